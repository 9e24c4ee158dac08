/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Keys the engine polls while a game is running.
use core::convert::TryFrom;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromI32KeycodeError(pub i32);

macro_rules! keycodes {
    ($($key:ident = $n:literal),*) => {
        /// A key of the emulated cabinet's keyboard, as queried by the engine.
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Keycode {
            $($key = $n),*
        }

        impl Keycode {
            /// All keycodes in ascending order.
            pub const ALL: &'static [Keycode] = &[$(Keycode::$key),*];
        }

        impl TryFrom<i32> for Keycode {
            type Error = TryFromI32KeycodeError;
            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($n => Ok(Keycode::$key),)*
                    _ => Err(TryFromI32KeycodeError(code))
                }
            }
        }
    };
}

keycodes! {
    A              = 0,
    B              = 1,
    C              = 2,
    D              = 3,
    E              = 4,
    F              = 5,
    G              = 6,
    H              = 7,
    I              = 8,
    J              = 9,
    K              = 10,
    L              = 11,
    M              = 12,
    N              = 13,
    O              = 14,
    P              = 15,
    Q              = 16,
    R              = 17,
    S              = 18,
    T              = 19,
    U              = 20,
    V              = 21,
    W              = 22,
    X              = 23,
    Y              = 24,
    Z              = 25,
    Number0        = 26,
    Number1        = 27,
    Number2        = 28,
    Number3        = 29,
    Number4        = 30,
    Number5        = 31,
    Number6        = 32,
    Number7        = 33,
    Number8        = 34,
    Number9        = 35,
    Keypad0        = 36,
    Keypad1        = 37,
    Keypad2        = 38,
    Keypad3        = 39,
    Keypad4        = 40,
    Keypad5        = 41,
    Keypad6        = 42,
    Keypad7        = 43,
    Keypad8        = 44,
    Keypad9        = 45,
    F1             = 46,
    F2             = 47,
    F3             = 48,
    F4             = 49,
    F5             = 50,
    F6             = 51,
    F7             = 52,
    F8             = 53,
    F9             = 54,
    F10            = 55,
    F11            = 56,
    F12            = 57,
    Escape         = 58,
    Tilde          = 59,
    Minus          = 60,
    Equals         = 61,
    Backspace      = 62,
    Tab            = 63,
    OpenBrace      = 64,
    CloseBrace     = 65,
    Enter          = 66,
    Colon          = 67,
    Quote          = 68,
    Backslash      = 69,
    Backslash2     = 70,
    Comma          = 71,
    Stop           = 72,
    Slash          = 73,
    Space          = 74,
    Insert         = 75,
    Delete         = 76,
    Home           = 77,
    End            = 78,
    PageUp         = 79,
    PageDown       = 80,
    Left           = 81,
    Right          = 82,
    Up             = 83,
    Down           = 84,
    KeypadSlash    = 85,
    KeypadAsterisk = 86,
    KeypadMinus    = 87,
    KeypadPlus     = 88,
    KeypadDelete   = 89,
    KeypadEnter    = 90,
    PrintScreen    = 91,
    Pause          = 92,
    LeftShift      = 93,
    RightShift     = 94,
    LeftControl    = 95,
    RightControl   = 96,
    LeftAlt        = 97,
    RightAlt       = 98,
    ScrollLock     = 99,
    NumLock        = 100,
    CapsLock       = 101,
    LeftSuper      = 102,
    RightSuper     = 103,
    Menu           = 104
}

impl Keycode {
    /// Returns the native code of this key.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<Keycode> for i32 {
    fn from(key: Keycode) -> i32 {
        key.code()
    }
}

impl std::error::Error for TryFromI32KeycodeError {}

impl fmt::Display for TryFromI32KeycodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer ({}) is not a valid `Keycode`", self.0)
    }
}
