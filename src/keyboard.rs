/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! A key state set for answering the engine's key polls.
use core::sync::atomic::{AtomicU64, Ordering};

use crate::keycode::Keycode;

/// The set of currently pressed keys.
///
/// Updated from the host's input thread and read by the engine's emulation thread
/// without locking.
///
/// ```
/// use pinmame::{PressedKeys, Keycode};
///
/// let keys = PressedKeys::new();
/// keys.press(Keycode::Number5);
/// assert!(keys.is_pressed(Keycode::Number5));
/// keys.release(Keycode::Number5);
/// assert!(!keys.is_pressed(Keycode::Number5));
/// ```
#[derive(Debug, Default)]
pub struct PressedKeys {
    bits: [AtomicU64; 2],
}

impl PressedKeys {
    pub const fn new() -> Self {
        PressedKeys { bits: [AtomicU64::new(0), AtomicU64::new(0)] }
    }

    #[inline]
    fn slot(key: Keycode) -> (usize, u64) {
        let code = key as usize;
        (code >> 6, 1 << (code & 63))
    }

    pub fn press(&self, key: Keycode) {
        let (index, mask) = Self::slot(key);
        self.bits[index].fetch_or(mask, Ordering::Relaxed);
    }

    pub fn release(&self, key: Keycode) {
        let (index, mask) = Self::slot(key);
        self.bits[index].fetch_and(!mask, Ordering::Relaxed);
    }

    /// Presses or releases `key`.
    pub fn set(&self, key: Keycode, pressed: bool) {
        if pressed {
            self.press(key)
        }
        else {
            self.release(key)
        }
    }

    pub fn is_pressed(&self, key: Keycode) -> bool {
        let (index, mask) = Self::slot(key);
        self.bits[index].load(Ordering::Relaxed) & mask != 0
    }

    pub fn release_all(&self) {
        for bits in self.bits.iter() {
            bits.store(0, Ordering::Relaxed);
        }
    }

    /// Returns an iterator of the keys pressed at the time of the call.
    pub fn pressed(&self) -> impl Iterator<Item=Keycode> + '_ {
        let snapshot = [self.bits[0].load(Ordering::Relaxed), self.bits[1].load(Ordering::Relaxed)];
        Keycode::ALL.iter().copied().filter(move |&key| {
            let (index, mask) = Self::slot(key);
            snapshot[index] & mask != 0
        })
    }
}
