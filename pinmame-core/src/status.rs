/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Status codes returned by the engine's command-style calls.
use core::fmt;

/// A status code reported by the native engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    ConfigNotSet,
    GameNotFound,
    GameAlreadyRunning,
    EmulatorNotRunning,
    /// A mech can't be configured while the engine simulates mechanics itself.
    MechHandleMechanics,
    MechNoInvalid,
    /// A code this crate doesn't know about.
    Unknown(i32),
}

impl Status {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Status::Ok,
            1 => Status::ConfigNotSet,
            2 => Status::GameNotFound,
            3 => Status::GameAlreadyRunning,
            4 => Status::EmulatorNotRunning,
            5 => Status::MechHandleMechanics,
            6 => Status::MechNoInvalid,
            code => Status::Unknown(code)
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::ConfigNotSet => 1,
            Status::GameNotFound => 2,
            Status::GameAlreadyRunning => 3,
            Status::EmulatorNotRunning => 4,
            Status::MechHandleMechanics => 5,
            Status::MechNoInvalid => 6,
            Status::Unknown(code) => code
        }
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Returns `Ok(())` for [Status::Ok] and `Err(self)` otherwise.
    #[inline]
    pub fn into_result(self) -> Result<(), Status> {
        match self {
            Status::Ok => Ok(()),
            status => Err(status)
        }
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status::from_code(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> i32 {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::ConfigNotSet => f.write_str("CONFIG_NOT_SET"),
            Status::GameNotFound => f.write_str("GAME_NOT_FOUND"),
            Status::GameAlreadyRunning => f.write_str("GAME_ALREADY_RUNNING"),
            Status::EmulatorNotRunning => f.write_str("EMULATOR_NOT_RUNNING"),
            Status::MechHandleMechanics => f.write_str("MECH_HANDLE_MECHANICS"),
            Status::MechNoInvalid => f.write_str("MECH_NO_INVALID"),
            Status::Unknown(code) => write!(f, "UNKNOWN({})", code)
        }
    }
}
