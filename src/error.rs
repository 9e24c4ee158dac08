/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
use crate::config::ConfigError;
use crate::status::Status;

pub type Result<T> = core::result::Result<T, PinMameError>;

/// The error type of the [PinMame][crate::PinMame] handle.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PinMameError {
    /// The operation isn't allowed in the current state, e.g. starting a game while
    /// another one is running.
    #[error("{0}")]
    InvalidOperation(&'static str),
    #[error("game not found: {0}")]
    GameNotFound(String),
    /// The engine refused a command.
    #[error("unable to {operation}, status={status}")]
    Status {
        operation: &'static str,
        status: Status,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PinMameError {
    /// Maps a non-OK status of `operation` to an error.
    pub fn from_status(operation: &'static str, status: Status) -> Self {
        PinMameError::Status { operation, status }
    }

    /// Returns the engine status embedded in this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            PinMameError::Status { status, .. } => Some(*status),
            PinMameError::GameNotFound(..) => Some(Status::GameNotFound),
            _ => None
        }
    }
}
