/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    PINMAME-RS is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    PINMAME-RS is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! Rust bindings for **libpinmame**, the cross-platform PinMAME pinball ROM emulator.
//!
//! The emulator itself lives in a native library. This crate wraps it with:
//!
//! * the [PinMame] handle, which starts and stops games, forwards switch input, polls
//!   lamp, GI and solenoid changes and configures mechs,
//! * the [PinMameCallbacks] trait, through which a consumer receives life-cycle events,
//!   display frames, audio buffers and solenoid changes, and answers key polls,
//! * [PinMame::available_displays], which runs a game just long enough to learn the set
//!   of displays it uses,
//! * [PinMame::games], which builds the parent/clone catalog of supported games.
//!
//! The native library is reached through the [Engine] trait. With the `libpinmame`
//! feature enabled [native::LibPinMame] implements it by linking to the shared library;
//! tests and tools may provide their own implementation.
//!
//! ```no_run
//! # #[cfg(feature = "libpinmame")]
//! # fn main() -> Result<(), pinmame::PinMameError> {
//! use std::sync::Arc;
//! use pinmame::{Config, PinMame, NoCallbacks, native::LibPinMame};
//!
//! let pinmame = PinMame::new(LibPinMame, Config::default(), Arc::new(NoCallbacks))?;
//! let displays = pinmame.available_displays("tz_94h")?;
//! for (index, layout) in &displays {
//!     println!("display {}: {}", index, layout);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "libpinmame"))]
//! # fn main() {}
//! ```
pub use pinmame_core::{audio, display, game, hardware, keycode, mech, status};

pub mod callbacks;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod keyboard;
mod dispatch;
mod pinmame;
mod probe;

#[cfg(feature = "libpinmame")]
pub mod native;

pub use audio::{AudioFormat, AudioInfo, AudioSamples};
pub use callbacks::{PinMameCallbacks, NoCallbacks};
pub use catalog::CatalogBuilder;
pub use config::{Config, ConfigError};
pub use display::{DisplayFrame, DisplayKind, DisplayLayout, DisplayType, DmdLevels};
pub use engine::{Engine, EngineConfig, EngineEvents};
pub use error::{PinMameError, Result};
pub use game::{Game, GameDriverFlags, GameInfo};
pub use hardware::HardwareGen;
pub use keyboard::PressedKeys;
pub use keycode::Keycode;
pub use mech::{MechConfig, MechFlags, MechInfo, MechSwitchConfig};
pub use pinmame::{PinMame, StateChange};
pub use status::Status;
