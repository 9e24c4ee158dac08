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
//! The core data model of the PINMAME-RS bindings.
//!
//! Everything in this crate is plain data: the types mirror what the native engine
//! reports (games, display layouts, mech state, audio parameters) and what it accepts
//! (mech configurations, keycodes), together with the fixed DMD brightness tables.
pub mod audio;
pub mod display;
pub mod game;
pub mod hardware;
pub mod keycode;
pub mod mech;
pub mod status;
