/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Game records enumerated by the engine.
use core::cmp::Ordering;
use core::convert::TryFrom;
use core::fmt;
use core::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use bitflags::bitflags;

bitflags! {
    /// Driver flags of a game record.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
    #[derive(Default, Debug, PartialEq, Eq, Hash, Clone, Copy)]
    pub struct GameDriverFlags: u32 {
        /// Mirror everything in the X direction.
        const ORIENTATION_FLIP_X         = 0x0001;
        /// Mirror everything in the Y direction.
        const ORIENTATION_FLIP_Y         = 0x0002;
        /// Mirror along the top-left/bottom-right diagonal.
        const ORIENTATION_SWAP_XY        = 0x0004;
        const GAME_NOT_WORKING           = 0x0008;
        /// The game's protection is not fully emulated.
        const GAME_UNEMULATED_PROTECTION = 0x0010;
        const GAME_WRONG_COLORS          = 0x0020;
        const GAME_IMPERFECT_COLORS      = 0x0040;
        const GAME_IMPERFECT_GRAPHICS    = 0x0080;
        /// Screen flip support is missing.
        const GAME_NO_COCKTAIL           = 0x0100;
        const GAME_NO_SOUND              = 0x0200;
        const GAME_IMPERFECT_SOUND       = 0x0400;
        /// Set by the fake root driver and by containers.
        const NOT_A_DRIVER               = 0x4000;
    }
}

impl GameDriverFlags {
    pub const ORIENTATION_MASK: Self = Self::from_bits_retain(0x0007);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU32GameDriverFlagsError(pub u32);

/// A single game record as reported by the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameInfo {
    /// The ROM id, the name of the zipped ROM file.
    pub name: String,
    /// The full title of the game, including its variant.
    pub description: String,
    /// The release year; free-form, e.g. `198?`.
    pub year: String,
    pub manufacturer: String,
    pub flags: GameDriverFlags,
    /// `true` if the ROM file was found on disk.
    pub rom_found: bool,
    /// The name of the parent game, empty for a parent.
    pub clone_of: String,
}

/// A game of the catalog, together with its clones.
///
/// Clones are ROMs of the same game in different versions. They are kept sorted by
/// description.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
    info: GameInfo,
    clones: Vec<Game>,
}

impl GameInfo {
    /// Returns `true` if any of the given `flags` is set on this game.
    #[inline]
    pub fn has_flag(&self, flags: GameDriverFlags) -> bool {
        self.flags.intersects(flags)
    }

    /// Returns `true` if this record declares a parent.
    #[inline]
    pub fn is_clone(&self) -> bool {
        !self.clone_of.is_empty()
    }

    /// The catalog order: by description, then by name.
    pub fn cmp_by_description(&self, other: &GameInfo) -> Ordering {
        self.description.cmp(&other.description)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Game {
    /// Creates a game without clones.
    pub fn new(info: GameInfo) -> Self {
        Game { info, clones: Vec::new() }
    }

    /// Creates a game with the given clones, sorted by description.
    pub fn with_clones(info: GameInfo, mut clones: Vec<Game>) -> Self {
        clones.sort_by(|a, b| a.info.cmp_by_description(&b.info));
        Game { info, clones }
    }

    pub fn info(&self) -> &GameInfo {
        &self.info
    }

    /// The clones of this game, ordered by description.
    pub fn clones(&self) -> &[Game] {
        &self.clones
    }

    pub fn into_info(self) -> GameInfo {
        self.info
    }
}

impl Deref for Game {
    type Target = GameInfo;

    fn deref(&self) -> &Self::Target {
        &self.info
    }
}

impl From<GameInfo> for Game {
    fn from(info: GameInfo) -> Self {
        Game::new(info)
    }
}

impl fmt::Display for GameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name={}, description={}, year={}, manufacturer={}, flags=0x{:x}, found={}",
            self.name, self.description, self.year, self.manufacturer, self.flags.bits(), self.rom_found)
    }
}

impl std::error::Error for TryFromU32GameDriverFlagsError {}

impl fmt::Display for TryFromU32GameDriverFlagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer (0x{:x}) contains extraneous bits for `GameDriverFlags`", self.0)
    }
}

impl TryFrom<u32> for GameDriverFlags {
    type Error = TryFromU32GameDriverFlagsError;
    fn try_from(flags: u32) -> core::result::Result<Self, Self::Error> {
        GameDriverFlags::from_bits(flags).ok_or(TryFromU32GameDriverFlagsError(flags))
    }
}

impl From<GameDriverFlags> for u32 {
    fn from(flags: GameDriverFlags) -> u32 {
        flags.bits()
    }
}
