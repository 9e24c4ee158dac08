/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Pinball hardware generations.
use core::convert::TryFrom;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use bitflags::bitflags;

bitflags! {
    /// The family of control-board hardware a ROM targets.
    ///
    /// The engine reports the generation of the running game as a single 64-bit mask.
    /// Test for a platform with [HardwareGen::intersects]; the `ALL_*` family groups
    /// defined on this type set more than one bit.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct HardwareGen: u64 {
        /// Alpha-numeric display, S11 sound, Dr Dude 10/90
        const WPC_ALPHA_1   = 0x0000000000001;
        /// Alpha-numeric display, The Machine BOP 4/91
        const WPC_ALPHA_2   = 0x0000000000002;
        /// Dot Matrix Display, Terminator 2 7/91 - Party Zone 10/91
        const WPC_DMD       = 0x0000000000004;
        /// Fliptronic flippers, Addams Family 2/92 - Twilight Zone 5/93
        const WPC_FLIPTRON  = 0x0000000000008;
        /// DCS sound system, Indiana Jones 10/93 - Popeye 3/94
        const WPC_DCS       = 0x0000000000010;
        /// Security chip, World Cup Soccer 3/94 - Jackbot 10/95
        const WPC_SECURITY  = 0x0000000000020;
        /// Hybrid WPC95 driver + DCS sound, Who Dunnit
        const WPC95_DCS     = 0x0000000000040;
        /// Integrated boards, Congo 3/96 - Cactus Canyon 2/99
        const WPC95         = 0x0000000000080;
        /// S11C sound board
        const S11X          = 0x0000000000100;
        /// Jokerz! sound board
        const S11B2         = 0x0000000000200;
        /// No CPU board sound
        const S11C          = 0x0000000000400;
        /// S9 CPU, 4x7+1x4
        const S9            = 0x0000000000800;
        /// DE AlphaSeg
        const DE            = 0x0000000001000;
        /// DE 128x16
        const DE_DMD16      = 0x0000000002000;
        /// DE 128x32
        const DE_DMD32      = 0x0000000004000;
        /// DE 192x64
        const DE_DMD64      = 0x0000000008000;
        /// S7 CPU
        const S7            = 0x0000000010000;
        /// S6 CPU
        const S6            = 0x0000000020000;
        /// S4 CPU
        const S4            = 0x0000000040000;
        /// S3 CPU, no chimes
        const S3C           = 0x0000000080000;
        const S3            = 0x0000000100000;
        const BY17          = 0x0000000200000;
        const BY35          = 0x0000000400000;
        /// Stern MPU-100
        const STMPU100      = 0x0000000800000;
        /// Stern MPU-200
        const STMPU200      = 0x0000001000000;
        /// Unknown Astro game, Stern hardware
        const ASTRO         = 0x0000002000000;
        /// Hankin
        const HNK           = 0x0000004000000;
        /// Bally Bow & Arrow prototype
        const BY_PROTO      = 0x0000008000000;
        const BY6803        = 0x0000010000000;
        const BY6803A       = 0x0000020000000;
        /// Big Ball Bowling, Stern hardware
        const BOWLING       = 0x0000040000000;
        /// No external sound board
        const S11           = 0x0000080000000;
        const GTS1          = 0x0000100000000;
        const GTS80         = 0x0000200000000;
        const GTS80B        = 0x0000400000000;
        /// Whitestar
        const WS            = 0x0004000000000;
        /// Whitestar with extra RAM
        const WS_1          = 0x0008000000000;
        /// Whitestar with extra DMD
        const WS_2          = 0x0010000000000;
        const GTS3          = 0x0020000000000;
        const ZAC1          = 0x0040000000000;
        const ZAC2          = 0x0080000000000;
        /// Stern S.A.M.
        const SAM           = 0x0100000000000;
        /// Alvin G hardware
        const ALVG          = 0x0200000000000;
        /// Alvin G hardware, with more shades
        const ALVG_DMD2     = 0x0400000000000;
        /// Mr. Game hardware
        const MRGAME        = 0x0800000000000;
        /// Sleic hardware
        const SLEIC         = 0x1000000000000;
        /// Wico hardware
        const WICO          = 0x2000000000000;
        /// Stern Pinball Arcade
        const SPA           = 0x4000000000000;
    }
}

impl HardwareGen {
    pub const S11A: Self = Self::S11X;
    pub const S11B: Self = Self::S11X;
    pub const GTS80A: Self = Self::GTS80;
    /// All WPC generations.
    pub const ALL_WPC: Self = Self::from_bits_retain(0x00000000000ff);
    /// All System 11 generations.
    pub const ALL_S11: Self = Self::from_bits_retain(0x000008000ff00);
    /// All Bally 35 generations and derivatives.
    pub const ALL_BY35: Self = Self::from_bits_retain(0x0000047e00000);
    /// All Gottlieb System 80 generations.
    pub const ALL_S80: Self = Self::from_bits_retain(0x0000600000000);
    /// All Whitestar generations.
    pub const ALL_WS: Self = Self::from_bits_retain(0x001c000000000);
    /// Generations whose 16-shade DMDs are decoded with the Stern SAM brightness table.
    pub const SAM_LEVELS: Self = Self::from_bits_retain(Self::SAM.bits() | Self::SPA.bits());

    /// Creates flags from the raw value reported by the engine, dropping undefined bits.
    #[inline]
    pub fn from_data(data: u64) -> Self {
        Self::from_bits_retain(data) & Self::all()
    }

    /// Returns `true` if any of the WPC generation bits is set.
    pub fn is_wpc(self) -> bool {
        self.intersects(Self::ALL_WPC)
    }

    /// Returns `true` if the Stern SAM or Stern Pinball Arcade bit is set.
    pub fn is_sam(self) -> bool {
        self.intersects(Self::SAM_LEVELS)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU64HardwareGenError(pub u64);

impl std::error::Error for TryFromU64HardwareGenError {}

impl fmt::Display for TryFromU64HardwareGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer (0x{:x}) contains extraneous bits for `HardwareGen`", self.0)
    }
}

impl TryFrom<u64> for HardwareGen {
    type Error = TryFromU64HardwareGenError;
    fn try_from(data: u64) -> core::result::Result<Self, Self::Error> {
        HardwareGen::from_bits(data).ok_or(TryFromU64HardwareGenError(data))
    }
}

impl From<HardwareGen> for u64 {
    fn from(gen: HardwareGen) -> u64 {
        gen.bits()
    }
}
