/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::hardware::HardwareGen;

/// A fixed mapping from raw DMD brightness bytes to display shades.
///
/// The engine delivers dot matrix frames as one raw brightness byte per pixel. Which
/// bytes may appear depends on the bit depth and on the hardware family:
///
/// * [DmdLevels::Wpc] - 2-bit displays, 4 shades,
/// * [DmdLevels::Sam] - 4-bit Stern SAM and Stern Pinball Arcade displays, 16 shades,
/// * [DmdLevels::Gts3] - every other 4-bit display, 16 shades.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DmdLevels {
    Wpc,
    Sam,
    Gts3,
}

/// A raw brightness byte that is not a member of the selected level table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownBrightnessError {
    pub levels: DmdLevels,
    pub raw: u8,
}

const NO_SHADE: u8 = u8::MAX;

const WPC_RAW: [u8; 5] = [0x00, 0x14, 0x21, 0x43, 0x64];
const WPC_SHADES: [u8; 5] = [0, 0, 1, 2, 3];

const SAM_RAW: [u8; 16] = [
    0x00, 0x14, 0x19, 0x1E, 0x23, 0x28, 0x2D, 0x32,
    0x37, 0x3C, 0x41, 0x46, 0x4B, 0x50, 0x5A, 0x64];

const GTS3_RAW: [u8; 16] = [
    0x00, 0x1E, 0x23, 0x28, 0x2D, 0x32, 0x37, 0x3C,
    0x41, 0x46, 0x4B, 0x50, 0x55, 0x5A, 0x5F, 0x64];

const SEQUENTIAL: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

const fn lookup_table(raw: &[u8], shades: &[u8]) -> [u8; 256] {
    let mut table = [NO_SHADE; 256];
    let mut i = 0;
    while i < raw.len() {
        table[raw[i] as usize] = shades[i];
        i += 1;
    }
    table
}

static WPC_TABLE: [u8; 256] = lookup_table(&WPC_RAW, &WPC_SHADES);
static SAM_TABLE: [u8; 256] = lookup_table(&SAM_RAW, &SEQUENTIAL);
static GTS3_TABLE: [u8; 256] = lookup_table(&GTS3_RAW, &SEQUENTIAL);

impl DmdLevels {
    /// Selects the level table for a dot matrix display of the given bit `depth`
    /// on `hardware_gen` hardware.
    pub fn select(depth: u8, hardware_gen: HardwareGen) -> Self {
        if depth == 2 {
            DmdLevels::Wpc
        }
        else if hardware_gen.is_sam() {
            DmdLevels::Sam
        }
        else {
            DmdLevels::Gts3
        }
    }

    /// Returns the number of distinct shades.
    pub fn shades(self) -> u8 {
        match self {
            DmdLevels::Wpc => 4,
            _ => 16
        }
    }

    /// Returns the raw brightness bytes this table accepts, in ascending order.
    pub fn raw_levels(self) -> &'static [u8] {
        match self {
            DmdLevels::Wpc => &WPC_RAW,
            DmdLevels::Sam => &SAM_RAW,
            DmdLevels::Gts3 => &GTS3_RAW,
        }
    }

    /// Returns an iterator of `(raw, shade)` pairs.
    pub fn iter(self) -> impl Iterator<Item=(u8, u8)> {
        let table = self.table();
        self.raw_levels().iter().map(move |&raw| (raw, table[raw as usize]))
    }

    /// Maps a raw brightness byte to a shade in `0..self.shades()`.
    #[inline]
    pub fn shade(self, raw: u8) -> Result<u8, UnknownBrightnessError> {
        match self.table()[raw as usize] {
            NO_SHADE => Err(UnknownBrightnessError { levels: self, raw }),
            shade => Ok(shade)
        }
    }

    /// Decodes a whole frame of raw brightness bytes into `shades`, replacing its content.
    ///
    /// On error `shades` holds the pixels decoded before the offending byte.
    pub fn decode_into(self, frame: &[u8], shades: &mut Vec<u8>) -> Result<(), UnknownBrightnessError> {
        shades.clear();
        shades.reserve(frame.len());
        let table = self.table();
        for &raw in frame {
            match table[raw as usize] {
                NO_SHADE => return Err(UnknownBrightnessError { levels: self, raw }),
                shade => shades.push(shade)
            }
        }
        Ok(())
    }

    /// Decodes a whole frame of raw brightness bytes.
    pub fn decode(self, frame: &[u8]) -> Result<Vec<u8>, UnknownBrightnessError> {
        let mut shades = Vec::new();
        self.decode_into(frame, &mut shades)?;
        Ok(shades)
    }

    #[inline(always)]
    fn table(self) -> &'static [u8; 256] {
        match self {
            DmdLevels::Wpc => &WPC_TABLE,
            DmdLevels::Sam => &SAM_TABLE,
            DmdLevels::Gts3 => &GTS3_TABLE,
        }
    }
}

impl std::error::Error for UnknownBrightnessError {}

impl fmt::Display for UnknownBrightnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "raw brightness (0x{:02x}) is not a {:?} DMD level", self.raw, self.levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmd_levels_select_works() {
        assert_eq!(DmdLevels::select(2, HardwareGen::WPC_DMD), DmdLevels::Wpc);
        assert_eq!(DmdLevels::select(2, HardwareGen::SAM), DmdLevels::Wpc);
        assert_eq!(DmdLevels::select(4, HardwareGen::SAM), DmdLevels::Sam);
        assert_eq!(DmdLevels::select(4, HardwareGen::SPA), DmdLevels::Sam);
        assert_eq!(DmdLevels::select(4, HardwareGen::GTS3), DmdLevels::Gts3);
        assert_eq!(DmdLevels::select(4, HardwareGen::WS), DmdLevels::Gts3);
        assert_eq!(DmdLevels::select(4, HardwareGen::empty()), DmdLevels::Gts3);
    }

    #[test]
    fn wpc_levels_work() {
        let levels = DmdLevels::Wpc;
        assert_eq!(levels.shades(), 4);
        assert_eq!(levels.shade(0x00), Ok(0));
        assert_eq!(levels.shade(0x14), Ok(0));
        assert_eq!(levels.shade(0x21), Ok(1));
        assert_eq!(levels.shade(0x43), Ok(2));
        assert_eq!(levels.shade(0x64), Ok(3));
        assert_eq!(levels.shade(0x22), Err(UnknownBrightnessError { levels, raw: 0x22 }));
        assert_eq!(levels.shade(0xff), Err(UnknownBrightnessError { levels, raw: 0xff }));
    }

    #[test]
    fn sixteen_shade_levels_work() {
        for levels in [DmdLevels::Sam, DmdLevels::Gts3] {
            assert_eq!(levels.shades(), 16);
            let shades: Vec<u8> = levels.iter().map(|(_, shade)| shade).collect();
            assert_eq!(shades, (0..16).collect::<Vec<u8>>());
            for raw in 0..=255u8 {
                match levels.shade(raw) {
                    Ok(shade) => assert_eq!(levels.raw_levels()[shade as usize], raw),
                    Err(err) => {
                        assert!(!levels.raw_levels().contains(&raw));
                        assert_eq!(err.raw, raw);
                    }
                }
            }
        }
        assert_eq!(DmdLevels::Sam.shade(0x14), Ok(1));
        assert!(DmdLevels::Gts3.shade(0x14).is_err());
        assert_eq!(DmdLevels::Gts3.shade(0x55), Ok(12));
        assert!(DmdLevels::Sam.shade(0x55).is_err());
        assert_eq!(DmdLevels::Sam.shade(0x5A), Ok(14));
        assert_eq!(DmdLevels::Gts3.shade(0x5A), Ok(13));
    }

    #[test]
    fn decode_frame_works() {
        let frame = [0x00, 0x14, 0x21, 0x43, 0x64, 0x43];
        assert_eq!(DmdLevels::Wpc.decode(&frame), Ok(vec![0, 0, 1, 2, 3, 2]));

        let mut shades = vec![9; 2];
        let err = DmdLevels::Wpc.decode_into(&[0x21, 0x64, 0x50, 0x00], &mut shades).unwrap_err();
        assert_eq!(err.raw, 0x50);
        assert_eq!(shades, [1, 3]);
        assert_eq!(err.to_string(), "raw brightness (0x50) is not a Wpc DMD level");
    }
}
