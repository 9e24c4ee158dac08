/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Display layouts announced by the engine and the frame buffers they describe.
use core::convert::TryFrom;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::hardware::HardwareGen;

mod levels;

pub use levels::*;

/// The base kind of a display panel.
///
/// Discriminants are the base type values of the native display type field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplayKind {
    /// 14 segments with period and comma, both toggled at the same time.
    Seg16  = 0,
    /// 16 segments with comma and period reversed.
    Seg16R = 1,
    /// 9 segments and comma.
    Seg10  = 2,
    /// 9 segments.
    Seg9   = 3,
    /// 7 segments and comma.
    Seg8   = 4,
    /// 7 segments and period.
    Seg8D  = 5,
    /// 7 segments.
    Seg7   = 6,
    /// 7 segments, comma every three.
    Seg87  = 7,
    /// 7 segments, forced comma every three.
    Seg87F = 8,
    /// 9 segments, comma every three.
    Seg98  = 9,
    /// 9 segments, forced comma every three.
    Seg98F = 10,
    /// 7 segments, small.
    Seg7S  = 11,
    /// 7 segments, small, with comma.
    Seg7SC = 12,
    /// 16 segments with split top and bottom line.
    Seg16S = 13,
    /// Dot matrix display.
    Dmd    = 14,
    /// Video display.
    Video  = 15,
    /// 16 segments without commas.
    Seg16N = 16,
    /// 16 segments with periods only.
    Seg16D = 17,
    /// Link to another display layout.
    Import = 0x20,
}

/// A display type: the base [DisplayKind] with its orthogonal modifiers.
///
/// The native engine packs all of this into a single integer; see [DisplayType::from_bits]
/// and [DisplayType::bits] for the conversion at the ABI boundary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayType {
    pub kind: DisplayKind,
    /// Comma and period are reversed.
    pub reversed: bool,
    /// The high-bit variant of a segment display (`SEG8H`, `SEG7H`, ...).
    pub high_bit: bool,
    /// A dot matrix display rendered without anti-aliasing.
    pub no_antialias: bool,
    /// The display exists but is not shown.
    pub not_displayed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU32DisplayTypeError(pub u32);

/// The layout of a single display as announced by the engine, mirroring the native struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawDisplayLayout {
    pub display_type: i32,
    pub top: i32,
    pub left: i32,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

/// An immutable description of one physical display.
///
/// Created by the dispatcher each time a display is announced or updated. For dot matrix
/// displays the brightness [levels][DisplayLayout::levels] are selected once, from the bit
/// depth and the hardware generation active at that moment.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayLayout {
    display_type: DisplayType,
    top: i32,
    left: i32,
    length: u32,
    width: u32,
    height: u32,
    depth: u8,
    levels: Option<DmdLevels>,
}

/// A borrowed view of a display frame buffer, interpreted by the [DisplayLayout] geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFrame<'a> {
    /// `width * height` raw brightness bytes of a dot matrix or video display, row by row.
    Pixels(&'a [u8]),
    /// One 16-bit segment word per character cell of a segment display.
    Segments(&'a [u16]),
}

impl DisplayType {
    pub const SEG_MASK: u32    = 0x03f;
    pub const SEG_HIBIT: u32   = 0x040;
    pub const SEG_REV: u32     = 0x080;
    pub const DMD_NOAA: u32    = 0x100;
    pub const NO_DISP: u32     = 0x200;
    const ALL_FLAGS: u32 = Self::SEG_MASK|Self::SEG_HIBIT|Self::SEG_REV|Self::DMD_NOAA|Self::NO_DISP;

    /// Creates a display type of the given `kind` with no modifiers.
    pub const fn new(kind: DisplayKind) -> Self {
        DisplayType { kind, reversed: false, high_bit: false, no_antialias: false, not_displayed: false }
    }

    /// Unpacks the native display type value.
    pub fn from_bits(bits: u32) -> Result<Self, TryFromU32DisplayTypeError> {
        if bits & !Self::ALL_FLAGS != 0 {
            return Err(TryFromU32DisplayTypeError(bits))
        }
        let kind = DisplayKind::try_from((bits & Self::SEG_MASK) as u8)
                   .map_err(|_| TryFromU32DisplayTypeError(bits))?;
        Ok(DisplayType {
            kind,
            reversed: bits & Self::SEG_REV != 0,
            high_bit: bits & Self::SEG_HIBIT != 0,
            no_antialias: bits & Self::DMD_NOAA != 0,
            not_displayed: bits & Self::NO_DISP != 0,
        })
    }

    /// Packs this type back into the native display type value.
    pub fn bits(self) -> u32 {
        let mut bits = self.kind as u32;
        if self.reversed {
            bits |= Self::SEG_REV;
        }
        if self.high_bit {
            bits |= Self::SEG_HIBIT;
        }
        if self.no_antialias {
            bits |= Self::DMD_NOAA;
        }
        if self.not_displayed {
            bits |= Self::NO_DISP;
        }
        bits
    }

    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn with_high_bit(mut self, high_bit: bool) -> Self {
        self.high_bit = high_bit;
        self
    }

    pub fn with_no_antialias(mut self, no_antialias: bool) -> Self {
        self.no_antialias = no_antialias;
        self
    }

    pub fn with_not_displayed(mut self, not_displayed: bool) -> Self {
        self.not_displayed = not_displayed;
        self
    }

    #[inline]
    pub fn is_dmd(self) -> bool {
        self.kind == DisplayKind::Dmd
    }

    #[inline]
    pub fn is_video(self) -> bool {
        self.kind == DisplayKind::Video
    }

    /// Returns `true` for alphanumeric and numeric segment displays.
    #[inline]
    pub fn is_segmented(self) -> bool {
        !matches!(self.kind, DisplayKind::Dmd|DisplayKind::Video|DisplayKind::Import)
    }
}

impl DisplayLayout {
    /// Creates a layout from the native struct.
    ///
    /// `hardware_gen` should be the generation of the running game; it only matters for
    /// dot matrix displays deeper than 2 bits. Negative geometry values are treated as 0.
    pub fn new(raw: &RawDisplayLayout, hardware_gen: HardwareGen) -> Result<Self, TryFromU32DisplayTypeError> {
        let display_type = DisplayType::from_bits(raw.display_type as u32)?;
        let depth = u8::try_from(raw.depth).unwrap_or(0);
        let levels = if display_type.is_dmd() {
            Some(DmdLevels::select(depth, hardware_gen))
        }
        else {
            None
        };
        Ok(DisplayLayout {
            display_type,
            top: raw.top,
            left: raw.left,
            length: u32::try_from(raw.length).unwrap_or(0),
            width: u32::try_from(raw.width).unwrap_or(0),
            height: u32::try_from(raw.height).unwrap_or(0),
            depth,
            levels,
        })
    }

    pub fn display_type(&self) -> DisplayType {
        self.display_type
    }

    pub fn kind(&self) -> DisplayKind {
        self.display_type.kind
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    /// The number of character cells of a segment display.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per pixel of a dot matrix display.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The brightness decoder of a dot matrix display, `None` for every other kind.
    pub fn levels(&self) -> Option<DmdLevels> {
        self.levels
    }

    pub fn is_dmd(&self) -> bool {
        self.display_type.is_dmd()
    }

    /// Returns the number of elements in a frame buffer of this display.
    ///
    /// Bytes for dot matrix and video displays, 16-bit segment words otherwise.
    pub fn frame_len(&self) -> usize {
        match self.display_type.kind {
            DisplayKind::Dmd|DisplayKind::Video => self.width as usize * self.height as usize,
            _ => self.length as usize
        }
    }

    /// Returns `true` if frames of this display are delivered as [DisplayFrame::Pixels].
    pub fn has_pixel_frames(&self) -> bool {
        matches!(self.display_type.kind, DisplayKind::Dmd|DisplayKind::Video)
    }

    /// Packs this layout back into the native struct.
    pub fn to_raw(&self) -> RawDisplayLayout {
        RawDisplayLayout {
            display_type: self.display_type.bits() as i32,
            top: self.top,
            left: self.left,
            length: self.length as i32,
            width: self.width as i32,
            height: self.height as i32,
            depth: self.depth.into(),
        }
    }
}

impl<'a> DisplayFrame<'a> {
    /// Returns the number of elements in the frame.
    pub fn len(&self) -> usize {
        match self {
            DisplayFrame::Pixels(pixels) => pixels.len(),
            DisplayFrame::Segments(segments) => segments.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixels(&self) -> Option<&'a [u8]> {
        match self {
            DisplayFrame::Pixels(pixels) => Some(pixels),
            _ => None
        }
    }

    pub fn segments(&self) -> Option<&'a [u16]> {
        match self {
            DisplayFrame::Segments(segments) => Some(segments),
            _ => None
        }
    }

    /// Returns an iterator over pixel rows of `width` bytes, empty for segment frames.
    pub fn rows(&self, width: usize) -> impl Iterator<Item=&'a [u8]> {
        let pixels: &'a [u8] = self.pixels().unwrap_or(&[]);
        pixels.chunks_exact(width.max(1))
    }
}

/****************************** DisplayKind ******************************/

impl TryFrom<u8> for DisplayKind {
    type Error = TryFromU32DisplayTypeError;
    fn try_from(base: u8) -> core::result::Result<Self, Self::Error> {
        use DisplayKind::*;
        Ok(match base {
            0  => Seg16,
            1  => Seg16R,
            2  => Seg10,
            3  => Seg9,
            4  => Seg8,
            5  => Seg8D,
            6  => Seg7,
            7  => Seg87,
            8  => Seg87F,
            9  => Seg98,
            10 => Seg98F,
            11 => Seg7S,
            12 => Seg7SC,
            13 => Seg16S,
            14 => Dmd,
            15 => Video,
            16 => Seg16N,
            17 => Seg16D,
            0x20 => Import,
            _ => return Err(TryFromU32DisplayTypeError(base.into()))
        })
    }
}

impl From<DisplayKind> for &str {
    fn from(kind: DisplayKind) -> Self {
        use DisplayKind::*;
        match kind {
            Seg16  => "SEG16",
            Seg16R => "SEG16R",
            Seg10  => "SEG10",
            Seg9   => "SEG9",
            Seg8   => "SEG8",
            Seg8D  => "SEG8D",
            Seg7   => "SEG7",
            Seg87  => "SEG87",
            Seg87F => "SEG87F",
            Seg98  => "SEG98",
            Seg98F => "SEG98F",
            Seg7S  => "SEG7S",
            Seg7SC => "SEG7SC",
            Seg16S => "SEG16S",
            Dmd    => "DMD",
            Video  => "VIDEO",
            Seg16N => "SEG16N",
            Seg16D => "SEG16D",
            Import => "IMPORT",
        }
    }
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <&str>::from(*self).fmt(f)
    }
}

/****************************** DisplayType ******************************/

impl std::error::Error for TryFromU32DisplayTypeError {}

impl fmt::Display for TryFromU32DisplayTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer (0x{:x}) is not a valid `DisplayType`", self.0)
    }
}

impl TryFrom<u32> for DisplayType {
    type Error = TryFromU32DisplayTypeError;
    fn try_from(bits: u32) -> core::result::Result<Self, Self::Error> {
        DisplayType::from_bits(bits)
    }
}

impl From<DisplayType> for u32 {
    fn from(display_type: DisplayType) -> u32 {
        display_type.bits()
    }
}

impl From<DisplayKind> for DisplayType {
    fn from(kind: DisplayKind) -> Self {
        DisplayType::new(kind)
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        if self.high_bit {
            f.write_str("|HIBIT")?;
        }
        if self.reversed {
            f.write_str("|REV")?;
        }
        if self.no_antialias {
            f.write_str("|NOAA")?;
        }
        if self.not_displayed {
            f.write_str("|NODISP")?;
        }
        Ok(())
    }
}

/****************************** DisplayLayout ******************************/

impl fmt::Display for DisplayLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type={}, top={}, left={}, length={}, width={}, height={}, depth={}",
            self.display_type, self.top, self.left, self.length, self.width, self.height, self.depth)?;
        if let Some(levels) = self.levels {
            write!(f, ", levels={:?}", levels)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(display_type: u32, width: i32, height: i32, length: i32, depth: i32) -> RawDisplayLayout {
        RawDisplayLayout {
            display_type: display_type as i32,
            top: 0, left: 0,
            length, width, height, depth
        }
    }

    #[test]
    fn display_type_bits_work() {
        let seg8h = DisplayType::from_bits(4 | 0x40).unwrap();
        assert_eq!(seg8h.kind, DisplayKind::Seg8);
        assert!(seg8h.high_bit);
        assert!(!seg8h.reversed && !seg8h.no_antialias && !seg8h.not_displayed);
        assert_eq!(seg8h.bits(), 0x44);

        let dmd = DisplayType::from_bits(14 | 0x100 | 0x200).unwrap();
        assert!(dmd.is_dmd());
        assert!(dmd.no_antialias);
        assert!(dmd.not_displayed);
        assert_eq!(u32::from(dmd), 0x30e);

        let seg16r = DisplayType::new(DisplayKind::Seg16).with_reversed(true);
        assert_eq!(seg16r.bits(), 0x80);
        assert_eq!(DisplayType::try_from(0x80u32), Ok(seg16r));

        assert_eq!(DisplayType::from_bits(0x20).unwrap().kind, DisplayKind::Import);
        assert_eq!(DisplayType::from_bits(18), Err(TryFromU32DisplayTypeError(18)));
        assert_eq!(DisplayType::from_bits(0x1f), Err(TryFromU32DisplayTypeError(0x1f)));
        assert_eq!(DisplayType::from_bits(0x400 | 14), Err(TryFromU32DisplayTypeError(0x40e)));
    }

    #[test]
    fn display_type_kinds_work() {
        assert!(DisplayType::new(DisplayKind::Seg7).is_segmented());
        assert!(!DisplayType::new(DisplayKind::Video).is_segmented());
        assert!(DisplayType::new(DisplayKind::Video).is_video());
        assert!(!DisplayType::new(DisplayKind::Import).is_segmented());
        assert_eq!(DisplayType::new(DisplayKind::Seg7).with_high_bit(true).to_string(), "SEG7|HIBIT");
    }

    #[test]
    fn dmd_layout_has_levels() {
        let layout = DisplayLayout::new(&raw(14, 128, 32, 0, 2), HardwareGen::WPC95).unwrap();
        assert!(layout.is_dmd());
        assert_eq!(layout.levels(), Some(DmdLevels::Wpc));
        assert_eq!(layout.frame_len(), 128 * 32);
        assert!(layout.has_pixel_frames());

        let layout = DisplayLayout::new(&raw(14, 128, 32, 0, 4), HardwareGen::SAM).unwrap();
        assert_eq!(layout.levels(), Some(DmdLevels::Sam));
        let layout = DisplayLayout::new(&raw(14, 128, 32, 0, 4), HardwareGen::GTS3).unwrap();
        assert_eq!(layout.levels(), Some(DmdLevels::Gts3));
    }

    #[test]
    fn segment_layout_has_no_levels() {
        let layout = DisplayLayout::new(&raw(0, 0, 0, 16, 0), HardwareGen::WPC_ALPHA_2).unwrap();
        assert_eq!(layout.kind(), DisplayKind::Seg16);
        assert_eq!(layout.levels(), None);
        assert_eq!(layout.frame_len(), 16);
        assert!(!layout.has_pixel_frames());

        let layout = DisplayLayout::new(&raw(15, 256, 192, 0, 0), HardwareGen::MRGAME).unwrap();
        assert_eq!(layout.levels(), None);
        assert_eq!(layout.frame_len(), 256 * 192);
    }

    #[test]
    fn layout_raw_conversion_works() {
        let source = RawDisplayLayout {
            display_type: 14 | 0x100, top: 34, left: 10, length: 0, width: 192, height: 64, depth: 4
        };
        let layout = DisplayLayout::new(&source, HardwareGen::DE_DMD64).unwrap();
        assert_eq!(layout.top(), 34);
        assert_eq!(layout.left(), 10);
        assert_eq!(layout.to_raw(), source);

        let negative = RawDisplayLayout { width: -1, height: 32, display_type: 14, ..source };
        let layout = DisplayLayout::new(&negative, HardwareGen::DE_DMD64).unwrap();
        assert_eq!(layout.width(), 0);
        assert_eq!(layout.frame_len(), 0);
    }

    #[test]
    fn display_frame_works() {
        let pixels = [0u8, 0x14, 0x21, 0x43, 0x64, 0x00];
        let frame = DisplayFrame::Pixels(&pixels);
        assert_eq!(frame.len(), 6);
        assert_eq!(frame.segments(), None);
        let rows: Vec<&[u8]> = frame.rows(3).collect();
        assert_eq!(rows, [&pixels[..3], &pixels[3..]]);

        let words = [0x3fu16, 0x06];
        let frame = DisplayFrame::Segments(&words);
        assert_eq!(frame.segments(), Some(&words[..]));
        assert_eq!(frame.rows(2).count(), 0);
        assert!(!frame.is_empty());
    }
}
