/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Audio stream parameters and sample buffers.
use core::convert::TryFrom;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// The sample format the engine renders audio in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AudioFormat {
    #[default]
    Int16 = 0,
    Float = 1,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromI32AudioFormatError(pub i32);

/// The parameters of the audio stream of a running game.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    pub format: AudioFormat,
    pub channels: u32,
    pub sample_rate: f64,
    pub frames_per_second: f64,
    pub samples_per_frame: u32,
    pub buffer_size: u32,
}

/// The native layout of the audio stream parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct RawAudioInfo {
    pub format: i32,
    pub channels: i32,
    pub sample_rate: f64,
    pub frames_per_second: f64,
    pub samples_per_frame: i32,
    pub buffer_size: i32,
}

/// A borrowed view of interleaved samples delivered by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioSamples<'a> {
    I16(&'a [i16]),
    F32(&'a [f32]),
}

impl AudioInfo {
    /// Creates stream parameters from the native struct.
    pub fn from_raw(raw: &RawAudioInfo) -> Result<Self, TryFromI32AudioFormatError> {
        Ok(AudioInfo {
            format: AudioFormat::try_from(raw.format)?,
            channels: u32::try_from(raw.channels).unwrap_or(0),
            sample_rate: raw.sample_rate,
            frames_per_second: raw.frames_per_second,
            samples_per_frame: u32::try_from(raw.samples_per_frame).unwrap_or(0),
            buffer_size: u32::try_from(raw.buffer_size).unwrap_or(0),
        })
    }

    /// The size in bytes of a single sample of one channel.
    pub fn sample_size(&self) -> usize {
        self.format.sample_size()
    }
}

impl AudioFormat {
    pub fn sample_size(self) -> usize {
        match self {
            AudioFormat::Int16 => core::mem::size_of::<i16>(),
            AudioFormat::Float => core::mem::size_of::<f32>(),
        }
    }
}

impl<'a> AudioSamples<'a> {
    /// Returns the number of samples, counting each channel separately.
    pub fn len(&self) -> usize {
        match self {
            AudioSamples::I16(samples) => samples.len(),
            AudioSamples::F32(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> AudioFormat {
        match self {
            AudioSamples::I16(..) => AudioFormat::Int16,
            AudioSamples::F32(..) => AudioFormat::Float,
        }
    }

    /// Returns an iterator of samples converted to `f32` in the range `[-1.0, 1.0]`.
    pub fn iter_f32(&self) -> impl Iterator<Item=f32> + 'a {
        let ints: &'a [i16] = match *self {
            AudioSamples::I16(samples) => samples,
            _ => &[]
        };
        let floats: &'a [f32] = match *self {
            AudioSamples::F32(samples) => samples,
            _ => &[]
        };
        ints.iter().map(|&sample| sample as f32 / 32768.0)
            .chain(floats.iter().copied())
    }
}

impl std::error::Error for TryFromI32AudioFormatError {}

impl fmt::Display for TryFromI32AudioFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer ({}) is not a valid `AudioFormat`", self.0)
    }
}

impl TryFrom<i32> for AudioFormat {
    type Error = TryFromI32AudioFormatError;
    fn try_from(format: i32) -> core::result::Result<Self, Self::Error> {
        match format {
            0 => Ok(AudioFormat::Int16),
            1 => Ok(AudioFormat::Float),
            _ => Err(TryFromI32AudioFormatError(format))
        }
    }
}

impl From<AudioFormat> for i32 {
    fn from(format: AudioFormat) -> i32 {
        format as i32
    }
}
