/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Configuration of the [PinMame][crate::PinMame] handle.
use std::env;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::Duration;

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::audio::AudioFormat;
use crate::engine::EngineConfig;

/// The environment variable consulted for the PinMAME root directory.
pub const VPM_PATH_ENV: &str = "PINMAME_PATH";
/// The name of the PinMAME root directory looked up in the user's home directory.
pub const VPM_HOME_DIR: &str = ".pinmame";
/// The capacity of the native path field, including the terminating NUL.
pub const MAX_VPM_PATH: usize = 512;

pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_DISPLAY_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not determine the PinMAME path, set {} or provide it explicitly", VPM_PATH_ENV)]
    NoVpmPath,
    #[error("could not find the PinMAME path: {} does not exist", .0.display())]
    VpmPathNotFound(PathBuf),
    #[error("the PinMAME path {} is not valid UTF-8", .0.display())]
    VpmPathNotUnicode(PathBuf),
    #[error("the PinMAME path {} is longer than {} bytes", .0.display(), MAX_VPM_PATH - 1)]
    VpmPathTooLong(PathBuf),
    #[error("the PinMAME path {} contains a NUL character", .0.display())]
    VpmPathNul(PathBuf),
}

/// The settings of a [PinMame][crate::PinMame] handle.
///
/// ```
/// use std::time::Duration;
/// use pinmame::{Config, AudioFormat};
///
/// let config = Config::default()
///     .with_sample_rate(44100)
///     .with_audio_format(AudioFormat::Float)
///     .with_display_probe_timeout(Duration::from_millis(500));
/// assert_eq!(config.sample_rate, 44100);
/// assert!(config.handle_mechanics);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sample_rate: u32,
    pub audio_format: AudioFormat,
    /// The PinMAME root directory, the parent of the `roms` directory.
    ///
    /// When `None` the directory is discovered, see [Config::resolve_vpm_path].
    pub vpm_path: Option<PathBuf>,
    /// How long [PinMame::available_displays][crate::PinMame::available_displays] waits
    /// for all displays to be announced.
    pub display_probe_timeout: Duration,
    /// Let the engine read the host keyboard itself.
    pub handle_keyboard: bool,
    /// Let the engine simulate the game's built-in mechs.
    pub handle_mechanics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sample_rate: DEFAULT_SAMPLE_RATE,
            audio_format: AudioFormat::Int16,
            vpm_path: None,
            display_probe_timeout: DEFAULT_DISPLAY_PROBE_TIMEOUT,
            handle_keyboard: false,
            handle_mechanics: true,
        }
    }
}

impl Config {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_audio_format(mut self, audio_format: AudioFormat) -> Self {
        self.audio_format = audio_format;
        self
    }

    pub fn with_vpm_path<P: Into<PathBuf>>(mut self, vpm_path: P) -> Self {
        self.vpm_path = Some(vpm_path.into());
        self
    }

    pub fn with_display_probe_timeout(mut self, timeout: Duration) -> Self {
        self.display_probe_timeout = timeout;
        self
    }

    pub fn with_handle_keyboard(mut self, handle_keyboard: bool) -> Self {
        self.handle_keyboard = handle_keyboard;
        self
    }

    pub fn with_handle_mechanics(mut self, handle_mechanics: bool) -> Self {
        self.handle_mechanics = handle_mechanics;
        self
    }

    /// Returns the PinMAME root directory.
    ///
    /// The first of these that is set is used:
    ///
    /// 1. [Config::vpm_path],
    /// 2. the [VPM_PATH_ENV] environment variable,
    /// 3. [VPM_HOME_DIR] in the user's home directory.
    ///
    /// # Errors
    /// Fails if none of them is available or the resulting directory doesn't exist.
    pub fn resolve_vpm_path(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.vpm_path {
            Some(path) => path.clone(),
            None => match env::var_os(VPM_PATH_ENV).filter(|path| !path.is_empty()) {
                Some(path) => PathBuf::from(path),
                None => dirs::home_dir().map(|home| home.join(VPM_HOME_DIR))
                                        .ok_or(ConfigError::NoVpmPath)?
            }
        };
        if !path.is_dir() {
            warn!("PinMAME path not found: {}", path.display());
            return Err(ConfigError::VpmPathNotFound(path))
        }
        debug!("PinMAME path: {}", path.display());
        Ok(path)
    }

    /// Creates the native engine configuration, resolving the PinMAME root directory.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let path = self.resolve_vpm_path()?;
        Ok(EngineConfig {
            audio_format: self.audio_format,
            sample_rate: self.sample_rate,
            vpm_path: native_vpm_path(&path)?,
        })
    }
}

/// Converts `path` into the form the engine expects: UTF-8, terminated with a separator,
/// fitting the native field.
pub fn native_vpm_path(path: &Path) -> Result<String, ConfigError> {
    let mut vpm_path = path.to_str()
                           .ok_or_else(|| ConfigError::VpmPathNotUnicode(path.to_path_buf()))?
                           .to_string();
    if vpm_path.contains('\0') {
        return Err(ConfigError::VpmPathNul(path.to_path_buf()))
    }
    if !vpm_path.ends_with(MAIN_SEPARATOR) {
        vpm_path.push(MAIN_SEPARATOR);
    }
    if vpm_path.len() >= MAX_VPM_PATH {
        return Err(ConfigError::VpmPathTooLong(path.to_path_buf()))
    }
    Ok(vpm_path)
}
