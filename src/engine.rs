/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! The seam between the [PinMame][crate::PinMame] handle and the native emulator.
//!
//! [Engine] lists the native calls the handle issues, [EngineEvents] the notifications
//! the engine pushes back. Both use the raw, ABI-shaped types so an implementation only
//! has to forward values; validation and translation happen in the handle.
use std::sync::Arc;

use crate::audio::{AudioFormat, AudioSamples, RawAudioInfo};
use crate::display::{DisplayFrame, RawDisplayLayout};
use crate::game::GameInfo;
use crate::hardware::HardwareGen;
use crate::mech::{MechConfig, MechInfo};
use crate::status::Status;

/// The engine state reported when a game has started.
pub const STATE_STARTED: i32 = 1;
/// The engine state reported when a game has stopped.
pub const STATE_STOPPED: i32 = 0;

/// The configuration handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub audio_format: AudioFormat,
    pub sample_rate: u32,
    /// The PinMAME root directory, terminated with a path separator.
    pub vpm_path: String,
}

/// Notifications pushed by the engine.
///
/// Every method may be called from an engine thread while another thread issues
/// [Engine] calls.
pub trait EngineEvents: Send + Sync {
    /// `state` is [STATE_STARTED] or [STATE_STOPPED].
    fn on_state_updated(&self, state: i32);
    fn on_display_available(&self, index: i32, display_count: i32, layout: &RawDisplayLayout);
    fn on_display_updated(&self, index: i32, frame: DisplayFrame<'_>, layout: &RawDisplayLayout);
    /// Returns the number of samples per frame the consumer wants to receive.
    fn on_audio_available(&self, info: &RawAudioInfo) -> i32;
    /// Returns the number of samples consumed.
    fn on_audio_updated(&self, samples: AudioSamples<'_>) -> i32;
    fn on_mech_available(&self, mech_no: i32, info: &MechInfo);
    fn on_mech_updated(&self, mech_no: i32, info: &MechInfo);
    /// `is_active` is 0 for an inactive solenoid.
    fn on_solenoid_updated(&self, solenoid: i32, is_active: i32);
    fn on_console_data_updated(&self, data: &[u8]);
    /// Returns 1 if the key with the given native code is pressed, 0 otherwise.
    fn is_key_pressed(&self, keycode: i32) -> i32;
}

/// The native calls of the emulator.
///
/// The native library keeps a single process-wide emulator, so implementations take
/// `&self` and are shared between the handle and the notification relay.
pub trait Engine: Send + Sync {
    /// Replaces the active configuration, including every notification slot.
    fn set_config(&self, config: &EngineConfig, events: Arc<dyn EngineEvents>);
    /// Looks up a single game, calling `found` with its record on success.
    fn get_game(&self, name: &str, found: &mut dyn FnMut(GameInfo)) -> Status;
    /// Enumerates all supported games.
    fn get_games(&self, each: &mut dyn FnMut(GameInfo)) -> Status;
    fn run(&self, name: &str) -> Status;
    fn is_running(&self) -> bool;
    fn pause(&self, pause: bool) -> Status;
    fn is_paused(&self) -> bool;
    fn reset(&self) -> Status;
    fn stop(&self);
    fn hardware_gen(&self) -> HardwareGen;
    fn switch(&self, slot: i32) -> bool;
    fn set_switch(&self, slot: i32, on: bool);
    fn max_lamps(&self) -> usize;
    /// Writes `(index, value)` pairs of changed lamps into `changes` and returns the number
    /// of pairs written. `changes` holds room for at least `2 * max_lamps()` values.
    fn changed_lamps(&self, changes: &mut [i32]) -> usize;
    fn max_gis(&self) -> usize;
    /// Same as [Engine::changed_lamps] for the GI strings.
    fn changed_gis(&self, changes: &mut [i32]) -> usize;
    fn max_solenoids(&self) -> usize;
    /// Same as [Engine::changed_lamps] for the solenoids.
    fn changed_solenoids(&self, changes: &mut [i32]) -> usize;
    fn max_mechs(&self) -> usize;
    /// Configures mech `mech_no`, or removes it when `config` is `None`.
    fn set_mech(&self, mech_no: i32, config: Option<&MechConfig>) -> Status;
    fn set_handle_keyboard(&self, handle: bool);
    fn set_handle_mechanics(&self, handle: bool);
}

impl<E: Engine + ?Sized> Engine for Arc<E> {
    fn set_config(&self, config: &EngineConfig, events: Arc<dyn EngineEvents>) {
        (**self).set_config(config, events)
    }
    fn get_game(&self, name: &str, found: &mut dyn FnMut(GameInfo)) -> Status {
        (**self).get_game(name, found)
    }
    fn get_games(&self, each: &mut dyn FnMut(GameInfo)) -> Status {
        (**self).get_games(each)
    }
    fn run(&self, name: &str) -> Status {
        (**self).run(name)
    }
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
    fn pause(&self, pause: bool) -> Status {
        (**self).pause(pause)
    }
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
    fn reset(&self) -> Status {
        (**self).reset()
    }
    fn stop(&self) {
        (**self).stop()
    }
    fn hardware_gen(&self) -> HardwareGen {
        (**self).hardware_gen()
    }
    fn switch(&self, slot: i32) -> bool {
        (**self).switch(slot)
    }
    fn set_switch(&self, slot: i32, on: bool) {
        (**self).set_switch(slot, on)
    }
    fn max_lamps(&self) -> usize {
        (**self).max_lamps()
    }
    fn changed_lamps(&self, changes: &mut [i32]) -> usize {
        (**self).changed_lamps(changes)
    }
    fn max_gis(&self) -> usize {
        (**self).max_gis()
    }
    fn changed_gis(&self, changes: &mut [i32]) -> usize {
        (**self).changed_gis(changes)
    }
    fn max_solenoids(&self) -> usize {
        (**self).max_solenoids()
    }
    fn changed_solenoids(&self, changes: &mut [i32]) -> usize {
        (**self).changed_solenoids(changes)
    }
    fn max_mechs(&self) -> usize {
        (**self).max_mechs()
    }
    fn set_mech(&self, mech_no: i32, config: Option<&MechConfig>) -> Status {
        (**self).set_mech(mech_no, config)
    }
    fn set_handle_keyboard(&self, handle: bool) {
        (**self).set_handle_keyboard(handle)
    }
    fn set_handle_mechanics(&self, handle: bool) {
        (**self).set_handle_mechanics(handle)
    }
}
