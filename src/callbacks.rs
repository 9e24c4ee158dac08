/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! The consumer side of the engine notifications.
use crate::audio::{AudioInfo, AudioSamples};
use crate::display::{DisplayFrame, DisplayLayout};
use crate::keycode::Keycode;
use crate::mech::MechInfo;

/// Receives notifications of a running game.
///
/// An implementation is passed once to [PinMame::new][crate::PinMame::new]. Every method
/// has an empty default, so implement only what you need.
///
/// Methods are called from the engine's emulation thread. They must return quickly and
/// must not call back into the [PinMame][crate::PinMame] handle in a way that waits for
/// the emulation thread, e.g. [PinMame::available_displays][crate::PinMame::available_displays].
#[allow(unused_variables)]
pub trait PinMameCallbacks: Send + Sync {
    /// The game is started and ready to receive switch changes.
    ///
    /// Lamp, GI and solenoid maxima are valid from now on.
    fn on_game_started(&self) {}
    /// The game has ended.
    fn on_game_ended(&self) {}
    /// A display of the starting game is available.
    ///
    /// Called once per display, in no particular order of `index`.
    fn on_display_available(&self, index: usize, display_count: usize, layout: &DisplayLayout) {}
    /// The content of display `index` has changed.
    ///
    /// The frame borrows the engine's buffer and is valid for the duration of the call.
    fn on_display_updated(&self, index: usize, frame: DisplayFrame<'_>, layout: &DisplayLayout) {}
    /// The audio stream of the game is about to start.
    ///
    /// Returns the number of samples per frame the consumer wants to receive.
    fn on_audio_available(&self, info: &AudioInfo) -> usize {
        info.samples_per_frame as usize
    }
    /// A buffer of interleaved samples is ready. Returns the number of samples consumed.
    fn on_audio_updated(&self, samples: AudioSamples<'_>) -> usize {
        samples.len()
    }
    fn on_mech_available(&self, mech_no: usize, info: &MechInfo) {}
    fn on_mech_updated(&self, mech_no: usize, info: &MechInfo) {}
    /// A coil state has changed.
    fn on_solenoid_updated(&self, solenoid: usize, is_active: bool) {}
    /// The emulated machine wrote to its console.
    fn on_console_data_updated(&self, data: &[u8]) {}
    /// Answers the engine's synchronous key poll.
    fn is_key_pressed(&self, keycode: Keycode) -> bool {
        false
    }
}

/// Callbacks ignoring every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallbacks;

impl PinMameCallbacks for NoCallbacks {}
