/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Translation of raw engine notifications into consumer callbacks.
use core::convert::TryFrom;
use std::sync::{Arc, Weak};

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

use crate::audio::{AudioInfo, AudioSamples, RawAudioInfo};
use crate::display::{DisplayFrame, DisplayLayout, RawDisplayLayout};
use crate::engine::{Engine, EngineEvents, STATE_STARTED};
use crate::keycode::Keycode;
use crate::mech::MechInfo;
use crate::pinmame::{Inner, lock};

/// The [EngineEvents] handed to the engine.
///
/// Holds the handle's state weakly, so the engine keeping its configuration alive doesn't
/// keep the handle alive. Notifications arriving after the handle is gone are dropped.
pub(crate) struct Relay<E> {
    inner: Weak<Inner<E>>,
}

impl<E: Engine> Relay<E> {
    pub fn new(inner: Weak<Inner<E>>) -> Self {
        Relay { inner }
    }

    #[inline]
    fn inner(&self) -> Option<Arc<Inner<E>>> {
        let inner = self.inner.upgrade();
        if inner.is_none() {
            trace!("notification after the handle was dropped");
        }
        inner
    }
}

fn to_index(n: i32, what: &str) -> Option<usize> {
    let index = usize::try_from(n).ok();
    if index.is_none() {
        warn!("negative {}: {}", what, n);
    }
    index
}

fn saturate(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl<E: Engine> Inner<E> {
    fn display_layout(&self, raw: &RawDisplayLayout) -> Option<DisplayLayout> {
        match DisplayLayout::new(raw, self.current_hardware_gen()) {
            Ok(layout) => Some(layout),
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }
}

impl<E: Engine> EngineEvents for Relay<E> {
    fn on_state_updated(&self, state: i32) {
        let Some(inner) = self.inner() else { return };
        debug!("state updated: {}", state);
        if state == STATE_STARTED {
            inner.game_started();
            inner.callbacks.on_game_started();
        }
        else {
            inner.callbacks.on_game_ended();
            inner.game_ended();
        }
    }

    fn on_display_available(&self, index: i32, display_count: i32, raw: &RawDisplayLayout) {
        let Some(inner) = self.inner() else { return };
        let (Some(index), Some(display_count)) = (to_index(index, "display index"),
                                                  to_index(display_count, "display count")) else {
            return
        };
        let probe = lock(&inner.probe).clone();
        let Some(layout) = inner.display_layout(raw) else {
            if let Some(probe) = probe {
                probe.reject(index, display_count);
            }
            return
        };
        trace!("display available: index={}, display_count={}, layout={}", index, display_count, layout);
        if let Some(probe) = probe {
            probe.announce(index, display_count, layout);
        }
        inner.callbacks.on_display_available(index, display_count, &layout);
    }

    fn on_display_updated(&self, index: i32, frame: DisplayFrame<'_>, raw: &RawDisplayLayout) {
        let Some(inner) = self.inner() else { return };
        let Some(index) = to_index(index, "display index") else { return };
        let Some(layout) = inner.display_layout(raw) else { return };
        trace!("display updated: index={}, layout={}", index, layout);
        inner.callbacks.on_display_updated(index, frame, &layout);
    }

    fn on_audio_available(&self, raw: &RawAudioInfo) -> i32 {
        let Some(inner) = self.inner() else { return 0 };
        match AudioInfo::from_raw(raw) {
            Ok(info) => {
                debug!("audio available: {:?}", info);
                saturate(inner.callbacks.on_audio_available(&info))
            }
            Err(err) => {
                warn!("{}", err);
                0
            }
        }
    }

    fn on_audio_updated(&self, samples: AudioSamples<'_>) -> i32 {
        let Some(inner) = self.inner() else { return 0 };
        saturate(inner.callbacks.on_audio_updated(samples))
    }

    fn on_mech_available(&self, mech_no: i32, info: &MechInfo) {
        let Some(inner) = self.inner() else { return };
        let Some(mech_no) = to_index(mech_no, "mech number") else { return };
        debug!("mech available: mech_no={}, {}", mech_no, info);
        inner.callbacks.on_mech_available(mech_no, info);
    }

    fn on_mech_updated(&self, mech_no: i32, info: &MechInfo) {
        let Some(inner) = self.inner() else { return };
        let Some(mech_no) = to_index(mech_no, "mech number") else { return };
        trace!("mech updated: mech_no={}, {}", mech_no, info);
        inner.callbacks.on_mech_updated(mech_no, info);
    }

    fn on_solenoid_updated(&self, solenoid: i32, is_active: i32) {
        let Some(inner) = self.inner() else { return };
        let Some(solenoid) = to_index(solenoid, "solenoid") else { return };
        debug!("solenoid updated: solenoid={}, is_active={}", solenoid, is_active);
        inner.callbacks.on_solenoid_updated(solenoid, is_active != 0);
    }

    fn on_console_data_updated(&self, data: &[u8]) {
        let Some(inner) = self.inner() else { return };
        trace!("console data: {} byte(s)", data.len());
        inner.callbacks.on_console_data_updated(data);
    }

    fn is_key_pressed(&self, keycode: i32) -> i32 {
        let Some(inner) = self.inner() else { return 0 };
        match Keycode::try_from(keycode) {
            Ok(key) => inner.callbacks.is_key_pressed(key).into(),
            Err(err) => {
                trace!("{}", err);
                0
            }
        }
    }
}
