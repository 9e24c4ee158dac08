/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! The [Engine] implementation linking to the native **libpinmame** library.
//!
//! Requires the "libpinmame" feature to be enabled and the shared library (`pinmame`, or
//! `pinmame64` on 64-bit Windows) to be available to the linker.
//!
//! The native library holds a single emulator per process and accepts plain function
//! pointers as callbacks. The trampolines in this module forward them to the
//! [EngineEvents] of the most recent [Engine::set_config] call.
use core::convert::TryFrom;
use core::ptr;
use core::slice;
use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use std::cell::RefCell;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

use crate::audio::{AudioFormat, AudioSamples, RawAudioInfo};
use crate::config::MAX_VPM_PATH;
use crate::display::{DisplayFrame, DisplayLayout, RawDisplayLayout};
use crate::engine::{Engine, EngineConfig, EngineEvents};
use crate::game::{GameDriverFlags, GameInfo};
use crate::hardware::HardwareGen;
use crate::mech::{MechConfig, MechInfo, RawMechConfig};
use crate::status::Status;

type GameCallback = extern "C" fn(*mut PinmameGame);
type OnStateUpdated = extern "C" fn(c_int);
type OnDisplayAvailable = extern "C" fn(c_int, c_int, *mut RawDisplayLayout);
type OnDisplayUpdated = extern "C" fn(c_int, *mut c_void, *mut RawDisplayLayout);
type OnAudioAvailable = extern "C" fn(*mut RawAudioInfo) -> c_int;
type OnAudioUpdated = extern "C" fn(*mut c_void, c_int) -> c_int;
type OnMechAvailable = extern "C" fn(c_int, *mut MechInfo);
type OnMechUpdated = extern "C" fn(c_int, *mut MechInfo);
type OnSolenoidUpdated = extern "C" fn(c_int, c_int);
type OnConsoleDataUpdated = extern "C" fn(*mut c_void, c_int);
type IsKeyPressed = extern "C" fn(c_int) -> c_int;

#[repr(C)]
struct PinmameGame {
    name: *const c_char,
    clone_of: *const c_char,
    description: *const c_char,
    year: *const c_char,
    manufacturer: *const c_char,
    flags: u32,
    found: c_int,
}

#[repr(C)]
struct PinmameConfig {
    audio_format: c_int,
    sample_rate: c_int,
    vpm_path: [c_char; MAX_VPM_PATH],
    cb_on_state_updated: Option<OnStateUpdated>,
    cb_on_display_available: Option<OnDisplayAvailable>,
    cb_on_display_updated: Option<OnDisplayUpdated>,
    cb_on_audio_available: Option<OnAudioAvailable>,
    cb_on_audio_updated: Option<OnAudioUpdated>,
    cb_on_mech_available: Option<OnMechAvailable>,
    cb_on_mech_updated: Option<OnMechUpdated>,
    cb_on_solenoid_updated: Option<OnSolenoidUpdated>,
    cb_on_console_data_updated: Option<OnConsoleDataUpdated>,
    fn_is_key_pressed: Option<IsKeyPressed>,
}

#[cfg_attr(all(windows, target_pointer_width = "64"), link(name = "pinmame64"))]
#[cfg_attr(not(all(windows, target_pointer_width = "64")), link(name = "pinmame"))]
extern "C" {
    fn PinmameSetConfig(config: *const PinmameConfig);
    fn PinmameGetGame(name: *const c_char, callback: GameCallback) -> c_int;
    fn PinmameGetGames(callback: GameCallback) -> c_int;
    fn PinmameRun(name: *const c_char) -> c_int;
    fn PinmameIsRunning() -> c_int;
    fn PinmamePause(pause: c_int) -> c_int;
    fn PinmameIsPaused() -> c_int;
    fn PinmameReset() -> c_int;
    fn PinmameStop();
    fn PinmameGetHardwareGen() -> u64;
    fn PinmameGetSwitch(slot: c_int) -> c_int;
    fn PinmameSetSwitch(slot: c_int, state: c_int);
    fn PinmameGetMaxLamps() -> c_int;
    fn PinmameGetChangedLamps(changed_states: *mut c_int) -> c_int;
    fn PinmameGetMaxGIs() -> c_int;
    fn PinmameGetChangedGIs(changed_states: *mut c_int) -> c_int;
    fn PinmameGetMaxSolenoids() -> c_int;
    fn PinmameGetChangedSolenoids(changed_states: *mut c_int) -> c_int;
    fn PinmameGetMaxMechs() -> c_int;
    fn PinmameSetMech(mech_no: c_int, mech_config: *const RawMechConfig) -> c_int;
    fn PinmameSetHandleKeyboard(handle: c_int);
    fn PinmameSetHandleMechanics(handle: c_int);
}

static EVENTS: RwLock<Option<Arc<dyn EngineEvents>>> = RwLock::new(None);
static AUDIO_FORMAT: AtomicU8 = AtomicU8::new(AudioFormat::Int16 as u8);
static AUDIO_CHANNELS: AtomicI32 = AtomicI32::new(0);

thread_local!(static GAMES: RefCell<Vec<GameInfo>> = RefCell::new(Vec::new()));

/// The native emulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibPinMame;

/// Calls `f` with the registered events, returning `R::default()` when there are none or
/// when `f` panics, so no panic unwinds into the native library.
fn relay<R: Default, F: FnOnce(&dyn EngineEvents) -> R>(f: F) -> R {
    let events = match EVENTS.read() {
        Ok(events) => events.clone(),
        Err(err) => err.into_inner().clone()
    };
    let Some(events) = events else { return R::default() };
    match panic::catch_unwind(AssertUnwindSafe(|| f(&*events))) {
        Ok(res) => res,
        Err(_) => {
            error!("panic in a PinMAME callback");
            R::default()
        }
    }
}

/// # Safety
/// `ptr` must be null or point to a NUL terminated string.
unsafe fn to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    }
    else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

fn count(n: c_int) -> usize {
    usize::try_from(n).unwrap_or(0)
}

extern "C" fn on_game(game: *mut PinmameGame) {
    // Safety: the engine passes a valid record for the duration of the call
    let Some(game) = (unsafe { game.as_ref() }) else { return };
    let info = unsafe {
        GameInfo {
            name: to_string(game.name),
            description: to_string(game.description),
            year: to_string(game.year),
            manufacturer: to_string(game.manufacturer),
            flags: GameDriverFlags::from_bits_truncate(game.flags),
            rom_found: game.found != 0,
            clone_of: to_string(game.clone_of),
        }
    };
    GAMES.with(|games| games.borrow_mut().push(info));
}

extern "C" fn on_state_updated(state: c_int) {
    relay(|events| events.on_state_updated(state))
}

extern "C" fn on_display_available(index: c_int, display_count: c_int, layout: *mut RawDisplayLayout) {
    let Some(layout) = (unsafe { layout.as_ref() }) else { return };
    relay(|events| events.on_display_available(index, display_count, layout))
}

extern "C" fn on_display_updated(index: c_int, data: *mut c_void, layout: *mut RawDisplayLayout) {
    let Some(raw) = (unsafe { layout.as_ref() }) else { return };
    let (len, pixels) = match DisplayLayout::new(raw, HardwareGen::empty()) {
        Ok(layout) => (layout.frame_len(), layout.has_pixel_frames()),
        Err(_) => (0, false)
    };
    let len = if data.is_null() { 0 } else { len };
    // Safety: the engine's frame buffer holds as many elements as the layout describes
    let frame = unsafe {
        if len == 0 {
            DisplayFrame::Segments(&[])
        }
        else if pixels {
            DisplayFrame::Pixels(slice::from_raw_parts(data as *const u8, len))
        }
        else {
            DisplayFrame::Segments(slice::from_raw_parts(data as *const u16, len))
        }
    };
    relay(|events| events.on_display_updated(index, frame, raw))
}

extern "C" fn on_audio_available(info: *mut RawAudioInfo) -> c_int {
    let Some(info) = (unsafe { info.as_ref() }) else { return 0 };
    AUDIO_CHANNELS.store(info.channels, Ordering::Relaxed);
    if let Ok(format) = AudioFormat::try_from(info.format) {
        AUDIO_FORMAT.store(format as u8, Ordering::Relaxed);
    }
    relay(|events| events.on_audio_available(info))
}

extern "C" fn on_audio_updated(buffer: *mut c_void, samples: c_int) -> c_int {
    if buffer.is_null() {
        return 0
    }
    let len = count(samples) * count(AUDIO_CHANNELS.load(Ordering::Relaxed));
    // Safety: the buffer holds `samples` frames of interleaved samples in the announced format
    let samples = unsafe {
        if AUDIO_FORMAT.load(Ordering::Relaxed) == AudioFormat::Float as u8 {
            AudioSamples::F32(slice::from_raw_parts(buffer as *const f32, len))
        }
        else {
            AudioSamples::I16(slice::from_raw_parts(buffer as *const i16, len))
        }
    };
    relay(|events| events.on_audio_updated(samples))
}

extern "C" fn on_mech_available(mech_no: c_int, info: *mut MechInfo) {
    let Some(info) = (unsafe { info.as_ref() }) else { return };
    relay(|events| events.on_mech_available(mech_no, info))
}

extern "C" fn on_mech_updated(mech_no: c_int, info: *mut MechInfo) {
    let Some(info) = (unsafe { info.as_ref() }) else { return };
    relay(|events| events.on_mech_updated(mech_no, info))
}

extern "C" fn on_solenoid_updated(solenoid: c_int, is_active: c_int) {
    relay(|events| events.on_solenoid_updated(solenoid, is_active))
}

extern "C" fn on_console_data_updated(data: *mut c_void, size: c_int) {
    let data: &[u8] = if data.is_null() {
        &[]
    }
    else {
        unsafe { slice::from_raw_parts(data as *const u8, count(size)) }
    };
    relay(|events| events.on_console_data_updated(data))
}

extern "C" fn is_key_pressed(keycode: c_int) -> c_int {
    relay(|events| events.is_key_pressed(keycode))
}

fn native_config(config: &EngineConfig) -> PinmameConfig {
    let mut vpm_path: [c_char; MAX_VPM_PATH] = [0; MAX_VPM_PATH];
    let bytes = config.vpm_path.as_bytes();
    let len = bytes.len().min(MAX_VPM_PATH - 1);
    if len < bytes.len() {
        warn!("PinMAME path truncated: {}", config.vpm_path);
    }
    for (dst, &src) in vpm_path.iter_mut().zip(&bytes[..len]) {
        *dst = src as c_char;
    }
    PinmameConfig {
        audio_format: config.audio_format as c_int,
        sample_rate: c_int::try_from(config.sample_rate).unwrap_or(c_int::MAX),
        vpm_path,
        cb_on_state_updated: Some(on_state_updated),
        cb_on_display_available: Some(on_display_available),
        cb_on_display_updated: Some(on_display_updated),
        cb_on_audio_available: Some(on_audio_available),
        cb_on_audio_updated: Some(on_audio_updated),
        cb_on_mech_available: Some(on_mech_available),
        cb_on_mech_updated: Some(on_mech_updated),
        cb_on_solenoid_updated: Some(on_solenoid_updated),
        cb_on_console_data_updated: Some(on_console_data_updated),
        fn_is_key_pressed: Some(is_key_pressed),
    }
}

fn collect_games(found: &mut dyn FnMut(GameInfo), enumerate: impl FnOnce() -> c_int) -> Status {
    GAMES.with(|games| games.borrow_mut().clear());
    let status = Status::from_code(enumerate());
    let games = GAMES.with(|games| games.take());
    for info in games {
        found(info);
    }
    status
}

fn changed(changes: &mut [i32], max: usize, get: unsafe extern "C" fn(*mut c_int) -> c_int) -> usize {
    if changes.len() < 2 * max {
        warn!("change buffer too small: {} < {}", changes.len(), 2 * max);
        return 0
    }
    // Safety: the buffer has room for `max` pairs
    count(unsafe { get(changes.as_mut_ptr()) })
}

impl Engine for LibPinMame {
    fn set_config(&self, config: &EngineConfig, events: Arc<dyn EngineEvents>) {
        debug!("libpinmame config: {:?}", config);
        match EVENTS.write() {
            Ok(mut slot) => *slot = Some(events),
            Err(err) => *err.into_inner() = Some(events)
        }
        AUDIO_FORMAT.store(config.audio_format as u8, Ordering::Relaxed);
        let native = native_config(config);
        unsafe { PinmameSetConfig(&native) }
    }

    fn get_game(&self, name: &str, found: &mut dyn FnMut(GameInfo)) -> Status {
        let Ok(name) = CString::new(name) else { return Status::GameNotFound };
        collect_games(found, || unsafe { PinmameGetGame(name.as_ptr(), on_game) })
    }

    fn get_games(&self, each: &mut dyn FnMut(GameInfo)) -> Status {
        collect_games(each, || unsafe { PinmameGetGames(on_game) })
    }

    fn run(&self, name: &str) -> Status {
        let Ok(name) = CString::new(name) else { return Status::GameNotFound };
        Status::from_code(unsafe { PinmameRun(name.as_ptr()) })
    }

    fn is_running(&self) -> bool {
        unsafe { PinmameIsRunning() != 0 }
    }

    fn pause(&self, pause: bool) -> Status {
        Status::from_code(unsafe { PinmamePause(pause.into()) })
    }

    fn is_paused(&self) -> bool {
        unsafe { PinmameIsPaused() != 0 }
    }

    fn reset(&self) -> Status {
        Status::from_code(unsafe { PinmameReset() })
    }

    fn stop(&self) {
        unsafe { PinmameStop() }
    }

    fn hardware_gen(&self) -> HardwareGen {
        HardwareGen::from_data(unsafe { PinmameGetHardwareGen() })
    }

    fn switch(&self, slot: i32) -> bool {
        unsafe { PinmameGetSwitch(slot) != 0 }
    }

    fn set_switch(&self, slot: i32, on: bool) {
        unsafe { PinmameSetSwitch(slot, on.into()) }
    }

    fn max_lamps(&self) -> usize {
        count(unsafe { PinmameGetMaxLamps() })
    }

    fn changed_lamps(&self, changes: &mut [i32]) -> usize {
        changed(changes, self.max_lamps(), PinmameGetChangedLamps)
    }

    fn max_gis(&self) -> usize {
        count(unsafe { PinmameGetMaxGIs() })
    }

    fn changed_gis(&self, changes: &mut [i32]) -> usize {
        changed(changes, self.max_gis(), PinmameGetChangedGIs)
    }

    fn max_solenoids(&self) -> usize {
        count(unsafe { PinmameGetMaxSolenoids() })
    }

    fn changed_solenoids(&self, changes: &mut [i32]) -> usize {
        changed(changes, self.max_solenoids(), PinmameGetChangedSolenoids)
    }

    fn max_mechs(&self) -> usize {
        count(unsafe { PinmameGetMaxMechs() })
    }

    fn set_mech(&self, mech_no: i32, config: Option<&MechConfig>) -> Status {
        let raw = config.map(MechConfig::to_raw);
        let ptr = raw.as_ref().map_or(ptr::null(), |raw| raw as *const RawMechConfig);
        Status::from_code(unsafe { PinmameSetMech(mech_no, ptr) })
    }

    fn set_handle_keyboard(&self, handle: bool) {
        unsafe { PinmameSetHandleKeyboard(handle.into()) }
    }

    fn set_handle_mechanics(&self, handle: bool) {
        unsafe { PinmameSetHandleMechanics(handle.into()) }
    }
}
