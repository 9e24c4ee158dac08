/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
use core::convert::TryFrom;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

use crate::callbacks::PinMameCallbacks;
use crate::catalog::CatalogBuilder;
use crate::config::Config;
use crate::dispatch::Relay;
use crate::display::DisplayLayout;
use crate::engine::{Engine, EngineEvents};
use crate::error::{PinMameError, Result};
use crate::game::Game;
use crate::hardware::HardwareGen;
use crate::mech::MechConfig;
use crate::probe::{DisplayProbe, ProbeOutcome};
use crate::status::Status;

/// Locks `mutex`, recovering the data of a poisoned lock.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

/// A lamp, GI string or solenoid whose value has changed since the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateChange {
    pub index: usize,
    pub value: i32,
}

/// The handle to the emulator.
///
/// Created once with an [Engine], a [Config] and the consumer's [PinMameCallbacks].
/// Commands are issued through `&self` and may come from any thread; polling the
/// lamp, GI and solenoid changes takes `&mut self` because it reuses per-handle buffers.
///
/// Dropping the handle stops a game it has started.
pub struct PinMame<E: Engine> {
    inner: Arc<Inner<E>>,
    lamps: ChangeBuffer,
    gis: ChangeBuffer,
    solenoids: ChangeBuffer,
}

/// The state shared between the handle and the notification relay.
pub(crate) struct Inner<E> {
    pub engine: E,
    pub callbacks: Arc<dyn PinMameCallbacks>,
    pub probe: Mutex<Option<Arc<DisplayProbe>>>,
    pub running_game: Mutex<Option<String>>,
    config: Config,
    vpm_path: PathBuf,
    start_lock: Mutex<()>,
    probe_lock: Mutex<()>,
    run: RunInfo,
}

/// Engine maxima recorded when a game starts.
#[derive(Debug, Default)]
struct RunInfo {
    generation: AtomicU64,
    hardware_gen: AtomicU64,
    max_lamps: AtomicUsize,
    max_gis: AtomicUsize,
    max_solenoids: AtomicUsize,
}

#[derive(Debug, Default)]
struct ChangeBuffer {
    generation: u64,
    changes: Vec<i32>,
}

#[derive(Debug, Clone, Copy)]
enum ChangeKind {
    Lamps,
    Gis,
    Solenoids,
}

/// Finalizes a display availability session on every exit path.
///
/// The engine is not stopped when `stop_game` is cleared: it then runs a game the
/// session didn't start.
struct ProbeSession<'a, E: Engine> {
    inner: &'a Inner<E>,
    stop_game: bool,
}

impl<E: Engine> Drop for ProbeSession<'_, E> {
    fn drop(&mut self) {
        if self.stop_game {
            self.inner.engine.stop();
        }
        lock(&self.inner.probe).take();
        debug!("display probe finished");
    }
}

impl<E: Engine> Inner<E> {
    /// Records the maxima of a freshly started game and invalidates the change buffers.
    pub fn game_started(&self) {
        let run = &self.run;
        run.hardware_gen.store(self.engine.hardware_gen().bits(), Ordering::Relaxed);
        run.max_lamps.store(self.engine.max_lamps(), Ordering::Relaxed);
        run.max_gis.store(self.engine.max_gis(), Ordering::Relaxed);
        run.max_solenoids.store(self.engine.max_solenoids(), Ordering::Relaxed);
        run.generation.fetch_add(1, Ordering::Release);
    }

    pub fn game_ended(&self) {
        self.run.hardware_gen.store(0, Ordering::Relaxed);
        lock(&self.running_game).take();
    }

    /// The hardware generation of the running game, queried once per run.
    pub fn current_hardware_gen(&self) -> HardwareGen {
        match self.run.hardware_gen.load(Ordering::Relaxed) {
            0 => {
                let hardware_gen = self.engine.hardware_gen();
                self.run.hardware_gen.store(hardware_gen.bits(), Ordering::Relaxed);
                hardware_gen
            }
            bits => HardwareGen::from_data(bits)
        }
    }

    fn max_changes(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Lamps => self.run.max_lamps.load(Ordering::Relaxed),
            ChangeKind::Gis => self.run.max_gis.load(Ordering::Relaxed),
            ChangeKind::Solenoids => self.run.max_solenoids.load(Ordering::Relaxed),
        }
    }

    fn changed(&self, kind: ChangeKind, changes: &mut [i32]) -> usize {
        match kind {
            ChangeKind::Lamps => self.engine.changed_lamps(changes),
            ChangeKind::Gis => self.engine.changed_gis(changes),
            ChangeKind::Solenoids => self.engine.changed_solenoids(changes),
        }
    }
}

impl<E: Engine + 'static> PinMame<E> {
    /// Configures `engine` and returns the handle.
    ///
    /// # Errors
    /// Fails with [PinMameError::Config] if the PinMAME root directory can't be resolved,
    /// before the engine is touched.
    pub fn new(engine: E, config: Config, callbacks: Arc<dyn PinMameCallbacks>) -> Result<Self> {
        let engine_config = config.engine_config()?;
        info!("PinMAME: sample_rate={}, vpm_path={}", engine_config.sample_rate, engine_config.vpm_path);
        let vpm_path = PathBuf::from(&engine_config.vpm_path);
        let inner = Arc::new(Inner {
            engine,
            callbacks,
            probe: Mutex::new(None),
            running_game: Mutex::new(None),
            config,
            vpm_path,
            start_lock: Mutex::new(()),
            probe_lock: Mutex::new(()),
            run: RunInfo::default(),
        });
        let relay: Arc<dyn EngineEvents> = Arc::new(Relay::new(Arc::downgrade(&inner)));
        inner.engine.set_config(&engine_config, relay);
        inner.engine.set_handle_keyboard(inner.config.handle_keyboard);
        inner.engine.set_handle_mechanics(inner.config.handle_mechanics);
        Ok(PinMame {
            inner,
            lamps: ChangeBuffer::default(),
            gis: ChangeBuffer::default(),
            solenoids: ChangeBuffer::default(),
        })
    }
}

impl<E: Engine> PinMame<E> {
    pub fn engine(&self) -> &E {
        &self.inner.engine
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The PinMAME root directory the engine was configured with.
    pub fn vpm_path(&self) -> &Path {
        &self.inner.vpm_path
    }

    /// The ROM directory: the PinMAME root directory + `roms`.
    pub fn rom_path(&self) -> PathBuf {
        self.inner.vpm_path.join("roms")
    }

    /// Starts a new game.
    ///
    /// [PinMameCallbacks::on_game_started] is called once the game is up.
    ///
    /// # Errors
    /// * [PinMameError::InvalidOperation] if a game is already running; the engine is not
    ///   asked to run anything in this case.
    /// * [PinMameError::GameNotFound] if `name` is not a supported ROM.
    /// * [PinMameError::Status] on any other engine failure.
    pub fn start_game(&self, name: &str) -> Result<()> {
        let _start = lock(&self.inner.start_lock);
        self.start_locked(name)
    }

    /// Starts a game with `start_lock` held by the caller.
    fn start_locked(&self, name: &str) -> Result<()> {
        info!("start game: {}", name);
        if self.inner.engine.is_running() {
            return Err(PinMameError::InvalidOperation("a game is already running"))
        }
        let previous = lock(&self.inner.running_game).replace(name.to_string());
        let status = self.inner.engine.run(name);
        if status.is_ok() {
            return Ok(())
        }
        *lock(&self.inner.running_game) = previous;
        Err(match status {
            Status::GameNotFound => PinMameError::GameNotFound(name.to_string()),
            Status::GameAlreadyRunning => PinMameError::InvalidOperation("a game is already running"),
            status => PinMameError::from_status("start game", status)
        })
    }

    /// Stops the running game. Does nothing if no game is running.
    pub fn stop_game(&self) {
        info!("stop game");
        self.inner.engine.stop();
    }

    pub fn pause(&self) -> Result<()> {
        info!("pause");
        self.inner.engine.pause(true).into_result()
            .map_err(|status| PinMameError::from_status("pause game", status))
    }

    /// Continues a paused game.
    pub fn resume(&self) -> Result<()> {
        info!("resume");
        self.inner.engine.pause(false).into_result()
            .map_err(|status| PinMameError::from_status("continue game", status))
    }

    pub fn reset(&self) -> Result<()> {
        info!("reset game");
        self.inner.engine.reset().into_result()
            .map_err(|status| PinMameError::from_status("reset game", status))
    }

    pub fn is_running(&self) -> bool {
        self.inner.engine.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.engine.is_paused()
    }

    /// The name of the game started with [PinMame::start_game], until it ends.
    pub fn running_game(&self) -> Option<String> {
        lock(&self.inner.running_game).clone()
    }

    pub fn hardware_gen(&self) -> HardwareGen {
        self.inner.engine.hardware_gen()
    }

    /// Retrieves all displays a game uses by running it.
    ///
    /// Starts the game, waits until it has announced all of its displays or until
    /// [Config::display_probe_timeout] passes, then stops it. A timeout is not an error:
    /// the displays announced so far are returned. The game is stopped on every path,
    /// including start errors, unless the engine reports another game running.
    ///
    /// This call blocks, so it must not be made from a [PinMameCallbacks] method.
    ///
    /// # Errors
    /// * [PinMameError::InvalidOperation] if a game is running or another thread is
    ///   already probing displays.
    /// * Any error of [PinMame::start_game].
    pub fn available_displays(&self, name: &str) -> Result<BTreeMap<usize, DisplayLayout>> {
        let _session = match self.inner.probe_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(err)) => err.into_inner(),
            Err(TryLockError::WouldBlock) => {
                return Err(PinMameError::InvalidOperation("another display probe is in progress"))
            }
        };
        // held until the session ends, so no other game starts in between
        let _start = lock(&self.inner.start_lock);
        if self.inner.engine.is_running() {
            return Err(PinMameError::InvalidOperation(
                "cannot retrieve available displays while a game is running"))
        }
        debug!("probing displays of: {}", name);
        let (probe, done_rx) = DisplayProbe::new();
        *lock(&self.inner.probe) = Some(Arc::clone(&probe));
        let mut session = ProbeSession { inner: &*self.inner, stop_game: true };
        if let Err(err) = self.start_locked(name) {
            session.stop_game = !matches!(err, PinMameError::InvalidOperation(..));
            return Err(err)
        }
        let timeout = self.inner.config.display_probe_timeout;
        let displays = match DisplayProbe::wait(&done_rx, timeout) {
            ProbeOutcome::Complete => probe.take_displays(),
            ProbeOutcome::TimedOut => {
                let displays = probe.take_displays();
                warn!("display probe of {} timed out after {:?} with {} display(s)",
                      name, timeout, displays.len());
                displays
            }
        };
        Ok(displays)
    }

    /// Returns `true` while [PinMame::available_displays] collects announcements.
    pub fn is_probing_displays(&self) -> bool {
        lock(&self.inner.probe).is_some()
    }

    /// Retrieves a single game by name.
    pub fn game(&self, name: &str) -> Result<Game> {
        info!("get game: {}", name);
        let mut found = None;
        let status = self.inner.engine.get_game(name, &mut |info| found = Some(info));
        match status {
            Status::Ok => found.map(Game::new)
                               .ok_or_else(|| PinMameError::GameNotFound(name.to_string())),
            Status::GameNotFound => Err(PinMameError::GameNotFound(name.to_string())),
            status => Err(PinMameError::from_status("get game", status))
        }
    }

    /// Retrieves all supported games as a catalog of parents with their clones,
    /// sorted by description.
    pub fn games(&self) -> Result<Vec<Game>> {
        let mut builder = CatalogBuilder::new();
        self.inner.engine.get_games(&mut |info| builder.push(info)).into_result()
            .map_err(|status| PinMameError::from_status("get games", status))?;
        debug!("enumerated {} game record(s)", builder.len());
        Ok(builder.build())
    }

    /// Retrieves the games whose ROMs were found, in enumeration order and without clones.
    pub fn found_games(&self) -> Result<Vec<Game>> {
        let mut games = Vec::new();
        let status = self.inner.engine.get_games(&mut |info| {
            if info.rom_found {
                games.push(Game::new(info))
            }
        });
        status.into_result().map_err(|status| PinMameError::from_status("get games", status))?;
        Ok(games)
    }

    /// Returns the state of switch `slot`.
    pub fn switch(&self, slot: usize) -> bool {
        match i32::try_from(slot) {
            Ok(slot) => self.inner.engine.switch(slot),
            Err(_) => false
        }
    }

    pub fn set_switch(&self, slot: usize, on: bool) {
        match i32::try_from(slot) {
            Ok(slot) => self.inner.engine.set_switch(slot, on),
            Err(_) => warn!("switch out of range: {}", slot)
        }
    }

    pub fn max_lamps(&self) -> usize {
        self.inner.engine.max_lamps()
    }

    pub fn max_gis(&self) -> usize {
        self.inner.engine.max_gis()
    }

    pub fn max_solenoids(&self) -> usize {
        self.inner.engine.max_solenoids()
    }

    /// Returns the lamps changed since the previous poll.
    pub fn changed_lamps(&mut self) -> impl Iterator<Item=StateChange> + '_ {
        Self::poll_changes(&self.inner, &mut self.lamps, ChangeKind::Lamps)
    }

    /// Returns the GI strings changed since the previous poll.
    pub fn changed_gis(&mut self) -> impl Iterator<Item=StateChange> + '_ {
        Self::poll_changes(&self.inner, &mut self.gis, ChangeKind::Gis)
    }

    /// Returns the solenoids changed since the previous poll.
    pub fn changed_solenoids(&mut self) -> impl Iterator<Item=StateChange> + '_ {
        Self::poll_changes(&self.inner, &mut self.solenoids, ChangeKind::Solenoids)
    }

    pub fn max_mechs(&self) -> usize {
        self.inner.engine.max_mechs()
    }

    /// Configures a simulated mech, or removes it when `config` is `None`.
    ///
    /// The engine refuses custom mechs while it handles mechanics itself, see
    /// [PinMame::set_handle_mechanics].
    pub fn set_mech(&self, mech_no: usize, config: Option<&MechConfig>) -> Result<()> {
        info!("set mech: {}, {}", mech_no, if config.is_some() { "configure" } else { "remove" });
        let mech_no = i32::try_from(mech_no)
            .map_err(|_| PinMameError::from_status("set mech", Status::MechNoInvalid))?;
        self.inner.engine.set_mech(mech_no, config).into_result()
            .map_err(|status| PinMameError::from_status("set mech", status))
    }

    pub fn set_handle_keyboard(&self, handle: bool) {
        self.inner.engine.set_handle_keyboard(handle)
    }

    pub fn set_handle_mechanics(&self, handle: bool) {
        self.inner.engine.set_handle_mechanics(handle)
    }

    fn poll_changes<'a>(
            inner: &'a Inner<E>,
            buffer: &'a mut ChangeBuffer,
            kind: ChangeKind
        ) -> impl Iterator<Item=StateChange> + 'a
    {
        let generation = inner.run.generation.load(Ordering::Acquire);
        if buffer.generation != generation {
            buffer.generation = generation;
            buffer.changes.clear();
            buffer.changes.resize(2 * inner.max_changes(kind), 0);
        }
        let count = if buffer.changes.is_empty() {
            0
        }
        else {
            inner.changed(kind, &mut buffer.changes).min(buffer.changes.len() / 2)
        };
        buffer.changes[..2 * count].chunks_exact(2).filter_map(|pair| {
            usize::try_from(pair[0]).ok().map(|index| StateChange { index, value: pair[1] })
        })
    }
}

impl<E: Engine> Drop for PinMame<E> {
    fn drop(&mut self) {
        if lock(&self.inner.running_game).is_some() && self.inner.engine.is_running() {
            info!("stopping game on drop");
            self.inner.engine.stop();
        }
    }
}
