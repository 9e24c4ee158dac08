//! A scriptable engine standing in for the native library.
#![allow(dead_code)]
use core::time::Duration;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use pinmame::*;
use pinmame::display::RawDisplayLayout;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn game_info(name: &str, description: &str, clone_of: &str, rom_found: bool) -> GameInfo {
    GameInfo {
        name: name.into(),
        description: description.into(),
        year: "1992".into(),
        manufacturer: "Williams".into(),
        flags: GameDriverFlags::empty(),
        rom_found,
        clone_of: clone_of.into(),
    }
}

pub fn dmd_layout(width: i32) -> RawDisplayLayout {
    RawDisplayLayout { display_type: 14, width, height: 32, depth: 2, ..Default::default() }
}

pub struct FakeEngine {
    events: Mutex<Option<Arc<dyn EngineEvents>>>,
    pub config: Mutex<Option<EngineConfig>>,
    games: Vec<GameInfo>,
    /// `(index, layout)` announced in this order, each with `display_count`.
    displays: Mutex<Vec<(i32, RawDisplayLayout)>>,
    display_count: AtomicUsize,
    emulation: Mutex<Option<JoinHandle<()>>>,
    running: AtomicBool,
    /// Makes the next `is_running` report `false`, as if the game was started by
    /// another thread right after the check.
    pub hide_running_once: AtomicBool,
    paused: AtomicBool,
    pub run_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub pause_status: Mutex<Status>,
    pub reset_status: Mutex<Status>,
    pub handle_keyboard: AtomicBool,
    pub handle_mechanics: AtomicBool,
    switches: Mutex<HashMap<i32, bool>>,
    lamps: Mutex<VecDeque<(i32, i32)>>,
    pub mechs: Mutex<HashMap<i32, MechConfig>>,
}

impl FakeEngine {
    pub fn new(games: Vec<GameInfo>) -> Arc<Self> {
        Arc::new(FakeEngine {
            events: Mutex::new(None),
            config: Mutex::new(None),
            games,
            displays: Mutex::new(Vec::new()),
            display_count: AtomicUsize::new(0),
            emulation: Mutex::new(None),
            running: AtomicBool::new(false),
            hide_running_once: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            run_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            pause_status: Mutex::new(Status::Ok),
            reset_status: Mutex::new(Status::Ok),
            handle_keyboard: AtomicBool::new(false),
            handle_mechanics: AtomicBool::new(false),
            switches: Mutex::new(HashMap::new()),
            lamps: Mutex::new(VecDeque::new()),
            mechs: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_games() -> Arc<Self> {
        Self::new(vec![
            game_info("t2_l8", "Terminator 2: Judgment Day (L-8)", "", true),
            game_info("t2_l6", "Terminator 2: Judgment Day (L-6)", "t2_l8", false),
            game_info("fh_l9", "Funhouse (L-9)", "", false),
        ])
    }

    /// Announces displays `order` on every start, each declaring `display_count` displays.
    pub fn script_displays(&self, order: &[i32], display_count: usize) {
        *self.displays.lock().unwrap() = order.iter()
                                              .map(|&index| (index, dmd_layout(100 + index)))
                                              .collect();
        self.display_count.store(display_count, Ordering::SeqCst);
    }

    /// Announces the given layouts in this order on every start.
    pub fn script_raw_displays(&self, displays: Vec<(i32, RawDisplayLayout)>, display_count: usize) {
        *self.displays.lock().unwrap() = displays;
        self.display_count.store(display_count, Ordering::SeqCst);
    }

    pub fn queue_lamp(&self, index: i32, value: i32) {
        self.lamps.lock().unwrap().push_back((index, value));
    }

    /// The events registered by the last configuration.
    pub fn events(&self) -> Arc<dyn EngineEvents> {
        self.events.lock().unwrap().clone().expect("engine not configured")
    }

    pub fn is_configured(&self) -> bool {
        self.config.lock().unwrap().is_some()
    }
}

impl Engine for FakeEngine {
    fn set_config(&self, config: &EngineConfig, events: Arc<dyn EngineEvents>) {
        *self.config.lock().unwrap() = Some(config.clone());
        *self.events.lock().unwrap() = Some(events);
    }

    fn get_game(&self, name: &str, found: &mut dyn FnMut(GameInfo)) -> Status {
        match self.games.iter().find(|game| game.name == name) {
            Some(game) => {
                found(game.clone());
                Status::Ok
            }
            None => Status::GameNotFound
        }
    }

    fn get_games(&self, each: &mut dyn FnMut(GameInfo)) -> Status {
        for game in self.games.iter() {
            each(game.clone());
        }
        Status::Ok
    }

    fn run(&self, name: &str) -> Status {
        if self.running.load(Ordering::SeqCst) {
            return Status::GameAlreadyRunning
        }
        if !self.games.iter().any(|game| game.name == name) {
            return Status::GameNotFound
        }
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        let events = self.events();
        let displays = self.displays.lock().unwrap().clone();
        let display_count = self.display_count.load(Ordering::SeqCst) as i32;
        let handle = thread::spawn(move || {
            events.on_state_updated(1);
            for (index, layout) in displays {
                events.on_display_available(index, display_count, &layout);
            }
        });
        *self.emulation.lock().unwrap() = Some(handle);
        Status::Ok
    }

    fn is_running(&self) -> bool {
        if self.hide_running_once.swap(false, Ordering::SeqCst) {
            return false
        }
        self.running.load(Ordering::SeqCst)
    }

    fn pause(&self, pause: bool) -> Status {
        if !self.running.load(Ordering::SeqCst) {
            return Status::EmulatorNotRunning
        }
        let status = *self.pause_status.lock().unwrap();
        if status.is_ok() {
            self.paused.store(pause, Ordering::SeqCst);
        }
        status
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn reset(&self) -> Status {
        if !self.running.load(Ordering::SeqCst) {
            return Status::EmulatorNotRunning
        }
        *self.reset_status.lock().unwrap()
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if !self.running.swap(false, Ordering::SeqCst) {
            return
        }
        if let Some(handle) = self.emulation.lock().unwrap().take() {
            handle.join().unwrap();
        }
        self.paused.store(false, Ordering::SeqCst);
        self.events().on_state_updated(0);
    }

    fn hardware_gen(&self) -> HardwareGen {
        if self.running.load(Ordering::SeqCst) { HardwareGen::WPC_DMD } else { HardwareGen::empty() }
    }

    fn switch(&self, slot: i32) -> bool {
        self.switches.lock().unwrap().get(&slot).copied().unwrap_or(false)
    }

    fn set_switch(&self, slot: i32, on: bool) {
        self.switches.lock().unwrap().insert(slot, on);
    }

    fn max_lamps(&self) -> usize {
        8
    }

    fn changed_lamps(&self, changes: &mut [i32]) -> usize {
        let mut lamps = self.lamps.lock().unwrap();
        let mut count = 0;
        for pair in changes.chunks_exact_mut(2) {
            let Some((index, value)) = lamps.pop_front() else { break };
            pair[0] = index;
            pair[1] = value;
            count += 1;
        }
        count
    }

    fn max_gis(&self) -> usize {
        5
    }

    fn changed_gis(&self, _changes: &mut [i32]) -> usize {
        0
    }

    fn max_solenoids(&self) -> usize {
        64
    }

    fn changed_solenoids(&self, _changes: &mut [i32]) -> usize {
        0
    }

    fn max_mechs(&self) -> usize {
        10
    }

    fn set_mech(&self, mech_no: i32, config: Option<&MechConfig>) -> Status {
        if self.handle_mechanics.load(Ordering::SeqCst) {
            return Status::MechHandleMechanics
        }
        if mech_no < 0 || mech_no as usize >= self.max_mechs() {
            return Status::MechNoInvalid
        }
        let mut mechs = self.mechs.lock().unwrap();
        match config {
            Some(config) => { mechs.insert(mech_no, config.clone()); }
            None => { mechs.remove(&mech_no); }
        }
        Status::Ok
    }

    fn set_handle_keyboard(&self, handle: bool) {
        self.handle_keyboard.store(handle, Ordering::SeqCst);
    }

    fn set_handle_mechanics(&self, handle: bool) {
        self.handle_mechanics.store(handle, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started,
    Ended,
    DisplayAvailable(usize, usize),
    DisplayUpdated(usize, usize),
    AudioAvailable(AudioInfo),
    Audio(usize),
    MechAvailable(usize, MechInfo),
    Solenoid(usize, bool),
    Console(Vec<u8>),
}

/// Forwards every notification to a channel.
pub struct Recorder {
    tx: Mutex<Sender<Event>>,
    pub keys: PressedKeys,
}

impl Recorder {
    pub fn new() -> (Arc<Self>, Receiver<Event>) {
        let (tx, rx) = channel();
        (Arc::new(Recorder { tx: Mutex::new(tx), keys: PressedKeys::new() }), rx)
    }

    fn send(&self, event: Event) {
        let _ = self.tx.lock().unwrap().send(event);
    }
}

impl PinMameCallbacks for Recorder {
    fn on_game_started(&self) {
        self.send(Event::Started)
    }
    fn on_game_ended(&self) {
        self.send(Event::Ended)
    }
    fn on_display_available(&self, index: usize, display_count: usize, _layout: &DisplayLayout) {
        self.send(Event::DisplayAvailable(index, display_count))
    }
    fn on_display_updated(&self, index: usize, frame: DisplayFrame<'_>, _layout: &DisplayLayout) {
        self.send(Event::DisplayUpdated(index, frame.len()))
    }
    fn on_audio_available(&self, info: &AudioInfo) -> usize {
        self.send(Event::AudioAvailable(*info));
        info.samples_per_frame as usize
    }
    fn on_audio_updated(&self, samples: AudioSamples<'_>) -> usize {
        self.send(Event::Audio(samples.len()));
        samples.len()
    }
    fn on_mech_available(&self, mech_no: usize, info: &MechInfo) {
        self.send(Event::MechAvailable(mech_no, *info))
    }
    fn on_solenoid_updated(&self, solenoid: usize, is_active: bool) {
        self.send(Event::Solenoid(solenoid, is_active))
    }
    fn on_console_data_updated(&self, data: &[u8]) {
        self.send(Event::Console(data.to_vec()))
    }
    fn is_key_pressed(&self, keycode: Keycode) -> bool {
        self.keys.is_pressed(keycode)
    }
}

/// Counts the events matching `pred` delivered so far.
pub fn count_events<F: Fn(&Event) -> bool>(rx: &Receiver<Event>, pred: F) -> usize {
    rx.try_iter().filter(|event| pred(event)).count()
}

pub fn test_config() -> Config {
    Config::default().with_vpm_path(std::env::temp_dir())
                     .with_display_probe_timeout(Duration::from_millis(200))
}

/// Creates a handle over `engine` with a recording consumer.
pub fn pinmame(engine: &Arc<FakeEngine>) -> (PinMame<Arc<FakeEngine>>, Arc<Recorder>, Receiver<Event>) {
    init_logger();
    let (recorder, rx) = Recorder::new();
    let pinmame = PinMame::new(Arc::clone(engine), test_config(), recorder.clone()).unwrap();
    (pinmame, recorder, rx)
}

/// Waits for the next event matching `pred`, skipping others.
pub fn wait_for<F: Fn(&Event) -> bool>(rx: &Receiver<Event>, pred: F) -> Event {
    loop {
        let event = rx.recv_timeout(TIMEOUT).expect("event not delivered");
        if pred(&event) {
            return event
        }
    }
}
