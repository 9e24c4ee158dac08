//! Display availability sessions.
mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use rand::prelude::*;
use pinmame::*;
use pinmame::display::UnknownBrightnessError;
use common::*;

#[test]
fn available_displays_collects_all_announced() {
    let engine = FakeEngine::with_games();
    engine.script_displays(&[0, 2, 1], 3);
    let (pinmame, _, rx) = pinmame(&engine);
    let started = Instant::now();
    let displays = pinmame.available_displays("t2_l8").unwrap();
    assert!(started.elapsed() < pinmame.config().display_probe_timeout);
    assert_eq!(displays.keys().copied().collect::<Vec<_>>(), [0, 1, 2]);
    for (index, layout) in displays.iter() {
        assert_eq!(layout.width(), 100 + *index as u32);
        assert_eq!(layout.kind(), DisplayKind::Dmd);
        assert_eq!(layout.levels(), Some(DmdLevels::Wpc));
    }
    // the probed game is stopped and the consumer saw the whole session
    assert!(!pinmame.is_running());
    assert_eq!(pinmame.running_game(), None);
    assert_eq!(engine.run_calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 1);
    assert!(!pinmame.is_probing_displays());
    let events: Vec<_> = rx.try_iter().collect();
    let announced: Vec<_> = events.iter().filter_map(|ev| match *ev {
        Event::DisplayAvailable(index, count) => Some((index, count)),
        _ => None
    }).collect();
    assert_eq!(announced, [(0, 3), (2, 3), (1, 3)]);
    assert_eq!(events.iter().filter(|ev| **ev == Event::Started).count(), 1);
    assert_eq!(events.iter().filter(|ev| **ev == Event::Ended).count(), 1);
}

#[test]
fn available_displays_returns_partial_map_on_timeout() {
    let engine = FakeEngine::with_games();
    engine.script_displays(&[0, 1], 3);
    let (pinmame, _, _) = pinmame(&engine);
    let started = Instant::now();
    let displays = pinmame.available_displays("t2_l8").unwrap();
    assert!(started.elapsed() >= pinmame.config().display_probe_timeout);
    assert_eq!(displays.len(), 2);
    assert!(!pinmame.is_running());
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 1);
    assert!(!pinmame.is_probing_displays());
}

#[test]
fn available_displays_never_exceeds_announced_count() {
    let engine = FakeEngine::with_games();
    engine.script_displays(&[0, 1, 2], 2);
    let (pinmame, _, _) = pinmame(&engine);
    let displays = pinmame.available_displays("t2_l8").unwrap();
    assert_eq!(displays.keys().copied().collect::<Vec<_>>(), [0, 1]);
}

#[test]
fn available_displays_in_random_order() {
    let mut rng = thread_rng();
    let engine = FakeEngine::with_games();
    let (pinmame, _, rx) = pinmame(&engine);
    for _ in 0..10 {
        let count = rng.gen_range(1..=6);
        let mut order: Vec<i32> = (0..count).collect();
        order.shuffle(&mut rng);
        engine.script_displays(&order, count as usize);
        let displays = pinmame.available_displays("fh_l9").unwrap();
        assert_eq!(displays.len(), count as usize);
        assert!(displays.keys().copied().eq(0..count as usize));
    }
    assert_eq!(count_events(&rx, |ev| *ev == Event::Started), 10);
    assert_eq!(engine.run_calls.load(Ordering::SeqCst), 10);
}

#[test]
fn available_displays_refused_while_running() {
    let engine = FakeEngine::with_games();
    let (pinmame, _, rx) = pinmame(&engine);
    pinmame.start_game("t2_l8").unwrap();
    wait_for(&rx, |ev| *ev == Event::Started);
    let err = pinmame.available_displays("fh_l9").unwrap_err();
    assert!(matches!(err, PinMameError::InvalidOperation(..)));
    assert_eq!(pinmame.running_game().as_deref(), Some("t2_l8"));
    assert!(pinmame.is_running());
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_start_keeps_a_game_started_elsewhere() {
    let engine = FakeEngine::with_games();
    let (pinmame, _, rx) = pinmame(&engine);
    pinmame.start_game("t2_l8").unwrap();
    wait_for(&rx, |ev| *ev == Event::Started);
    engine.hide_running_once.store(true, Ordering::SeqCst);
    let err = pinmame.available_displays("fh_l9").unwrap_err();
    assert_eq!(err, PinMameError::InvalidOperation("a game is already running"));
    assert!(pinmame.is_running());
    assert_eq!(pinmame.running_game().as_deref(), Some("t2_l8"));
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 0);
    assert_eq!(engine.run_calls.load(Ordering::SeqCst), 1);
    assert!(!pinmame.is_probing_displays());
}

#[test]
fn available_displays_of_unknown_game_fails() {
    let engine = FakeEngine::with_games();
    let (pinmame, _, _) = pinmame(&engine);
    let err = pinmame.available_displays("nope").unwrap_err();
    assert_eq!(err, PinMameError::GameNotFound("nope".into()));
    assert!(!pinmame.is_running());
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 1);
    assert!(!pinmame.is_probing_displays());
    engine.script_displays(&[0], 1);
    assert_eq!(pinmame.available_displays("t2_l8").unwrap().len(), 1);
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_probes_are_exclusive() {
    init_logger();
    let engine = FakeEngine::with_games();
    // one of two displays announced: the first session waits out its timeout
    engine.script_displays(&[0], 2);
    let (recorder, rx) = Recorder::new();
    let config = test_config().with_display_probe_timeout(Duration::from_secs(2));
    let pinmame = Arc::new(PinMame::new(Arc::clone(&engine), config, recorder).unwrap());
    let first = {
        let pinmame = Arc::clone(&pinmame);
        thread::spawn(move || pinmame.available_displays("t2_l8"))
    };
    wait_for(&rx, |ev| matches!(ev, Event::DisplayAvailable(..)));
    assert!(pinmame.is_probing_displays());
    assert_eq!(pinmame.available_displays("fh_l9"),
               Err(PinMameError::InvalidOperation("another display probe is in progress")));
    let displays = first.join().unwrap().unwrap();
    assert_eq!(displays.len(), 1);
    assert!(!pinmame.is_running());
    assert_eq!(engine.run_calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stop_calls.load(Ordering::SeqCst), 1);
    assert_eq!(count_events(&rx, |ev| *ev == Event::Started), 1);
}

#[test]
fn unreadable_layout_counts_toward_completion() {
    let engine = FakeEngine::with_games();
    let mut exotic = dmd_layout(128);
    exotic.display_type = 0x1f;
    engine.script_raw_displays(vec![(0, dmd_layout(128)), (1, exotic), (2, dmd_layout(192))], 3);
    let (pinmame, _, rx) = pinmame(&engine);
    let started = Instant::now();
    let displays = pinmame.available_displays("t2_l8").unwrap();
    assert!(started.elapsed() < pinmame.config().display_probe_timeout);
    assert_eq!(displays.keys().copied().collect::<Vec<_>>(), [0, 2]);
    let announced = count_events(&rx, |ev| matches!(ev, Event::DisplayAvailable(..)));
    assert_eq!(announced, 2);
}

#[test]
fn dmd_frames_decode_to_shades() {
    let engine = FakeEngine::with_games();
    engine.script_displays(&[0], 1);
    let (pinmame, _, _) = pinmame(&engine);
    let displays = pinmame.available_displays("t2_l8").unwrap();
    let levels = displays[&0].levels().unwrap();
    let frame = [0x14, 0x21, 0x43, 0x64];
    assert_eq!(levels.decode(&frame).unwrap(), [0, 1, 2, 3]);
    let err = levels.decode(&[0x00, 0x15]).unwrap_err();
    assert_eq!(err, UnknownBrightnessError { levels: DmdLevels::Wpc, raw: 0x15 });
    assert_eq!(err.to_string(), "raw brightness (0x15) is not a Wpc DMD level");
}
