/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
use core::mem;
use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::sync::mpsc::{sync_channel, SyncSender, Receiver, RecvTimeoutError};

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

use crate::display::DisplayLayout;
use crate::pinmame::lock;

/// Displays collected during a single display availability session.
///
/// Registered with the dispatcher while the probed game starts. Each announcement is
/// inserted by index; once as many displays as announced were seen the waiting
/// caller is released. Displays whose layout can't be read count as seen but are
/// left out of the result.
#[derive(Debug)]
pub(crate) struct DisplayProbe {
    announced: Mutex<Announced>,
    done_tx: SyncSender<()>,
}

#[derive(Debug, Default)]
struct Announced {
    displays: BTreeMap<usize, DisplayLayout>,
    rejected: BTreeSet<usize>,
}

impl Announced {
    fn seen(&self) -> usize {
        self.displays.len() + self.rejected.len()
    }

    fn is_known(&self, index: usize) -> bool {
        self.displays.contains_key(&index) || self.rejected.contains(&index)
    }

    fn admit(&self, index: usize, display_count: usize) -> bool {
        if self.seen() >= display_count && !self.is_known(index) {
            warn!("display {} exceeds announced count: {}", index, display_count);
            return false
        }
        true
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    Complete,
    TimedOut,
}

impl DisplayProbe {
    pub fn new() -> (Arc<Self>, Receiver<()>) {
        let (done_tx, done_rx) = sync_channel(1);
        let probe = DisplayProbe { announced: Mutex::default(), done_tx };
        (Arc::new(probe), done_rx)
    }

    /// Records an announced display.
    ///
    /// An announcement of a new index is ignored when `display_count` displays were
    /// already seen.
    pub fn announce(&self, index: usize, display_count: usize, layout: DisplayLayout) {
        let mut announced = lock(&self.announced);
        if !announced.admit(index, display_count) {
            return
        }
        announced.rejected.remove(&index);
        announced.displays.insert(index, layout);
        self.check_complete(&announced, display_count);
    }

    /// Records an announced display whose layout couldn't be read.
    pub fn reject(&self, index: usize, display_count: usize) {
        let mut announced = lock(&self.announced);
        if !announced.admit(index, display_count) || announced.displays.contains_key(&index) {
            return
        }
        announced.rejected.insert(index);
        self.check_complete(&announced, display_count);
    }

    fn check_complete(&self, announced: &Announced, display_count: usize) {
        trace!("probed displays: {} of {}", announced.seen(), display_count);
        if announced.seen() == display_count {
            // the receiver may have already given up
            let _ = self.done_tx.try_send(());
        }
    }

    /// Blocks until all displays were announced or `timeout` passes.
    pub fn wait(done_rx: &Receiver<()>, timeout: Duration) -> ProbeOutcome {
        match done_rx.recv_timeout(timeout) {
            Ok(()) => ProbeOutcome::Complete,
            Err(RecvTimeoutError::Timeout) => ProbeOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => {
                error!("display probe dropped while waiting");
                ProbeOutcome::TimedOut
            }
        }
    }

    pub fn take_displays(&self) -> BTreeMap<usize, DisplayLayout> {
        mem::take(&mut lock(&self.announced).displays)
    }
}
