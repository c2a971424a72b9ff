// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw signalling between the event thread and the render thread.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Monotonic redraw counter with a wake-up for the render thread.
///
/// The event side calls [`RedrawSignal::request_redraw`] whenever the UI
/// changed. The render side waits in [`RedrawSignal::wait_for_work`], which
/// returns a snapshot of the counter; after presenting it reports that
/// snapshot with [`RedrawSignal::mark_drawn`]. Requests that arrive while a
/// frame is being drawn leave the counter ahead of the snapshot, so the next
/// wait returns at once.
#[derive(Debug, Default)]
pub struct RedrawSignal {
    state: Mutex<SignalState>,
    cvar: Condvar,
}

#[derive(Debug, Default)]
struct SignalState {
    requested: u64,
    drawn: u64,
    shutdown: bool,
}

impl RedrawSignal {
    /// A signal with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame.
    pub fn request_redraw(&self) {
        let mut state = self.state.lock();
        state.requested += 1;
        self.cvar.notify_one();
    }

    /// Block until a frame is wanted, returning the counter to draw, or `None`
    /// once shut down.
    pub fn wait_for_work(&self) -> Option<u64> {
        let mut state = self.state.lock();
        while !state.shutdown && state.requested == state.drawn {
            self.cvar.wait(&mut state);
        }
        (!state.shutdown).then_some(state.requested)
    }

    /// As [`RedrawSignal::wait_for_work`], giving up after `timeout` with
    /// `None` while still running.
    pub fn wait_for_work_timeout(&self, timeout: Duration) -> Option<u64> {
        let mut state = self.state.lock();
        if !state.shutdown && state.requested == state.drawn {
            let _ = self.cvar.wait_for(&mut state, timeout);
        }
        (!state.shutdown && state.requested != state.drawn).then_some(state.requested)
    }

    /// Record that the frame for `snapshot` was presented.
    pub fn mark_drawn(&self, snapshot: u64) {
        let mut state = self.state.lock();
        state.drawn = state.drawn.max(snapshot);
    }

    /// Whether requests arrived after `snapshot` was taken.
    pub fn is_stale(&self, snapshot: u64) -> bool {
        self.state.lock().requested != snapshot
    }

    /// Whether a frame is wanted.
    pub fn is_pending(&self) -> bool {
        let state = self.state.lock();
        state.requested != state.drawn
    }

    /// Current request counter.
    pub fn requested(&self) -> u64 {
        self.state.lock().requested
    }

    /// Wake every waiter and make further waits return `None`.
    pub fn shutdown(&self) {
        self.state.lock().shutdown = true;
        self.cvar.notify_all();
    }

    /// Whether [`RedrawSignal::shutdown`] was called.
    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shutdown
    }
}
