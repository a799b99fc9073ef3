//! Deadline timers and after-frame callbacks
//!
//! The gesture layer never sleeps or spawns. A timer is just a deadline the
//! host polls with `tick(now)`; cancelling is clearing the deadline, which
//! is safe whether the timer already fired or was never started.

use std::time::{Duration, Instant};

/// A one-shot, restartable deadline
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// (Re)start the countdown. Any in-flight deadline is replaced.
    pub fn start(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Work that must wait until the host has laid out the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Recompute handle and toolbar focal points from the current selection
    SyncFocalPoints,
}

/// Queue of tasks to run after the current update cycle
#[derive(Debug, Clone, Default)]
pub struct FrameCallbacks {
    pending: Vec<FrameTask>,
}

impl FrameCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task; scheduling the same task twice in one frame runs it once
    pub fn schedule(&mut self, task: FrameTask) {
        if !self.pending.contains(&task) {
            self.pending.push(task);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all pending tasks, leaving the queue empty
    pub fn drain(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.pending)
    }
}
