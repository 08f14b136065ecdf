//! Single-slot refresh scheduling with debounce.
//!
//! The scheduler never runs anything itself. The owner asks it whether a run
//! is due (`take_due`), performs the refresh, then calls `finish`. A request
//! always replaces the pending slot, so a burst of edits collapses into one
//! run `delay` after the last edit.

use std::time::{Duration, Instant};

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending.
    Idle,
    /// A run is pending and becomes due at `due`.
    Scheduled { due: Instant },
    /// A run is in progress.
    Running,
}

#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    delay: Duration,
    state: SchedulerState,
}

impl RefreshScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the debounce delay used by later requests.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arm a run due right away, replacing any pending one.
    pub fn request_immediate(&mut self, now: Instant) {
        self.arm(now);
    }

    /// Arm a run due `delay` from now, replacing any pending one.
    pub fn request_debounced(&mut self, now: Instant) {
        self.arm(now + self.delay);
    }

    fn arm(&mut self, due: Instant) {
        if self.is_pending() {
            log::trace!("Replacing pending refresh");
        }
        self.state = SchedulerState::Scheduled { due };
    }

    /// Drop the pending run, if any. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, SchedulerState::Scheduled { .. }) {
            self.state = SchedulerState::Idle;
            true
        } else {
            false
        }
    }

    /// If the pending run is due at `now`, move to `Running` and return true.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            SchedulerState::Scheduled { due } if due <= now => {
                self.state = SchedulerState::Running;
                true
            }
            _ => false,
        }
    }

    /// Mark the current run complete.
    ///
    /// A request that arrived while running stays scheduled.
    pub fn finish(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Idle;
        }
    }

    /// When the pending run becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Scheduled { due } => Some(due),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::Scheduled { .. })
    }
}
