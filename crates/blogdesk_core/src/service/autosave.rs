//! Cooperative autosave schedule.
//!
//! # Responsibility
//! - Decide when a periodic autosave is due.
//!
//! # Invariants
//! - The schedule never reads the clock itself; callers pass `Instant`s.
//! - `poll` reports due at most once per elapsed interval and re-arms from
//!   the polled instant.

use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Cancellable periodic schedule driven by explicit instants.
#[derive(Debug, Clone)]
pub struct AutosaveSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl AutosaveSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the schedule; the first save is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns `true` when a save is due at `now` and re-arms the schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for AutosaveSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL)
    }
}
