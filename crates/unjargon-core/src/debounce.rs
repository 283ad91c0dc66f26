//! Deferred rescan that restarts its timer on every trigger.
//!
//! The debouncer holds no timer of its own. The host passes the current
//! [`Instant`] in and polls it from its event loop.

use std::time::{Duration, Instant};

/// Delay between the last DOM addition and the rescan.
pub const RESCAN_DELAY: Duration = Duration::from_millis(500);

/// A cancellable deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESCAN_DELAY)
    }
}

impl Debouncer {
    /// Create an idle debouncer.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm, or re-arm, the task to fire `delay` after `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending task. Returns `true` if one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns `true` while a task is pending.
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending task fires.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The configured delay.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` exactly once, the first time `now` reaches the
    /// deadline; the debouncer is idle afterwards.
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
