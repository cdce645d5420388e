//! Trailing-edge debouncing for search input.
//!
//! Each edit replaces the pending value and pushes the deadline out by the
//! quiet period; the value is released only once a poll happens after the
//! deadline. Callers pass `Instant`s in so behavior is deterministic under
//! test.

use std::time::{Duration, Instant};

/// Default quiet period for search edits
pub const DEFAULT_QUIET_MS: u64 = 300;

/// Collapses bursts of values into the last one
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_QUIET_MS))
    }
}

impl<T> Debouncer<T> {
    /// Debouncer releasing values after `quiet` without further edits
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            deadline: None,
        }
    }

    /// Record an edit at `now`, replacing anything still pending
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.quiet);
    }

    /// Release the pending value if the quiet period has passed by `now`
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Release the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Whether an edit is waiting
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Configured quiet period
    #[must_use]
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }
}
