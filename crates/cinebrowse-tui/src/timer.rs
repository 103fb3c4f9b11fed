//! Cancellable scheduled tasks driven by an explicit clock.

use std::time::{Duration, Instant};

/// One logical timer owned by a component.
///
/// Holds at most one pending schedule: arming again replaces it, so a
/// timer can never fire twice for the same logical event. Dropping the
/// owner drops the schedule with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledTask {
    due: Option<Instant>,
}

impl ScheduledTask {
    /// Creates a disarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Schedules the task `delay` after `now`, cancelling any earlier schedule.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.due = now.checked_add(delay);
    }

    /// Cancels the pending schedule, if any.
    pub const fn cancel(&mut self) {
        self.due = None;
    }

    /// Whether a schedule is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Consumes the schedule if it is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the schedule is due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}
