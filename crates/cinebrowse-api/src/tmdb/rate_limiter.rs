//! Request pacing for the TMDB API.

use std::time::Duration;

use tokio::time::Instant;

/// Default spacing between requests (TMDB tolerates roughly 40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier pacer: hands out request slots at least `min_interval` apart.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum spacing between two request slots.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a pacer with the default spacing (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits for the next free slot and reserves the one after it.
    pub async fn acquire(&mut self) {
        if let Some(slot) = self.next_slot
            && slot > Instant::now()
        {
            tokio::time::sleep_until(slot).await;
        }
        self.next_slot = Some(self.slot_after(Instant::now()));
    }

    /// Slot reserved after a request starting at `now`; saturates to `now`.
    fn slot_after(&self, now: Instant) -> Instant {
        now.checked_add(self.min_interval).unwrap_or(now)
    }
}
