//! Monotonic request tokens used to discard stale responses.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide source of generation values.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Token stamped on a request at issuance time.
///
/// Values are unique across the whole process, so a component recreated
/// after a key change can never match a token issued to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Draws the next token.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Token that no request ever carries.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }
}

/// Latest token issued by one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationCounter {
    current: Generation,
}

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationCounter {
    /// Creates a counter that has not issued anything yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Generation::none(),
        }
    }

    /// Issues a new token; every earlier token becomes stale.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation::next();
        self.current
    }

    /// Latest issued token.
    #[must_use]
    pub const fn current(&self) -> Generation {
        self.current
    }

    /// Whether `generation` is the latest issued token.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        generation != Generation::none() && generation == self.current
    }
}
