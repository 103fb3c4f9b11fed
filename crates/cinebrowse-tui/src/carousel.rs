//! Auto-advancing banner carousel with a settle guard.

use std::time::{Duration, Instant};

use cinebrowse_api::catalog::CatalogItem;

use crate::timer::ScheduledTask;

/// Default delay between automatic advances.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(6000);

/// Default duration a transition is considered in progress.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(700);

/// Carousel timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    /// Auto-advance period.
    pub interval: Duration,
    /// Transition settle delay.
    pub settle: Duration,
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselPhase {
    /// No transition pending.
    Idle,
    /// A navigation just happened; further navigation is ignored.
    Transitioning,
}

/// Banner carousel over a fixed in-memory list.
#[derive(Debug, Clone)]
pub struct BannerCarousel {
    items: Vec<CatalogItem>,
    active: usize,
    phase: CarouselPhase,
    timing: CarouselTiming,
    tick: ScheduledTask,
    settle: ScheduledTask,
}

impl BannerCarousel {
    /// Creates a carousel; the tick is armed only when `items` is non-empty.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>, timing: CarouselTiming, now: Instant) -> Self {
        let mut carousel = Self {
            items: Vec::new(),
            active: 0,
            phase: CarouselPhase::Idle,
            timing,
            tick: ScheduledTask::new(),
            settle: ScheduledTask::new(),
        };
        carousel.replace_items(items, now);
        carousel
    }

    /// Replaces the list and starts over at the first slide.
    pub fn replace_items(&mut self, items: Vec<CatalogItem>, now: Instant) {
        self.items = items;
        self.active = 0;
        self.phase = CarouselPhase::Idle;
        self.settle.cancel();
        if self.items.is_empty() {
            self.tick.cancel();
        } else {
            self.tick.arm(now, self.timing.interval);
        }
    }

    /// Advances to the next slide, wrapping at the end.
    pub fn next(&mut self, now: Instant) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        self.navigate(self.active.saturating_add(1).checked_rem(len).unwrap_or(0), now)
    }

    /// Goes back one slide, wrapping at the start.
    pub fn prev(&mut self, now: Instant) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        let target = self.active.checked_sub(1).unwrap_or(len.saturating_sub(1));
        self.navigate(target, now)
    }

    /// Jumps to `index` (indicator selection).
    pub fn jump(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.items.len() || index == self.active {
            return false;
        }
        self.navigate(index, now)
    }

    /// Runs due timers. Returns `true` when the active slide changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.settle.fire(now) {
            self.phase = CarouselPhase::Idle;
        }
        if !self.tick.fire(now) {
            return false;
        }
        if self.phase == CarouselPhase::Transitioning {
            tracing::trace!("carousel tick skipped during transition");
            self.tick.arm(now, self.timing.interval);
            return false;
        }
        self.next(now)
    }

    fn navigate(&mut self, target: usize, now: Instant) -> bool {
        if self.phase == CarouselPhase::Transitioning {
            return false;
        }
        self.active = target;
        self.phase = CarouselPhase::Transitioning;
        self.settle.arm(now, self.timing.settle);
        self.tick.arm(now, self.timing.interval);
        true
    }

    /// Index of the active slide.
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    /// Active slide.
    #[must_use]
    pub fn active_item(&self) -> Option<&CatalogItem> {
        self.items.get(self.active)
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CarouselPhase {
        self.phase
    }

    /// Whether a transition is in progress.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase == CarouselPhase::Transitioning
    }

    /// All slides.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Whether the auto-advance timer is armed.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.tick.is_armed()
    }

    /// Whether slide `index` should be rendered: the active slide and its
    /// neighbours, with wraparound.
    #[must_use]
    pub fn is_materialized(&self, index: usize) -> bool {
        let len = self.items.len();
        if index >= len {
            return false;
        }
        let before = self.active.checked_sub(1).unwrap_or(len.saturating_sub(1));
        let after = self.active.saturating_add(1).checked_rem(len).unwrap_or(0);
        index == self.active || index == before || index == after
    }

    /// Slides to render, in list order, paired with their index.
    #[must_use]
    pub fn materialized(&self) -> Vec<(usize, &CatalogItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_materialized(*i))
            .collect()
    }
}
