//! Scroll tracking and the end-of-list sentinel that triggers paging.

/// Number of trailing rows the sentinel spans.
pub const SENTINEL_ROWS: usize = 10;

/// Minimum visible share of the sentinel, in percent, that counts as a hit.
pub const VISIBILITY_THRESHOLD_PERCENT: usize = 10;

/// Visible window of a scrolled list, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible row.
    pub offset: usize,
    /// Number of visible rows.
    pub height: usize,
}

/// Selection plus scroll offset for a vertical list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollCursor {
    selected: usize,
    offset: usize,
}

impl ScrollCursor {
    /// Selected row.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// First visible row.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the selection up one row.
    pub const fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the selection down one row, clamped to `len`.
    pub fn down(&mut self, len: usize) {
        if self.selected.saturating_add(1) < len {
            self.selected = self.selected.saturating_add(1);
        }
    }

    /// Moves the selection by a page.
    pub fn page_down(&mut self, len: usize, page: usize) {
        self.selected = self
            .selected
            .saturating_add(page)
            .min(len.saturating_sub(1));
    }

    /// Moves the selection up by a page.
    pub const fn page_up(&mut self, page: usize) {
        self.selected = self.selected.saturating_sub(page);
    }

    /// Adjusts the offset so the selection is visible in `height` rows.
    pub fn follow(&mut self, height: usize) -> Viewport {
        if height == 0 {
            return Viewport {
                offset: self.offset,
                height,
            };
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset.saturating_add(height) {
            self.offset = self.selected.saturating_add(1).saturating_sub(height);
        }
        Viewport {
            offset: self.offset,
            height,
        }
    }

    /// Returns to the top.
    pub const fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }
}

/// Fires once per applied page when the trailing rows come into view.
#[derive(Debug, Clone, Default)]
pub struct SentinelObserver {
    armed: bool,
    observed: (usize, u32),
}

impl SentinelObserver {
    /// Creates a detached observer; the first applied page arms it.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            armed: false,
            observed: (0, 0),
        }
    }

    /// Re-attaches after the underlying list was replaced.
    pub const fn reattach(&mut self) {
        self.armed = false;
        self.observed = (0, 0);
    }

    /// Checks the sentinel against `viewport`. Returns `true` on a hit.
    ///
    /// `page` is the number of the last applied page (0 before the first).
    /// A new page re-arms the sentinel even when it added no rows.
    pub fn observe(&mut self, list_len: usize, page: u32, viewport: Viewport) -> bool {
        if (list_len, page) != self.observed {
            self.observed = (list_len, page);
            self.armed = page > 0;
        }
        if !self.armed {
            return false;
        }
        // An empty list leaves the sentinel at the top of the viewport.
        if list_len == 0 {
            let hit = viewport.height > 0;
            if hit {
                self.armed = false;
            }
            return hit;
        }
        let start = list_len.saturating_sub(SENTINEL_ROWS);
        let span = list_len.saturating_sub(start);
        let view_end = viewport.offset.saturating_add(viewport.height);
        let visible = view_end
            .min(list_len)
            .saturating_sub(viewport.offset.max(start));
        let hit = visible.saturating_mul(100)
            >= span.saturating_mul(VISIBILITY_THRESHOLD_PERCENT)
            && visible > 0;
        if hit {
            self.armed = false;
        }
        hit
    }
}
