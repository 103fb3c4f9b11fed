//! Infinite-scroll category listing.

use cinebrowse_api::catalog::{CatalogItem, MediaType, Page};

use crate::paging::{PageTicket, PagedQuery};
use crate::sentinel::{ScrollCursor, SentinelObserver, Viewport};

/// Page request for a category listing.
pub type ListingTicket = PageTicket<MediaType>;

/// Paged discover listing for one media type.
#[derive(Debug, Clone)]
pub struct ListingLoader {
    query: PagedQuery<MediaType>,
    observer: SentinelObserver,
    cursor: ScrollCursor,
}

impl ListingLoader {
    /// Creates a loader for `media_type` and the request for its first page.
    #[must_use]
    pub fn open(media_type: MediaType) -> (Self, ListingTicket) {
        let mut loader = Self {
            query: PagedQuery::new(),
            observer: SentinelObserver::new(),
            cursor: ScrollCursor::default(),
        };
        let ticket = loader.reset(media_type);
        (loader, ticket)
    }

    /// Switches category; displayed items are cleared immediately.
    pub fn reset(&mut self, media_type: MediaType) -> ListingTicket {
        self.cursor.reset();
        self.observer.reattach();
        self.query.reset(media_type)
    }

    /// Category being listed.
    #[must_use]
    pub fn media_type(&self) -> Option<MediaType> {
        self.query.key().copied()
    }

    /// Merges a page response; stale responses are ignored.
    pub fn apply(&mut self, ticket: &ListingTicket, outcome: anyhow::Result<Page>) -> bool {
        self.query.apply(ticket, outcome)
    }

    /// Requests the next page regardless of scroll position.
    pub fn load_more(&mut self) -> Option<ListingTicket> {
        self.query.load_more()
    }

    /// Reacts to the visible window; may request the next page.
    pub fn on_viewport(&mut self, height: usize) -> Option<ListingTicket> {
        let viewport: Viewport = self.cursor.follow(height);
        if self.observer.observe(
            self.query.items().len(),
            self.query.current_page(),
            viewport,
        ) {
            self.query.load_more()
        } else {
            None
        }
    }

    /// Underlying query state.
    #[must_use]
    pub const fn query(&self) -> &PagedQuery<MediaType> {
        &self.query
    }

    /// Selection and scroll position.
    #[must_use]
    pub const fn cursor(&self) -> &ScrollCursor {
        &self.cursor
    }

    /// Mutable selection and scroll position.
    pub const fn cursor_mut(&mut self) -> &mut ScrollCursor {
        &mut self.cursor
    }

    /// Item under the cursor.
    #[must_use]
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.query.items().get(self.cursor.selected())
    }
}
