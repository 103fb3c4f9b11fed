//! Generic accumulate-on-scroll query over a paged resource.
//!
//! Shared by the category listing and the full search results. A reset
//! draws a fresh generation, so responses issued under an earlier key are
//! dropped on arrival instead of being cancelled.

use cinebrowse_api::catalog::{CatalogItem, Page};

use crate::generation::{Generation, GenerationCounter};

/// Request for one page, stamped with the issuing generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket<K> {
    /// Query key active at issuance.
    pub key: K,
    /// 1-based page number to fetch.
    pub page: u32,
    /// Generation the request was issued under.
    pub generation: Generation,
}

/// Accumulated state of a paged query.
#[derive(Debug, Clone)]
pub struct PagedQuery<K> {
    key: Option<K>,
    current_page: u32,
    /// `None` until the first response (treated as unbounded).
    total_pages: Option<u32>,
    total_results: Option<u32>,
    items: Vec<CatalogItem>,
    in_flight: Option<Generation>,
    frozen: bool,
    generation: GenerationCounter,
}

impl<K> Default for PagedQuery<K> {
    fn default() -> Self {
        Self {
            key: None,
            current_page: 0,
            total_pages: None,
            total_results: None,
            items: Vec::new(),
            in_flight: None,
            frozen: false,
            generation: GenerationCounter::new(),
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> PagedQuery<K> {
    /// Creates an idle query with no key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards everything and requests page 1 for `key`.
    ///
    /// Items are cleared synchronously, before the new page arrives.
    pub fn reset(&mut self, key: K) -> PageTicket<K> {
        self.key = Some(key.clone());
        self.current_page = 0;
        self.total_pages = None;
        self.total_results = None;
        self.items.clear();
        self.frozen = false;
        let generation = self.generation.advance();
        self.in_flight = Some(generation);
        tracing::debug!(?key, "paged query reset");
        PageTicket {
            key,
            page: 1,
            generation,
        }
    }

    /// Requests the next page, or nothing when loading or exhausted.
    pub fn load_more(&mut self) -> Option<PageTicket<K>> {
        if self.is_loading() || !self.has_more() {
            return None;
        }
        let key = self.key.clone()?;
        let page = self.current_page.checked_add(1)?;
        let generation = self.generation.advance();
        self.in_flight = Some(generation);
        tracing::debug!(?key, page, "loading next page");
        Some(PageTicket {
            key,
            page,
            generation,
        })
    }

    /// Merges a page response. Returns `false` when the ticket is stale.
    ///
    /// A failure stops further paging and keeps accumulated items.
    pub fn apply(&mut self, ticket: &PageTicket<K>, outcome: anyhow::Result<Page>) -> bool {
        if self.in_flight != Some(ticket.generation) || !self.generation.is_current(ticket.generation)
        {
            tracing::debug!(key = ?ticket.key, page = ticket.page, "discarding stale page response");
            return false;
        }
        self.in_flight = None;
        match outcome {
            Ok(page) => {
                self.items.extend(page.items);
                self.current_page = ticket.page;
                self.total_pages = Some(page.total_pages);
                self.total_results = Some(page.total_results);
            }
            Err(e) => {
                tracing::warn!(key = ?ticket.key, page = ticket.page, error = %e, "page fetch failed");
                self.frozen = true;
            }
        }
        true
    }

    /// Key the items belong to.
    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Accumulated items in fetch order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Last page merged (0 before the first response).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total pages reported by the last response.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Total results reported by the last response.
    #[must_use]
    pub const fn total_results(&self) -> Option<u32> {
        self.total_results
    }

    /// Whether a page request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a failed fetch stopped paging.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.frozen
    }

    /// Whether another page can be requested.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.frozen || self.key.is_none() {
            return false;
        }
        self.total_pages.is_none_or(|total| self.current_page < total)
    }

    /// Whether a key is set, nothing is loading, and nothing was found.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.key.is_some() && !self.is_loading() && !self.frozen && self.items.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]

    use cinebrowse_api::catalog::MediaType;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    pub(crate) fn item(id: u64) -> CatalogItem {
        CatalogItem {
            id,
            media_type: MediaType::Movie,
            title: format!("Item {id}"),
            release_date: Some(String::from("2020-01-01")),
            vote_average: 7.0,
            popularity: 10.0,
            overview: None,
            poster_path: None,
            backdrop_path: None,
        }
    }

    pub(crate) fn page(number: u32, total_pages: u32, ids: &[u64]) -> Page {
        Page {
            page_number: number,
            total_pages,
            total_results: total_pages.saturating_mul(20),
            items: ids.iter().copied().map(item).collect(),
        }
    }

    fn ids(query: &PagedQuery<MediaType>) -> Vec<u64> {
        query.items().iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_discover_scenario_two_pages() {
        // Arrange
        let mut query = PagedQuery::new();
        let first = query.reset(MediaType::Movie);

        // Act: page 1
        assert!(query.apply(&first, Ok(page(1, 5, &[1, 2]))));

        // Assert
        assert_eq!(ids(&query), vec![1, 2]);
        assert_eq!(query.current_page(), 1);
        assert!(query.has_more());

        // Act: page 2
        let second = query.load_more().unwrap();
        assert_eq!(second.page, 2);
        assert!(query.apply(&second, Ok(page(2, 5, &[3]))));

        // Assert
        assert_eq!(ids(&query), vec![1, 2, 3]);
        assert_eq!(query.current_page(), 2);
        assert!(query.has_more());
    }

    #[test]
    fn test_reset_clears_synchronously() {
        // Arrange
        let mut query = PagedQuery::new();
        let first = query.reset(MediaType::Movie);
        query.apply(&first, Ok(page(1, 3, &[1, 2, 3])));

        // Act
        let _ticket = query.reset(MediaType::Tv);

        // Assert
        assert!(query.items().is_empty());
        assert!(query.is_loading());
        assert_eq!(query.current_page(), 0);
        assert_eq!(query.key(), Some(&MediaType::Tv));
    }

    #[test]
    fn test_load_more_guarded_while_loading() {
        // Arrange
        let mut query = PagedQuery::new();
        let _first = query.reset(MediaType::Movie);

        // Act & Assert
        assert!(query.load_more().is_none());
    }

    #[test]
    fn test_pages_fetched_in_order_until_exhausted() {
        // Arrange
        let mut query = PagedQuery::new();
        let mut ticket = query.reset(MediaType::Movie);
        let mut fetched = Vec::new();

        // Act
        loop {
            fetched.push(ticket.page);
            let id = u64::from(ticket.page);
            query.apply(&ticket, Ok(page(ticket.page, 4, &[id])));
            match query.load_more() {
                Some(next) => ticket = next,
                None => break,
            }
        }

        // Assert
        assert_eq!(fetched, vec![1, 2, 3, 4]);
        assert_eq!(ids(&query), vec![1, 2, 3, 4]);
        assert!(!query.has_more());
    }

    #[test]
    fn test_duplicates_across_pages_are_kept() {
        // Arrange
        let mut query = PagedQuery::new();
        let first = query.reset(MediaType::Movie);
        query.apply(&first, Ok(page(1, 2, &[1, 2])));

        // Act
        let second = query.load_more().unwrap();
        query.apply(&second, Ok(page(2, 2, &[2, 3])));

        // Assert
        assert_eq!(ids(&query), vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_failure_freezes_paging_and_keeps_items() {
        // Arrange
        let mut query = PagedQuery::new();
        let first = query.reset(MediaType::Movie);
        query.apply(&first, Ok(page(1, 5, &[1, 2])));
        let second = query.load_more().unwrap();

        // Act
        assert!(query.apply(&second, Err(anyhow::anyhow!("HTTP 500"))));

        // Assert
        assert_eq!(ids(&query), vec![1, 2]);
        assert!(!query.has_more());
        assert!(query.is_failed());
        assert!(query.load_more().is_none());
    }

    #[test]
    fn test_reset_after_failure_retries() {
        // Arrange
        let mut query = PagedQuery::new();
        let first = query.reset(MediaType::Movie);
        query.apply(&first, Err(anyhow::anyhow!("offline")));

        // Act
        let retry = query.reset(MediaType::Movie);
        query.apply(&retry, Ok(page(1, 1, &[9])));

        // Assert
        assert_eq!(ids(&query), vec![9]);
        assert!(!query.is_failed());
    }

    #[test]
    fn test_stale_response_after_reset_is_discarded() {
        // Arrange
        let mut query = PagedQuery::new();
        let movie = query.reset(MediaType::Movie);
        let tv = query.reset(MediaType::Tv);

        // Act
        let applied_stale = query.apply(&movie, Ok(page(1, 5, &[1])));
        let applied_fresh = query.apply(&tv, Ok(page(1, 5, &[2])));

        // Assert
        assert!(!applied_stale);
        assert!(applied_fresh);
        assert_eq!(ids(&query), vec![2]);
    }

    #[test]
    fn test_ticket_from_another_query_is_discarded() {
        // Arrange
        let mut old = PagedQuery::new();
        let old_ticket = old.reset(MediaType::Movie);
        let mut recreated = PagedQuery::new();
        let _fresh = recreated.reset(MediaType::Movie);

        // Act & Assert
        assert!(!recreated.apply(&old_ticket, Ok(page(1, 1, &[1]))));
        assert!(recreated.items().is_empty());
    }

    #[test]
    fn test_zero_results_is_empty_not_failed() {
        // Arrange
        let mut query: PagedQuery<String> = PagedQuery::new();
        let ticket = query.reset(String::from("zzzz"));

        // Act
        query.apply(&ticket, Ok(page(1, 0, &[])));

        // Assert
        assert!(query.is_empty_result());
        assert!(!query.has_more());
    }

    #[test]
    fn test_stale_discard_is_logged() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::DEBUG))
            .event(expect::event().at_level(tracing::Level::DEBUG))
            .event(
                expect::event()
                    .at_level(tracing::Level::DEBUG)
                    .with_fields(expect::msg("discarding stale page response")),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            let mut query = PagedQuery::new();
            let stale = query.reset(MediaType::Movie);
            let _fresh = query.reset(MediaType::Tv);
            query.apply(&stale, Ok(page(1, 1, &[1])));
        });

        // Assert
        handle.assert_finished();
    }
}
