//! Home screen rows, each loaded independently.

use cinebrowse_api::catalog::{CatalogItem, CuratedList, Page};

use crate::loadable::Loadable;

/// Row identity on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRowKind {
    /// Trending items, shown with rank labels.
    Trending,
    /// One of the fixed curated lists.
    Curated(CuratedList),
}

impl HomeRowKind {
    /// Row heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trending => "Trending",
            Self::Curated(list) => list.label(),
        }
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct HomeRow<'a> {
    /// Row identity.
    pub kind: HomeRowKind,
    /// Items, or `None` while pending or after failure.
    pub items: Option<&'a [CatalogItem]>,
    /// Whether the row's fetch is in flight.
    pub pending: bool,
}

/// All home rows.
#[derive(Debug, Clone, Default)]
pub struct HomeRows {
    trending: Loadable<Vec<CatalogItem>>,
    curated: Vec<(CuratedList, Loadable<Page>)>,
}

impl HomeRows {
    /// Creates rows with every fetch pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trending: Loadable::Pending,
            curated: CuratedList::ALL
                .iter()
                .map(|list| (*list, Loadable::Pending))
                .collect(),
        }
    }

    /// Stores the trending outcome.
    pub fn set_trending(&mut self, outcome: anyhow::Result<Vec<CatalogItem>>) {
        self.trending = Loadable::from_outcome(outcome, "trending");
    }

    /// Stores a curated list outcome.
    pub fn set_curated(&mut self, list: CuratedList, outcome: anyhow::Result<Page>) {
        if let Some((_, slot)) = self.curated.iter_mut().find(|(l, _)| *l == list) {
            *slot = Loadable::from_outcome(outcome, list.label());
        }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<HomeRow<'_>> {
        let mut rows = Vec::with_capacity(self.curated.len().saturating_add(1));
        rows.push(HomeRow {
            kind: HomeRowKind::Trending,
            items: self.trending.value().map(Vec::as_slice),
            pending: self.trending.is_pending(),
        });
        rows.extend(self.curated.iter().map(|(list, state)| HomeRow {
            kind: HomeRowKind::Curated(*list),
            items: state.value().map(|page| page.items.as_slice()),
            pending: state.is_pending(),
        }));
        rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curated.len().saturating_add(1)
    }

    /// Always `false`; the trending row is always present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::paging::tests::{item, page};

    #[test]
    fn test_rows_resolve_independently() {
        // Arrange
        let mut home = HomeRows::new();

        // Act
        home.set_trending(Ok(vec![item(1), item(2)]));
        home.set_curated(CuratedList::TopRatedMovies, Err(anyhow::anyhow!("HTTP 503")));
        home.set_curated(CuratedList::PopularTv, Ok(page(1, 1, &[3])));

        // Assert
        let rows = home.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.first().unwrap().items.unwrap().len(), 2);
        let top_rated = rows.get(2).unwrap();
        assert_eq!(top_rated.kind.label(), "Top Rated Movies");
        assert!(top_rated.items.is_none() && !top_rated.pending);
        assert!(rows.get(1).unwrap().pending);
        assert_eq!(rows.get(3).unwrap().items.unwrap().len(), 1);
    }
}
