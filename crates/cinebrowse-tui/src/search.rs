//! Debounced search: live suggestions plus paged full results.

use std::time::{Duration, Instant};

use cinebrowse_api::catalog::{CatalogItem, Page};

use crate::generation::{Generation, GenerationCounter};
use crate::paging::{PageTicket, PagedQuery};
use crate::sentinel::{ScrollCursor, SentinelObserver};
use crate::timer::ScheduledTask;

/// Maximum number of suggestions shown in the dropdown.
pub const MAX_SUGGESTIONS: usize = 8;

/// Default settle window between the last keystroke and the request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Suggestion request, stamped with the issuing generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTicket {
    /// Trimmed query text.
    pub query: String,
    /// Generation the request was issued under.
    pub generation: Generation,
}

/// Page request for the full results view.
pub type ResultsTicket = PageTicket<String>;

/// Search input state machine.
#[derive(Debug, Clone)]
pub struct SearchController {
    input: String,
    debounce: Duration,
    settle: ScheduledTask,
    suggestions: Vec<CatalogItem>,
    dropdown_open: bool,
    highlighted: Option<usize>,
    suggestion_generation: GenerationCounter,
    results: PagedQuery<String>,
    results_observer: SentinelObserver,
    results_cursor: ScrollCursor,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchController {
    /// Creates a controller with the given settle window.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            input: String::new(),
            debounce,
            settle: ScheduledTask::new(),
            suggestions: Vec::new(),
            dropdown_open: false,
            highlighted: None,
            suggestion_generation: GenerationCounter::new(),
            results: PagedQuery::new(),
            results_observer: SentinelObserver::new(),
            results_cursor: ScrollCursor::default(),
        }
    }

    /// Records new input text.
    ///
    /// Blank text clears suggestions at once; anything else restarts the
    /// settle window. In-flight requests are left alone.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        if self.input.trim().is_empty() {
            self.settle.cancel();
            self.clear_suggestions();
            // Late responses must not reopen the dropdown.
            self.suggestion_generation.advance();
        } else {
            self.settle.arm(now, self.debounce);
        }
    }

    /// Appends one character to the input.
    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = self.input.clone();
        text.push(c);
        self.on_input(text, now);
    }

    /// Removes the last character of the input.
    pub fn pop_char(&mut self, now: Instant) {
        let mut text = self.input.clone();
        text.pop();
        self.on_input(text, now);
    }

    /// Issues a suggestion request once the settle window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SuggestionTicket> {
        if !self.settle.fire(now) {
            return None;
        }
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let generation = self.suggestion_generation.advance();
        tracing::debug!(query, "suggestion request issued");
        Some(SuggestionTicket {
            query: String::from(query),
            generation,
        })
    }

    /// Time until the pending settle window elapses.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.settle.remaining(now)
    }

    /// Shows the first results as suggestions. Returns `false` when stale.
    pub fn apply_suggestions(
        &mut self,
        ticket: &SuggestionTicket,
        outcome: anyhow::Result<Page>,
    ) -> bool {
        if !self.suggestion_generation.is_current(ticket.generation) {
            tracing::debug!(query = %ticket.query, "discarding stale suggestions");
            return false;
        }
        match outcome {
            Ok(page) => {
                self.suggestions = page.items.into_iter().take(MAX_SUGGESTIONS).collect();
                self.dropdown_open = true;
                self.highlighted = None;
            }
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %e, "suggestion fetch failed");
                self.clear_suggestions();
            }
        }
        true
    }

    /// Closes the dropdown and keeps the typed text.
    pub const fn dismiss(&mut self) {
        self.dropdown_open = false;
        self.highlighted = None;
    }

    /// Moves the suggestion highlight down.
    pub fn highlight_next(&mut self) {
        if !self.dropdown_open || self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len().saturating_sub(1);
        self.highlighted = Some(self.highlighted.map_or(0, |i| i.saturating_add(1).min(last)));
    }

    /// Moves the suggestion highlight up; leaving the top clears it.
    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            Some(0) | None => None,
            Some(i) => Some(i.saturating_sub(1)),
        };
    }

    /// Submits the current text to the full results view.
    pub fn submit(&mut self) -> Option<ResultsTicket> {
        let query = String::from(self.input.trim());
        if query.is_empty() {
            return None;
        }
        Some(self.open_results(query))
    }

    /// Submits the highlighted suggestion if any, else the typed text.
    pub fn submit_highlighted(&mut self) -> Option<ResultsTicket> {
        match self.highlighted {
            Some(index) => self.pick_suggestion(index),
            None => self.submit(),
        }
    }

    /// Replaces the input with a suggestion's title and submits it.
    pub fn pick_suggestion(&mut self, index: usize) -> Option<ResultsTicket> {
        let title = self.suggestions.get(index)?.title.clone();
        self.input.clone_from(&title);
        Some(self.open_results(title))
    }

    /// Opens the results view for `query`, e.g. from a route.
    pub fn submit_query(&mut self, query: &str) -> Option<ResultsTicket> {
        self.input = String::from(query);
        self.submit()
    }

    /// Merges a full-results page. Returns `false` when stale.
    pub fn apply_results(&mut self, ticket: &ResultsTicket, outcome: anyhow::Result<Page>) -> bool {
        self.results.apply(ticket, outcome)
    }

    /// Requests the next results page regardless of scroll position.
    pub fn load_more_results(&mut self) -> Option<ResultsTicket> {
        self.results.load_more()
    }

    /// Reacts to the visible window of the results list.
    pub fn on_results_viewport(&mut self, height: usize) -> Option<ResultsTicket> {
        let viewport = self.results_cursor.follow(height);
        if self
            .results_observer
            .observe(
                self.results.items().len(),
                self.results.current_page(),
                viewport,
            )
        {
            self.results.load_more()
        } else {
            None
        }
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Suggestions from the latest settled query.
    #[must_use]
    pub fn suggestions(&self) -> &[CatalogItem] {
        &self.suggestions
    }

    /// Whether the dropdown is visible.
    #[must_use]
    pub const fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Highlighted suggestion index.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Full results state.
    #[must_use]
    pub const fn results(&self) -> &PagedQuery<String> {
        &self.results
    }

    /// Results selection and scroll position.
    #[must_use]
    pub const fn results_cursor(&self) -> &ScrollCursor {
        &self.results_cursor
    }

    /// Mutable results selection and scroll position.
    pub const fn results_cursor_mut(&mut self) -> &mut ScrollCursor {
        &mut self.results_cursor
    }

    /// Result under the cursor.
    #[must_use]
    pub fn selected_result(&self) -> Option<&CatalogItem> {
        self.results.items().get(self.results_cursor.selected())
    }

    fn open_results(&mut self, query: String) -> ResultsTicket {
        self.settle.cancel();
        self.dismiss();
        self.results_cursor.reset();
        self.results_observer.reattach();
        tracing::debug!(query = %query, "search submitted");
        self.results.reset(query)
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.dropdown_open = false;
        self.highlighted = None;
    }
}
