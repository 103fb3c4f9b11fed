//! Screen state machine tying the components together.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cinebrowse_api::catalog::{CatalogItem, CuratedList, MediaType, TimeWindow};

use crate::carousel::{BannerCarousel, CarouselTiming};
use crate::context::AppContext;
use crate::details::{DetailsAggregator, DetailsPart, VideoState};
use crate::dispatch::{Delivery, Payload, Request};
use crate::home::HomeRows;
use crate::listing::ListingLoader;
use crate::route::{Route, RouteError};
use crate::search::{DEFAULT_DEBOUNCE, ResultsTicket, SearchController};

/// Tunables taken from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    /// Settle window for search input.
    pub search_debounce: Duration,
    /// Carousel tick and settle durations.
    pub carousel: CarouselTiming,
    /// Trending window for the banner and first home row.
    pub trending_window: TimeWindow,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_DEBOUNCE,
            carousel: CarouselTiming::default(),
            trending_window: TimeWindow::Week,
        }
    }
}

/// Active screen and its route-scoped state.
#[derive(Debug)]
pub enum Screen {
    /// Banner carousel and home rows.
    Home,
    /// Category listing.
    Explore(ListingLoader),
    /// Full search results (state lives in the search controller).
    Search,
    /// Item details.
    Details(Box<DetailsAggregator>),
    /// Address that could not be parsed.
    Invalid {
        /// Address as entered.
        address: String,
        /// Parse failure.
        error: RouteError,
    },
}

/// Where key presses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The active screen.
    Content,
    /// The search box.
    SearchInput,
}

/// Selection on the home screen. Row 0 is the banner while it has items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HomeCursor {
    /// Selected row.
    pub row: usize,
    /// Selected column within the row.
    pub col: usize,
}

/// Whole-application state.
#[derive(Debug)]
pub struct App {
    settings: AppSettings,
    context: AppContext,
    home: HomeRows,
    carousel: BannerCarousel,
    search: SearchController,
    screen: Screen,
    route: Option<Route>,
    history: Vec<Route>,
    focus: Focus,
    home_cursor: HomeCursor,
    list_height: usize,
    status: Option<String>,
    quit: bool,
}

impl App {
    /// Creates the app on the home screen plus its startup requests.
    #[must_use]
    pub fn new(settings: AppSettings, now: Instant) -> (Self, Vec<Request>) {
        let app = Self {
            settings,
            context: AppContext::new(),
            home: HomeRows::new(),
            carousel: BannerCarousel::new(Vec::new(), settings.carousel, now),
            search: SearchController::new(settings.search_debounce),
            screen: Screen::Home,
            route: Some(Route::Home),
            history: Vec::new(),
            focus: Focus::Content,
            home_cursor: HomeCursor::default(),
            list_height: 0,
            status: None,
            quit: false,
        };
        let mut requests = vec![
            Request::Configuration,
            Request::Trending(settings.trending_window),
        ];
        requests.extend(CuratedList::ALL.into_iter().map(Request::Curated));
        (app, requests)
    }

    // --- Navigation ---

    /// Parses `address` and navigates there, or shows the invalid screen.
    pub fn open_address(&mut self, address: &str) -> Vec<Request> {
        match address.parse::<Route>() {
            Ok(route) => self.navigate(route),
            Err(error) => {
                tracing::warn!(address, %error, "invalid address");
                self.remember_current();
                self.route = None;
                self.screen = Screen::Invalid {
                    address: String::from(address),
                    error,
                };
                Vec::new()
            }
        }
    }

    /// Navigates to `route`, recreating its route-scoped state.
    pub fn navigate(&mut self, route: Route) -> Vec<Request> {
        self.remember_current();
        self.enter(route)
    }

    /// Returns to the previous route, or home.
    pub fn back(&mut self) -> Vec<Request> {
        let route = self.history.pop().unwrap_or(Route::Home);
        self.enter(route)
    }

    fn remember_current(&mut self) {
        if let Some(current) = self.route.take() {
            self.history.push(current);
        }
    }

    fn enter(&mut self, route: Route) -> Vec<Request> {
        tracing::debug!(%route, "navigating");
        self.status = None;
        self.focus = Focus::Content;
        let requests = match &route {
            Route::Home => {
                self.screen = Screen::Home;
                Vec::new()
            }
            Route::Explore(media_type) => {
                let (loader, ticket) = ListingLoader::open(*media_type);
                self.screen = Screen::Explore(loader);
                vec![Request::Listing(ticket)]
            }
            Route::Search(query) => {
                self.screen = Screen::Search;
                self.search
                    .submit_query(query)
                    .map(Request::SearchResults)
                    .into_iter()
                    .collect()
            }
            Route::Details { media_type, id } => {
                let (aggregator, ticket) = DetailsAggregator::open(*media_type, *id);
                self.screen = Screen::Details(Box::new(aggregator));
                DetailsPart::ALL
                    .into_iter()
                    .map(|part| Request::Details(ticket, part))
                    .collect()
            }
        };
        self.route = Some(route);
        requests
    }

    fn enter_search_results(&mut self, ticket: ResultsTicket) -> Vec<Request> {
        self.remember_current();
        self.route = Some(Route::Search(ticket.key.clone()));
        self.screen = Screen::Search;
        self.focus = Focus::Content;
        self.status = None;
        vec![Request::SearchResults(ticket)]
    }

    fn open_item(&mut self, item: &CatalogItem) -> Vec<Request> {
        self.navigate(Route::Details {
            media_type: item.media_type,
            id: item.id,
        })
    }

    // --- Timers and layout ---

    /// Runs due timers.
    pub fn tick(&mut self, now: Instant) -> Vec<Request> {
        self.carousel.poll(now);
        self.search
            .poll(now)
            .map(Request::Suggestions)
            .into_iter()
            .collect()
    }

    /// Reports the visible list height; may request the next page.
    pub fn on_viewport(&mut self, height: usize) -> Vec<Request> {
        self.list_height = height;
        match &mut self.screen {
            Screen::Explore(loader) => loader
                .on_viewport(height)
                .map(Request::Listing)
                .into_iter()
                .collect(),
            Screen::Search => self
                .search
                .on_results_viewport(height)
                .map(Request::SearchResults)
                .into_iter()
                .collect(),
            Screen::Home | Screen::Details(_) | Screen::Invalid { .. } => Vec::new(),
        }
    }

    /// Requests the next page of the active list, ignoring scroll position.
    pub fn load_more(&mut self) -> Vec<Request> {
        match &mut self.screen {
            Screen::Explore(loader) => loader
                .load_more()
                .map(Request::Listing)
                .into_iter()
                .collect(),
            Screen::Search => self
                .search
                .load_more_results()
                .map(Request::SearchResults)
                .into_iter()
                .collect(),
            Screen::Home | Screen::Details(_) | Screen::Invalid { .. } => Vec::new(),
        }
    }

    /// Opens the trailer modal on the details screen.
    pub fn request_video(&mut self) -> Vec<Request> {
        match &mut self.screen {
            Screen::Details(aggregator) if !aggregator.is_video_open() => {
                vec![Request::Videos(aggregator.request_video())]
            }
            _ => Vec::new(),
        }
    }

    // --- Deliveries ---

    /// Routes a finished request to its component.
    pub fn apply(&mut self, delivery: Delivery, now: Instant) {
        let Delivery { request, outcome } = delivery;
        match request {
            Request::Configuration => match outcome.and_then(Payload::into_configuration) {
                Ok(config) => self.context.set_image_base(config.image_base()),
                Err(e) => tracing::warn!(error = %e, "configuration fetch failed"),
            },
            Request::Trending(_) => {
                let outcome = outcome.and_then(Payload::into_items);
                if let Ok(items) = &outcome {
                    self.context.set_banner(items.clone());
                    self.carousel.replace_items(items.clone(), now);
                }
                self.home.set_trending(outcome);
            }
            Request::Curated(list) => {
                self.home
                    .set_curated(list, outcome.and_then(Payload::into_page));
            }
            Request::Listing(ticket) => {
                if let Screen::Explore(loader) = &mut self.screen {
                    loader.apply(&ticket, outcome.and_then(Payload::into_page));
                } else {
                    tracing::debug!(page = ticket.page, "listing response after leaving listing");
                }
            }
            Request::Suggestions(ticket) => {
                self.search
                    .apply_suggestions(&ticket, outcome.and_then(Payload::into_page));
            }
            Request::SearchResults(ticket) => {
                self.search
                    .apply_results(&ticket, outcome.and_then(Payload::into_page));
            }
            Request::Details(ticket, part) => {
                let Screen::Details(aggregator) = &mut self.screen else {
                    tracing::debug!(id = ticket.id, "details response after leaving details");
                    return;
                };
                match part {
                    DetailsPart::Primary => {
                        aggregator.apply_primary(&ticket, outcome.and_then(Payload::into_details));
                    }
                    DetailsPart::Credits => {
                        aggregator.apply_credits(&ticket, outcome.and_then(Payload::into_credits));
                    }
                    DetailsPart::Similar => {
                        aggregator.apply_similar(&ticket, outcome.and_then(Payload::into_page));
                    }
                    DetailsPart::Recommendations => {
                        aggregator
                            .apply_recommendations(&ticket, outcome.and_then(Payload::into_page));
                    }
                }
            }
            Request::Videos(ticket) => {
                if let Screen::Details(aggregator) = &mut self.screen {
                    aggregator.apply_video(&ticket, outcome.and_then(Payload::into_videos));
                }
            }
        }
    }

    // --- Keys ---

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Request> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Vec::new();
        }
        match self.focus {
            Focus::SearchInput => self.handle_search_key(key, now),
            Focus::Content => self.handle_content_key(key, now),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Request> {
        match key.code {
            KeyCode::Esc => {
                self.search.dismiss();
                self.focus = Focus::Content;
            }
            KeyCode::Enter => {
                if let Some(ticket) = self.search.submit_highlighted() {
                    return self.enter_search_results(ticket);
                }
            }
            KeyCode::Down => self.search.highlight_next(),
            KeyCode::Up => self.search.highlight_prev(),
            KeyCode::Backspace => self.search.pop_char(now),
            KeyCode::Char(c) => self.search.push_char(c, now),
            _ => {}
        }
        Vec::new()
    }

    fn handle_content_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Request> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit = true;
                return Vec::new();
            }
            KeyCode::Char('/') => {
                self.focus = Focus::SearchInput;
                return Vec::new();
            }
            KeyCode::Char('h') => return self.navigate(Route::Home),
            KeyCode::Char('m') => return self.navigate(Route::Explore(MediaType::Movie)),
            KeyCode::Char('t') => return self.navigate(Route::Explore(MediaType::Tv)),
            _ => {}
        }
        match &self.screen {
            Screen::Home => self.handle_home_key(key.code, now),
            Screen::Explore(_) | Screen::Search => self.handle_list_key(key.code),
            Screen::Details(_) => self.handle_details_key(key.code),
            Screen::Invalid { .. } => match key.code {
                KeyCode::Esc | KeyCode::Backspace => self.back(),
                _ => Vec::new(),
            },
        }
    }

    fn handle_home_key(&mut self, code: KeyCode, now: Instant) -> Vec<Request> {
        let rows = self.home.len();
        self.home_cursor = self.home_cursor();
        match code {
            KeyCode::Up => {
                self.home_cursor.row = self
                    .home_cursor
                    .row
                    .saturating_sub(1)
                    .max(self.first_home_row());
                self.home_cursor.col = 0;
            }
            KeyCode::Down => {
                if self.home_cursor.row < rows {
                    self.home_cursor.row = self.home_cursor.row.saturating_add(1);
                    self.home_cursor.col = 0;
                }
            }
            KeyCode::Left => {
                if self.home_cursor.row == 0 {
                    self.carousel.prev(now);
                } else {
                    self.home_cursor.col = self.home_cursor.col.saturating_sub(1);
                }
            }
            KeyCode::Right => {
                if self.home_cursor.row == 0 {
                    self.carousel.next(now);
                } else {
                    let len = self.home_row_items(self.home_cursor.row).len();
                    if self.home_cursor.col.saturating_add(1) < len {
                        self.home_cursor.col = self.home_cursor.col.saturating_add(1);
                    }
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(index) = c.to_digit(10).and_then(|d| d.checked_sub(1)) {
                    self.carousel
                        .jump(usize::try_from(index).unwrap_or(usize::MAX), now);
                }
            }
            KeyCode::Enter => {
                if let Some(item) = self.home_selection().cloned() {
                    return self.open_item(&item);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Vec<Request> {
        let page = self.list_height.max(1);
        let (cursor, len) = match &mut self.screen {
            Screen::Explore(loader) => {
                let len = loader.query().items().len();
                (loader.cursor_mut(), len)
            }
            Screen::Search => {
                let len = self.search.results().items().len();
                (self.search.results_cursor_mut(), len)
            }
            Screen::Home | Screen::Details(_) | Screen::Invalid { .. } => return Vec::new(),
        };
        match code {
            KeyCode::Up | KeyCode::Char('k') => cursor.up(),
            KeyCode::Down | KeyCode::Char('j') => cursor.down(len),
            KeyCode::PageUp => cursor.page_up(page),
            KeyCode::PageDown => cursor.page_down(len, page),
            KeyCode::Esc | KeyCode::Backspace => return self.back(),
            KeyCode::Enter => {
                let selected = match &self.screen {
                    Screen::Explore(loader) => loader.selected_item().cloned(),
                    _ => self.search.selected_result().cloned(),
                };
                if let Some(item) = selected {
                    return self.open_item(&item);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_details_key(&mut self, code: KeyCode) -> Vec<Request> {
        let Screen::Details(aggregator) = &mut self.screen else {
            return Vec::new();
        };
        match code {
            KeyCode::Char('p') => return self.request_video(),
            KeyCode::Char('o') => self.open_trailer(),
            KeyCode::Esc | KeyCode::Backspace => {
                if aggregator.is_video_open() {
                    aggregator.close_video();
                } else {
                    return self.back();
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn open_trailer(&mut self) {
        let Screen::Details(aggregator) = &self.screen else {
            return;
        };
        let VideoState::Playable(video) = aggregator.video() else {
            return;
        };
        let Some(url) = video.watch_url() else {
            self.status = Some(format!("Unsupported video site: {}", video.site));
            return;
        };
        match open::that(&url) {
            Ok(()) => self.status = Some(format!("Opened {url}")),
            Err(e) => {
                tracing::warn!(error = %e, url, "failed to open browser");
                self.status = Some(format!("Could not open {url}"));
            }
        }
    }

    // --- Accessors ---

    /// Row 0 is the banner, which is absent while the carousel is empty.
    fn first_home_row(&self) -> usize {
        usize::from(self.carousel.items().is_empty())
    }

    fn home_row_items(&self, row: usize) -> &[CatalogItem] {
        row.checked_sub(1)
            .and_then(|i| self.home.rows().get(i).and_then(|r| r.items))
            .unwrap_or(&[])
    }

    /// Item selected on the home screen.
    #[must_use]
    pub fn home_selection(&self) -> Option<&CatalogItem> {
        let cursor = self.home_cursor();
        if cursor.row == 0 {
            self.carousel.active_item()
        } else {
            self.home_row_items(cursor.row).get(cursor.col)
        }
    }

    /// Shared context.
    #[must_use]
    pub const fn context(&self) -> &AppContext {
        &self.context
    }

    /// Home rows.
    #[must_use]
    pub const fn home(&self) -> &HomeRows {
        &self.home
    }

    /// Home cursor; skips the banner row while the carousel is empty.
    #[must_use]
    pub fn home_cursor(&self) -> HomeCursor {
        let first = self.first_home_row();
        if self.home_cursor.row < first {
            HomeCursor { row: first, col: 0 }
        } else {
            self.home_cursor
        }
    }

    /// Banner carousel.
    #[must_use]
    pub const fn carousel(&self) -> &BannerCarousel {
        &self.carousel
    }

    /// Search controller.
    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    /// Active screen.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current route, `None` on the invalid screen.
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Key focus.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Transient status line.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Whether the user asked to quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use cinebrowse_api::catalog::Configuration;

    use super::*;
    use crate::details::DetailsView;
    use crate::details::tests::details;
    use crate::paging::tests::{item, page};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn deliver(request: Request, payload: Payload) -> Delivery {
        Delivery {
            request,
            outcome: Ok(payload),
        }
    }

    fn app() -> (App, Instant) {
        let now = Instant::now();
        let (app, _) = App::new(AppSettings::default(), now);
        (app, now)
    }

    #[test]
    fn test_startup_requests() {
        // Arrange & Act
        let (_, requests) = App::new(AppSettings::default(), Instant::now());

        // Assert
        assert_eq!(requests.len(), 6);
        assert_eq!(requests.first(), Some(&Request::Configuration));
        assert!(requests.contains(&Request::Curated(CuratedList::OnTheAirTv)));
    }

    #[test]
    fn test_startup_deliveries_fill_context_and_carousel() {
        // Arrange
        let (mut app, now) = app();

        // Act
        app.apply(
            deliver(
                Request::Configuration,
                Payload::Configuration(Configuration {
                    secure_base_url: String::from("https://image.tmdb.org/t/p/"),
                    poster_sizes: vec![],
                }),
            ),
            now,
        );
        app.apply(
            deliver(
                Request::Trending(TimeWindow::Week),
                Payload::Items(vec![item(1), item(2)]),
            ),
            now,
        );

        // Assert
        assert!(app.context().has_image_base());
        assert_eq!(app.context().banner().len(), 2);
        assert!(app.carousel().is_ticking());
        assert_eq!(app.home_selection().unwrap().id, 1);
    }

    #[test]
    fn test_explore_route_loads_and_pages() {
        // Arrange
        let (mut app, _) = app();

        // Act
        let requests = app.open_address("/movie");

        // Assert
        let [Request::Listing(ticket)] = requests.as_slice() else {
            panic!("expected one listing request, got {requests:?}");
        };
        assert_eq!(ticket.key, MediaType::Movie);

        // Act: deliver page 1, then report a tall viewport
        app.apply(
            deliver(Request::Listing(ticket.clone()), Payload::Page(page(1, 5, &[1, 2]))),
            Instant::now(),
        );
        let more = app.on_viewport(20);

        // Assert
        assert!(matches!(more.as_slice(), [Request::Listing(t)] if t.page == 2));
    }

    #[test]
    fn test_switching_category_drops_old_pages() {
        // Arrange
        let (mut app, now) = app();
        let movie = app.open_address("/movie");
        let _tv = app.open_address("/tv");

        // Act
        let Some(Request::Listing(stale)) = movie.into_iter().next() else {
            panic!("expected listing request");
        };
        app.apply(
            deliver(Request::Listing(stale), Payload::Page(page(1, 5, &[1]))),
            now,
        );

        // Assert
        let Screen::Explore(loader) = app.screen() else {
            panic!("expected explore screen");
        };
        assert_eq!(loader.media_type(), Some(MediaType::Tv));
        assert!(loader.query().items().is_empty());
        assert!(loader.query().is_loading());
    }

    #[test]
    fn test_typing_settles_into_one_suggestion_request() {
        // Arrange
        let (mut app, t0) = app();
        app.handle_key(key(KeyCode::Char('/')), t0);

        // Act
        for (i, c) in "dune".chars().enumerate() {
            let at = t0 + Duration::from_millis(50 * u64::try_from(i).unwrap());
            app.handle_key(key(KeyCode::Char(c)), at);
            assert!(app.tick(at).is_empty());
        }
        let requests = app.tick(t0 + Duration::from_millis(600));

        // Assert
        assert_eq!(app.focus(), Focus::SearchInput);
        assert!(matches!(requests.as_slice(), [Request::Suggestions(t)] if t.query == "dune"));
    }

    #[test]
    fn test_enter_in_search_opens_results() {
        // Arrange
        let (mut app, t0) = app();
        app.handle_key(key(KeyCode::Char('/')), t0);
        app.handle_key(key(KeyCode::Char('x')), t0);

        // Act
        let requests = app.handle_key(key(KeyCode::Enter), t0);

        // Assert
        assert!(matches!(app.screen(), Screen::Search));
        assert_eq!(app.route(), Some(&Route::Search(String::from("x"))));
        assert!(matches!(requests.as_slice(), [Request::SearchResults(t)] if t.page == 1));
        assert_eq!(app.focus(), Focus::Content);
    }

    #[test]
    fn test_escape_in_search_keeps_text() {
        // Arrange
        let (mut app, t0) = app();
        app.handle_key(key(KeyCode::Char('/')), t0);
        app.handle_key(key(KeyCode::Char('a')), t0);

        // Act
        app.handle_key(key(KeyCode::Esc), t0);

        // Assert
        assert_eq!(app.search().input(), "a");
        assert_eq!(app.focus(), Focus::Content);
    }

    #[test]
    fn test_details_route_issues_four_requests() {
        // Arrange
        let (mut app, now) = app();

        // Act
        let requests = app.open_address("/movie/550");

        // Assert
        assert_eq!(requests.len(), 4);
        for request in requests {
            let Request::Details(ticket, part) = request else {
                panic!("expected details request");
            };
            let payload = match part {
                DetailsPart::Primary => Payload::Details(Box::new(details("Fight Club"))),
                DetailsPart::Credits => {
                    app.apply(
                        Delivery {
                            request: Request::Details(ticket, part),
                            outcome: Err(anyhow::anyhow!("HTTP 500")),
                        },
                        now,
                    );
                    continue;
                }
                DetailsPart::Similar | DetailsPart::Recommendations => {
                    Payload::Page(page(1, 1, &[3]))
                }
            };
            app.apply(deliver(Request::Details(ticket, part), payload), now);
        }
        let Screen::Details(aggregator) = app.screen() else {
            panic!("expected details screen");
        };
        assert!(matches!(aggregator.view(), DetailsView::Ready(d) if d.title == "Fight Club"));
        assert!(aggregator.crew().director.is_none());
    }

    #[test]
    fn test_play_then_escape_closes_modal_before_leaving() {
        // Arrange
        let (mut app, now) = app();
        app.open_address("/tv/1399");

        // Act
        let requests = app.handle_key(key(KeyCode::Char('p')), now);
        app.handle_key(key(KeyCode::Esc), now);

        // Assert
        assert!(matches!(requests.as_slice(), [Request::Videos(t)] if t.id == 1399));
        let Screen::Details(aggregator) = app.screen() else {
            panic!("expected details screen");
        };
        assert_eq!(aggregator.video(), VideoState::Closed);

        // Act: second escape goes back home
        app.handle_key(key(KeyCode::Esc), now);

        // Assert
        assert!(matches!(app.screen(), Screen::Home));
    }

    #[test]
    fn test_invalid_address_shows_error_screen() {
        // Arrange
        let (mut app, now) = app();

        // Act
        let requests = app.open_address("/person/17");

        // Assert
        assert!(requests.is_empty());
        assert!(app.route().is_none());
        assert!(matches!(
            app.screen(),
            Screen::Invalid { error: RouteError::UnsupportedMediaType(m), .. } if m == "person"
        ));

        // Act
        app.handle_key(key(KeyCode::Esc), now);

        // Assert
        assert_eq!(app.route(), Some(&Route::Home));
    }

    #[test]
    fn test_back_recreates_previous_listing() {
        // Arrange
        let (mut app, now) = app();
        app.open_address("/tv");
        app.open_address("/tv/1399");

        // Act
        let requests = app.handle_key(key(KeyCode::Esc), now);

        // Assert
        assert_eq!(app.route(), Some(&Route::Explore(MediaType::Tv)));
        assert!(matches!(requests.as_slice(), [Request::Listing(t)] if t.page == 1));
    }

    #[test]
    fn test_home_keys_drive_carousel() {
        // Arrange
        let (mut app, now) = app();
        app.apply(
            deliver(
                Request::Trending(TimeWindow::Week),
                Payload::Items((1..=4).map(item).collect()),
            ),
            now,
        );

        // Act
        app.handle_key(key(KeyCode::Left), now);

        // Assert
        assert_eq!(app.carousel().active_index(), 3);

        // Act: ignored while transitioning
        app.handle_key(key(KeyCode::Char('2')), now);
        assert_eq!(app.carousel().active_index(), 3);
        let later = now + Duration::from_millis(700);
        app.tick(later);
        app.handle_key(key(KeyCode::Char('2')), later);

        // Assert
        assert_eq!(app.carousel().active_index(), 1);
    }

    #[test]
    fn test_enter_on_home_row_opens_details() {
        // Arrange
        let (mut app, now) = app();
        app.apply(
            deliver(
                Request::Curated(CuratedList::NowPlayingMovies),
                Payload::Page(page(1, 1, &[11, 12])),
            ),
            now,
        );
        // No banner yet, so the cursor starts on the trending row.
        app.handle_key(key(KeyCode::Down), now);
        app.handle_key(key(KeyCode::Right), now);

        // Act
        let requests = app.handle_key(key(KeyCode::Enter), now);

        // Assert
        assert_eq!(requests.len(), 4);
        assert_eq!(
            app.route(),
            Some(&Route::Details {
                media_type: MediaType::Movie,
                id: 12
            })
        );
    }

    #[test]
    fn test_home_cursor_skips_absent_banner() {
        // Arrange
        let (mut app, now) = app();

        // Act
        app.handle_key(key(KeyCode::Up), now);

        // Assert
        assert_eq!(app.home_cursor(), HomeCursor { row: 1, col: 0 });
        assert!(app.home_selection().is_none());

        // Act: the banner row appears once trending arrives
        app.apply(
            deliver(
                Request::Trending(TimeWindow::Week),
                Payload::Items(vec![item(7)]),
            ),
            now,
        );
        app.handle_key(key(KeyCode::Up), now);

        // Assert
        assert_eq!(app.home_cursor(), HomeCursor { row: 0, col: 0 });
        assert_eq!(app.home_selection().unwrap().id, 7);
    }

    #[test]
    fn test_load_more_without_viewport() {
        // Arrange
        let (mut app, now) = app();
        let first = app.open_address("/search?query=heat");
        let Some(Request::SearchResults(ticket)) = first.into_iter().next() else {
            panic!("expected search request");
        };
        app.apply(
            deliver(Request::SearchResults(ticket), Payload::Page(page(1, 2, &[1]))),
            now,
        );

        // Act
        let more = app.load_more();

        // Assert
        assert!(matches!(more.as_slice(), [Request::SearchResults(t)] if t.page == 2 && t.key == "heat"));
        assert!(app.load_more().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        // Arrange
        let (mut app, now) = app();

        // Act
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now);

        // Assert
        assert!(app.should_quit());
    }
}
