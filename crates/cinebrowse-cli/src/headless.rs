//! Non-interactive commands that drive the browsing state machines to
//! completion and render plain text lines.

use std::time::Instant;

use anyhow::{Result, bail};
use futures::future::join_all;

use cinebrowse_api::catalog::{CatalogApi, MediaType, TimeWindow};
use cinebrowse_tui::app::{App, AppSettings, Screen};
use cinebrowse_tui::details::{DetailsView, VideoState, cast_with_profiles};
use cinebrowse_tui::dispatch::{Delivery, Request, execute};
use cinebrowse_tui::format;
use cinebrowse_tui::loadable::Loadable;
use cinebrowse_tui::paging::PagedQuery;
use cinebrowse_tui::route::Route;

/// Executes `requests` concurrently and applies every outcome.
async fn drive<C: CatalogApi>(api: &C, app: &mut App, requests: Vec<Request>) {
    let outcomes = join_all(requests.iter().map(|request| execute(api, request))).await;
    for (request, outcome) in requests.into_iter().zip(outcomes) {
        app.apply(Delivery { request, outcome }, Instant::now());
    }
}

/// Trending items with rank, date, rating and poster URL.
///
/// # Errors
///
/// Returns an error if the trending list could not be loaded.
pub async fn trending<C: CatalogApi>(
    api: &C,
    settings: AppSettings,
    window: TimeWindow,
    limit: usize,
) -> Result<Vec<String>> {
    let settings = AppSettings {
        trending_window: window,
        ..settings
    };
    let (mut app, _) = App::new(settings, Instant::now());
    drive(
        api,
        &mut app,
        vec![Request::Configuration, Request::Trending(window)],
    )
    .await;

    let row = app.home().rows().into_iter().next();
    let Some(items) = row.and_then(|r| r.items) else {
        bail!("failed to load trending items");
    };
    Ok(items
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}\t{}/{}\t{}\t{}",
                format::rank_label(i),
                item.media_type,
                item.id,
                format::card_line(item),
                app.context().image_url(item.poster_path.as_deref())
            )
        })
        .collect())
}

fn list_lines<K>(query: &PagedQuery<K>) -> Vec<String>
where
    K: Clone + PartialEq + std::fmt::Debug,
{
    let mut lines = vec![format!(
        "Page {} of {} ({} results)",
        query.current_page(),
        query.total_pages().unwrap_or(0),
        query.total_results().unwrap_or(0)
    )];
    if query.is_empty_result() {
        lines.push(String::from("No results"));
    }
    lines.extend(
        query
            .items()
            .iter()
            .map(|item| format!("{}/{}\t{}", item.media_type, item.id, format::card_line(item))),
    );
    if query.is_failed() {
        lines.push(String::from("Loading stopped after an error"));
    }
    lines
}

async fn page_through<C: CatalogApi>(
    api: &C,
    app: &mut App,
    route: Route,
    pages: u32,
) -> Result<()> {
    let mut requests = app.navigate(route);
    for _ in 0..pages {
        if requests.is_empty() {
            break;
        }
        drive(api, app, requests).await;
        requests = app.load_more();
    }
    let query_failed_empty = match app.screen() {
        Screen::Explore(loader) => {
            loader.query().is_failed() && loader.query().items().is_empty()
        }
        Screen::Search => {
            app.search().results().is_failed() && app.search().results().items().is_empty()
        }
        Screen::Home | Screen::Details(_) | Screen::Invalid { .. } => false,
    };
    if query_failed_empty {
        bail!("failed to load the first page");
    }
    Ok(())
}

/// Discover listing, up to `pages` pages.
///
/// # Errors
///
/// Returns an error if the first page could not be loaded.
pub async fn discover<C: CatalogApi>(
    api: &C,
    settings: AppSettings,
    media_type: MediaType,
    pages: u32,
) -> Result<Vec<String>> {
    let (mut app, _) = App::new(settings, Instant::now());
    page_through(api, &mut app, Route::Explore(media_type), pages).await?;
    match app.screen() {
        Screen::Explore(loader) => Ok(list_lines(loader.query())),
        _ => bail!("listing screen was not opened"),
    }
}

/// Multi-search results, up to `pages` pages.
///
/// # Errors
///
/// Returns an error if the query is blank or the first page could not be loaded.
pub async fn search<C: CatalogApi>(
    api: &C,
    settings: AppSettings,
    query: &str,
    pages: u32,
) -> Result<Vec<String>> {
    let query = query.trim();
    if query.is_empty() {
        bail!("search query must not be empty");
    }
    let (mut app, _) = App::new(settings, Instant::now());
    page_through(api, &mut app, Route::Search(String::from(query)), pages).await?;
    Ok(list_lines(app.search().results()))
}

/// Details, credits and related titles for one item.
///
/// # Errors
///
/// Returns an error if no details are available for the item.
pub async fn details<C: CatalogApi>(
    api: &C,
    settings: AppSettings,
    media_type: MediaType,
    id: u64,
    with_video: bool,
) -> Result<Vec<String>> {
    let (mut app, _) = App::new(settings, Instant::now());
    let requests = app.navigate(Route::Details { media_type, id });
    drive(api, &mut app, requests).await;
    if with_video {
        let requests = app.request_video();
        drive(api, &mut app, requests).await;
    }

    let Screen::Details(aggregator) = app.screen() else {
        bail!("details screen was not opened");
    };
    let DetailsView::Ready(record) = aggregator.view() else {
        bail!("no details available for {media_type}/{id}");
    };

    let mut lines = vec![record.title.clone()];
    if let Some(tagline) = record.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(String::from(tagline));
    }
    lines.push(format!(
        "Released: {}",
        format::release_date(record.release_date.as_deref())
    ));
    lines.push(format!(
        "Rating: {} ({} votes)",
        format::rating(record.vote_average),
        format::thousands(record.vote_count)
    ));
    if let Some(runtime) = format::runtime(record.runtime) {
        lines.push(format!("Runtime: {runtime}"));
    }
    if let Some(status) = &record.status {
        lines.push(format!("Status: {status}"));
    }
    if let Some(revenue) = format::revenue(record.revenue) {
        lines.push(format!("Revenue: {revenue}"));
    }
    if !record.genres.is_empty() {
        let names: Vec<&str> = record.genres.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("Genres: {}", names.join(", ")));
    }
    let crew = aggregator.crew();
    if let Some(director) = &crew.director {
        lines.push(format!("Director: {director}"));
    }
    if let Some(writers) = crew.writers_label() {
        lines.push(format!("Writers: {writers}"));
    }
    lines.push(format!(
        "Poster: {}",
        app.context().image_url(record.poster_path.as_deref())
    ));
    if let Some(overview) = record.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(String::from(overview));
    }

    if let Loadable::Ready(credits) = aggregator.credits() {
        for member in cast_with_profiles(credits) {
            lines.push(format!(
                "Cast: {} as {}",
                member.name,
                member.character.as_deref().unwrap_or("?")
            ));
        }
    }
    for (label, state) in [
        ("Similar", aggregator.similar()),
        ("Recommended", aggregator.recommendations()),
    ] {
        if let Loadable::Ready(page) = state {
            for item in &page.items {
                lines.push(format!("{label}: {} ({}/{})", item.title, item.media_type, item.id));
            }
        }
    }

    if with_video {
        lines.push(match aggregator.video() {
            VideoState::Playable(video) => format!(
                "Trailer: {}",
                video.watch_url().unwrap_or_else(|| video.key.clone())
            ),
            VideoState::NoVideo => String::from("Trailer: no video available"),
            VideoState::Failed => String::from("Trailer: could not load video"),
            VideoState::Pending | VideoState::Closed => String::from("Trailer: unavailable"),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::anyhow;
    use cinebrowse_api::catalog::{
        CastMember, CatalogItem, Configuration, Credits, CrewMember, CuratedList, Details, Page,
        Video,
    };

    use super::*;

    fn item(id: u64, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            media_type: MediaType::Movie,
            title: String::from(title),
            release_date: Some(String::from("1999-10-15")),
            vote_average: 8.4,
            popularity: 61.4,
            overview: None,
            poster_path: Some(format!("/{id}.jpg")),
            backdrop_path: None,
        }
    }

    /// Canned catalog; discover serves 3 pages and fails on page 3.
    #[derive(Debug, Default)]
    struct StubCatalog {
        fail_details: bool,
    }

    impl CatalogApi for StubCatalog {
        async fn trending(&self, _window: TimeWindow) -> Result<Vec<CatalogItem>> {
            Ok(vec![item(1, "Dune: Part Two"), item(2, "Civil War")])
        }

        async fn configuration(&self) -> Result<Configuration> {
            Ok(Configuration {
                secure_base_url: String::from("https://image.tmdb.org/t/p/"),
                poster_sizes: vec![],
            })
        }

        async fn curated(&self, _list: CuratedList, page: u32) -> Result<Page> {
            Ok(Page {
                page_number: page,
                total_pages: 1,
                total_results: 0,
                items: vec![],
            })
        }

        async fn discover(&self, _media_type: MediaType, page: u32) -> Result<Page> {
            if page == 3 {
                return Err(anyhow!("TMDB API error (HTTP 500)"));
            }
            Ok(Page {
                page_number: page,
                total_pages: 5,
                total_results: 100,
                items: vec![item(u64::from(page), &format!("Movie {page}"))],
            })
        }

        async fn search_multi(&self, query: &str, page: u32) -> Result<Page> {
            Ok(Page {
                page_number: page,
                total_pages: 1,
                total_results: 1,
                items: vec![item(603, query)],
            })
        }

        async fn details(&self, media_type: MediaType, id: u64) -> Result<Details> {
            if self.fail_details {
                return Err(anyhow!("TMDB API error (HTTP 404)"));
            }
            Ok(Details {
                id,
                media_type,
                title: String::from("Fight Club"),
                tagline: Some(String::from("Mischief. Mayhem. Soap.")),
                overview: Some(String::from("An insomniac office worker...")),
                status: Some(String::from("Released")),
                release_date: Some(String::from("1999-10-15")),
                runtime: Some(139),
                vote_average: 8.4,
                vote_count: 26_280,
                revenue: Some(100_853_753),
                genres: vec![],
                poster_path: Some(String::from("/poster.jpg")),
                backdrop_path: None,
            })
        }

        async fn credits(&self, _media_type: MediaType, _id: u64) -> Result<Credits> {
            Ok(Credits {
                cast: vec![CastMember {
                    id: 819,
                    name: String::from("Edward Norton"),
                    character: Some(String::from("Narrator")),
                    profile_path: Some(String::from("/en.jpg")),
                }],
                crew: vec![CrewMember {
                    id: 7467,
                    name: String::from("David Fincher"),
                    job: String::from("Director"),
                    department: Some(String::from("Directing")),
                }],
            })
        }

        async fn similar(&self, _media_type: MediaType, _id: u64, _page: u32) -> Result<Page> {
            Err(anyhow!("timeout"))
        }

        async fn recommendations(
            &self,
            _media_type: MediaType,
            _id: u64,
            page: u32,
        ) -> Result<Page> {
            Ok(Page {
                page_number: page,
                total_pages: 1,
                total_results: 1,
                items: vec![item(807, "Se7en")],
            })
        }

        async fn videos(&self, _media_type: MediaType, _id: u64) -> Result<Vec<Video>> {
            Ok(vec![Video {
                key: String::from("6JnN1DmbqoU"),
                name: String::from("Trailer"),
                site: String::from("YouTube"),
                kind: String::from("Trailer"),
            }])
        }
    }

    #[tokio::test]
    async fn test_trending_lines_use_image_base() {
        // Arrange
        let api = StubCatalog::default();

        // Act
        let lines = trending(&api, AppSettings::default(), TimeWindow::Day, 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(lines.len(), 1);
        let line = lines.first().unwrap();
        assert!(line.starts_with("#1 Trending\tmovie/1\tDune: Part Two"));
        assert!(line.ends_with("https://image.tmdb.org/t/p/original/1.jpg"));
    }

    #[tokio::test]
    async fn test_discover_keeps_pages_before_failure() {
        // Arrange
        let api = StubCatalog::default();

        // Act
        let lines = discover(&api, AppSettings::default(), MediaType::Movie, 4)
            .await
            .unwrap();

        // Assert
        assert_eq!(lines.first().unwrap(), "Page 2 of 5 (100 results)");
        assert!(lines.iter().any(|l| l.contains("Movie 1")));
        assert!(lines.iter().any(|l| l.contains("Movie 2")));
        assert_eq!(lines.last().unwrap(), "Loading stopped after an error");
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        // Arrange
        let api = StubCatalog::default();

        // Act
        let err = search(&api, AppSettings::default(), "  ", 1)
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "search query must not be empty");
    }

    #[tokio::test]
    async fn test_search_lists_results() {
        // Arrange
        let api = StubCatalog::default();

        // Act
        let lines = search(&api, AppSettings::default(), "The Matrix", 3)
            .await
            .unwrap();

        // Assert
        assert_eq!(lines.len(), 2);
        assert!(lines.get(1).unwrap().starts_with("movie/603\tThe Matrix"));
    }

    #[tokio::test]
    async fn test_details_tolerates_failed_side_panel() {
        // Arrange
        let api = StubCatalog::default();

        // Act
        let lines = details(&api, AppSettings::default(), MediaType::Movie, 550, true)
            .await
            .unwrap();

        // Assert
        assert_eq!(lines.first().unwrap(), "Fight Club");
        assert!(lines.contains(&String::from("Runtime: 2h 19m")));
        assert!(lines.contains(&String::from("Director: David Fincher")));
        assert!(lines.contains(&String::from("Cast: Edward Norton as Narrator")));
        assert!(lines.contains(&String::from("Recommended: Se7en (movie/807)")));
        assert!(!lines.iter().any(|l| l.starts_with("Similar:")));
        assert_eq!(
            lines.last().unwrap(),
            "Trailer: https://www.youtube.com/watch?v=6JnN1DmbqoU"
        );
    }

    #[tokio::test]
    async fn test_details_unavailable_is_an_error() {
        // Arrange
        let api = StubCatalog { fail_details: true };

        // Act
        let err = details(&api, AppSettings::default(), MediaType::Tv, 1, false)
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "no details available for tv/1");
    }
}
