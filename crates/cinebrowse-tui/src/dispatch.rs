//! Request values, their execution, and delivery back to the UI loop.

use std::sync::Arc;

use anyhow::{Result, bail};
use tokio::sync::mpsc;

use cinebrowse_api::catalog::{
    CatalogApi, CatalogItem, Configuration, Credits, CuratedList, Details, Page, TimeWindow, Video,
};

use crate::details::{DetailsPart, DetailsTicket, VideoTicket};
use crate::listing::ListingTicket;
use crate::search::{ResultsTicket, SuggestionTicket};

/// A fetch requested by a state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Image configuration.
    Configuration,
    /// Trending items for the banner and first home row.
    Trending(TimeWindow),
    /// One curated home row.
    Curated(CuratedList),
    /// A category listing page.
    Listing(ListingTicket),
    /// Search suggestions.
    Suggestions(SuggestionTicket),
    /// A full search results page.
    SearchResults(ResultsTicket),
    /// One details sub-resource.
    Details(DetailsTicket, DetailsPart),
    /// Video list for the trailer modal.
    Videos(VideoTicket),
}

/// Successful response body.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Image configuration.
    Configuration(Configuration),
    /// Unpaged items.
    Items(Vec<CatalogItem>),
    /// One page.
    Page(Page),
    /// Full details record.
    Details(Box<Details>),
    /// Cast and crew.
    Credits(Credits),
    /// Video list.
    Videos(Vec<Video>),
}

impl Payload {
    /// Extracts a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_configuration(self) -> Result<Configuration> {
        match self {
            Self::Configuration(c) => Ok(c),
            other => bail!("expected configuration, got {}", other.kind()),
        }
    }

    /// Extracts unpaged items.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_items(self) -> Result<Vec<CatalogItem>> {
        match self {
            Self::Items(items) => Ok(items),
            other => bail!("expected items, got {}", other.kind()),
        }
    }

    /// Extracts a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_page(self) -> Result<Page> {
        match self {
            Self::Page(page) => Ok(page),
            other => bail!("expected page, got {}", other.kind()),
        }
    }

    /// Extracts a details record.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_details(self) -> Result<Details> {
        match self {
            Self::Details(details) => Ok(*details),
            other => bail!("expected details, got {}", other.kind()),
        }
    }

    /// Extracts credits.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_credits(self) -> Result<Credits> {
        match self {
            Self::Credits(credits) => Ok(credits),
            other => bail!("expected credits, got {}", other.kind()),
        }
    }

    /// Extracts a video list.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload holds something else.
    pub fn into_videos(self) -> Result<Vec<Video>> {
        match self {
            Self::Videos(videos) => Ok(videos),
            other => bail!("expected videos, got {}", other.kind()),
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Items(_) => "items",
            Self::Page(_) => "page",
            Self::Details(_) => "details",
            Self::Credits(_) => "credits",
            Self::Videos(_) => "videos",
        }
    }
}

/// A finished request and its outcome.
#[derive(Debug)]
pub struct Delivery {
    /// The request as issued, including its generation stamp.
    pub request: Request,
    /// Response or failure.
    pub outcome: Result<Payload>,
}

/// Runs one request against the catalog service.
///
/// # Errors
///
/// Returns the service error unchanged.
pub async fn execute<C: CatalogApi>(api: &C, request: &Request) -> Result<Payload> {
    let payload = match request {
        Request::Configuration => Payload::Configuration(api.configuration().await?),
        Request::Trending(window) => Payload::Items(api.trending(*window).await?),
        Request::Curated(list) => Payload::Page(api.curated(*list, 1).await?),
        Request::Listing(ticket) => Payload::Page(api.discover(ticket.key, ticket.page).await?),
        Request::Suggestions(ticket) => Payload::Page(api.search_multi(&ticket.query, 1).await?),
        Request::SearchResults(ticket) => {
            Payload::Page(api.search_multi(&ticket.key, ticket.page).await?)
        }
        Request::Details(ticket, part) => match part {
            DetailsPart::Primary => Payload::Details(Box::new(
                api.details(ticket.media_type, ticket.id).await?,
            )),
            DetailsPart::Credits => {
                Payload::Credits(api.credits(ticket.media_type, ticket.id).await?)
            }
            DetailsPart::Similar => {
                Payload::Page(api.similar(ticket.media_type, ticket.id, 1).await?)
            }
            DetailsPart::Recommendations => {
                Payload::Page(api.recommendations(ticket.media_type, ticket.id, 1).await?)
            }
        },
        Request::Videos(ticket) => Payload::Videos(api.videos(ticket.media_type, ticket.id).await?),
    };
    Ok(payload)
}

/// Spawns one task per request and funnels outcomes into a channel.
///
/// In-flight tasks are never aborted; stale outcomes are dropped by
/// their receiving component.
#[derive(Debug)]
pub struct Dispatcher<C> {
    api: Arc<C>,
    tx: mpsc::UnboundedSender<Delivery>,
}

impl<C> Dispatcher<C>
where
    C: CatalogApi + Sync + 'static,
{
    /// Creates a dispatcher and the receiving end of its deliveries.
    #[must_use]
    pub fn new(api: Arc<C>) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, tx }, rx)
    }

    /// Starts `request` on the current runtime.
    pub fn dispatch(&self, request: Request) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::debug!(?request, "dispatching");
        tokio::spawn(async move {
            let outcome = execute(api.as_ref(), &request).await;
            if tx.send(Delivery { request, outcome }).is_err() {
                tracing::debug!("delivery receiver dropped");
            }
        });
    }

    /// Starts every request in order.
    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}
