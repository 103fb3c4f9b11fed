//! `TmdbClient` - catalog service backed by the TMDB API v3.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::rate_limiter::RequestPacer;
use super::types::{
    TmdbConfiguration, TmdbCredits, TmdbDetails, TmdbErrorResponse, TmdbPagedResponse,
    TmdbVideoList,
};
use crate::catalog::{
    CatalogApi, CatalogItem, Configuration, Credits, CuratedList, Details, MediaType, Page,
    TimeWindow, Video,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every request.
    language: String,
    /// Request pacer shared by concurrent calls.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (config file or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a paced GET request with bearer auth and the language parameter.
    /// Every failure, HTTP 429 included, is returned on the first response.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
    ) -> Result<T> {
        self.pacer.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut query: Vec<(&str, String)> = vec![("language", self.language.clone())];
        query.extend(extra_query.iter().cloned());

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(&query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .with_context(|| format!("request failed: {path}"))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(path, "TMDB API rate limited (429)");
            bail!("TMDB API rate limit exceeded: {path}");
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        serde_json::from_str(&body)
            .with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Fetches a paged listing and normalizes it.
    async fn get_page(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
        fallback: Option<MediaType>,
    ) -> Result<Page> {
        let raw: TmdbPagedResponse = self.get_json(path, extra_query).await?;
        Ok(raw.into_page(fallback))
    }
}

impl CatalogApi for TmdbClient {
    #[instrument(skip_all)]
    async fn trending(&self, window: TimeWindow) -> Result<Vec<CatalogItem>> {
        let path = format!("trending/all/{}", window.as_str());
        let page = self.get_page(&path, &[], None).await?;
        Ok(page.items)
    }

    #[instrument(skip_all)]
    async fn configuration(&self) -> Result<Configuration> {
        let raw: TmdbConfiguration = self.get_json("configuration", &[]).await?;
        Ok(raw.into())
    }

    #[instrument(skip_all)]
    async fn curated(&self, list: CuratedList, page: u32) -> Result<Page> {
        let query = [("page", page.to_string())];
        self.get_page(list.path(), &query, Some(list.media_type()))
            .await
    }

    #[instrument(skip_all)]
    async fn discover(&self, media_type: MediaType, page: u32) -> Result<Page> {
        let path = format!("discover/{media_type}");
        let query = [("page", page.to_string())];
        self.get_page(&path, &query, Some(media_type)).await
    }

    #[instrument(skip_all)]
    async fn search_multi(&self, query: &str, page: u32) -> Result<Page> {
        let params = [
            ("query", String::from(query)),
            ("page", page.to_string()),
            ("include_adult", String::from("false")),
        ];
        self.get_page("search/multi", &params, None).await
    }

    #[instrument(skip_all)]
    async fn details(&self, media_type: MediaType, id: u64) -> Result<Details> {
        let path = format!("{media_type}/{id}");
        let raw: TmdbDetails = self.get_json(&path, &[]).await?;
        Ok(raw.into_details(media_type))
    }

    #[instrument(skip_all)]
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits> {
        let path = format!("{media_type}/{id}/credits");
        let raw: TmdbCredits = self.get_json(&path, &[]).await?;
        Ok(raw.into())
    }

    #[instrument(skip_all)]
    async fn similar(&self, media_type: MediaType, id: u64, page: u32) -> Result<Page> {
        let path = format!("{media_type}/{id}/similar");
        let query = [("page", page.to_string())];
        self.get_page(&path, &query, Some(media_type)).await
    }

    #[instrument(skip_all)]
    async fn recommendations(&self, media_type: MediaType, id: u64, page: u32) -> Result<Page> {
        let path = format!("{media_type}/{id}/recommendations");
        let query = [("page", page.to_string())];
        self.get_page(&path, &query, Some(media_type)).await
    }

    #[instrument(skip_all)]
    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<Video>> {
        let path = format!("{media_type}/{id}/videos");
        let raw: TmdbVideoList = self.get_json(&path, &[]).await?;
        Ok(raw.results.into_iter().map(Video::from).collect())
    }
}
