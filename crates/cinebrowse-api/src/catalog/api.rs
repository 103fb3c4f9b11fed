//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    CatalogItem, Configuration, Credits, CuratedList, Details, MediaType, Page, TimeWindow, Video,
};

/// Remote media catalog.
///
/// Abstracts service operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Lists trending movies and TV shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, window: TimeWindow) -> Result<Vec<CatalogItem>>;

    /// Fetches the image configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn configuration(&self) -> Result<Configuration>;

    /// Fetches one page of a fixed home-page listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn curated(&self, list: CuratedList, page: u32) -> Result<Page>;

    /// Fetches one page of the discover listing for a media type.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover(&self, media_type: MediaType, page: u32) -> Result<Page>;

    /// Searches movies and TV shows. Person results are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_multi(&self, query: &str, page: u32) -> Result<Page>;

    /// Fetches the full record for an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, media_type: MediaType, id: u64) -> Result<Details>;

    /// Fetches cast and crew for an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits>;

    /// Fetches items similar to the given one.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn similar(&self, media_type: MediaType, id: u64, page: u32) -> Result<Page>;

    /// Fetches recommendations for the given item.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn recommendations(&self, media_type: MediaType, id: u64, page: u32) -> Result<Page>;

    /// Fetches the videos attached to an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<Video>>;
}
