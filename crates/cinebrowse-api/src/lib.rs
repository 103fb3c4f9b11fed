//! API client library for cinebrowse.
//!
//! Provides the catalog domain types, the `CatalogApi` trait and a TMDB
//! implementation of it.

/// Catalog domain types and service trait.
pub mod catalog;

/// TMDB API client.
pub mod tmdb;
