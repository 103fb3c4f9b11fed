//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and normalizes the
//! responses into catalog records.

mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
