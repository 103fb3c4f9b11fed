//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use cinebrowse_api::catalog::TimeWindow;
use cinebrowse_api::tmdb::DEFAULT_BASE_URL;
use cinebrowse_tui::AppSettings;
use cinebrowse_tui::carousel::CarouselTiming;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog service settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Debounce and carousel timing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Home screen settings.
    #[serde(default)]
    pub home: HomeConfig,
}

/// Catalog service settings. The token is read from `TMDB_API_TOKEN`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// API root URL.
    pub base_url: String,
    /// Response language.
    pub language: String,
    /// Minimum delay between requests, in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            language: String::from("en-US"),
            min_interval_ms: 25,
        }
    }
}

/// Timing settings, in milliseconds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Search settle window.
    pub search_debounce_ms: u64,
    /// Carousel auto-advance period.
    pub carousel_interval_ms: u64,
    /// Carousel transition settle delay.
    pub carousel_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 400,
            carousel_interval_ms: 6000,
            carousel_settle_ms: 700,
        }
    }
}

/// Home screen settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HomeConfig {
    /// Trending window for the banner (`day` or `week`).
    pub trending_window: TimeWindow,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Parsed API root URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `api.base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("invalid api.base_url: {}", self.api.base_url))
    }

    /// Minimum delay between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.api.min_interval_ms)
    }

    /// Settings for the browsing state machines.
    #[must_use]
    pub const fn settings(&self) -> AppSettings {
        AppSettings {
            search_debounce: Duration::from_millis(self.timing.search_debounce_ms),
            carousel: CarouselTiming {
                interval: Duration::from_millis(self.timing.carousel_interval_ms),
                settle: Duration::from_millis(self.timing.carousel_settle_ms),
            },
            trending_window: self.home.trending_window,
        }
    }
}
