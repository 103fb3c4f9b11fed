//! Normalized catalog records shared by every consumer of the service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placeholder shown when an item carries no image path.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://fakeimg.pl/230x320?text=No+Image";

// --- Media type ---

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// Television series.
    Tv,
}

impl MediaType {
    /// Path segment used by the service (`movie` / `tv`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected media type text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeError(pub String);

impl fmt::Display for MediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported media type: {}", self.0)
    }
}

impl std::error::Error for MediaTypeError {}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => Err(MediaTypeError(String::from(other))),
        }
    }
}

/// Trending time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    #[default]
    Week,
}

impl TimeWindow {
    /// Path segment used by the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Fixed home-page listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CuratedList {
    /// Movies currently in theatres.
    NowPlayingMovies,
    /// Highest rated movies.
    TopRatedMovies,
    /// Popular TV series.
    PopularTv,
    /// TV series airing in the next week.
    OnTheAirTv,
}

impl CuratedList {
    /// All lists in home-page order.
    pub const ALL: [Self; 4] = [
        Self::NowPlayingMovies,
        Self::TopRatedMovies,
        Self::PopularTv,
        Self::OnTheAirTv,
    ];

    /// Media type of every entry in the list.
    #[must_use]
    pub const fn media_type(self) -> MediaType {
        match self {
            Self::NowPlayingMovies | Self::TopRatedMovies => MediaType::Movie,
            Self::PopularTv | Self::OnTheAirTv => MediaType::Tv,
        }
    }

    /// Service path relative to the API root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NowPlayingMovies => "movie/now_playing",
            Self::TopRatedMovies => "movie/top_rated",
            Self::PopularTv => "tv/popular",
            Self::OnTheAirTv => "tv/on_the_air",
        }
    }

    /// Row heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NowPlayingMovies => "Now Playing",
            Self::TopRatedMovies => "Top Rated Movies",
            Self::PopularTv => "Popular TV Show",
            Self::OnTheAirTv => "On The Air",
        }
    }
}

// --- Items and pages ---

/// One movie or TV show. Identity is `(media_type, id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Service ID.
    pub id: u64,
    /// Movie or TV.
    pub media_type: MediaType,
    /// Display title (`title` for movies, `name` for TV).
    pub title: String,
    /// Release or first-air date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Popularity score.
    pub popularity: f64,
    /// Overview text.
    pub overview: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl CatalogItem {
    /// Identity key.
    #[must_use]
    pub const fn key(&self) -> (MediaType, u64) {
        (self.media_type, self.id)
    }
}

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub page_number: u32,
    /// Total pages reported by the service.
    pub total_pages: u32,
    /// Total results reported by the service.
    pub total_results: u32,
    /// Items in service order.
    pub items: Vec<CatalogItem>,
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Full record for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    /// Service ID.
    pub id: u64,
    /// Movie or TV.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release status (e.g. "Released", "Ended").
    pub status: Option<String>,
    /// Release or first-air date.
    pub release_date: Option<String>,
    /// Runtime in minutes (episode runtime for TV).
    pub runtime: Option<u32>,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u64,
    /// Box-office revenue (movies only).
    pub revenue: Option<u64>,
    /// Genres.
    pub genres: Vec<Genre>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl Details {
    /// A record with no title carries nothing worth showing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
    }
}

// --- Credits ---

/// Cast entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    pub character: Option<String>,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// Crew entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g. "Director", "Screenplay").
    pub job: String,
    /// Department.
    pub department: Option<String>,
}

/// Cast and crew, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credits {
    /// Cast members.
    pub cast: Vec<CastMember>,
    /// Crew members.
    pub crew: Vec<CrewMember>,
}

// --- Videos ---

/// A video attached to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    /// Hosting-site key.
    pub key: String,
    /// Video title.
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer").
    pub kind: String,
}

impl Video {
    /// Public watch URL for supported hosting sites.
    #[must_use]
    pub fn watch_url(&self) -> Option<String> {
        match self.site.as_str() {
            "YouTube" => Some(format!("https://www.youtube.com/watch?v={}", self.key)),
            "Vimeo" => Some(format!("https://vimeo.com/{}", self.key)),
            _ => None,
        }
    }
}

// --- Configuration ---

/// Image configuration returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// HTTPS base URL for images (ends with `/`).
    pub secure_base_url: String,
    /// Available poster sizes.
    pub poster_sizes: Vec<String>,
}

impl Configuration {
    /// Image base for full-size images; unset when the service sent no base.
    #[must_use]
    pub fn image_base(&self) -> ImageBase {
        let base = self.secure_base_url.trim();
        if base.is_empty() {
            return ImageBase::new("");
        }
        ImageBase::new(format!("{}/original", base.trim_end_matches('/')))
    }
}

/// Resolved image URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBase(String);

impl ImageBase {
    /// Wraps a URL prefix. A blank prefix is stored as unset.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            Self(String::new())
        } else {
            Self(prefix)
        }
    }

    /// Whether a prefix is present.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    /// Prefix as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `prefix + path`, or the placeholder when the path is missing.
    #[must_use]
    pub fn url_for(&self, path: Option<&str>) -> String {
        match path {
            Some(p) if !p.trim().is_empty() && !self.0.is_empty() => format!("{}{p}", self.0),
            _ => String::from(PLACEHOLDER_IMAGE_URL),
        }
    }
}
