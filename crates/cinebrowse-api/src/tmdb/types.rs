//! TMDB API response bodies and their conversion into catalog records.

use serde::Deserialize;

use crate::catalog::{
    CastMember, CatalogItem, Configuration, Credits, CrewMember, Details, Genre, MediaType, Page,
    Video,
};

// --- Paged listings ---

/// Paged response shared by trending, discover, search, similar and
/// recommendation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPagedResponse {
    /// Current page number.
    pub page: u32,
    /// Results (movies, TV shows and, for multi-search, people).
    pub results: Vec<TmdbMediaResult>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

impl TmdbPagedResponse {
    /// Converts into a `Page`, dropping entries that are not movies or TV
    /// shows. `fallback` is used when a result carries no `media_type`.
    #[must_use]
    pub fn into_page(self, fallback: Option<MediaType>) -> Page {
        Page {
            page_number: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            items: self
                .results
                .into_iter()
                .filter_map(|r| r.into_item(fallback))
                .collect(),
        }
    }
}

/// A single movie, TV or person result.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMediaResult {
    /// TMDB ID.
    pub id: u64,
    /// "movie", "tv" or "person" (absent on typed endpoints).
    pub media_type: Option<String>,
    /// Movie title.
    pub title: Option<String>,
    /// TV or person name.
    pub name: Option<String>,
    /// Movie release date.
    pub release_date: Option<String>,
    /// TV first air date.
    pub first_air_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Overview text.
    pub overview: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl TmdbMediaResult {
    /// Normalizes into a `CatalogItem`. Returns `None` for people and
    /// results whose media type cannot be determined.
    #[must_use]
    pub fn into_item(self, fallback: Option<MediaType>) -> Option<CatalogItem> {
        let media_type = match self.media_type.as_deref() {
            Some(raw) => raw.parse().ok()?,
            None => fallback?,
        };
        Some(CatalogItem {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            release_date: non_empty(self.release_date.or(self.first_air_date)),
            vote_average: self.vote_average,
            popularity: self.popularity,
            overview: non_empty(self.overview),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
        })
    }
}

/// Treats empty strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// --- Details ---

/// Response from `movie/{id}` and `tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    /// TMDB ID.
    pub id: u64,
    /// Movie title.
    pub title: Option<String>,
    /// TV name.
    pub name: Option<String>,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Status (e.g. "Released", "Returning Series").
    pub status: Option<String>,
    /// Movie release date.
    pub release_date: Option<String>,
    /// TV first air date.
    pub first_air_date: Option<String>,
    /// Movie runtime in minutes.
    pub runtime: Option<u32>,
    /// TV episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u64,
    /// Revenue (movies only).
    pub revenue: Option<u64>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl TmdbDetails {
    /// Normalizes into `Details`.
    #[must_use]
    pub fn into_details(self, media_type: MediaType) -> Details {
        let runtime = self
            .runtime
            .filter(|r| *r > 0)
            .or_else(|| self.episode_run_time.first().copied());
        Details {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            tagline: non_empty(self.tagline),
            overview: non_empty(self.overview),
            status: non_empty(self.status),
            release_date: non_empty(self.release_date.or(self.first_air_date)),
            runtime,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            revenue: self.revenue,
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
        }
    }
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Credits ---

/// Response from `{media}/{id}/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    /// Cast members.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

/// Cast entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
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
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub job: String,
    /// Department.
    pub department: Option<String>,
}

impl From<TmdbCredits> for Credits {
    fn from(raw: TmdbCredits) -> Self {
        Self {
            cast: raw
                .cast
                .into_iter()
                .map(|c| CastMember {
                    id: c.id,
                    name: c.name,
                    character: non_empty(c.character),
                    profile_path: non_empty(c.profile_path),
                })
                .collect(),
            crew: raw
                .crew
                .into_iter()
                .map(|c| CrewMember {
                    id: c.id,
                    name: c.name,
                    job: c.job,
                    department: c.department,
                })
                .collect(),
        }
    }
}

// --- Videos ---

/// Response from `{media}/{id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    /// Videos in service order.
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

/// A single video.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    /// Hosting-site key.
    pub key: String,
    /// Title.
    #[serde(default)]
    pub name: String,
    /// Hosting site.
    #[serde(default)]
    pub site: String,
    /// Video type ("Trailer", "Teaser", ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl From<TmdbVideo> for Video {
    fn from(raw: TmdbVideo) -> Self {
        Self {
            key: raw.key,
            name: raw.name,
            site: raw.site,
            kind: raw.kind,
        }
    }
}

// --- Configuration ---

/// Response from `configuration`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfiguration {
    /// Image settings.
    pub images: TmdbImagesConfiguration,
}

/// Image section of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImagesConfiguration {
    /// HTTPS image base URL.
    pub secure_base_url: String,
    /// Available poster sizes.
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

impl From<TmdbConfiguration> for Configuration {
    fn from(raw: TmdbConfiguration) -> Self {
        Self {
            secure_base_url: raw.images.secure_base_url,
            poster_sizes: raw.images.poster_sizes,
        }
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    pub success: bool,
}
