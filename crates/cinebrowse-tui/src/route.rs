//! Navigable addresses and their parameters.

use std::fmt;
use std::str::FromStr;

use cinebrowse_api::catalog::MediaType;

/// A parsed address. Its parameters are the only keys the views use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/movie` or `/tv`
    Explore(MediaType),
    /// `/movie/<id>` or `/tv/<id>`
    Details {
        /// Movie or TV.
        media_type: MediaType,
        /// Service ID.
        id: u64,
    },
    /// `/search?query=<text>`
    Search(String),
}

/// Why an address could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// First segment is not a supported media type.
    UnsupportedMediaType(String),
    /// ID segment is not a positive integer.
    InvalidId(String),
    /// Search address without a usable `query` parameter.
    MissingQuery,
    /// Address has too many segments.
    NotFound(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMediaType(m) => write!(f, "unsupported media type: {m}"),
            Self::InvalidId(id) => write!(f, "invalid id: {id}"),
            Self::MissingQuery => write!(f, "search requires a query"),
            Self::NotFound(path) => write!(f, "no such page: {path}"),
        }
    }
}

impl std::error::Error for RouteError {}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = s.split_once('?').unwrap_or((s, ""));
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();
        match segments.as_slice() {
            [] => Ok(Self::Home),
            ["search"] => {
                let text = url::form_urlencoded::parse(query.as_bytes())
                    .find(|(k, _)| k == "query")
                    .map(|(_, v)| String::from(v.trim()))
                    .filter(|v| !v.is_empty())
                    .ok_or(RouteError::MissingQuery)?;
                Ok(Self::Search(text))
            }
            [media] => Ok(Self::Explore(parse_media(media)?)),
            [media, id] => {
                let media_type = parse_media(media)?;
                let id = id
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| RouteError::InvalidId(String::from(*id)))?;
                Ok(Self::Details { media_type, id })
            }
            _ => Err(RouteError::NotFound(String::from(path))),
        }
    }
}

fn parse_media(segment: &str) -> Result<MediaType, RouteError> {
    segment
        .parse::<MediaType>()
        .map_err(|_| RouteError::UnsupportedMediaType(String::from(segment)))
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Explore(media) => write!(f, "/{media}"),
            Self::Details { media_type, id } => write!(f, "/{media_type}/{id}"),
            Self::Search(text) => {
                let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("query", text)
                    .finish();
                write!(f, "/search?{encoded}")
            }
        }
    }
}
