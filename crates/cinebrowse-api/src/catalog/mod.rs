//! Catalog domain: normalized records and the service trait.

mod api;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
pub use types::{
    CastMember, CatalogItem, Configuration, Credits, CrewMember, CuratedList, Details, Genre,
    ImageBase, MediaType, MediaTypeError, PLACEHOLDER_IMAGE_URL, Page, TimeWindow, Video,
};
