//! Application context shared by every rendering component.
//!
//! Written once at startup (configuration and trending fetches) and read
//! everywhere afterwards. Readers must cope with the unset state.

use cinebrowse_api::catalog::{CatalogItem, ImageBase, PLACEHOLDER_IMAGE_URL};

/// Resolved image base and current banner list.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    image_base: Option<ImageBase>,
    banner: Vec<CatalogItem>,
}

impl AppContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the image base resolved from the service configuration.
    /// An unset base leaves the context unresolved.
    pub fn set_image_base(&mut self, base: ImageBase) {
        if base.is_set() {
            self.image_base = Some(base);
        } else {
            tracing::warn!("configuration carried no image base URL");
            self.image_base = None;
        }
    }

    /// Replaces the banner list.
    pub fn set_banner(&mut self, items: Vec<CatalogItem>) {
        self.banner = items;
    }

    /// Whether the image base has been resolved.
    #[must_use]
    pub const fn has_image_base(&self) -> bool {
        self.image_base.is_some()
    }

    /// Banner items; empty until trending resolves.
    #[must_use]
    pub fn banner(&self) -> &[CatalogItem] {
        &self.banner
    }

    /// Absolute image URL for `path`, or the placeholder.
    #[must_use]
    pub fn image_url(&self, path: Option<&str>) -> String {
        self.image_base.as_ref().map_or_else(
            || String::from(PLACEHOLDER_IMAGE_URL),
            |base| base.url_for(path),
        )
    }
}
