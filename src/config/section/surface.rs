//! `[surface]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [surface]
//! base_url = "https://shop.example.com"   # Where the previewed site lives
//! path = "/"                              # Page opened in the preview
//! style_element_id = "themesync-preview-styles"
//! poll_interval_ms = 500                  # Navigation polling inside the surface
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Well-known id of the style element the surface injects.
pub const DEFAULT_STYLE_ELEMENT_ID: &str = "themesync-preview-styles";

/// Preview surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Base URL of the previewed site. Only used to build the preview address.
    pub base_url: Option<String>,

    /// Path opened in the preview.
    pub path: String,

    /// Id of the `<style>` element receiving compiled CSS.
    pub style_element_id: String,

    /// How often the surface checks its own location.
    pub poll_interval_ms: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: "/".into(),
            style_element_id: DEFAULT_STYLE_ELEMENT_ID.into(),
            poll_interval_ms: 500,
        }
    }
}

impl SurfaceConfig {
    /// Parsed base URL, if configured and valid.
    pub fn base(&self) -> Option<Url> {
        self.base_url.as_deref().and_then(|s| Url::parse(s).ok())
    }

    /// Full preview address: `base_url` joined with `path`.
    pub fn preview_url(&self) -> Option<Url> {
        self.base().and_then(|base| base.join(&self.path).ok())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(raw) = &self.base_url
            && Url::parse(raw).is_err()
        {
            diag.error(
                FieldPath::new("surface.base_url"),
                format!("`{raw}` is not an absolute URL"),
            );
        }
        if self.style_element_id.is_empty()
            || self.style_element_id.contains(char::is_whitespace)
        {
            diag.error(
                FieldPath::new("surface.style_element_id"),
                "must be a non-empty id without whitespace",
            );
        }
        if self.poll_interval_ms == 0 {
            diag.error(
                FieldPath::new("surface.poll_interval_ms"),
                "must be greater than zero",
            );
        }
    }
}
