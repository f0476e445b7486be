//! Preview surface: the independently loaded document being styled.
//!
//! # Two Views
//!
//! ```text
//!  host side                               surface side
//!  ─────────                               ────────────
//!  SurfaceLoader::load(url)                SurfaceAgent
//!      └─► Box<dyn PreviewSurface>           ├── <style id=…> element
//!              └─ direct_access()?           ├── preview-device-* class
//!                   Ok  → StyleSink          ├── preview-ready on boot
//!                   Err → messages only      └── navigate on location change
//! ```
//!
//! The host never assumes it can reach into the surface: `direct_access`
//! is a capability probe, and a cross-origin surface answers
//! [`PreviewError::CrossOriginAccessDenied`]. Delivery over the channel
//! happens either way.

mod agent;

pub use agent::{SharedStyle, SurfaceAgent};

use crate::error::PreviewError;

/// Direct write access to the surface's preview style element.
pub trait StyleSink {
    /// Replace the element's text with `css`.
    fn replace_css(&mut self, css: &str);
}

/// Host-side handle to one loaded preview document.
///
/// The controller owns exactly one of these at a time and replaces it on
/// every reload instead of mutating it.
pub trait PreviewSurface: Send {
    /// Address the surface was loaded from.
    fn url(&self) -> &str;

    /// Probe for same-origin access to the surface internals.
    fn direct_access(&mut self) -> Result<&mut dyn StyleSink, PreviewError>;
}

/// Creates a fresh surface for each navigation attempt.
pub trait SurfaceLoader: Send {
    fn load(&mut self, url: &str) -> Box<dyn PreviewSurface>;
}

impl<F> SurfaceLoader for F
where
    F: FnMut(&str) -> Box<dyn PreviewSurface> + Send,
{
    fn load(&mut self, url: &str) -> Box<dyn PreviewSurface> {
        self(url)
    }
}

// ============================================================================
// Implementations
// ============================================================================

/// A surface on another origin. Reachable through messages only.
#[derive(Debug, Clone)]
pub struct RemoteSurface {
    url: String,
}

impl RemoteSurface {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Loader producing [`RemoteSurface`]s.
    pub fn loader() -> impl SurfaceLoader {
        |url: &str| -> Box<dyn PreviewSurface> { Box::new(RemoteSurface::new(url)) }
    }
}

impl PreviewSurface for RemoteSurface {
    fn url(&self) -> &str {
        &self.url
    }

    fn direct_access(&mut self) -> Result<&mut dyn StyleSink, PreviewError> {
        Err(PreviewError::CrossOriginAccessDenied)
    }
}

/// A same-origin surface whose style element the host may write directly.
#[derive(Debug, Clone)]
pub struct LocalSurface {
    url: String,
    style: SharedStyle,
}

impl LocalSurface {
    pub fn new(url: impl Into<String>, style: SharedStyle) -> Self {
        Self {
            url: url.into(),
            style,
        }
    }
}

impl PreviewSurface for LocalSurface {
    fn url(&self) -> &str {
        &self.url
    }

    fn direct_access(&mut self) -> Result<&mut dyn StyleSink, PreviewError> {
        Ok(&mut self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_surface_denies_direct_access() {
        let mut loader = RemoteSurface::loader();
        let mut surface = loader.load("https://shop.test/");
        assert_eq!(surface.url(), "https://shop.test/");
        assert!(matches!(
            surface.direct_access(),
            Err(PreviewError::CrossOriginAccessDenied)
        ));
    }

    #[test]
    fn test_local_surface_writes_shared_style() {
        let style = SharedStyle::new("preview-styles");
        let mut surface = LocalSurface::new("/", style.clone());
        surface.direct_access().unwrap().replace_css("body{}");
        assert_eq!(style.css(), "body{}");
    }
}
