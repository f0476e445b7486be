//! Surface-side bootstrap model.
//!
//! `SurfaceAgent` mirrors what the embedded bootstrap script does inside the
//! preview document, so the protocol can be driven end to end without a
//! browser. The script in `embed/preview/bootstrap.js` follows the same
//! steps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::StyleSink;
use crate::channel::{Message, OriginPolicy, Viewport};
use crate::error::TransportError;
use crate::settings::{DEVICE_CLASS_PREFIX, Device, SettingsTree};
use crate::transport::Transport;
use crate::debug;

// ============================================================================
// Style element
// ============================================================================

#[derive(Debug, Default)]
struct StyleElement {
    id: String,
    css: String,
}

/// The preview `<style>` element, shared between the agent and a
/// same-origin host.
#[derive(Debug, Clone)]
pub struct SharedStyle(Arc<Mutex<StyleElement>>);

impl SharedStyle {
    pub fn new(id: &str) -> Self {
        Self(Arc::new(Mutex::new(StyleElement {
            id: id.to_string(),
            css: String::new(),
        })))
    }

    pub fn id(&self) -> String {
        self.0.lock().id.clone()
    }

    pub fn css(&self) -> String {
        self.0.lock().css.clone()
    }
}

impl StyleSink for SharedStyle {
    fn replace_css(&mut self, css: &str) {
        let mut element = self.0.lock();
        if element.css != css {
            element.css.clear();
            element.css.push_str(css);
        }
    }
}

// ============================================================================
// Agent
// ============================================================================

/// Surface-side half of the preview protocol.
pub struct SurfaceAgent {
    host: Box<dyn Transport>,
    /// Accepts host messages, and addresses messages to the host.
    host_policy: OriginPolicy,
    style: SharedStyle,
    style_injected: bool,
    body_classes: Vec<String>,
    viewport: Option<Viewport>,
    settings: SettingsTree,
    location: String,
    reported_location: Option<String>,
    poll_interval: Duration,
    next_poll: Option<Instant>,
}

impl SurfaceAgent {
    pub fn new(
        host: Box<dyn Transport>,
        host_policy: OriginPolicy,
        style_element_id: &str,
        location: impl Into<String>,
    ) -> Self {
        Self {
            host,
            host_policy,
            style: SharedStyle::new(style_element_id),
            style_injected: false,
            body_classes: Vec::new(),
            viewport: None,
            settings: SettingsTree::empty(),
            location: location.into(),
            reported_location: None,
            poll_interval: Duration::from_millis(500),
            next_poll: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Inject the style element and announce readiness to the host.
    pub fn boot(&mut self, now: Instant) -> Result<(), TransportError> {
        self.style_injected = true;
        self.reported_location = Some(self.location.clone());
        self.next_poll = Some(now + self.poll_interval);
        self.post(&Message::PreviewReady)
    }

    /// Handle raw input from the host.
    ///
    /// Returns whether the input was accepted and applied.
    pub fn receive(&mut self, raw: &str, origin: &str) -> bool {
        if !self.host_policy.accepts(origin) {
            debug!("surface"; "ignored message from {}", origin);
            return false;
        }
        match Message::from_json(raw) {
            Ok(Some(message)) => {
                self.handle(&message);
                true
            }
            Ok(None) => false,
            Err(err) => {
                debug!("surface"; "{}", err);
                false
            }
        }
    }

    /// Apply a decoded host message.
    pub fn handle(&mut self, message: &Message) {
        match message {
            Message::SettingChange(payload) => {
                self.apply_css(&payload.css);
                self.settings = payload.settings.clone();
            }
            Message::DeviceChange(payload) => self.set_device(payload.device),
            Message::ViewportChange(payload) => self.viewport = Some(payload.viewport),
            Message::SelectiveRefresh(payload) => self.settings = payload.settings.clone(),
            Message::Save | Message::Reset => {
                debug!("surface"; "host sent {}", message.kind());
            }
            Message::PreviewReady | Message::Navigate(_) | Message::EmbeddingRefused(_) => {}
        }
    }

    /// Record an in-page navigation. Reported on the next due poll.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Check the location if the poll interval elapsed.
    ///
    /// Returns whether a `navigate` message was sent.
    pub fn poll(&mut self, now: Instant) -> Result<bool, TransportError> {
        let Some(due) = self.next_poll else {
            return Ok(false);
        };
        if now < due {
            return Ok(false);
        }
        self.next_poll = Some(now + self.poll_interval);

        if self.reported_location.as_deref() == Some(self.location.as_str()) {
            return Ok(false);
        }
        self.reported_location = Some(self.location.clone());
        self.post(&Message::navigate(self.location.clone()))?;
        Ok(true)
    }

    /// Report an embedding rejection instead of booting.
    pub fn refuse(&self, reason: &str) -> Result<(), TransportError> {
        self.post(&Message::embedding_refused(reason))
    }

    fn apply_css(&mut self, css: &str) {
        self.style_injected = true;
        self.style.replace_css(css);
    }

    /// Replace any existing device class with the one for `device`.
    fn set_device(&mut self, device: Device) {
        self.body_classes
            .retain(|class| !class.starts_with(DEVICE_CLASS_PREFIX));
        self.body_classes.push(device.class_name());
    }

    fn post(&self, message: &Message) -> Result<(), TransportError> {
        match self.host_policy.target() {
            Some(origin) => self.host.post(&message.to_json(), origin),
            None => {
                debug!("surface"; "no host origin configured, dropped {}", message.kind());
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn style(&self) -> &SharedStyle {
        &self.style
    }

    pub fn has_style_element(&self) -> bool {
        self.style_injected
    }

    pub fn css(&self) -> String {
        self.style.css()
    }

    pub fn body_classes(&self) -> &[String] {
        &self.body_classes
    }

    pub fn device_classes(&self) -> impl Iterator<Item = &str> {
        self.body_classes
            .iter()
            .map(String::as_str)
            .filter(|class| class.starts_with(DEVICE_CLASS_PREFIX))
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn settings(&self) -> &SettingsTree {
        &self.settings
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl std::fmt::Debug for SurfaceAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceAgent")
            .field("style", &self.style)
            .field("body_classes", &self.body_classes)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
