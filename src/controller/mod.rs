//! Preview controller: drives one preview surface through its lifecycle.
//!
//! # Architecture
//!
//! ```text
//!  host UI ── update_settings ──► Debouncer ──(quiet)──► compile ──► deliver
//!                                                                     │
//!                                       ┌─────────────────────────────┤
//!                                       ▼                             ▼
//!                         surface.direct_access()            channel.send(
//!                           Ok  → replace_css                  setting-change)
//!                           Err → skip silently
//!
//!  channel ── preview-ready / navigate / embedding-refused ──► SurfaceEvent
//! ```
//!
//! The core is synchronous and never reads the clock: every time-dependent
//! method takes `now`. [`next_deadline`](PreviewController::next_deadline)
//! tells the driver when to call [`poll`](PreviewController::poll) next.
//! [`PreviewActor`] is the tokio driver.
//!
//! # Timers
//!
//! | Timer        | Armed by                   | Canceled by                     |
//! |--------------|----------------------------|---------------------------------|
//! | load timeout | navigation start           | ready, refusal, retry, dispose  |
//! | backoff      | timeout with retries left  | ready, refusal, retry, dispose  |
//! | debounce     | settings update            | push, dispose                   |

mod actor;
mod state;
mod timers;
mod viewport;

pub use actor::{PreviewActor, PreviewCommand, PreviewHandle};
pub use state::{Failure, LoadingState, PreviewStatus, RecoveryAction};
pub use viewport::{DeviceProfile, viewport_for};

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};

use crate::channel::{Message, MessageChannel, MessageKind, Subscription, Viewport};
use crate::compiler;
use crate::config::{PreviewConfig, TimingConfig};
use crate::error::PreviewError;
use crate::logger::{status_error, status_success};
use crate::settings::{Device, SettingChange, SettingsTree};
use crate::surface::{PreviewSurface, SurfaceLoader};
use crate::utils::hash;
use crate::{debug, log};
use timers::{Debouncer, Timer, TimerKind, earliest_due};

/// Surface-originated event, forwarded from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Ready,
    Navigated(String),
    Refused(String),
}

impl SurfaceEvent {
    fn from_message(message: &Message) -> Option<Self> {
        match message {
            Message::PreviewReady => Some(Self::Ready),
            Message::Navigate(payload) => Some(Self::Navigated(payload.url.clone())),
            Message::EmbeddingRefused(payload) => Some(Self::Refused(payload.reason.clone())),
            _ => None,
        }
    }
}

pub struct PreviewController {
    timing: TimingConfig,
    channel: Arc<MessageChannel>,
    loader: Box<dyn SurfaceLoader>,
    /// Current surface; replaced on every navigation.
    surface: Option<Box<dyn PreviewSurface>>,
    /// Address loaded on (re)navigation. Follows in-surface navigation.
    url: String,

    settings: SettingsTree,
    css: String,
    last_pushed: Option<u64>,
    pushes: usize,
    device: Device,

    state: LoadingState,
    retry_count: u32,
    failure: Option<Failure>,

    load_timer: Timer,
    backoff_timer: Timer,
    debouncer: Debouncer,

    status: watch::Sender<PreviewStatus>,
    events: Option<mpsc::UnboundedReceiver<SurfaceEvent>>,
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

impl PreviewController {
    /// Create a controller and register it on `channel`.
    pub fn new(
        config: &PreviewConfig,
        channel: Arc<MessageChannel>,
        loader: Box<dyn SurfaceLoader>,
    ) -> Self {
        let url = config
            .surface
            .preview_url()
            .map(|url| url.to_string())
            .unwrap_or_else(|| config.surface.path.clone());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let subscriptions = [
            MessageKind::PreviewReady,
            MessageKind::Navigate,
            MessageKind::EmbeddingRefused,
        ]
        .into_iter()
        .map(|kind| {
            let tx = events_tx.clone();
            channel.on(kind, move |message| {
                if let Some(event) = SurfaceEvent::from_message(message) {
                    // Receiver gone means the controller was dropped.
                    let _ = tx.send(event);
                }
                Ok(())
            })
        })
        .collect();

        let settings = SettingsTree::empty();
        let css = compiler::compile(&settings);
        let (status, _) = watch::channel(PreviewStatus::default());

        Self {
            timing: config.timing.sanitized(),
            channel,
            loader,
            surface: None,
            url,
            settings,
            css,
            last_pushed: None,
            pushes: 0,
            device: Device::Desktop,
            state: LoadingState::Initial,
            retry_count: 0,
            failure: None,
            load_timer: Timer::default(),
            backoff_timer: Timer::default(),
            debouncer: Debouncer::new(config.timing.debounce()),
            status,
            events: Some(events_rx),
            subscriptions,
            disposed: false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load the surface at the current address and start the load timeout.
    pub fn navigate(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.backoff_timer.cancel();
        // Replaced, never reused: a stale surface must not receive pushes.
        self.surface = Some(self.loader.load(&self.url));
        self.state = LoadingState::Loading;
        self.load_timer.start(now + self.timing.load_timeout());
        debug!("preview"; "loading {} (attempt {})", self.url, self.retry_count + 1);
        self.publish();
    }

    /// Explicit user retry: clears the failure and retry count, then reloads.
    pub fn retry(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.retry_count = 0;
        self.failure = None;
        self.load_timer.cancel();
        self.navigate(now);
    }

    /// The surface reported readiness.
    pub fn on_ready(&mut self) {
        if self.disposed {
            return;
        }
        match self.state {
            LoadingState::Loading | LoadingState::Loaded => {}
            LoadingState::Initial | LoadingState::Error | LoadingState::Blocked => {
                debug!("preview"; "ignored ready while {}", self.state);
                return;
            }
        }
        let recovered = self.retry_count > 0 || self.failure.is_some();

        self.load_timer.cancel();
        self.backoff_timer.cancel();
        self.state = LoadingState::Loaded;
        self.retry_count = 0;
        self.failure = None;

        // A freshly loaded document has no styles yet.
        self.push(true);
        if recovered {
            status_success("preview ready");
        }
        self.publish();
    }

    /// The surface refused to be embedded. No further automatic retries.
    pub fn on_refused(&mut self, reason: &str) {
        if self.disposed {
            return;
        }
        self.load_timer.cancel();
        self.backoff_timer.cancel();
        self.state = LoadingState::Blocked;

        let error = PreviewError::EmbeddingRefused {
            reason: reason.to_string(),
        };
        status_error(&error.to_string(), "open the preview in a new tab");
        self.failure = Some(Failure {
            message: error.to_string(),
            action: RecoveryAction::OpenExternally {
                url: self.url.clone(),
            },
        });
        self.publish();
    }

    /// The surface navigated within itself. Later reloads use `url`.
    pub fn on_navigated(&mut self, url: &str) {
        if self.disposed {
            return;
        }
        debug!("preview"; "surface navigated to {}", url);
        self.url = url.to_string();
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Ready => self.on_ready(),
            SurfaceEvent::Navigated(url) => self.on_navigated(&url),
            SurfaceEvent::Refused(reason) => self.on_refused(&reason),
        }
    }

    /// Hand surface events to an external driver. After this, `poll` no
    /// longer drains them.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SurfaceEvent>> {
        self.events.take()
    }

    /// Process pending surface events, then fire every due timer.
    pub fn poll(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        let mut pending = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            self.handle_event(event);
        }

        while let Some(kind) = earliest_due(self.timers(), now) {
            self.fire(kind, now);
        }
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers().into_iter().filter_map(|(at, _)| at).min()
    }

    /// Cancel every timer, unregister from the channel and drop the surface.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.load_timer.cancel();
        self.backoff_timer.cancel();
        self.debouncer.cancel();
        self.subscriptions.clear();
        self.surface = None;
        self.events = None;
        debug!("preview"; "controller disposed");
    }

    fn timers(&self) -> [(Option<Instant>, TimerKind); 3] {
        [
            (self.load_timer.deadline(), TimerKind::LoadTimeout),
            (self.backoff_timer.deadline(), TimerKind::Backoff),
            (self.debouncer.deadline(), TimerKind::Debounce),
        ]
    }

    fn fire(&mut self, kind: TimerKind, now: Instant) {
        match kind {
            TimerKind::LoadTimeout => {
                self.load_timer.cancel();
                self.on_timeout(now);
            }
            TimerKind::Backoff => {
                self.backoff_timer.cancel();
                self.navigate(now);
            }
            TimerKind::Debounce => {
                if self.debouncer.take_if_ready(now) {
                    if self.state == LoadingState::Loaded {
                        self.push(false);
                    } else {
                        // Delivered by the ready push instead.
                        debug!("preview"; "surface {}, deferred settings push", self.state);
                    }
                }
            }
        }
    }

    fn on_timeout(&mut self, now: Instant) {
        if self.state != LoadingState::Loading {
            return;
        }
        if self.retry_count < self.timing.max_retries {
            self.retry_count += 1;
            let delay = self.timing.backoff(self.retry_count);
            debug!(
                "preview"; "load timed out, retry {}/{} in {:?}",
                self.retry_count, self.timing.max_retries, delay
            );
            self.backoff_timer.start(now + delay);
            self.publish();
            return;
        }

        let error = PreviewError::LoadTimeout {
            attempts: self.retry_count + 1,
        };
        status_error(&error.to_string(), "retry, or open the preview in a new tab");
        self.state = LoadingState::Error;
        self.failure = Some(Failure {
            message: error.to_string(),
            action: RecoveryAction::Retry,
        });
        self.surface = None;
        self.publish();
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Take a new settings tree. The push is debounced; the CSS is
    /// recompiled right away.
    pub fn update_settings(&mut self, tree: SettingsTree, now: Instant) {
        if self.disposed {
            return;
        }
        self.css = compiler::compile(&tree);
        self.settings = tree;
        self.debouncer.touch(now);
    }

    /// Apply `changes` and send them as one selective refresh, without
    /// waiting for the debounce window.
    pub fn selective_refresh(&mut self, changes: Vec<SettingChange>) {
        if self.disposed || changes.is_empty() {
            return;
        }
        self.settings = changes
            .iter()
            .fold(self.settings.clone(), |tree, change| change.apply_to(&tree));
        self.css = compiler::compile(&self.settings);
        self.send(&Message::selective_refresh(changes, self.settings.clone()));
    }

    pub fn set_device(&mut self, device: Device) {
        if self.disposed {
            return;
        }
        self.device = device;
        self.send(&Message::device_change(device));
    }

    /// Emulate the current device in a container of the given size.
    pub fn set_viewport(&mut self, container_width: u32, container_height: u32) -> Viewport {
        let viewport = viewport_for(self.device, container_width, container_height);
        if !self.disposed {
            self.send(&Message::viewport_change(viewport));
        }
        viewport
    }

    pub fn save(&mut self) {
        if !self.disposed {
            self.send(&Message::Save);
        }
    }

    pub fn reset(&mut self) {
        if !self.disposed {
            self.send(&Message::Reset);
        }
    }

    /// Deliver the current CSS: directly when the surface allows it, and
    /// over the channel always.
    fn push(&mut self, force: bool) {
        let digest = self.digest();
        if !force && self.last_pushed == Some(digest) {
            debug!("preview"; "settings and stylesheet unchanged, skipped push");
            return;
        }

        if let Some(surface) = self.surface.as_mut() {
            match surface.direct_access() {
                Ok(sink) => sink.replace_css(&self.css),
                Err(err) => debug!("preview"; "direct injection unavailable: {}", err),
            }
        }
        self.send(&Message::setting_change(self.settings.clone(), self.css.clone()));

        self.last_pushed = Some(digest);
        self.pushes += 1;
    }

    /// Hash of everything a `setting-change` carries.
    fn digest(&self) -> u64 {
        hash::compute(&format!("{}\n{}", self.settings.to_json(), self.css))
    }

    fn send(&self, message: &Message) {
        if let Err(err) = self.channel.send(message) {
            log!("preview"; "failed to send {}: {}", message.kind(), err);
        }
    }

    fn publish(&self) {
        self.status.send_replace(self.status());
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn status(&self) -> PreviewStatus {
        PreviewStatus {
            state: self.state,
            retry_count: self.retry_count,
            failure: self.failure.clone(),
        }
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<PreviewStatus> {
        self.status.subscribe()
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn settings(&self) -> &SettingsTree {
        &self.settings
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Number of stylesheet pushes delivered so far.
    pub fn push_count(&self) -> usize {
        self.pushes
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for PreviewController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for PreviewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewController")
            .field("url", &self.url)
            .field("state", &self.state)
            .field("retry_count", &self.retry_count)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
