use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

use super::*;
use crate::channel::{OriginPolicy, SettingChangePayload};
use crate::config::RETRY_CEILING;
use crate::surface::{LocalSurface, RemoteSurface, SharedStyle, SurfaceAgent};
use crate::transport::{MemoryPort, MemoryTransport, Transport};

const HOST: &str = "https://admin.test";
const SURFACE: &str = "https://shop.test";

struct Harness {
    controller: PreviewController,
    channel: Arc<MessageChannel>,
    /// Host end; surface messages are pumped from here into the channel.
    host: MemoryPort,
    /// Surface end; host messages arrive here.
    surface: MemoryPort,
    loads: Arc<AtomicUsize>,
    start: Instant,
}

fn config() -> PreviewConfig {
    let mut config = PreviewConfig::default();
    config.surface.base_url = Some(format!("{SURFACE}/"));
    config.surface.path = "/blog/".into();
    config
}

fn harness_with(config: &PreviewConfig, style: Option<SharedStyle>) -> Harness {
    let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
    let channel = Arc::new(MessageChannel::new(config.origin_policy()));
    channel.set_target(Some(Box::new(host.transport())));

    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let loader = move |url: &str| -> Box<dyn PreviewSurface> {
        counter.fetch_add(1, Ordering::SeqCst);
        match &style {
            Some(style) => Box::new(LocalSurface::new(url, style.clone())),
            None => Box::new(RemoteSurface::new(url)),
        }
    };
    let controller = PreviewController::new(config, Arc::clone(&channel), Box::new(loader));

    Harness {
        controller,
        channel,
        host,
        surface,
        loads,
        start: Instant::now(),
    }
}

fn harness() -> Harness {
    harness_with(&config(), None)
}

impl Harness {
    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    /// Deliver a surface-side message through the channel, then poll.
    fn surface_says(&mut self, message: &Message, now: Instant) {
        self.surface
            .transport()
            .post(&message.to_json(), HOST)
            .unwrap();
        self.host.pump(&self.channel);
        self.controller.poll(now);
    }

    /// Host messages received by the surface so far.
    fn received(&self) -> Vec<Message> {
        let mut out = Vec::new();
        while let Some(posted) = self.surface.try_recv() {
            if let Ok(Some(message)) = Message::from_json(&posted.text) {
                out.push(message);
            }
        }
        out
    }

    fn loaded(&mut self) {
        self.controller.navigate(self.start);
        self.surface_says(&Message::PreviewReady, self.start);
        assert_eq!(self.controller.state(), LoadingState::Loaded);
        self.received();
    }

    /// Advance to each deadline until none is left. Returns the number of polls.
    fn run_timers(&mut self) -> usize {
        let mut polls = 0;
        while let Some(deadline) = self.controller.next_deadline() {
            self.controller.poll(deadline);
            polls += 1;
            assert!(polls < 100, "timers never settle");
        }
        polls
    }
}

fn setting_changes(messages: &[Message]) -> Vec<&SettingChangePayload> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::SettingChange(payload) => Some(payload),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_preview_url_from_config() {
    let h = harness();
    assert_eq!(h.controller.url(), "https://shop.test/blog/");
    assert_eq!(h.controller.state(), LoadingState::Initial);
}

#[test]
fn test_navigate_starts_load_timeout() {
    let mut h = harness();
    h.controller.navigate(h.start);
    assert_eq!(h.controller.state(), LoadingState::Loading);
    assert_eq!(h.controller.next_deadline(), Some(h.at(10_000)));
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_ready_pushes_current_css() {
    let mut h = harness();
    let tree = SettingsTree::new(json!({ "colors": { "primaryColor": "#112233" } }));
    h.controller.update_settings(tree.clone(), h.start);
    h.controller.navigate(h.start);
    h.surface_says(&Message::PreviewReady, h.at(100));

    assert_eq!(h.controller.state(), LoadingState::Loaded);
    assert_eq!(h.controller.push_count(), 1);
    let messages = h.received();
    let pushes = setting_changes(&messages);
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].settings, tree);
    assert!(pushes[0].css.contains("--wp-color-primary-500: #112233;"));
}

#[test]
fn test_retry_bound_then_terminal_error() {
    let mut h = harness();
    h.controller.navigate(h.start);
    h.run_timers();

    let status = h.controller.status();
    assert_eq!(status.state, LoadingState::Error);
    assert_eq!(status.retry_count, 3);
    assert_eq!(h.loads.load(Ordering::SeqCst), 4);
    assert_eq!(
        status.failure.map(|f| f.action),
        Some(RecoveryAction::Retry)
    );
    // Nothing left to fire, and a late poll changes nothing.
    assert_eq!(h.controller.next_deadline(), None);
    h.controller.poll(h.at(1_000_000));
    assert_eq!(h.loads.load(Ordering::SeqCst), 4);
}

#[test]
fn test_unvalidated_retry_count_is_capped() {
    let mut config = config();
    config.timing.max_retries = 4_000_000_000;
    config.timing.load_timeout_ms = 0;
    let mut h = harness_with(&config, None);

    h.controller.navigate(h.start);
    assert_eq!(h.controller.next_deadline(), Some(h.at(10_000)));
    h.run_timers();

    assert_eq!(h.controller.state(), LoadingState::Error);
    assert_eq!(h.controller.retry_count(), RETRY_CEILING);
    assert_eq!(h.loads.load(Ordering::SeqCst), RETRY_CEILING as usize + 1);
}

#[test]
fn test_backoff_grows_between_attempts() {
    let mut h = harness();
    h.controller.navigate(h.start);

    h.controller.poll(h.at(10_000));
    assert_eq!(h.controller.retry_count(), 1);
    assert_eq!(h.controller.state(), LoadingState::Loading);
    assert_eq!(h.controller.next_deadline(), Some(h.at(11_000)));

    h.controller.poll(h.at(11_000));
    assert_eq!(h.loads.load(Ordering::SeqCst), 2);
    assert_eq!(h.controller.next_deadline(), Some(h.at(21_000)));

    h.controller.poll(h.at(21_000));
    assert_eq!(h.controller.next_deadline(), Some(h.at(23_000)));
}

#[test]
fn test_ready_during_backoff_resets_retries() {
    let mut h = harness();
    h.controller.navigate(h.start);
    h.controller.poll(h.at(10_000));
    assert_eq!(h.controller.retry_count(), 1);

    h.surface_says(&Message::PreviewReady, h.at(10_500));
    assert_eq!(h.controller.state(), LoadingState::Loaded);
    assert_eq!(h.controller.retry_count(), 0);
    assert_eq!(h.controller.next_deadline(), None);
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_manual_retry_after_error() {
    let mut h = harness();
    h.controller.navigate(h.start);
    h.run_timers();
    assert_eq!(h.controller.state(), LoadingState::Error);

    // Late ready from a dead surface does not revive the preview.
    h.surface_says(&Message::PreviewReady, h.at(200_000));
    assert_eq!(h.controller.state(), LoadingState::Error);

    h.controller.retry(h.at(200_000));
    let status = h.controller.status();
    assert_eq!(status.state, LoadingState::Loading);
    assert_eq!(status.retry_count, 0);
    assert!(status.failure.is_none());
    assert!(h.controller.has_surface());
}

#[test]
fn test_embedding_refusal_blocks() {
    let mut h = harness();
    h.controller.navigate(h.start);
    h.surface_says(&Message::embedding_refused("frame-ancestors 'none'"), h.at(50));

    let status = h.controller.status();
    assert_eq!(status.state, LoadingState::Blocked);
    assert_eq!(h.controller.next_deadline(), None);
    assert_eq!(
        status.failure.map(|f| f.action),
        Some(RecoveryAction::OpenExternally {
            url: "https://shop.test/blog/".into()
        })
    );

    h.surface_says(&Message::PreviewReady, h.at(60));
    assert_eq!(h.controller.state(), LoadingState::Blocked);
    h.controller.poll(h.at(100_000));
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_navigate_message_kept_across_reload() {
    let mut h = harness();
    h.loaded();
    h.surface_says(&Message::navigate("https://shop.test/about/"), h.at(10));
    assert_eq!(h.controller.url(), "https://shop.test/about/");

    h.controller.retry(h.at(20));
    assert_eq!(h.controller.url(), "https://shop.test/about/");
}

#[test]
fn test_status_subscription() {
    let mut h = harness();
    let status = h.controller.subscribe();
    assert_eq!(status.borrow().state, LoadingState::Initial);

    h.controller.navigate(h.start);
    assert_eq!(status.borrow().state, LoadingState::Loading);
    h.surface_says(&Message::PreviewReady, h.at(5));
    assert_eq!(status.borrow().state, LoadingState::Loaded);
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_debounce_coalesces_burst() {
    let mut h = harness();
    h.loaded();

    let trees: Vec<_> = (0..5)
        .map(|i| SettingsTree::new(json!({ "colors": { "primaryColor": format!("#00000{i}") } })))
        .collect();
    for (i, tree) in trees.iter().enumerate() {
        h.controller.update_settings(tree.clone(), h.at(i as u64 * 50));
    }

    // Last edit at 200ms, window 300ms.
    h.controller.poll(h.at(499));
    assert!(h.received().is_empty());

    h.controller.poll(h.at(500));
    let messages = h.received();
    let pushes = setting_changes(&messages);
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].settings, trees[4]);
    assert!(pushes[0].css.contains("#000004"));
}

#[test]
fn test_identical_state_is_not_pushed_again() {
    let mut h = harness();
    h.loaded();
    let tree = SettingsTree::new(json!({ "colors": { "primaryColor": "#abcdef" } }));

    h.controller.update_settings(tree.clone(), h.start);
    h.run_timers();
    h.controller.update_settings(tree, h.at(1_000));
    h.run_timers();

    assert_eq!(setting_changes(&h.received()).len(), 1);
    assert_eq!(h.controller.push_count(), 2);
}

#[test]
fn test_settings_only_edit_is_still_pushed() {
    let mut h = harness();
    h.loaded();
    let pushes_before = h.controller.push_count();
    let css_before = h.controller.css().to_string();

    let tree = SettingsTree::new(json!({ "siteIdentity": { "siteTitle": { "text": "New name" } } }));
    h.controller.update_settings(tree.clone(), h.start);
    assert_eq!(h.controller.css(), css_before);
    h.run_timers();

    let messages = h.received();
    let pushes = setting_changes(&messages);
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].settings, tree);
    assert_eq!(pushes[0].css, css_before);
    assert_eq!(h.controller.push_count(), pushes_before + 1);
}

#[test]
fn test_update_before_ready_is_delivered_on_ready() {
    let mut h = harness();
    h.controller.navigate(h.start);
    let tree = SettingsTree::new(json!({ "customCSS": ".late {}" }));
    h.controller.update_settings(tree, h.at(10));
    h.controller.poll(h.at(400));
    assert!(h.received().is_empty());

    h.surface_says(&Message::PreviewReady, h.at(500));
    let messages = h.received();
    let pushes = setting_changes(&messages);
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].css.ends_with(".late {}"));
}

#[test]
fn test_direct_injection_and_channel_both_deliver() {
    let style = SharedStyle::new("themesync-preview-styles");
    let mut h = harness_with(&config(), Some(style.clone()));
    h.loaded();

    let tree = SettingsTree::new(json!({ "colors": { "textColor": "#222222" } }));
    h.controller.update_settings(tree, h.start);
    h.run_timers();

    assert_eq!(style.css(), h.controller.css());
    assert_eq!(setting_changes(&h.received()).len(), 1);
}

#[test]
fn test_cross_origin_surface_falls_back_silently() {
    let mut h = harness();
    h.loaded();
    h.controller.update_settings(SettingsTree::new(json!({ "customCSS": "p{}" })), h.start);
    h.run_timers();

    assert!(h.controller.status().failure.is_none());
    assert_eq!(setting_changes(&h.received()).len(), 1);
}

#[test]
fn test_device_viewport_save_reset() {
    let mut h = harness();
    h.controller.set_device(Device::Mobile);
    let viewport = h.controller.set_viewport(300, 600);
    h.controller.save();
    h.controller.reset();

    assert!(viewport.scale <= 1.0);
    assert_eq!(
        h.received(),
        vec![
            Message::device_change(Device::Mobile),
            Message::viewport_change(viewport),
            Message::Save,
            Message::Reset,
        ]
    );
}

#[test]
fn test_selective_refresh_is_immediate() {
    let mut h = harness();
    let change = SettingChange::new("header", &["primary", "height"], json!(80));
    h.controller.selective_refresh(vec![change.clone()]);

    assert_eq!(h.controller.next_deadline(), None);
    match h.received().as_slice() {
        [Message::SelectiveRefresh(payload)] => {
            assert_eq!(payload.changes, vec![change]);
            assert_eq!(payload.settings.get(&["header", "primary", "height"]), Some(&json!(80)));
        }
        other => panic!("unexpected messages: {other:?}"),
    }
}

#[test]
fn test_three_device_changes_leave_one_class() {
    let mut h = harness();
    let mut agent = SurfaceAgent::new(
        Box::new(h.surface.transport()),
        OriginPolicy::Exact(HOST.into()),
        "themesync-preview-styles",
        "/",
    );
    for device in [Device::Mobile, Device::Tablet, Device::Mobile] {
        h.controller.set_device(device);
    }
    while let Some(posted) = h.surface.try_recv() {
        agent.receive(&posted.text, &posted.origin);
    }
    let classes: Vec<_> = agent.device_classes().collect();
    assert_eq!(classes, ["preview-device-mobile"]);
}

#[test]
fn test_end_to_end_with_agent() {
    let mut h = harness();
    let mut agent = SurfaceAgent::new(
        Box::new(h.surface.transport()),
        OriginPolicy::Exact(HOST.into()),
        "themesync-preview-styles",
        "/blog/",
    );

    h.controller.navigate(h.start);
    agent.boot(h.at(100)).unwrap();
    h.host.pump(&h.channel);
    h.controller.poll(h.at(100));
    assert_eq!(h.controller.state(), LoadingState::Loaded);

    while let Some(posted) = h.surface.try_recv() {
        agent.receive(&posted.text, &posted.origin);
    }
    assert_eq!(agent.css(), h.controller.css());
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_cancels_everything() {
    let mut h = harness();
    h.controller.navigate(h.start);
    h.controller.update_settings(SettingsTree::empty(), h.start);
    assert!(h.controller.next_deadline().is_some());
    assert_eq!(h.channel.subscriber_count(MessageKind::PreviewReady), 1);

    h.controller.dispose();
    h.controller.dispose();
    assert!(h.controller.is_disposed());
    assert_eq!(h.controller.next_deadline(), None);
    assert!(!h.controller.has_surface());
    assert_eq!(h.channel.subscriber_count(MessageKind::PreviewReady), 0);

    h.controller.poll(h.at(100_000));
    h.controller.navigate(h.at(100_000));
    h.controller.set_device(Device::Tablet);
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
    assert!(h.received().is_empty());
}

#[test]
fn test_drop_unregisters_from_shared_channel() {
    let h = harness();
    let channel = Arc::clone(&h.channel);
    assert_eq!(channel.subscriber_count(MessageKind::Navigate), 1);
    drop(h);
    assert_eq!(channel.subscriber_count(MessageKind::Navigate), 0);
}
