use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::*;
use crate::settings::Device;
use crate::transport::MemoryTransport;

const HOST: &str = "https://admin.test";
const SURFACE: &str = "https://shop.test";

fn recorder(channel: &MessageChannel, kind: MessageKind, log: &Arc<Mutex<Vec<String>>>, tag: &str) -> Subscription {
    let log = Arc::clone(log);
    let tag = tag.to_string();
    channel.on(kind, move |message| {
        log.lock().push(format!("{tag}:{}", message.kind()));
        Ok(())
    })
}

fn counter(channel: &MessageChannel, kind: MessageKind) -> (Subscription, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    let sub = channel.on(kind, move |_| {
        inner.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (sub, count)
}

const READY: &str = r#"{"type":"preview-ready"}"#;

#[test]
fn test_callbacks_run_in_registration_order() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    let log = Arc::new(Mutex::new(Vec::new()));
    let _a = recorder(&channel, MessageKind::PreviewReady, &log, "a");
    let _b = recorder(&channel, MessageKind::PreviewReady, &log, "b");
    let _c = recorder(&channel, MessageKind::PreviewReady, &log, "c");

    let result = channel.receive(READY, SURFACE);
    assert_eq!(result.delivered, 3);
    assert_eq!(*log.lock(), ["a:preview-ready", "b:preview-ready", "c:preview-ready"]);
}

#[test]
fn test_double_unsubscribe_is_noop() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    let (mut first, first_count) = counter(&channel, MessageKind::PreviewReady);
    let (_second, second_count) = counter(&channel, MessageKind::PreviewReady);

    first.unsubscribe();
    first.unsubscribe();
    assert!(!first.is_active());
    assert_eq!(channel.subscriber_count(MessageKind::PreviewReady), 1);

    channel.receive(READY, SURFACE);
    assert_eq!(first_count.load(Ordering::SeqCst), 0);
    assert_eq!(second_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_unsubscribes_and_detach_keeps() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    {
        let (_scoped, _) = counter(&channel, MessageKind::Save);
        assert_eq!(channel.subscriber_count(MessageKind::Save), 1);
    }
    assert_eq!(channel.subscriber_count(MessageKind::Save), 0);

    let (kept, count) = counter(&channel, MessageKind::Save);
    kept.detach();
    channel.dispatch(&Message::Save);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(channel.subscriber_count(MessageKind::Save), 1);
}

#[test]
fn test_failing_subscriber_does_not_block_others() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    let _err = channel.on(MessageKind::PreviewReady, |_| anyhow::bail!("subscriber broke"));
    let _panic = channel.on(MessageKind::PreviewReady, |_| panic!("subscriber panicked"));
    let (_ok, count) = counter(&channel, MessageKind::PreviewReady);

    let result = channel.receive(READY, SURFACE);
    assert_eq!(result, Dispatch { delivered: 1, failed: 2 });
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_callbacks_only_see_their_kind() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    let (_ready, ready) = counter(&channel, MessageKind::PreviewReady);
    let (_nav, nav) = counter(&channel, MessageKind::Navigate);

    channel.receive(r#"{"type":"navigate","payload":{"url":"/about/"}}"#, SURFACE);
    assert_eq!(ready.load(Ordering::SeqCst), 0);
    assert_eq!(nav.load(Ordering::SeqCst), 1);
}

#[test]
fn test_origin_mismatch_is_dropped() {
    let channel = MessageChannel::new(OriginPolicy::Exact(SURFACE.into()));
    let (_sub, count) = counter(&channel, MessageKind::PreviewReady);

    assert_eq!(channel.receive(READY, "https://evil.test"), Dispatch::default());
    assert_eq!(channel.receive(READY, "https://SHOP.test/").delivered, 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_require_configured_rejects_everything() {
    let channel = MessageChannel::new(OriginPolicy::RequireConfigured);
    let (_sub, count) = counter(&channel, MessageKind::PreviewReady);

    channel.receive(READY, SURFACE);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    channel.set_origin_policy(OriginPolicy::Exact(SURFACE.into()));
    channel.receive(READY, SURFACE);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_and_malformed_input_is_ignored() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    let (_sub, count) = counter(&channel, MessageKind::Navigate);

    assert_eq!(channel.receive(r#"{"type":"telemetry"}"#, SURFACE), Dispatch::default());
    assert_eq!(channel.receive(r#"{"type":"navigate","payload":{}}"#, SURFACE), Dispatch::default());
    assert_eq!(channel.receive("<html>", SURFACE), Dispatch::default());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_send_without_target_is_noop() {
    let channel = MessageChannel::new(OriginPolicy::Any);
    assert!(!channel.has_target());
    assert!(channel.send(&Message::Save).is_ok());
}

#[test]
fn test_send_uses_policy_target_origin() {
    let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
    let channel = MessageChannel::new(OriginPolicy::Exact(SURFACE.into()));
    channel.set_target(Some(Box::new(host.transport())));

    channel.send(&Message::device_change(Device::Tablet)).unwrap();
    let posted = surface.try_recv().unwrap();
    assert_eq!(posted.target_origin, SURFACE);
    assert_eq!(
        Message::from_json(&posted.text).unwrap(),
        Some(Message::device_change(Device::Tablet))
    );

    channel.set_origin_policy(OriginPolicy::RequireConfigured);
    channel.send(&Message::Save).unwrap();
    assert!(surface.try_recv().is_none());
}

#[test]
fn test_teardown() {
    let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
    let channel = MessageChannel::new(OriginPolicy::Any);
    channel.set_target(Some(Box::new(host.transport())));
    let (sub, count) = counter(&channel, MessageKind::PreviewReady);

    channel.teardown();
    assert!(channel.is_closed());
    assert!(!channel.has_target());
    assert_eq!(channel.subscriber_count(MessageKind::PreviewReady), 0);

    channel.receive(READY, SURFACE);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    channel.send(&Message::Save).unwrap();
    assert!(surface.try_recv().is_none());

    let late = channel.on(MessageKind::Save, |_| Ok(()));
    assert!(!late.is_active());
    channel.set_target(Some(Box::new(host.transport())));
    assert!(!channel.has_target());

    drop(sub);
}

#[test]
fn test_subscriber_may_unsubscribe_others_while_dispatching() {
    let channel = Arc::new(MessageChannel::new(OriginPolicy::Any));
    let (victim, victim_count) = counter(&channel, MessageKind::Reset);
    let slot = Arc::new(Mutex::new(Some(victim)));

    let held = Arc::clone(&slot);
    let _killer = channel.on(MessageKind::Reset, move |_| {
        held.lock().take();
        Ok(())
    });

    // Callbacks are snapshotted, so the victim still runs this round.
    channel.dispatch(&Message::Reset);
    assert_eq!(victim_count.load(Ordering::SeqCst), 1);
    assert_eq!(channel.subscriber_count(MessageKind::Reset), 1);

    channel.dispatch(&Message::Reset);
    assert_eq!(victim_count.load(Ordering::SeqCst), 1);
}
