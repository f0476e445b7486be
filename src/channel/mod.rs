//! Typed publish/subscribe channel between the host and the preview surface.
//!
//! # Architecture
//!
//! ```text
//!   host code                        MessageChannel                    surface
//!  ───────────                      ────────────────                  ─────────
//!   send(msg) ───── envelope JSON ──► Transport::post ───────────────►
//!                                                                        │
//!   on(kind, cb) ◄── dispatch ◄── receive(raw, origin) ◄──────────────────┘
//!                        │
//!                        ├── origin check (OriginPolicy)
//!                        ├── shape check (Message::from_json)
//!                        └── unknown type → ignored
//! ```
//!
//! The channel is created once by its owner and shared as
//! `Arc<MessageChannel>`. Rejected input is dropped and only debug-logged.
//! Callbacks run without any channel lock held, in registration order, and
//! a callback that errors or panics does not stop the others.

pub mod message;
mod subscription;

pub use message::{
    DeviceChangePayload, EmbeddingRefusedPayload, Envelope, Message, MessageKind,
    NavigatePayload, PROTOCOL_VERSION, SelectiveRefreshPayload, SettingChangePayload,
    ViewportChangePayload, Viewport,
};
pub use subscription::{Callback, Subscription};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::transport::Transport;
use crate::{debug, log};
use subscription::Registry;

// ============================================================================
// OriginPolicy
// ============================================================================

/// Which sender origins are accepted, and where outgoing messages may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept from, and post to, any origin (`*`).
    Any,
    /// Only this origin (`scheme://host[:port]`).
    Exact(String),
    /// Reject everything until an origin is configured.
    RequireConfigured,
}

impl OriginPolicy {
    pub fn accepts(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => same_origin(expected, origin),
            Self::RequireConfigured => false,
        }
    }

    /// Target origin for outgoing messages; `None` means do not send.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Any => Some("*"),
            Self::Exact(origin) => Some(origin),
            Self::RequireConfigured => None,
        }
    }
}

pub(crate) fn same_origin(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}

// ============================================================================
// MessageChannel
// ============================================================================

struct Inner {
    policy: OriginPolicy,
    target: Option<Box<dyn Transport>>,
    closed: bool,
}

/// Delivery counts for one received message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub delivered: usize,
    pub failed: usize,
}

pub struct MessageChannel {
    inner: Mutex<Inner>,
    registry: Arc<Mutex<Registry>>,
}

impl MessageChannel {
    pub fn new(policy: OriginPolicy) -> Self {
        Self {
            inner: Mutex::new(Inner {
                policy,
                target: None,
                closed: false,
            }),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Replace (or clear) the transport to the surface.
    pub fn set_target(&self, target: Option<Box<dyn Transport>>) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.target = target;
    }

    pub fn has_target(&self) -> bool {
        self.inner.lock().target.is_some()
    }

    pub fn set_origin_policy(&self, policy: OriginPolicy) {
        self.inner.lock().policy = policy;
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        self.inner.lock().policy.clone()
    }

    /// Post `message` to the current target.
    ///
    /// Without a target, or without a permitted target origin, this is a
    /// logged no-op.
    pub fn send(&self, message: &Message) -> Result<(), TransportError> {
        let inner = self.inner.lock();
        let Some(target) = inner.target.as_ref() else {
            debug!("channel"; "no target, dropped outgoing {}", message.kind());
            return Ok(());
        };
        let Some(origin) = inner.policy.target() else {
            debug!("channel"; "no target origin configured, dropped outgoing {}", message.kind());
            return Ok(());
        };
        target.post(&message.to_json(), origin)
    }

    /// Register `callback` for `kind`. Callbacks for the same kind run in
    /// registration order.
    pub fn on<F>(&self, kind: MessageKind, callback: F) -> Subscription
    where
        F: Fn(&Message) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if self.inner.lock().closed {
            return Subscription::inert(kind);
        }
        let id = self.registry.lock().insert(kind, Arc::new(callback));
        Subscription::new(&self.registry, kind, id)
    }

    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.registry.lock().count(kind)
    }

    /// Handle raw input from the transport.
    ///
    /// Input from a rejected origin, malformed input, and unknown types are
    /// dropped. Returns what happened to the message.
    pub fn receive(&self, raw: &str, origin: &str) -> Dispatch {
        {
            let inner = self.inner.lock();
            if inner.closed {
                return Dispatch::default();
            }
            if !inner.policy.accepts(origin) {
                debug!("channel"; "dropped message from origin {}", origin);
                return Dispatch::default();
            }
        }

        match Message::from_json(raw) {
            Ok(Some(message)) => self.dispatch(&message),
            Ok(None) => {
                debug!("channel"; "ignored unknown message type");
                Dispatch::default()
            }
            Err(err) => {
                debug!("channel"; "{}", err);
                Dispatch::default()
            }
        }
    }

    /// Run every callback registered for the message's kind.
    pub fn dispatch(&self, message: &Message) -> Dispatch {
        let callbacks = self.registry.lock().callbacks(message.kind());
        let mut result = Dispatch::default();

        for callback in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(message))) {
                Ok(Ok(())) => result.delivered += 1,
                Ok(Err(err)) => {
                    result.failed += 1;
                    log!("channel"; "{} subscriber failed: {:#}", message.kind(), err);
                }
                Err(_) => {
                    result.failed += 1;
                    log!("channel"; "{} subscriber panicked", message.kind());
                }
            }
        }
        result
    }

    /// Drop the target and every subscriber. Later `send`/`on`/`receive`
    /// calls do nothing.
    pub fn teardown(&self) {
        {
            let mut inner = self.inner.lock();
            inner.closed = true;
            inner.target = None;
        }
        self.registry.lock().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl std::fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MessageChannel")
            .field("policy", &inner.policy)
            .field("has_target", &inner.target.is_some())
            .field("closed", &inner.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests;
