//! Subscriber registry and scoped subscription handles.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::MessageKind;
use super::message::Message;

/// Subscriber callback. Errors are logged by the channel and never reach
/// other subscribers.
pub type Callback = Arc<dyn Fn(&Message) -> anyhow::Result<()> + Send + Sync>;

/// Message kind → callbacks in registration order.
#[derive(Default)]
pub(super) struct Registry {
    next_id: u64,
    subscribers: FxHashMap<MessageKind, Vec<(u64, Callback)>>,
}

impl Registry {
    pub(super) fn insert(&mut self, kind: MessageKind, callback: Callback) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.subscribers.entry(kind).or_default().push((id, callback));
        id
    }

    /// Returns whether the entry was still present.
    pub(super) fn remove(&mut self, kind: MessageKind, id: u64) -> bool {
        let Some(list) = self.subscribers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(entry, _)| *entry != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.subscribers.remove(&kind);
        }
        removed
    }

    /// Snapshot of the callbacks for `kind`, so none run under the lock.
    pub(super) fn callbacks(&self, kind: MessageKind) -> Vec<Callback> {
        self.subscribers
            .get(&kind)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    pub(super) fn count(&self, kind: MessageKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    pub(super) fn clear(&mut self) {
        self.subscribers.clear();
    }
}

/// Handle returned by [`MessageChannel::on`](super::MessageChannel::on).
///
/// Dropping the handle unsubscribes. Call [`detach`](Self::detach) to keep
/// the callback registered for the channel's lifetime.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    kind: MessageKind,
    id: u64,
    active: bool,
}

impl Subscription {
    pub(super) fn new(registry: &Arc<Mutex<Registry>>, kind: MessageKind, id: u64) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            kind,
            id,
            active: true,
        }
    }

    /// A handle bound to nothing, returned after teardown.
    pub(super) fn inert(kind: MessageKind) -> Self {
        Self {
            registry: Weak::new(),
            kind,
            id: 0,
            active: false,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remove the callback. Calling this again is a no-op.
    pub fn unsubscribe(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(self.kind, self.id);
        }
    }

    /// Keep the callback registered after this handle is dropped.
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
