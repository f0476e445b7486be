//! Current settings with atomic replacement.
//!
//! Readers get a cheap snapshot via [`SettingsStore::load`]; edits swap in
//! a new tree and never mutate a snapshot someone else holds.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SettingsTree;

/// One path-based edit coming from a panel widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingChange {
    pub section: String,
    #[serde(default)]
    pub path: Vec<String>,
    pub value: Value,
}

impl SettingChange {
    pub fn new(section: impl Into<String>, path: &[&str], value: Value) -> Self {
        Self {
            section: section.into(),
            path: path.iter().map(|s| s.to_string()).collect(),
            value,
        }
    }

    /// Apply to `tree`, producing the edited tree.
    pub fn apply_to(&self, tree: &SettingsTree) -> SettingsTree {
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        tree.with_value(&self.section, &path, self.value.clone())
    }
}

/// Holder of the current settings tree.
pub struct SettingsStore {
    current: ArcSwap<Value>,
    defaults: Arc<Value>,
    revision: AtomicU64,
}

impl SettingsStore {
    /// Start from `defaults`; [`reset`](Self::reset) returns here.
    pub fn new(defaults: SettingsTree) -> Self {
        let defaults = Arc::clone(defaults.as_arc());
        Self {
            current: ArcSwap::new(Arc::clone(&defaults)),
            defaults,
            revision: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn load(&self) -> SettingsTree {
        SettingsTree::from_arc(self.current.load_full())
    }

    /// Monotonic counter, bumped on every replacement.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    pub fn replace(&self, tree: SettingsTree) {
        self.current.store(Arc::clone(tree.as_arc()));
        self.revision.fetch_add(1, Ordering::Relaxed);
    }

    /// Apply one edit and return the resulting tree.
    pub fn apply(&self, change: &SettingChange) -> SettingsTree {
        let mut result = None;
        self.current.rcu(|current| {
            let next = change.apply_to(&SettingsTree::from_arc(Arc::clone(current)));
            let arc = Arc::clone(next.as_arc());
            result = Some(next);
            arc
        });
        self.revision.fetch_add(1, Ordering::Relaxed);
        result.unwrap_or_else(|| self.load())
    }

    /// Apply several edits as a single replacement.
    pub fn apply_all(&self, changes: &[SettingChange]) -> SettingsTree {
        let next = changes
            .iter()
            .fold(self.load(), |tree, change| change.apply_to(&tree));
        self.replace(next.clone());
        next
    }

    /// Restore the defaults given at construction.
    pub fn reset(&self) -> SettingsTree {
        self.current.store(Arc::clone(&self.defaults));
        self.revision.fetch_add(1, Ordering::Relaxed);
        self.load()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SettingsTree::empty())
    }
}
