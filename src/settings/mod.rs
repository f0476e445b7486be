//! Customizer settings model.
//!
//! # Module Structure
//!
//! ```text
//! settings/
//! ├── responsive.rs  # Device, Responsive<T>, the shared resolve helper
//! ├── store.rs       # SettingsStore (atomic swap), SettingChange
//! └── mod.rs         # SettingsTree, CssValue (this file)
//! ```
//!
//! The tree is a JSON document keyed by section (`colors`, `typography`,
//! `header`, `blog`, ...). Lookups are lenient: a missing key or a value of
//! the wrong shape reads as `None`, and the compiler substitutes its default.

mod responsive;
mod store;

pub use responsive::{Breakpoints, DEVICE_CLASS_PREFIX, Device, Responsive, resolve};
pub use store::{SettingChange, SettingsStore};

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// SettingsTree
// ============================================================================

/// Immutable settings document. Cloning shares the underlying JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsTree(Arc<Value>);

impl Default for SettingsTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl SettingsTree {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self::new)
    }

    pub(crate) fn from_arc(value: Arc<Value>) -> Self {
        Self(value)
    }

    pub(crate) fn as_arc(&self) -> &Arc<Value> {
        &self.0
    }

    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Walk object keys; any non-object along the way ends the lookup.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self.as_value(), |node, key| node.as_object()?.get(*key))
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.get(&[name])
    }

    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn bool_at(&self, path: &[&str]) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Deserialize the value at `path`, or `None` if absent or mis-shaped.
    pub fn value_at<T: DeserializeOwned>(&self, path: &[&str]) -> Option<T> {
        self.get(path)
            .and_then(|value| T::deserialize(value).ok())
    }

    /// Responsive CSS value at `path`.
    pub fn responsive_at(&self, path: &[&str]) -> Option<Responsive<CssValue>> {
        self.value_at(path)
    }

    /// New tree with `value` stored at `section.path...`.
    ///
    /// Missing intermediate objects are created; a non-object in the way is
    /// replaced by an object.
    pub fn with_value(&self, section: &str, path: &[&str], value: Value) -> Self {
        let mut root = (*self.0).clone();
        let mut node = &mut root;
        for key in std::iter::once(section).chain(path.iter().copied()) {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = &mut node[key];
        }
        *node = value;
        Self::new(root)
    }

    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for SettingsTree {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Serialize for SettingsTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SettingsTree {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

// ============================================================================
// CssValue
// ============================================================================

/// A leaf destined for a CSS declaration.
///
/// Numbers get a unit appended by the compiler; strings are emitted as-is
/// (`"2rem"`, `"auto"`, `"#fff"`), without validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl CssValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Render with `unit` appended to numbers.
    pub fn with_unit(&self, unit: &str) -> String {
        match self {
            Self::Number(n) => format!("{}{}", n, unit),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CssValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CssValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}
