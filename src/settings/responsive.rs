//! Breakpoints and per-breakpoint values.
//!
//! Every leaf of the settings tree may be a plain scalar or a responsive
//! value `{desktop, tablet, mobile}`. [`Responsive::resolve`] is the one
//! place where that distinction is collapsed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Device
// ============================================================================

/// Emulated device / CSS breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Device {
    /// Widest to narrowest; breakpoint overrides are emitted in this order.
    pub const ALL: [Device; 3] = [Device::Desktop, Device::Tablet, Device::Mobile];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop" => Some(Self::Desktop),
            "tablet" => Some(Self::Tablet),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }

    /// Class the preview surface puts on its root element.
    pub fn class_name(self) -> String {
        format!("{}{}", DEVICE_CLASS_PREFIX, self.as_str())
    }

    /// The next wider breakpoint, whose value a narrower override must differ from.
    pub const fn wider(self) -> Option<Self> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(Self::Desktop),
            Self::Mobile => Some(Self::Tablet),
        }
    }
}

/// Prefix shared by all device classes on the preview surface.
pub const DEVICE_CLASS_PREFIX: &str = "preview-device-";

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Responsive<T>
// ============================================================================

/// Per-breakpoint entries. Missing entries fall back to an explicit default
/// supplied by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoints<T> {
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub desktop: Option<T>,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub tablet: Option<T>,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

/// A scalar or a `{desktop, tablet, mobile}` mapping of the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Responsive<T> {
    PerDevice(Breakpoints<T>),
    Scalar(T),
}

impl<T> Responsive<T> {
    /// Same value at every breakpoint.
    pub const fn scalar(value: T) -> Self {
        Self::Scalar(value)
    }

    pub fn per_device(desktop: T, tablet: T, mobile: T) -> Self {
        Self::PerDevice(Breakpoints {
            desktop: Some(desktop),
            tablet: Some(tablet),
            mobile: Some(mobile),
        })
    }

    /// Value for `device`: the scalar itself, or that breakpoint's entry.
    pub fn resolve(&self, device: Device) -> Option<&T> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::PerDevice(bp) => match device {
                Device::Desktop => bp.desktop.as_ref(),
                Device::Tablet => bp.tablet.as_ref(),
                Device::Mobile => bp.mobile.as_ref(),
            },
        }
    }
}

impl<T: Clone> Responsive<T> {
    /// Like [`resolve`](Self::resolve), substituting `default` for a missing breakpoint.
    pub fn resolve_or(&self, device: Device, default: T) -> T {
        self.resolve(device).cloned().unwrap_or(default)
    }
}

/// Resolve an optional responsive value, applying a per-device default.
///
/// Shared by every compiler stage so scalar/responsive handling cannot drift.
pub fn resolve<T: Clone>(value: Option<&Responsive<T>>, device: Device, default: T) -> T {
    value.map_or(default.clone(), |v| v.resolve_or(device, default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_per_device() {
        let value: Responsive<f64> =
            serde_json::from_str(r#"{"desktop":20,"tablet":18,"mobile":16}"#).unwrap();
        assert_eq!(value.resolve(Device::Mobile), Some(&16.0));
        assert_eq!(value.resolve(Device::Tablet), Some(&18.0));
        assert_eq!(value.resolve(Device::Desktop), Some(&20.0));
    }

    #[test]
    fn test_resolve_scalar_any_device() {
        let value: Responsive<f64> = serde_json::from_str("20").unwrap();
        for device in Device::ALL {
            assert_eq!(value.resolve(device), Some(&20.0));
        }
    }

    #[test]
    fn test_missing_breakpoint_uses_default() {
        let value: Responsive<f64> = serde_json::from_str(r#"{"desktop":20}"#).unwrap();
        assert_eq!(value.resolve(Device::Tablet), None);
        assert_eq!(value.resolve_or(Device::Tablet, 15.0), 15.0);
        assert_eq!(resolve(None, Device::Mobile, 14.0), 14.0);
    }

    #[test]
    fn test_object_scalar_is_not_mistaken_for_breakpoints() {
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        struct Edge {
            top: f64,
        }
        let value: Responsive<Edge> = serde_json::from_str(r#"{"top":4}"#).unwrap();
        assert_eq!(value, Responsive::Scalar(Edge { top: 4.0 }));
    }

    #[test]
    fn test_device_helpers() {
        assert_eq!(Device::parse("tablet"), Some(Device::Tablet));
        assert_eq!(Device::parse("watch"), None);
        assert_eq!(Device::Mobile.class_name(), "preview-device-mobile");
        assert_eq!(Device::Mobile.wider(), Some(Device::Tablet));
        assert_eq!(Device::Desktop.wider(), None);
    }
}
