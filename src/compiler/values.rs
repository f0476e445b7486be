//! Leaf shapes shared by several compiler stages.

use serde::Deserialize;

use super::defaults;
use crate::settings::{CssValue, Device, Responsive, SettingsTree, resolve};

/// Tablet override breakpoint.
pub const TABLET_MAX_WIDTH: u32 = 992;
/// Mobile override breakpoint.
pub const MOBILE_MAX_WIDTH: u32 = 576;

/// `max-width` of the override block for `device`; desktop has none.
pub const fn max_width(device: Device) -> Option<u32> {
    match device {
        Device::Desktop => None,
        Device::Tablet => Some(TABLET_MAX_WIDTH),
        Device::Mobile => Some(MOBILE_MAX_WIDTH),
    }
}

/// Either a single color or a `{normal, hover}` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorState {
    Plain(String),
    States {
        #[serde(default)]
        normal: Option<String>,
        #[serde(default)]
        hover: Option<String>,
    },
}

impl ColorState {
    pub fn normal_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Self::Plain(color) => color,
            Self::States { normal, .. } => normal.as_deref().unwrap_or(default),
        }
    }

    /// Hover color, falling back to the normal color, then to `default`.
    pub fn hover_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Self::Plain(color) => color,
            Self::States { normal, hover } => hover
                .as_deref()
                .or(normal.as_deref())
                .unwrap_or(default),
        }
    }
}

/// Vertical padding pair used by footer areas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerticalPadding {
    #[serde(default)]
    pub top: Option<CssValue>,
    #[serde(default)]
    pub bottom: Option<CssValue>,
}

/// Four-sided box spacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxSpacing {
    #[serde(default)]
    pub top: Option<CssValue>,
    #[serde(default)]
    pub right: Option<CssValue>,
    #[serde(default)]
    pub bottom: Option<CssValue>,
    #[serde(default)]
    pub left: Option<CssValue>,
}

/// Responsive value at `path`, falling back to the per-device default.
pub fn responsive(tree: &SettingsTree, path: &[&str], fallback: [f64; 3], device: Device) -> CssValue {
    let value = tree.responsive_at(path);
    resolve(value.as_ref(), device, defaults::pick(fallback, device))
}

/// Like [`responsive`] for an already deserialized value.
pub fn at(value: Option<&Responsive<CssValue>>, fallback: [f64; 3], device: Device) -> CssValue {
    resolve(value, device, defaults::pick(fallback, device))
}

/// Same default at every breakpoint.
pub const fn flat(value: f64) -> [f64; 3] {
    [value, value, value]
}

/// Scalar CSS value at `path`, or `default`.
pub fn scalar(tree: &SettingsTree, path: &[&str], default: CssValue) -> CssValue {
    tree.value_at(path).unwrap_or(default)
}

/// String at `path`, or `default`.
pub fn text(tree: &SettingsTree, path: &[&str], default: &str) -> String {
    tree.str_at(path).unwrap_or(default).to_string()
}

pub fn px(value: &CssValue) -> String {
    value.with_unit("px")
}

pub fn pct(value: &CssValue) -> String {
    value.with_unit("%")
}

pub fn ms(value: &CssValue) -> String {
    value.with_unit("ms")
}
