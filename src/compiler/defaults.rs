//! Fallback values used when a setting is absent or mis-shaped.
//!
//! Per-device arrays are ordered `[desktop, tablet, mobile]`.

use crate::settings::{CssValue, Device};

// colors
pub const PRIMARY_COLOR: &str = "#0073e6";
pub const SECONDARY_COLOR: &str = "#6c757d";
pub const TEXT_COLOR: &str = "#333333";
pub const LINK_COLOR: &str = "#0073e6";
pub const LINK_HOVER_COLOR: &str = "#005bb5";
pub const BORDER_COLOR: &str = "#e1e5e9";
pub const BODY_BACKGROUND: &str = "#ffffff";
pub const CONTENT_BACKGROUND: &str = "#ffffff";

// typography
pub const BODY_FONT_FAMILY: &str =
    r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#;
pub const BODY_FONT_SIZE: [f64; 3] = [16.0, 15.0, 14.0];
pub const BODY_LINE_HEIGHT: [f64; 3] = [1.6, 1.6, 1.6];
pub const BODY_LETTER_SPACING: [f64; 3] = [0.0, 0.0, 0.0];
pub const BODY_FONT_WEIGHT: f64 = 400.0;
pub const TEXT_TRANSFORM: &str = "none";

pub const HEADING_FONT_FAMILY: &str = "inherit";
pub const HEADING_FONT_WEIGHT: f64 = 600.0;
pub const HEADING_LINE_HEIGHT: [f64; 3] = [1.3, 1.3, 1.3];
pub const HEADING_FONT_SIZE: [[f64; 3]; 6] = [
    [36.0, 32.0, 28.0],
    [30.0, 28.0, 24.0],
    [24.0, 22.0, 20.0],
    [20.0, 18.0, 18.0],
    [18.0, 16.0, 16.0],
    [14.0, 14.0, 13.0],
];

pub const BUTTON_FONT_FAMILY: &str = "inherit";
pub const BUTTON_FONT_WEIGHT: f64 = 500.0;

// layout
pub const CONTAINER_WIDTH: [f64; 3] = [1200.0, 992.0, 544.0];
pub const CONTAINER_PADDING: f64 = 20.0;
pub const SIDEBAR_WIDTH: [f64; 3] = [30.0, 30.0, 30.0];
pub const SIDEBAR_GAP: f64 = 30.0;

/// Pick this device's entry from a `[desktop, tablet, mobile]` array.
pub fn pick(values: [f64; 3], device: Device) -> CssValue {
    let index = match device {
        Device::Desktop => 0,
        Device::Tablet => 1,
        Device::Mobile => 2,
    };
    CssValue::Number(values[index])
}
