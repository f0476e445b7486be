//! Content container layout.

use serde::Deserialize;

use super::section;
use crate::compiler::defaults::{CONTAINER_PADDING, CONTAINER_WIDTH};
use crate::compiler::values::{BoxSpacing, at, max_width, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

#[derive(Debug, Deserialize)]
struct Container {
    layout: String,
    width: Responsive<CssValue>,
    #[serde(default)]
    padding: Option<Responsive<BoxSpacing>>,
}

impl Container {
    fn width(&self, device: Device) -> CssValue {
        at(Some(&self.width), CONTAINER_WIDTH, device)
    }

    /// Horizontal padding `(left, right)`.
    fn padding(&self, device: Device) -> (CssValue, CssValue) {
        let spacing = self.padding.as_ref().and_then(|p| p.resolve(device));
        let side = |value: Option<&CssValue>| {
            value.cloned().unwrap_or(CssValue::Number(CONTAINER_PADDING))
        };
        (
            side(spacing.and_then(|s| s.left.as_ref())),
            side(spacing.and_then(|s| s.right.as_ref())),
        )
    }
}

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let container: Container = section(tree, "container")?;
    let width = px(&container.width(Device::Desktop));

    let mut rule = Rule::new(".ast-container");
    match container.layout.as_str() {
        "boxed" => {
            rule.push("max-width", &width);
            rule.push("margin", "0 auto");
        }
        "full-width" => {
            rule.push("width", "100%");
            rule.push("max-width", "100%");
        }
        "fluid" => {
            rule.push("width", "100%");
            rule.push("max-width", &width);
            rule.push("margin", "0 auto");
        }
        _ => {}
    }
    let (left, right) = container.padding(Device::Desktop);
    rule.push("padding-left", px(&left));
    rule.push("padding-right", px(&right));

    let mut sheet = Stylesheet::new();
    sheet.rule(&rule);

    for device in [Device::Tablet, Device::Mobile] {
        let Some(query) = max_width(device) else {
            continue;
        };
        let (left, right) = container.padding(device);
        sheet.media(
            &Media::max_width(query).rule(
                Rule::new(".ast-container")
                    .decl("max-width", px(&container.width(device)))
                    .decl("padding-left", px(&left))
                    .decl("padding-right", px(&right)),
            ),
        );
    }

    Some(sheet)
}
