//! Breadcrumb trail.

use serde::Deserialize;

use super::section;
use crate::compiler::values::{at, max_width, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Breadcrumbs {
    enabled: bool,
    link_color: String,
    #[serde(default)]
    current_page_color: Option<String>,
    #[serde(default)]
    separator_color: Option<String>,
    #[serde(default)]
    hover_color: Option<String>,
    #[serde(default)]
    font_size: Option<Responsive<CssValue>>,
    #[serde(default)]
    font_weight: Option<CssValue>,
    #[serde(default)]
    text_transform: Option<String>,
    #[serde(default)]
    item_spacing: Option<CssValue>,
    #[serde(default)]
    margin_top: Option<CssValue>,
    #[serde(default)]
    margin_bottom: Option<CssValue>,
    #[serde(default)]
    mobile_hidden: bool,
}

const FONT_SIZE: [f64; 3] = [14.0, 13.0, 12.0];

fn num(value: &Option<CssValue>, default: f64) -> CssValue {
    value.clone().unwrap_or(CssValue::Number(default))
}

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let crumbs: Breadcrumbs = section(tree, "breadcrumbs")?;
    if !crumbs.enabled {
        return None;
    }
    let size = |device| at(crumbs.font_size.as_ref(), FONT_SIZE, device);

    let mut sheet = Stylesheet::new();
    sheet.rule(
        &Rule::new(".ast-breadcrumbs")
            .decl("font-size", px(&size(Device::Desktop)))
            .decl("font-weight", num(&crumbs.font_weight, 400.0))
            .decl("text-transform", crumbs.text_transform.as_deref().unwrap_or("none"))
            .decl("margin-top", px(&num(&crumbs.margin_top, 0.0)))
            .decl("margin-bottom", px(&num(&crumbs.margin_bottom, 20.0))),
    );
    sheet.rule(&Rule::new(".ast-breadcrumbs a").decl("color", &crumbs.link_color));
    sheet.rule(
        &Rule::new(".ast-breadcrumbs a:hover")
            .decl("color", crumbs.hover_color.as_deref().unwrap_or(&crumbs.link_color)),
    );
    sheet.rule(
        &Rule::new(".ast-breadcrumbs .separator")
            .decl("color", crumbs.separator_color.as_deref().unwrap_or("#999999"))
            .decl("margin", format!("0 {}", px(&num(&crumbs.item_spacing, 8.0)))),
    );
    sheet.rule(
        &Rule::new(".ast-breadcrumbs .current")
            .decl("color", crumbs.current_page_color.as_deref().unwrap_or("var(--wp-text-primary)")),
    );

    for device in [Device::Tablet, Device::Mobile] {
        let (Some(query), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        let mut rule = Rule::new(".ast-breadcrumbs");
        if size(device) != size(wider) {
            rule.push("font-size", px(&size(device)));
        }
        if device == Device::Mobile && crumbs.mobile_hidden {
            rule.push("display", "none");
        }
        sheet.media(&Media::max_width(query).rule(rule));
    }

    Some(sheet)
}
