//! Footer widget area and bottom bar.

use serde::Deserialize;

use super::section;
use crate::compiler::values::{ColorState, VerticalPadding, max_width, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Footer {
    #[serde(default)]
    widgets: Option<Area>,
    #[serde(default)]
    bottom_bar: Option<Area>,
}

/// Shared shape of the widget area and the bottom bar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Area {
    enabled: bool,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    link_color: Option<ColorState>,
    #[serde(default)]
    padding: Option<Responsive<VerticalPadding>>,
    #[serde(default)]
    columns: Option<Responsive<CssValue>>,
}

struct AreaDefaults {
    selector: &'static str,
    background: &'static str,
    text_color: &'static str,
    padding: f64,
}

const WIDGETS: AreaDefaults = AreaDefaults {
    selector: ".ast-footer-widgets",
    background: "#f8f9fa",
    text_color: "#333333",
    padding: 60.0,
};

const BOTTOM_BAR: AreaDefaults = AreaDefaults {
    selector: ".ast-footer-bottom",
    background: "#333333",
    text_color: "#ffffff",
    padding: 20.0,
};

const COLUMNS: [f64; 3] = [4.0, 2.0, 1.0];

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let footer: Footer = section(tree, "footer")?;
    if footer.widgets.is_none() && footer.bottom_bar.is_none() {
        return None;
    }

    let mut sheet = Stylesheet::new();
    if let Some(widgets) = footer.widgets.as_ref().filter(|a| a.enabled) {
        area(widgets, &WIDGETS, &mut sheet);
        columns(widgets, &mut sheet);
    }
    if let Some(bar) = footer.bottom_bar.as_ref().filter(|a| a.enabled) {
        area(bar, &BOTTOM_BAR, &mut sheet);
    }
    Some(sheet)
}

fn padding(area: &Area, device: Device, default: f64) -> (CssValue, CssValue) {
    let edge = area.padding.as_ref().and_then(|p| p.resolve(device));
    let pick = |side: Option<&CssValue>| side.cloned().unwrap_or(CssValue::Number(default));
    (
        pick(edge.and_then(|e| e.top.as_ref())),
        pick(edge.and_then(|e| e.bottom.as_ref())),
    )
}

fn area(area: &Area, defaults: &AreaDefaults, sheet: &mut Stylesheet) {
    let link = area.link_color.as_ref();
    let (top, bottom) = padding(area, Device::Desktop, defaults.padding);

    sheet.rule(
        &Rule::new(defaults.selector)
            .decl("background", area.background.as_deref().unwrap_or(defaults.background))
            .decl("color", area.text_color.as_deref().unwrap_or(defaults.text_color))
            .decl("padding-top", px(&top))
            .decl("padding-bottom", px(&bottom)),
    );
    sheet.rule(
        &Rule::new(format!("{} a", defaults.selector))
            .decl("color", link.map_or("inherit", |c| c.normal_or("inherit"))),
    );
    sheet.rule(
        &Rule::new(format!("{} a:hover", defaults.selector))
            .decl("color", link.map_or("inherit", |c| c.hover_or("inherit"))),
    );

    for device in [Device::Tablet, Device::Mobile] {
        let (Some(query), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        let (top, bottom) = padding(area, device, defaults.padding);
        let (wider_top, wider_bottom) = padding(area, wider, defaults.padding);

        let mut rule = Rule::new(defaults.selector);
        if top != wider_top {
            rule.push("padding-top", px(&top));
        }
        if bottom != wider_bottom {
            rule.push("padding-bottom", px(&bottom));
        }
        sheet.media(&Media::max_width(query).rule(rule));
    }
}

fn columns(widgets: &Area, sheet: &mut Stylesheet) {
    let count = |device| {
        crate::compiler::values::at(widgets.columns.as_ref(), COLUMNS, device)
    };
    let template = |device| format!("repeat({}, 1fr)", count(device));

    sheet.rule(
        &Rule::new(".ast-footer-widget-area")
            .decl("display", "grid")
            .decl("grid-template-columns", template(Device::Desktop))
            .decl("gap", "30px"),
    );
    for device in [Device::Tablet, Device::Mobile] {
        let (Some(query), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        if count(device) != count(wider) {
            sheet.media(&Media::max_width(query).rule(
                Rule::new(".ast-footer-widget-area").decl("grid-template-columns", template(device)),
            ));
        }
    }
}
