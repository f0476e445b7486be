//! `:root` custom properties.
//!
//! Both the `--wp-*` names and the legacy `--ast-*` names are declared, so
//! themes written against either keep working.

use super::defaults as d;
use super::values::{ColorState, flat, pct, px, responsive, scalar, text};
use super::writer::Rule;
use crate::settings::{CssValue, Device, SettingsTree};

pub fn root(tree: &SettingsTree) -> Rule {
    let mut rule = Rule::new(":root");
    colors(tree, &mut rule);
    typography(tree, &mut rule);
    spacing(tree, &mut rule);
    rule
}

fn colors(tree: &SettingsTree, rule: &mut Rule) {
    let color = |key: &str, default: &str| text(tree, &["colors", key], default);

    let primary = color("primaryColor", d::PRIMARY_COLOR);
    let secondary = color("secondaryColor", d::SECONDARY_COLOR);
    let text_color = color("textColor", d::TEXT_COLOR);
    let border = color("borderColor", d::BORDER_COLOR);
    let body_bg = color("bodyBackground", d::BODY_BACKGROUND);
    let content_bg = color("contentBackground", d::CONTENT_BACKGROUND);

    let link: Option<ColorState> = tree.value_at(&["colors", "linkColor"]);
    let (link, link_hover) = match &link {
        Some(state) => (
            state.normal_or(d::LINK_COLOR).to_string(),
            state.hover_or(d::LINK_HOVER_COLOR).to_string(),
        ),
        None => (d::LINK_COLOR.to_string(), d::LINK_HOVER_COLOR.to_string()),
    };

    rule.push("--wp-color-primary-500", &primary);
    rule.push("--wp-color-secondary-500", &secondary);
    rule.push("--wp-text-primary", &text_color);
    rule.push("--wp-link-color", &link);
    rule.push("--wp-link-color-hover", &link_hover);
    rule.push("--wp-border-primary", &border);
    rule.push("--wp-bg-body", &body_bg);
    rule.push("--wp-bg-content", &content_bg);

    rule.push("--ast-primary-color", &primary);
    rule.push("--ast-secondary-color", &secondary);
    rule.push("--ast-text-color", &text_color);
    rule.push("--ast-link-color", &link);
    rule.push("--ast-link-hover-color", &link_hover);
    rule.push("--ast-border-color", &border);
    rule.push("--ast-body-bg", &body_bg);
    rule.push("--ast-content-bg", &content_bg);

    // Insertion order of the source document is kept.
    if let Some(palette) = tree.get(&["colors", "palette"]).and_then(|v| v.as_object()) {
        for (key, value) in palette {
            if let Some(color) = value.as_str() {
                rule.push(format!("--ast-palette-{key}"), color);
            }
        }
    }
}

fn typography(tree: &SettingsTree, rule: &mut Rule) {
    let body = |key| ["typography", "bodyFont", key];
    let family = text(tree, &body("fontFamily"), d::BODY_FONT_FAMILY);

    rule.push("--wp-font-body", &family);
    for device in Device::ALL {
        let size = responsive(tree, &body("fontSize"), d::BODY_FONT_SIZE, device);
        rule.push(format!("--wp-font-size-body-{device}"), px(&size));
    }
    for device in Device::ALL {
        let height = responsive(tree, &body("lineHeight"), d::BODY_LINE_HEIGHT, device);
        rule.push(format!("--wp-line-height-body-{device}"), height);
    }

    rule.push("--ast-body-font-family", &family);
    rule.push(
        "--ast-body-font-weight",
        scalar(tree, &body("fontWeight"), CssValue::Number(d::BODY_FONT_WEIGHT)),
    );
    rule.push(
        "--ast-body-text-transform",
        text(tree, &body("textTransform"), d::TEXT_TRANSFORM),
    );

    let button = |key| ["typography", "button", key];
    rule.push(
        "--ast-button-font-family",
        text(tree, &button("fontFamily"), d::BUTTON_FONT_FAMILY),
    );
    rule.push(
        "--ast-button-font-weight",
        scalar(tree, &button("fontWeight"), CssValue::Number(d::BUTTON_FONT_WEIGHT)),
    );
    rule.push(
        "--ast-button-text-transform",
        text(tree, &button("textTransform"), d::TEXT_TRANSFORM),
    );
}

fn spacing(tree: &SettingsTree, rule: &mut Rule) {
    let widths: Vec<_> = Device::ALL
        .iter()
        .map(|&device| (device, responsive(tree, &["container", "width"], d::CONTAINER_WIDTH, device)))
        .collect();

    for (device, width) in &widths {
        rule.push(format!("--wp-container-width-{device}"), px(width));
    }
    for (device, width) in &widths {
        rule.push(format!("--ast-container-width-{device}"), px(width));
    }

    for device in Device::ALL {
        let width = responsive(tree, &["sidebar", "width"], d::SIDEBAR_WIDTH, device);
        rule.push(format!("--ast-sidebar-width-{device}"), pct(&width));
    }
    let gap = responsive(tree, &["sidebar", "gap"], flat(d::SIDEBAR_GAP), Device::Desktop);
    rule.push("--ast-sidebar-gap", px(&gap));
}
