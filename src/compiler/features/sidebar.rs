//! Sidebar placement next to the primary content.

use serde::Deserialize;

use super::section;
use crate::compiler::defaults::{SIDEBAR_GAP, SIDEBAR_WIDTH};
use crate::compiler::values::{at, flat, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

/// The sidebar stacks under the content below this width.
const COLLAPSE_MAX_WIDTH: u32 = 768;

#[derive(Debug, Deserialize)]
struct Sidebar {
    layout: String,
    width: Responsive<CssValue>,
    #[serde(default)]
    gap: Option<Responsive<CssValue>>,
}

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let sidebar: Sidebar = section(tree, "sidebar")?;
    if sidebar.layout == "no-sidebar" {
        return None;
    }

    let width = at(Some(&sidebar.width), SIDEBAR_WIDTH, Device::Desktop);
    let gap = at(sidebar.gap.as_ref(), flat(SIDEBAR_GAP), Device::Desktop);
    let content_basis = match width.as_number() {
        Some(n) => format!("{}%", 100.0 - n),
        None => format!("calc(100% - {width})"),
    };
    let sidebar_basis = match width.as_number() {
        Some(n) => format!("{n}%"),
        None => width.to_string(),
    };

    let mut sheet = Stylesheet::new();
    sheet.rule(
        &Rule::new(".ast-content-area")
            .decl("display", "flex")
            .decl("gap", px(&gap)),
    );
    sheet.rule(&Rule::new(".ast-primary-content").decl("flex", format!("1 1 {content_basis}")));

    let mut aside = Rule::new(".ast-sidebar").decl("flex", format!("0 0 {sidebar_basis}"));
    if sidebar.layout == "left-sidebar" {
        aside.push("order", -1);
    }
    sheet.rule(&aside);

    sheet.media(
        &Media::max_width(COLLAPSE_MAX_WIDTH)
            .rule(Rule::new(".ast-content-area").decl("flex-direction", "column"))
            .rule(Rule::new(".ast-sidebar").decl("flex", "0 0 100%")),
    );

    Some(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: serde_json::Value) -> Option<String> {
        emit(&SettingsTree::new(value)).map(Stylesheet::finish)
    }

    #[test]
    fn test_no_sidebar_emits_nothing() {
        assert!(render(json!({ "sidebar": { "layout": "no-sidebar", "width": 30 } })).is_none());
        assert!(render(json!({ "sidebar": { "layout": "right-sidebar" } })).is_none());
    }

    #[test]
    fn test_left_sidebar() {
        let css = render(json!({
            "sidebar": { "layout": "left-sidebar", "width": { "desktop": 25, "tablet": 30, "mobile": 100 }, "gap": 40 }
        }))
        .unwrap();
        assert!(css.contains("  gap: 40px;"));
        assert!(css.contains(".ast-primary-content {\n  flex: 1 1 75%;"));
        assert!(css.contains(".ast-sidebar {\n  flex: 0 0 25%;\n  order: -1;"));
        assert!(css.contains("@media (max-width: 768px)"));
    }
}
