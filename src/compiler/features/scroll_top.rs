//! Scroll-to-top button.

use serde::Deserialize;

use super::section;
use crate::compiler::values::MOBILE_MAX_WIDTH;
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::SettingsTree;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrollToTop {
    enabled: bool,
    display_type: String,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    icon_color: Option<String>,
    #[serde(default)]
    position: Option<String>,
}

const SELECTOR: &str = ".ast-scroll-top";

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let button: ScrollToTop = section(tree, "scrollToTop")?;
    if !button.enabled {
        return None;
    }
    let side = match button.position.as_deref() {
        Some("left") => "left",
        _ => "right",
    };

    let mut sheet = Stylesheet::new();
    sheet.rule(
        &Rule::new(SELECTOR)
            .decl("position", "fixed")
            .decl("bottom", "30px")
            .decl(side, "30px")
            .decl("width", "40px")
            .decl("height", "40px")
            .decl("border-radius", "50%")
            .decl("display", "flex")
            .decl("align-items", "center")
            .decl("justify-content", "center")
            .decl(
                "background-color",
                button.background_color.as_deref().unwrap_or("var(--wp-color-primary-500)"),
            )
            .decl("color", button.icon_color.as_deref().unwrap_or("#ffffff"))
            .decl("z-index", 99)
            .decl("cursor", "pointer"),
    );

    let hidden = Rule::new(SELECTOR).decl("display", "none");
    match button.display_type.as_str() {
        "desktop" => sheet.media(&Media::max_width(MOBILE_MAX_WIDTH).rule(hidden)),
        "mobile" => sheet.media(&Media::min_width(MOBILE_MAX_WIDTH + 1).rule(hidden)),
        _ => {}
    }

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
    fn test_requires_enabled_and_display_type() {
        assert!(render(json!({ "scrollToTop": { "enabled": true } })).is_none());
        assert!(render(json!({ "scrollToTop": { "enabled": false, "displayType": "both" } })).is_none());
    }

    #[test]
    fn test_display_type_visibility() {
        let both = render(json!({ "scrollToTop": { "enabled": true, "displayType": "both", "position": "left" } })).unwrap();
        assert!(both.contains("  left: 30px;"));
        assert!(!both.contains("@media"));

        let mobile = render(json!({ "scrollToTop": { "enabled": true, "displayType": "mobile" } })).unwrap();
        assert!(mobile.contains("@media (min-width: 577px) {\n  .ast-scroll-top {\n    display: none;"));
    }
}
