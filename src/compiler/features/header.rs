//! Header bar, sticky behavior, site title and logo.

use serde::Deserialize;

use super::section;
use crate::compiler::values::{ColorState, max_width, ms, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree, resolve};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    primary: Primary,
    #[serde(default)]
    sticky: bool,
    #[serde(default)]
    sticky_settings: Option<Sticky>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Primary {
    background: String,
    height: Responsive<CssValue>,
    #[serde(default)]
    menu_alignment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sticky {
    enabled: bool,
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    animation_duration: Option<CssValue>,
    #[serde(default)]
    z_index: Option<CssValue>,
    #[serde(default)]
    box_shadow: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SiteIdentity {
    site_title: Option<SiteTitle>,
    logo: Option<Logo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteTitle {
    show: bool,
    #[serde(default)]
    color: Option<ColorState>,
    #[serde(default)]
    typography: Option<TitleTypography>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TitleTypography {
    font_family: Option<String>,
    font_size: Option<Responsive<CssValue>>,
    font_weight: Option<CssValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Logo {
    #[serde(default)]
    desktop: Option<String>,
    #[serde(default)]
    width: Option<Responsive<CssValue>>,
}

const DEFAULT_HEIGHT: f64 = 80.0;
const DEFAULT_TITLE_COLOR: &str = "var(--wp-text-primary)";
const DEFAULT_LOGO_WIDTH: f64 = 150.0;

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let header: Header = section(tree, "header")?;
    // Site identity is decoration; a malformed one does not cancel the header.
    let identity: SiteIdentity = section(tree, "siteIdentity").unwrap_or_default();

    let height = |device| resolve(Some(&header.primary.height), device, CssValue::Number(DEFAULT_HEIGHT));

    let mut sheet = Stylesheet::new();
    let mut bar = Rule::new(".ast-header")
        .decl("background", &header.primary.background)
        .decl("height", px(&height(Device::Desktop)));
    if header.sticky {
        bar.push("position", "sticky");
        bar.push("top", 0);
        bar.push("z-index", 999);
    }
    sheet.rule(&bar);

    if let Some(sticky) = header.sticky_settings.as_ref().filter(|s| s.enabled) {
        let mut rule = Rule::new(".ast-header.is-sticky")
            .decl_opt("background", sticky.background_color.as_deref())
            .decl_opt("z-index", sticky.z_index.as_ref())
            .decl_opt(
                "transition",
                sticky.animation_duration.as_ref().map(|d| format!("all {} ease", ms(d))),
            );
        if sticky.box_shadow {
            rule.push("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.1)");
        }
        sheet.rule(&rule);
    }

    if let Some(title) = identity.site_title.as_ref().filter(|t| t.show) {
        let typography = title.typography.as_ref();
        let color = title.color.as_ref();
        sheet.rule(
            &Rule::new(".site-title")
                .decl("color", color.map_or(DEFAULT_TITLE_COLOR, |c| c.normal_or(DEFAULT_TITLE_COLOR)))
                .decl_opt("font-family", typography.and_then(|t| t.font_family.as_deref()))
                .decl_opt(
                    "font-size",
                    typography
                        .and_then(|t| t.font_size.as_ref())
                        .and_then(|size| size.resolve(Device::Desktop))
                        .map(px),
                )
                .decl_opt("font-weight", typography.and_then(|t| t.font_weight.as_ref())),
        );
        sheet.rule(
            &Rule::new(".site-title:hover")
                .decl("color", color.map_or(DEFAULT_TITLE_COLOR, |c| c.hover_or(DEFAULT_TITLE_COLOR))),
        );
    }

    let logo = identity.logo.as_ref().filter(|l| l.desktop.is_some());
    if let Some(logo) = logo {
        let width = resolve(logo.width.as_ref(), Device::Desktop, CssValue::Number(DEFAULT_LOGO_WIDTH));
        sheet.rule(&Rule::new(".site-logo img").decl("max-width", px(&width)));
    }

    sheet.rule(
        &Rule::new(".ast-primary-menu")
            .decl("text-align", header.primary.menu_alignment.as_deref().unwrap_or("left")),
    );

    for device in [Device::Tablet, Device::Mobile] {
        let (Some(query), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        let mut media = Media::max_width(query);
        if height(device) != height(wider) {
            media.push(Rule::new(".ast-header").decl("height", px(&height(device))));
        }
        if let Some(logo) = logo {
            let width = |d| resolve(logo.width.as_ref(), d, CssValue::Number(DEFAULT_LOGO_WIDTH));
            if width(device) != width(wider) {
                media.push(Rule::new(".site-logo img").decl("max-width", px(&width(device))));
            }
        }
        sheet.media(&media);
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
    fn test_requires_background_and_height() {
        assert!(render(json!({})).is_none());
        assert!(render(json!({ "header": { "primary": { "background": "#fff" } } })).is_none());
    }

    #[test]
    fn test_sticky_and_responsive_height() {
        let css = render(json!({
            "header": {
                "sticky": true,
                "primary": { "background": "#fff", "height": { "desktop": 80, "tablet": 70, "mobile": 70 } },
                "stickySettings": { "enabled": true, "animationDuration": 250 }
            }
        }))
        .unwrap();
        assert!(css.contains(".ast-header {\n  background: #fff;\n  height: 80px;\n  position: sticky;"));
        assert!(css.contains("transition: all 250ms ease;"));
        assert!(css.contains("@media (max-width: 992px) {\n  .ast-header {\n    height: 70px;"));
        assert!(!css.contains("@media (max-width: 576px)"));
    }

    #[test]
    fn test_site_title_and_logo() {
        let css = render(json!({
            "header": { "primary": { "background": "#000", "height": 60 } },
            "siteIdentity": {
                "siteTitle": { "show": true, "color": { "normal": "#111", "hover": "#222" } },
                "logo": { "desktop": "/logo.png", "width": 120 }
            }
        }))
        .unwrap();
        assert!(css.contains(".site-title {\n  color: #111;"));
        assert!(css.contains(".site-title:hover {\n  color: #222;"));
        assert!(css.contains(".site-logo img {\n  max-width: 120px;"));
    }
}
