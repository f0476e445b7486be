//! Base selectors and breakpoint overrides.
//!
//! Desktop values go on the plain selectors. Each narrower breakpoint then
//! re-declares only the properties whose value differs from the next wider
//! one; a breakpoint with nothing to re-declare is skipped entirely.

use super::defaults as d;
use super::values::{max_width, px, responsive, scalar, text};
use super::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, SettingsTree};

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Typography of one selector, resolved per breakpoint.
struct Font {
    selector: &'static str,
    family: String,
    weight: CssValue,
    transform: String,
    size: [CssValue; 3],
    line_height: [CssValue; 3],
    letter_spacing: [CssValue; 3],
}

struct FontDefaults {
    family: &'static str,
    weight: f64,
    size: [f64; 3],
    line_height: [f64; 3],
}

impl Font {
    fn read(tree: &SettingsTree, selector: &'static str, path: &[&str], defaults: FontDefaults) -> Self {
        let at = |key: &'static str| {
            path.iter().copied().chain(std::iter::once(key)).collect::<Vec<_>>()
        };
        let per_device = |key, fallback| {
            Device::ALL.map(|device| responsive(tree, &at(key), fallback, device))
        };

        Self {
            selector,
            family: text(tree, &at("fontFamily"), defaults.family),
            weight: scalar(tree, &at("fontWeight"), CssValue::Number(defaults.weight)),
            transform: text(tree, &at("textTransform"), d::TEXT_TRANSFORM),
            size: per_device("fontSize", defaults.size),
            line_height: per_device("lineHeight", defaults.line_height),
            letter_spacing: per_device("letterSpacing", d::BODY_LETTER_SPACING),
        }
    }

    fn index(device: Device) -> usize {
        match device {
            Device::Desktop => 0,
            Device::Tablet => 1,
            Device::Mobile => 2,
        }
    }

    /// Responsive declarations for `device` that differ from `wider`.
    fn overrides(&self, device: Device, wider: Device) -> Rule {
        let (i, w) = (Self::index(device), Self::index(wider));
        let mut rule = Rule::new(self.selector);
        if self.size[i] != self.size[w] {
            rule.push("font-size", px(&self.size[i]));
        }
        if self.line_height[i] != self.line_height[w] {
            rule.push("line-height", &self.line_height[i]);
        }
        if self.letter_spacing[i] != self.letter_spacing[w] {
            rule.push("letter-spacing", px(&self.letter_spacing[i]));
        }
        rule
    }
}

/// Body font followed by `h1`-`h6`.
fn fonts(tree: &SettingsTree) -> (Font, Vec<Font>) {
    let body = Font::read(
        tree,
        "body",
        &["typography", "bodyFont"],
        FontDefaults {
            family: d::BODY_FONT_FAMILY,
            weight: d::BODY_FONT_WEIGHT,
            size: d::BODY_FONT_SIZE,
            line_height: d::BODY_LINE_HEIGHT,
        },
    );

    let headings = HEADINGS.iter().zip(d::HEADING_FONT_SIZE).map(|(&tag, size)| {
        Font::read(
            tree,
            tag,
            &["typography", "headings", tag],
            FontDefaults {
                family: d::HEADING_FONT_FAMILY,
                weight: d::HEADING_FONT_WEIGHT,
                size,
                line_height: d::HEADING_LINE_HEIGHT,
            },
        )
    });

    (body, headings.collect())
}

/// Emit `body`, `h1`-`h6`, `a`, `a:hover` and the tablet/mobile overrides.
pub fn emit(tree: &SettingsTree, sheet: &mut Stylesheet) {
    let (body, headings) = fonts(tree);

    sheet.rule(
        &Rule::new("body")
            .decl("font-family", &body.family)
            .decl("font-size", px(&body.size[0]))
            .decl("font-weight", &body.weight)
            .decl("line-height", &body.line_height[0])
            .decl("letter-spacing", px(&body.letter_spacing[0]))
            .decl("color", "var(--wp-text-primary)")
            .decl("background-color", "var(--wp-bg-body)"),
    );

    for heading in &headings {
        sheet.rule(
            &Rule::new(heading.selector)
                .decl("font-family", &heading.family)
                .decl("font-size", px(&heading.size[0]))
                .decl("font-weight", &heading.weight)
                .decl("line-height", &heading.line_height[0])
                .decl("letter-spacing", px(&heading.letter_spacing[0]))
                .decl("text-transform", &heading.transform),
        );
    }

    sheet.rule(
        &Rule::new("a")
            .decl("color", "var(--wp-link-color)")
            .decl("text-decoration", "none")
            .decl("transition", "color 0.2s"),
    );
    sheet.rule(&Rule::new("a:hover").decl("color", "var(--wp-link-color-hover)"));

    for device in [Device::Tablet, Device::Mobile] {
        let (Some(width), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        let mut media = Media::max_width(width);
        for font in std::iter::once(&body).chain(&headings) {
            media.push(font.overrides(device, wider));
        }
        sheet.media(&media);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(tree: &SettingsTree) -> String {
        let mut sheet = Stylesheet::new();
        emit(tree, &mut sheet);
        sheet.finish()
    }

    #[test]
    fn test_defaults_only_override_what_changes() {
        let css = render(&SettingsTree::empty());
        // Body size shrinks at both breakpoints, line-height never changes.
        assert!(css.contains("@media (max-width: 992px) {\n  body {\n    font-size: 15px;\n  }"));
        assert!(css.contains("@media (max-width: 576px) {\n  body {\n    font-size: 14px;\n  }"));
        assert!(!css.contains("    line-height"));
    }

    #[test]
    fn test_identical_breakpoints_omit_media_block() {
        let mut headings = serde_json::Map::new();
        for tag in HEADINGS {
            headings.insert(tag.into(), json!({ "fontSize": 20 }));
        }
        let tree = SettingsTree::new(json!({
            "typography": {
                "bodyFont": { "fontSize": 16 },
                "headings": headings,
            }
        }));
        assert!(!render(&tree).contains("@media"));
    }

    #[test]
    fn test_mobile_compares_against_tablet() {
        let tree = SettingsTree::new(json!({
            "typography": { "bodyFont": { "fontSize": { "desktop": 18, "tablet": 16, "mobile": 16 } } }
        }));
        let css = render(&tree);
        assert!(css.contains("    font-size: 16px;"));
        assert!(!css.contains("@media (max-width: 576px) {\n  body"));
    }

    #[test]
    fn test_heading_family_and_transform() {
        let tree = SettingsTree::new(json!({
            "typography": { "headings": { "h2": { "fontFamily": "Georgia", "textTransform": "uppercase" } } }
        }));
        let css = render(&tree);
        assert!(css.contains("h2 {\n  font-family: Georgia;"));
        assert!(css.contains("  text-transform: uppercase;"));
    }
}
