//! Button variants.
//!
//! `primary` is complete on its own; `secondary`, `outline` and `text` are
//! partial overrides layered on top of it.

use serde::Deserialize;

use super::section;
use crate::compiler::values::{at, max_width, ms, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

#[derive(Debug, Deserialize)]
struct Buttons {
    primary: ButtonStyle,
    #[serde(default)]
    secondary: Option<ButtonStyle>,
    #[serde(default)]
    outline: Option<ButtonStyle>,
    #[serde(default)]
    text: Option<ButtonStyle>,
    #[serde(default)]
    global: Option<Global>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ButtonStyle {
    background_color: Option<String>,
    text_color: Option<String>,
    border_width: Option<CssValue>,
    border_color: Option<String>,
    border_style: Option<String>,
    border_radius: Option<CssValue>,
    padding_vertical: Option<CssValue>,
    padding_horizontal: Option<CssValue>,
    hover_background_color: Option<String>,
    hover_text_color: Option<String>,
    hover_border_color: Option<String>,
    hover_transform: Option<String>,
    transition_duration: Option<CssValue>,
    font_family: Option<String>,
    font_size: Option<Responsive<CssValue>>,
    font_weight: Option<CssValue>,
    text_transform: Option<String>,
    letter_spacing: Option<CssValue>,
    box_shadow: Option<String>,
    hover_box_shadow: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Global {
    min_height: Option<CssValue>,
    min_width: Option<CssValue>,
    display_type: Option<String>,
    icon_spacing: Option<CssValue>,
}

const FONT_SIZE: [f64; 3] = [16.0, 15.0, 14.0];

macro_rules! layer {
    ($over:expr, $base:expr; $($field:ident),* $(,)?) => {
        ButtonStyle {
            $($field: $over.$field.clone().or_else(|| $base.$field.clone()),)*
        }
    };
}

impl ButtonStyle {
    /// `self` with every unset field taken from `base`.
    fn over(&self, base: &ButtonStyle) -> ButtonStyle {
        layer!(self, base;
            background_color, text_color, border_width, border_color, border_style,
            border_radius, padding_vertical, padding_horizontal, hover_background_color,
            hover_text_color, hover_border_color, hover_transform, transition_duration,
            font_family, font_size, font_weight, text_transform, letter_spacing,
            box_shadow, hover_box_shadow,
        )
    }

    fn font_size(&self, device: Device) -> CssValue {
        at(self.font_size.as_ref(), FONT_SIZE, device)
    }
}

fn shadow(preset: Option<&str>) -> Option<&'static str> {
    match preset? {
        "small" => Some("0 1px 3px rgba(0, 0, 0, 0.12)"),
        "medium" => Some("0 4px 6px rgba(0, 0, 0, 0.15)"),
        "large" => Some("0 10px 20px rgba(0, 0, 0, 0.2)"),
        _ => None,
    }
}

fn transform(effect: Option<&str>) -> Option<&'static str> {
    match effect? {
        "scale" => Some("scale(1.05)"),
        "translateY" => Some("translateY(-2px)"),
        _ => None,
    }
}

fn num(value: &Option<CssValue>, default: f64) -> CssValue {
    value.clone().unwrap_or(CssValue::Number(default))
}

/// Rules for one variant; `background` and `text` are already resolved.
fn variant(selectors: &[String], style: &ButtonStyle, background: &str, text: &str, sheet: &mut Stylesheet) {
    let selector = selectors.join(", ");
    let hover = selectors
        .iter()
        .map(|s| format!("{s}:hover"))
        .collect::<Vec<_>>()
        .join(", ");
    let border_color = style.border_color.as_deref().unwrap_or(background);
    let border = format!(
        "{} {} {}",
        px(&num(&style.border_width, 0.0)),
        style.border_style.as_deref().unwrap_or("solid"),
        border_color,
    );
    let padding = format!(
        "{} {}",
        px(&num(&style.padding_vertical, 12.0)),
        px(&num(&style.padding_horizontal, 24.0)),
    );

    sheet.rule(
        &Rule::new(&selector)
            .decl("background-color", background)
            .decl("color", text)
            .decl("border", border)
            .decl("border-radius", px(&num(&style.border_radius, 4.0)))
            .decl("padding", padding)
            .decl_opt("font-family", style.font_family.as_deref())
            .decl("font-size", px(&style.font_size(Device::Desktop)))
            .decl("font-weight", num(&style.font_weight, 500.0))
            .decl("text-transform", style.text_transform.as_deref().unwrap_or("none"))
            .decl("letter-spacing", px(&num(&style.letter_spacing, 0.0)))
            .decl("transition", format!("all {} ease", ms(&num(&style.transition_duration, 300.0))))
            .decl_opt("box-shadow", shadow(style.box_shadow.as_deref())),
    );

    sheet.rule(
        &Rule::new(hover)
            .decl("background-color", style.hover_background_color.as_deref().unwrap_or(background))
            .decl("color", style.hover_text_color.as_deref().unwrap_or(text))
            .decl("border-color", style.hover_border_color.as_deref().unwrap_or(border_color))
            .decl_opt("transform", transform(style.hover_transform.as_deref()))
            .decl_opt("box-shadow", shadow(style.hover_box_shadow.as_deref())),
    );

    for device in [Device::Tablet, Device::Mobile] {
        let (Some(query), Some(wider)) = (max_width(device), device.wider()) else {
            continue;
        };
        let size = style.font_size(device);
        if size != style.font_size(wider) {
            sheet.media(&Media::max_width(query).rule(Rule::new(&selector).decl("font-size", px(&size))));
        }
    }
}

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let buttons: Buttons = section(tree, "buttons")?;
    let primary = &buttons.primary;
    let background = primary.background_color.as_deref()?;
    let text = primary.text_color.as_deref()?;

    let mut sheet = Stylesheet::new();
    let selectors = [".ast-button".to_string(), ".wp-block-button__link".to_string()];
    variant(&selectors, primary, background, text, &mut sheet);

    let overrides = [
        ("secondary", &buttons.secondary),
        ("outline", &buttons.outline),
        ("text", &buttons.text),
    ];
    for (name, style) in overrides {
        let Some(style) = style else { continue };
        let merged = style.over(primary);
        let background = merged.background_color.as_deref().unwrap_or(background);
        let text = merged.text_color.as_deref().unwrap_or(text);
        variant(&[format!(".ast-button-{name}")], &merged, background, text, &mut sheet);
    }

    if let Some(global) = &buttons.global {
        sheet.rule(
            &Rule::new(".ast-button, .ast-button-secondary, .ast-button-outline, .ast-button-text")
                .decl_opt("display", global.display_type.as_deref())
                .decl_opt("min-height", global.min_height.as_ref().map(px))
                .decl_opt("min-width", global.min_width.as_ref().map(px))
                .decl_opt("gap", global.icon_spacing.as_ref().map(px)),
        );
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
    fn test_primary_colors_required() {
        assert!(render(json!({ "buttons": { "primary": { "backgroundColor": "#000" } } })).is_none());
        assert!(render(json!({ "buttons": { "secondary": {} } })).is_none());
    }

    #[test]
    fn test_primary_defaults() {
        let css = render(json!({
            "buttons": { "primary": { "backgroundColor": "#0073e6", "textColor": "#fff" } }
        }))
        .unwrap();
        assert!(css.contains("  border: 0px solid #0073e6;"));
        assert!(css.contains("  padding: 12px 24px;"));
        assert!(css.contains("  transition: all 300ms ease;"));
        assert!(css.contains(".ast-button:hover, .wp-block-button__link:hover {\n  background-color: #0073e6;"));
        assert!(css.contains("@media (max-width: 992px)"));
    }

    #[test]
    fn test_variants_layer_over_primary() {
        let css = render(json!({
            "buttons": {
                "primary": { "backgroundColor": "#111", "textColor": "#fff", "borderRadius": 6, "fontSize": 15 },
                "outline": { "backgroundColor": "transparent", "borderWidth": 2, "hoverTransform": "scale" }
            }
        }))
        .unwrap();
        assert!(css.contains(".ast-button-outline {\n  background-color: transparent;\n  color: #fff;\n  border: 2px solid transparent;\n  border-radius: 6px;"));
        assert!(css.contains("  transform: scale(1.05);"));
        assert!(!css.contains(".ast-button-secondary {"));
        assert!(!css.contains("@media"));
    }
}
