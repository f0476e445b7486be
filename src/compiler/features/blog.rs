//! Blog archive cards.
//!
//! Card colors and sizes become `--blog-*` custom properties; the card
//! selectors then refer to those variables. Breakpoints here follow the
//! archive grid (1024px / 768px), not the typography overrides.

use serde::Deserialize;

use super::section;
use crate::compiler::values::{at, px};
use crate::compiler::writer::{Media, Rule, Stylesheet};
use crate::settings::{CssValue, Device, Responsive, SettingsTree};

const ARCHIVE_TABLET_MAX_WIDTH: u32 = 1024;
const ARCHIVE_MOBILE_MAX_WIDTH: u32 = 768;

#[derive(Debug, Deserialize)]
struct Blog {
    archive: Archive,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Archive {
    layout: String,
    styling: Styling,
    #[serde(default)]
    card_style: Option<String>,
    #[serde(default)]
    card_spacing: Option<CssValue>,
    #[serde(default)]
    featured_image: Option<FeaturedImage>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Styling {
    background_color: Option<String>,
    border_color: Option<String>,
    border_radius: Option<CssValue>,
    card_padding: Option<CssValue>,
    title_color: Option<String>,
    title_hover_color: Option<String>,
    excerpt_color: Option<String>,
    typography: Option<Typography>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Typography {
    title_size: Option<Responsive<CssValue>>,
    title_weight: Option<CssValue>,
    excerpt_size: Option<Responsive<CssValue>>,
    meta_size: Option<Responsive<CssValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeaturedImage {
    enabled: bool,
    #[serde(default)]
    hover_effect: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Meta {
    colors: Option<MetaColors>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaColors {
    text: Option<String>,
    links: Option<String>,
    icons: Option<String>,
}

const TITLE_SIZE: [f64; 3] = [20.0, 18.0, 16.0];
const EXCERPT_SIZE: [f64; 3] = [14.0, 13.0, 12.0];
const META_SIZE: [f64; 3] = [12.0, 11.0, 10.0];

fn or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

fn number_or(value: &Option<CssValue>, default: f64) -> CssValue {
    value.clone().unwrap_or(CssValue::Number(default))
}

fn variables(archive: &Archive) -> Rule {
    let styling = &archive.styling;
    let typography = styling.typography.as_ref();
    let colors = archive.meta.as_ref().and_then(|m| m.colors.as_ref());

    let mut rule = Rule::new(":root")
        .decl("--blog-card-spacing", px(&number_or(&archive.card_spacing, 20.0)))
        .decl("--blog-card-bg", or(&styling.background_color, "#ffffff"))
        .decl("--blog-card-border", or(&styling.border_color, "#e1e5e9"))
        .decl("--blog-card-border-radius", px(&number_or(&styling.border_radius, 8.0)))
        .decl("--blog-card-padding", px(&number_or(&styling.card_padding, 20.0)))
        .decl("--blog-title-color", or(&styling.title_color, "#333333"))
        .decl("--blog-title-hover-color", or(&styling.title_hover_color, "#0073e6"))
        .decl("--blog-excerpt-color", or(&styling.excerpt_color, "#6c757d"))
        .decl(
            "--blog-meta-text-color",
            colors.and_then(|c| c.text.as_deref()).unwrap_or("#6c757d"),
        )
        .decl(
            "--blog-meta-link-color",
            colors.and_then(|c| c.links.as_deref()).unwrap_or("#0073e6"),
        )
        .decl(
            "--blog-meta-icon-color",
            colors.and_then(|c| c.icons.as_deref()).unwrap_or("#6c757d"),
        );

    let sizes = |name: &str, value: Option<&Responsive<CssValue>>, fallback, rule: &mut Rule| {
        for device in Device::ALL {
            rule.push(format!("--blog-{name}-size-{device}"), px(&at(value, fallback, device)));
        }
    };
    sizes("title", typography.and_then(|t| t.title_size.as_ref()), TITLE_SIZE, &mut rule);
    rule.push(
        "--blog-title-weight",
        typography
            .and_then(|t| t.title_weight.clone())
            .unwrap_or(CssValue::Number(600.0)),
    );
    sizes("excerpt", typography.and_then(|t| t.excerpt_size.as_ref()), EXCERPT_SIZE, &mut rule);
    sizes("meta", typography.and_then(|t| t.meta_size.as_ref()), META_SIZE, &mut rule);
    rule
}

fn layout(kind: &str) -> Option<Rule> {
    let rule = match kind {
        "grid" => Rule::new(".blog-archive-grid .posts-container")
            .decl("display", "grid")
            .decl("grid-template-columns", "repeat(auto-fit, minmax(300px, 1fr))")
            .decl("gap", "var(--blog-card-spacing)"),
        "list" => Rule::new(".blog-archive-list .posts-container")
            .decl("display", "flex")
            .decl("flex-direction", "column")
            .decl("gap", "var(--blog-card-spacing)"),
        "masonry" => Rule::new(".blog-archive-masonry .posts-container")
            .decl("column-count", "auto")
            .decl("column-width", "300px")
            .decl("column-gap", "var(--blog-card-spacing)")
            .decl("column-fill", "balance"),
        _ => return None,
    };
    Some(rule)
}

fn text_sizes(device: Device) -> [Rule; 3] {
    [
        Rule::new(".post-title a").decl("font-size", format!("var(--blog-title-size-{device})")),
        Rule::new(".post-excerpt").decl("font-size", format!("var(--blog-excerpt-size-{device})")),
        Rule::new(".post-meta").decl("font-size", format!("var(--blog-meta-size-{device})")),
    ]
}

pub fn emit(tree: &SettingsTree) -> Option<Stylesheet> {
    let blog: Blog = section(tree, "blog")?;
    let archive = &blog.archive;

    let mut sheet = Stylesheet::new();
    sheet.rule(&variables(archive));
    sheet.rule(&Rule::new(".blog-archive").decl("width", "100%"));
    if let Some(rule) = layout(&archive.layout) {
        sheet.rule(&rule);
    }

    sheet.rule(
        &Rule::new(".post-card")
            .decl("background", "var(--blog-card-bg)")
            .decl("border-radius", "var(--blog-card-border-radius)")
            .decl("padding", "var(--blog-card-padding)")
            .decl("transition", "all 0.3s ease")
            .decl("height", "fit-content"),
    );

    match archive.card_style.as_deref() {
        Some("boxed") => {
            sheet.rule(&Rule::new(".card-style-boxed").decl("border", "1px solid var(--blog-card-border)"));
        }
        Some("shadow") => {
            sheet.rule(&Rule::new(".card-style-shadow").decl("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.1)"));
            sheet.rule(
                &Rule::new(".card-style-shadow:hover")
                    .decl("box-shadow", "0 4px 16px rgba(0, 0, 0, 0.15)")
                    .decl("transform", "translateY(-2px)"),
            );
        }
        _ => {}
    }

    sheet.rule(
        &Rule::new(".post-title a")
            .decl("color", "var(--blog-title-color)")
            .decl("font-size", "var(--blog-title-size-desktop)")
            .decl("font-weight", "var(--blog-title-weight)")
            .decl("text-decoration", "none")
            .decl("transition", "color 0.3s ease"),
    );
    sheet.rule(&Rule::new(".post-title a:hover").decl("color", "var(--blog-title-hover-color)"));
    sheet.rule(
        &Rule::new(".post-excerpt")
            .decl("color", "var(--blog-excerpt-color)")
            .decl("font-size", "var(--blog-excerpt-size-desktop)")
            .decl("line-height", 1.6),
    );
    sheet.rule(
        &Rule::new(".post-meta")
            .decl("font-size", "var(--blog-meta-size-desktop)")
            .decl("color", "var(--blog-meta-text-color)"),
    );
    sheet.rule(
        &Rule::new(".meta-link")
            .decl("color", "var(--blog-meta-link-color)")
            .decl("text-decoration", "none")
            .decl("transition", "opacity 0.3s ease"),
    );
    sheet.rule(&Rule::new(".meta-link:hover").decl("opacity", 0.8));
    sheet.rule(&Rule::new(".meta-icon").decl("color", "var(--blog-meta-icon-color)"));

    if let Some(image) = archive.featured_image.as_ref().filter(|i| i.enabled) {
        sheet.rule(
            &Rule::new(".featured-image")
                .decl("width", "100%")
                .decl("height", "100%")
                .decl("object-fit", "cover")
                .decl("transition", "transform 0.3s ease"),
        );
        let hover = Rule::new(".post-card:hover .featured-image");
        match image.hover_effect.as_deref() {
            Some("zoom") => sheet.rule(&hover.decl("transform", "scale(1.05)")),
            Some("fade") => sheet.rule(&hover.decl("opacity", 0.8)),
            _ => {}
        }
    }

    let mut tablet = Media::max_width(ARCHIVE_TABLET_MAX_WIDTH);
    for rule in text_sizes(Device::Tablet) {
        tablet.push(rule);
    }
    sheet.media(
        &tablet
            .rule(
                Rule::new(".blog-archive-grid .posts-container")
                    .decl("grid-template-columns", "repeat(auto-fit, minmax(250px, 1fr))"),
            )
            .rule(
                Rule::new(".blog-archive-masonry .posts-container")
                    .decl("column-count", 2)
                    .decl("column-width", "auto"),
            ),
    );

    let mut mobile = Media::max_width(ARCHIVE_MOBILE_MAX_WIDTH);
    for rule in text_sizes(Device::Mobile) {
        mobile.push(rule);
    }
    sheet.media(
        &mobile
            .rule(Rule::new(".blog-archive-grid .posts-container").decl("grid-template-columns", "1fr"))
            .rule(Rule::new(".blog-archive-masonry .posts-container").decl("column-count", 1))
            .rule(Rule::new(".post-card-list").decl("flex-direction", "column")),
    );

    Some(sheet)
}
