//! Stylesheet builder.
//!
//! Rules and media blocks are collected as values and rendered line by
//! line. Empty rules and empty media blocks render to nothing.

use std::fmt;

const INDENT: &str = "  ";

// ============================================================================
// Rule
// ============================================================================

/// A selector with its declarations, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    selector: String,
    decls: Vec<(String, String)>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            decls: Vec::new(),
        }
    }

    pub fn decl(mut self, property: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(property, value);
        self
    }

    /// Declare only when `value` is present.
    pub fn decl_opt<V: fmt::Display>(self, property: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.decl(property, value),
            None => self,
        }
    }

    pub fn push(&mut self, property: impl Into<String>, value: impl fmt::Display) {
        self.decls.push((property.into(), value.to_string()));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn render(&self, depth: usize, out: &mut Vec<String>) {
        if self.is_empty() {
            return;
        }
        let pad = INDENT.repeat(depth);
        out.push(format!("{pad}{} {{", self.selector));
        for (property, value) in &self.decls {
            out.push(format!("{pad}{INDENT}{property}: {value};"));
        }
        out.push(format!("{pad}}}"));
    }
}

// ============================================================================
// Media
// ============================================================================

/// An `@media` block holding rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    query: String,
    rules: Vec<Rule>,
}

impl Media {
    pub fn max_width(px: u32) -> Self {
        Self::with_query(format!("(max-width: {px}px)"))
    }

    pub fn min_width(px: u32) -> Self {
        Self::with_query(format!("(min-width: {px}px)"))
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        if !rule.is_empty() {
            self.rules.push(rule);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn render(&self, out: &mut Vec<String>) {
        if self.is_empty() {
            return;
        }
        out.push(format!("@media {} {{", self.query));
        for rule in &self.rules {
            rule.render(1, out);
        }
        out.push("}".to_string());
    }
}

// ============================================================================
// Stylesheet
// ============================================================================

/// Accumulated stylesheet lines, joined with `\n` on [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct Stylesheet {
    lines: Vec<String>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(&mut self, rule: &Rule) {
        rule.render(0, &mut self.lines);
    }

    pub fn media(&mut self, media: &Media) {
        media.render(&mut self.lines);
    }

    /// Verbatim text, e.g. user-authored CSS.
    pub fn raw(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Move every line of `other` to the end of this sheet.
    pub fn append(&mut self, other: Stylesheet) {
        self.lines.extend(other.lines);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_rendering() {
        let mut sheet = Stylesheet::new();
        sheet.rule(&Rule::new("body").decl("color", "red").decl("margin", 0));
        assert_eq!(sheet.finish(), "body {\n  color: red;\n  margin: 0;\n}");
    }

    #[test]
    fn test_media_indents_rules() {
        let mut sheet = Stylesheet::new();
        sheet.media(&Media::max_width(576).rule(Rule::new("h1").decl("font-size", "28px")));
        assert_eq!(
            sheet.finish(),
            "@media (max-width: 576px) {\n  h1 {\n    font-size: 28px;\n  }\n}"
        );
    }

    #[test]
    fn test_empty_blocks_render_nothing() {
        let mut sheet = Stylesheet::new();
        sheet.rule(&Rule::new("body"));
        sheet.media(&Media::max_width(992).rule(Rule::new("h2")));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_decl_opt() {
        let rule = Rule::new("a").decl_opt("color", None::<&str>).decl_opt("top", Some(0));
        assert_eq!(rule.decls.len(), 1);
    }
}
