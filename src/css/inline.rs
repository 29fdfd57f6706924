//! Copy stylesheet rules into `style` attributes.

use tracing::debug;

use super::element::{ElementRef, matches};
use super::stylesheet::{
    Declaration, InlineError, ResidualKind, Specificity, StyleRule, Stylesheet,
    parse_style_attribute,
};
use crate::dom::{ArenaDom, ArenaNodeId, parse_html, serialize};

/// Inliner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOptions {
    /// Keep `!important` on inlined declarations.
    pub preserve_important: bool,
    /// Keep `@media` rules in the residual `<style>`.
    pub preserve_media_queries: bool,
    /// Keep `@font-face` rules in the residual `<style>`.
    pub preserve_font_faces: bool,
    /// Fail on malformed CSS instead of skipping it.
    pub strict: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            preserve_important: true,
            preserve_media_queries: true,
            preserve_font_faces: true,
            strict: true,
        }
    }
}

impl InlineOptions {
    fn keeps(&self, kind: ResidualKind) -> bool {
        match kind {
            ResidualKind::MediaQuery => self.preserve_media_queries,
            ResidualKind::FontFace => self.preserve_font_faces,
            ResidualKind::Dynamic | ResidualKind::OtherAtRule => true,
        }
    }

    /// Residual CSS for one stylesheet, or an empty string.
    fn residual_css(&self, sheet: &Stylesheet) -> String {
        sheet
            .residual
            .iter()
            .filter(|rule| self.keeps(rule.kind))
            .map(|rule| rule.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Inline every `<style>` element of `html` into the body's elements.
///
/// `<style data-embed>` elements are left alone. The remaining ones keep
/// only the rules that cannot be inlined and are removed when nothing is
/// left.
///
/// # Examples
///
/// ```
/// use blockmail::css::{InlineOptions, inline_css};
///
/// let html = "<html><head><style>p { margin: 0; }</style></head>\
///             <body><p style=\"color:#333333\">Hi</p></body></html>";
/// let out = inline_css(html, &InlineOptions::default()).unwrap();
/// assert!(out.contains(r#"<p style="margin: 0; color: #333333;">Hi</p>"#));
/// assert!(!out.contains("<style>"));
/// ```
pub fn inline_css(html: &str, options: &InlineOptions) -> Result<String, InlineError> {
    let mut dom = parse_html(html);

    let mut sheets = Vec::new();
    for style in dom.find_all_by_tag("style") {
        if dom.get_attr(style, "data-embed").is_some() {
            continue;
        }
        let css = dom.collect_text(style);
        let sheet = if options.strict {
            Stylesheet::parse_strict(&css)?
        } else {
            Stylesheet::parse(&css)
        };
        sheets.push((style, sheet));
    }

    let rules: Vec<&StyleRule> = sheets.iter().flat_map(|(_, s)| &s.rules).collect();
    let targets = dom
        .find_by_tag("body")
        .map(|body| dom.descendants(body))
        .unwrap_or_default();

    let mut updates = Vec::new();
    for id in targets {
        let skip = dom
            .element_name(id)
            .is_none_or(|name| matches!(&**name, "style" | "script"));
        if skip {
            continue;
        }
        if let Some(style) = cascade_for(&dom, id, &rules, options) {
            updates.push((id, style));
        }
    }
    debug!(
        rules = rules.len(),
        elements = updates.len(),
        "inlined stylesheet rules"
    );

    for (id, style) in updates {
        dom.set_attr(id, "style", &style);
    }

    for (style, sheet) in &sheets {
        let residual = options.residual_css(sheet);
        if residual.is_empty() {
            dom.detach(*style);
        } else {
            dom.set_text(*style, &residual);
        }
    }

    Ok(serialize(&dom))
}

struct Matched<'a> {
    declaration: &'a Declaration,
    specificity: Specificity,
    order: usize,
}

/// Ordered property list; re-setting a property keeps its first position.
#[derive(Default)]
struct Cascade {
    entries: Vec<Declaration>,
}

impl Cascade {
    fn set(&mut self, declaration: &Declaration) {
        match self
            .entries
            .iter_mut()
            .find(|d| d.property == declaration.property)
        {
            Some(existing) => *existing = declaration.clone(),
            None => self.entries.push(declaration.clone()),
        }
    }

    /// Inline declarations lose only to important sheet declarations.
    fn set_inline(&mut self, declaration: &Declaration) {
        let blocked = self
            .entries
            .iter()
            .any(|d| d.property == declaration.property && d.important && !declaration.important);
        if !blocked {
            self.set(declaration);
        }
    }

    fn to_style(&self, preserve_important: bool) -> String {
        self.entries
            .iter()
            .map(|d| {
                if d.important && preserve_important {
                    format!("{}: {} !important;", d.property, d.value)
                } else {
                    format!("{}: {};", d.property, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Compute the new `style` attribute for one element, if any rule matches.
fn cascade_for(
    dom: &ArenaDom,
    id: ArenaNodeId,
    rules: &[&StyleRule],
    options: &InlineOptions,
) -> Option<String> {
    let element = ElementRef::new(dom, id);
    let mut matched = Vec::new();
    for (order, rule) in rules.iter().enumerate() {
        let best = rule
            .selectors
            .iter()
            .filter(|selector| matches(selector, &element))
            .map(Specificity::from_selector)
            .max();
        if let Some(specificity) = best {
            matched.extend(rule.declarations.iter().map(|declaration| Matched {
                declaration,
                specificity,
                order,
            }));
        }
    }
    if matched.is_empty() {
        return None;
    }

    // Stable sort keeps declaration order within a rule.
    matched.sort_by(|a, b| {
        a.declaration
            .important
            .cmp(&b.declaration.important)
            .then(a.specificity.cmp(&b.specificity))
            .then(a.order.cmp(&b.order))
    });

    let mut cascade = Cascade::default();
    for m in &matched {
        cascade.set(m.declaration);
    }
    if let Some(existing) = dom.get_attr(id, "style") {
        for declaration in parse_style_attribute(existing) {
            cascade.set_inline(&declaration);
        }
    }
    Some(cascade.to_style(options.preserve_important))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(css: &str, body: &str) -> String {
        format!("<!DOCTYPE html><html><head><style>{css}</style></head><body>{body}</body></html>")
    }

    fn inline(css: &str, body: &str) -> String {
        inline_css(&doc(css, body), &InlineOptions::default()).unwrap()
    }

    #[test]
    fn test_specificity_beats_order() {
        let out = inline(
            ".stack-column { width: 50%; } td { width: 10%; padding: 0; }",
            r#"<table><tr><td class="stack-column">x</td></tr></table>"#,
        );
        assert!(out.contains(r#"<td class="stack-column" style="width: 50%; padding: 0;">"#));
    }

    #[test]
    fn test_inline_style_wins_unless_important() {
        let out = inline(
            "p { margin: 0; color: red !important; }",
            r#"<p style="margin:8px 0 0;color:#ffffff">Hi</p>"#,
        );
        assert!(out.contains(r#"style="margin: 8px 0 0; color: red !important;""#));
    }

    #[test]
    fn test_important_can_be_dropped() {
        let options = InlineOptions {
            preserve_important: false,
            ..InlineOptions::default()
        };
        let out = inline_css(&doc("p { color: red !important; }", "<p>x</p>"), &options).unwrap();
        assert!(out.contains(r#"<p style="color: red;">"#));
    }

    #[test]
    fn test_residual_style_kept() {
        let out = inline(
            ".container { width: 600px; } @media only screen and (max-width:600px) { .container { width: 100% !important; } }",
            r#"<table class="container"></table>"#,
        );
        assert!(out.contains(r#"class="container" style="width: 600px;""#));
        assert!(out.contains("<style>@media only screen and (max-width:600px)"));
        assert!(out.contains(".container { width: 100% !important; }"));
    }

    #[test]
    fn test_media_queries_can_be_dropped() {
        let options = InlineOptions {
            preserve_media_queries: false,
            ..InlineOptions::default()
        };
        let html = doc("@media print { p { color: #000; } }", "<p>x</p>");
        let out = inline_css(&html, &options).unwrap();
        assert!(!out.contains("@media"));
        assert!(!out.contains("<style>"));
    }

    #[test]
    fn test_embedded_styles_untouched() {
        let html = "<html><head><style data-embed>p { color: red; }</style></head><body><p>x</p></body></html>";
        let out = inline_css(html, &InlineOptions::default()).unwrap();
        assert!(out.contains("<style data-embed=\"\">p { color: red; }</style>"));
        assert!(out.contains("<p>x</p>"));
    }

    #[test]
    fn test_strict_mode_fails_on_bad_css() {
        let html = doc("p { color red }", "<p>x</p>");
        let err = inline_css(&html, &InlineOptions::default()).unwrap_err();
        assert_eq!(err.line, 1);

        let lenient = InlineOptions {
            strict: false,
            ..InlineOptions::default()
        };
        assert!(inline_css(&html, &lenient).is_ok());
    }

    #[test]
    fn test_head_elements_not_styled() {
        let out = inline("* { margin: 0; }", "<p>x</p>");
        assert!(out.contains(r#"<body style="margin: 0;">"#));
        assert!(!out.contains("<head style"));
    }
}
