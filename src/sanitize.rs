//! Allow-list HTML sanitizer for user-authored rich text and preheaders.
//!
//! Input is parsed with html5ever so that malformed markup is recovered the
//! way a browser would before anything is filtered. Only the `<body>` subtree
//! is kept: whatever the parser hoists into `<head>` (stray `<style>`,
//! `<title>`, early `<script>`) never reaches the output.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::css::parse_style_attribute;
use crate::dom::{ArenaDom, ArenaNodeData, ArenaNodeId, parse_html};
use crate::util::escape_html;

/// Elements dropped together with everything inside them.
const NON_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

/// URL schemes an `href` may use. Relative links are always allowed.
const HREF_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("valid regex"));

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})|rgba?\(\s*(\d{1,3}\s*,\s*){2}\d{1,3}\s*(,\s*(0|1|0?\.\d+))?\s*\))$",
    )
    .expect("valid regex")
});

static TEXT_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^underline$").expect("valid regex"));

static TEXT_ALIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(left|center|right|justify)$").expect("valid regex"));

static FONT_FAMILY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Arial|Helvetica|Times New Roman|Georgia|Verdana), ?(sans-serif|serif)$")
        .expect("valid regex")
});

static FONT_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}px$").expect("valid regex"));

/// Which markup survives sanitizing.
#[derive(Debug, Clone, Copy)]
pub struct SanitizePolicy {
    /// Allowed elements.
    tags: &'static [&'static str],
    /// Allowed attributes per element.
    attributes: &'static [(&'static str, &'static [&'static str])],
}

impl SanitizePolicy {
    /// Inline formatting produced by the rich-text editor.
    pub fn rich_text() -> Self {
        Self {
            tags: &["p", "strong", "em", "u", "a", "span"],
            attributes: &[
                ("a", &["href", "style"]),
                ("span", &["style"]),
                ("p", &["style"]),
            ],
        }
    }

    /// No markup at all; text is kept and escaped.
    pub fn text_only() -> Self {
        Self {
            tags: &[],
            attributes: &[],
        }
    }

    /// Sanitize `html` and return the cleaned markup.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockmail::sanitize::SanitizePolicy;
    ///
    /// let clean = SanitizePolicy::rich_text()
    ///     .sanitize(r#"<p onclick="x()">Hi <script>alert(1)</script><b>there</b></p>"#);
    /// assert_eq!(clean, "<p>Hi there</p>");
    /// ```
    pub fn sanitize(&self, html: &str) -> String {
        let dom = parse_html(html);
        let mut out = String::with_capacity(html.len());
        if let Some(body) = dom.find_by_tag("body") {
            for child in dom.children(body) {
                self.write_node(&dom, child, &mut out);
            }
        }
        out
    }

    fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    fn allows_attr(&self, tag: &str, attr: &str) -> bool {
        self.attributes
            .iter()
            .any(|(t, attrs)| *t == tag && attrs.contains(&attr))
    }

    fn write_node(&self, dom: &ArenaDom, id: ArenaNodeId, out: &mut String) {
        let Some(node) = dom.get(id) else {
            return;
        };
        match &node.data {
            ArenaNodeData::Text(text) => out.push_str(&escape_html(text)),
            ArenaNodeData::Element { name, .. } => {
                let tag: &str = &name.local;
                if NON_TEXT_TAGS.contains(&tag) {
                    return;
                }
                if !self.allows_tag(tag) {
                    for child in dom.children(id) {
                        self.write_node(dom, child, out);
                    }
                    return;
                }

                out.push('<');
                out.push_str(tag);
                for attr in dom.attrs(id) {
                    let attr_name: &str = &attr.name.local;
                    if attr.name.prefix.is_some() || !self.allows_attr(tag, attr_name) {
                        continue;
                    }
                    let value = match attr_name {
                        "href" => allowed_href(&attr.value).then(|| attr.value.trim().to_string()),
                        "style" => filter_style(&attr.value),
                        _ => Some(attr.value.clone()),
                    };
                    if let Some(value) = value {
                        out.push(' ');
                        out.push_str(attr_name);
                        out.push_str("=\"");
                        out.push_str(&escape_html(&value));
                        out.push('"');
                    }
                }
                out.push('>');
                for child in dom.children(id) {
                    self.write_node(dom, child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            ArenaNodeData::Document
            | ArenaNodeData::Comment(_)
            | ArenaNodeData::Doctype { .. } => {}
        }
    }
}

/// Sanitize editor rich text.
pub fn sanitize_rich_text(html: &str) -> String {
    SanitizePolicy::rich_text().sanitize(html)
}

/// Strip all markup, keeping escaped text.
pub fn sanitize_text(html: &str) -> String {
    SanitizePolicy::text_only().sanitize(html)
}

/// Check an `href` against the scheme allow-list.
fn allowed_href(value: &str) -> bool {
    // Browsers ignore whitespace and control characters inside the scheme.
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match SCHEME.captures(&compact) {
        Some(caps) => {
            let scheme = caps[1].to_ascii_lowercase();
            HREF_SCHEMES.contains(&scheme.as_str())
        }
        None => true,
    }
}

/// Keep only allowed properties with allowed values.
fn filter_style(value: &str) -> Option<String> {
    let kept: String = parse_style_attribute(value)
        .into_iter()
        .filter(|d| !d.important && style_value_allowed(&d.property, &d.value))
        .map(|d| format!("{}:{};", d.property, d.value))
        .collect();
    (!kept.is_empty()).then_some(kept)
}

fn style_value_allowed(property: &str, value: &str) -> bool {
    let pattern = match property {
        "color" => &COLOR,
        "text-decoration" => &TEXT_DECORATION,
        "text-align" => &TEXT_ALIGN,
        "font-family" => &FONT_FAMILY,
        "font-size" => &FONT_SIZE,
        _ => return false,
    };
    pattern.is_match(value)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_script_and_handlers_stripped() {
        let clean = sanitize_rich_text(
            r#"<p>Hello</p><img src="x" onerror="alert(1)"><script>alert(2)</script><p onmouseover="x">World</p>"#,
        );
        assert_eq!(clean, "<p>Hello</p><p>World</p>");
    }

    #[test]
    fn test_disallowed_tags_keep_text() {
        let clean = sanitize_rich_text("<div><h1>Big</h1> <b>bold</b> <strong>ok</strong></div>");
        assert_eq!(clean, "Big bold <strong>ok</strong>");
    }

    #[test]
    fn test_non_text_tags_drop_content() {
        let clean = sanitize_rich_text(
            "<p>a<textarea>b</textarea><noscript>c</noscript><select><option>d</option></select>e</p>",
        );
        assert_eq!(clean, "<p>ae</p>");
    }

    #[test]
    fn test_href_schemes() {
        assert_eq!(
            sanitize_rich_text(r#"<a href="https://example.com">x</a>"#),
            r#"<a href="https://example.com">x</a>"#
        );
        assert_eq!(
            sanitize_rich_text(r#"<a href="mailto:hi@example.com">x</a>"#),
            r#"<a href="mailto:hi@example.com">x</a>"#
        );
        assert_eq!(
            sanitize_rich_text(r#"<a href="/unsubscribe">x</a>"#),
            r#"<a href="/unsubscribe">x</a>"#
        );
        assert_eq!(
            sanitize_rich_text(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            sanitize_rich_text("<a href=\"java\tscript:alert(1)\">x</a>"),
            "<a>x</a>"
        );
    }

    #[test]
    fn test_style_values_filtered() {
        let clean = sanitize_rich_text(
            r#"<span style="color: #ff0000; background: url(x); font-size: 14px; font-family: Arial, sans-serif">x</span>"#,
        );
        assert_eq!(
            clean,
            r#"<span style="color:#ff0000;font-size:14px;font-family:Arial, sans-serif;">x</span>"#
        );

        let clean = sanitize_rich_text(r#"<p style="text-align: middle; font-size: 100px">x</p>"#);
        assert_eq!(clean, "<p>x</p>");
    }

    #[test]
    fn test_style_rgb_colors_kept() {
        let clean = sanitize_rich_text(r#"<span style="color: rgba(255, 0, 0, 0.5)">x</span>"#);
        assert_eq!(clean, r#"<span style="color:rgba(255, 0, 0, 0.5);">x</span>"#);

        let clean = sanitize_rich_text(r#"<span style="color: rgb(0,128,0)">x</span>"#);
        assert_eq!(clean, r#"<span style="color:rgb(0,128,0);">x</span>"#);
    }

    #[test]
    fn test_style_not_allowed_on_strong() {
        let clean = sanitize_rich_text(r#"<strong style="color:#000">x</strong>"#);
        assert_eq!(clean, "<strong>x</strong>");
    }

    #[test]
    fn test_text_is_reescaped() {
        let clean = sanitize_rich_text("<p>1 &lt; 2 &amp;&amp; <em>\"quoted\"</em></p>");
        assert_eq!(clean, "<p>1 &lt; 2 &amp;&amp; <em>&quot;quoted&quot;</em></p>");
    }

    #[test]
    fn test_text_only_policy() {
        assert_eq!(sanitize_text("Your code"), "Your code");
        assert_eq!(
            sanitize_text("<b>Sale</b> <script>x</script>ends <i>soon</i>"),
            "Sale ends soon"
        );
        assert_eq!(sanitize_text(""), "");
    }

    fn markup() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            "[a-z ]{0,6}",
            "<(p|a|span|img|script|div|em|svg|iframe)( (on[a-z]{1,6}|href|style|src)=\"[a-z:()#0-9 ]{0,12}\"){0,2}>",
            "</(p|a|span|script|div|em|svg)>",
            Just("&lt;".to_string()),
            Just("<!--x-->".to_string()),
        ];
        prop::collection::vec(piece, 0..12).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn prop_output_only_contains_allowed_markup(input in markup()) {
            let clean = sanitize_rich_text(&input);
            let dom = parse_html(&clean);
            let body = dom.find_by_tag("body").expect("body");
            let policy = SanitizePolicy::rich_text();
            for id in dom.descendants(body).into_iter().skip(1) {
                if let Some(name) = dom.element_name(id) {
                    let tag: &str = name;
                    prop_assert!(policy.allows_tag(tag), "tag {} survived", tag);
                    for attr in dom.attrs(id) {
                        let attr_name: &str = &attr.name.local;
                        prop_assert!(!attr_name.starts_with("on"));
                        prop_assert!(policy.allows_attr(tag, attr_name));
                    }
                }
            }
        }

        #[test]
        fn prop_text_only_has_no_tags(input in markup()) {
            prop_assert!(!sanitize_text(&input).contains('<'));
        }
    }
}
