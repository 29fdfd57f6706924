//! Small HTML builder used by the block renderers.
//!
//! Attribute values and text go through [`escape_html`]; only [`Markup`]
//! values and [`Element::raw`] are inserted as-is.

use std::fmt::{self, Write as _};

use crate::util::escape_html;

/// An HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap already-safe HTML.
    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inline `style` declarations in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Style {
    declarations: Vec<(&'static str, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &'static str, value: impl fmt::Display) -> Self {
        self.declarations.push((property, value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_char(';')?;
            }
            write!(f, "{property}:{value}")?;
        }
        Ok(())
    }
}

/// An element being built.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: String,
    body: String,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: String::new(),
            body: String::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        let _ = write!(self.attrs, " {}=\"{}\"", name, escape_html(&value));
        self
    }

    pub fn style(self, style: Style) -> Self {
        if style.is_empty() {
            return self;
        }
        self.attr("style", style)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.body.push_str(&escape_html(text));
        self
    }

    /// Append trusted HTML.
    pub fn raw(mut self, html: &str) -> Self {
        self.body.push_str(html);
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.body.push_str(child.as_str());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Markup>,
    {
        for child in children {
            self.body.push_str(child.as_str());
        }
        self
    }

    pub fn build(self) -> Markup {
        let mut out =
            String::with_capacity(self.tag.len() * 2 + self.attrs.len() + self.body.len() + 5);
        out.push('<');
        out.push_str(self.tag);
        out.push_str(&self.attrs);
        out.push('>');
        if !matches!(self.tag, "img" | "br" | "hr" | "meta") {
            out.push_str(&self.body);
            out.push_str("</");
            out.push_str(self.tag);
            out.push('>');
        }
        Markup(out)
    }
}

/// `<table role="presentation">`, the base of every block.
pub fn table() -> Element {
    Element::new("table").attr("role", "presentation")
}

/// Full-width presentation table.
pub fn full_width_table() -> Element {
    table().attr("width", "100%")
}

/// Close `table` around `rows` inside a `<tbody>`.
pub fn with_rows<I>(table: Element, rows: I) -> Markup
where
    I: IntoIterator<Item = Markup>,
{
    table
        .child(Element::new("tbody").children(rows).build())
        .build()
}

/// A table holding exactly one row with one cell.
pub fn single_cell(table: Element, cell: Element) -> Markup {
    with_rows(table, [Element::new("tr").child(cell.build()).build()])
}
