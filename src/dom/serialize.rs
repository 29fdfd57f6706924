//! HTML serialization of an [`ArenaDom`].

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the whole document.
pub fn serialize(dom: &ArenaDom) -> String {
    let mut out = String::new();
    write_children(dom, dom.document(), false, &mut out);
    out
}

/// Serialize the children of `node`, excluding the node itself.
pub fn serialize_children(dom: &ArenaDom, node: ArenaNodeId) -> String {
    let mut out = String::new();
    let raw = dom
        .element_name(node)
        .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&&**n));
    write_children(dom, node, raw, &mut out);
    out
}

fn write_children(dom: &ArenaDom, node: ArenaNodeId, raw: bool, out: &mut String) {
    for child in dom.children(node) {
        write_node(dom, child, raw, out);
    }
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, raw_parent: bool, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    match &node.data {
        ArenaNodeData::Document => write_children(dom, id, false, out),
        ArenaNodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        ArenaNodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        ArenaNodeData::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        ArenaNodeData::Element { name, attrs, .. } => {
            let tag: &str = &name.local;
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&attr.name.local);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            write_children(dom, id, RAW_TEXT_ELEMENTS.contains(&tag), out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Escape text or attribute content the way the HTML serializer does.
fn escape_into(text: &str, attr_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attr_mode => out.push_str("&quot;"),
            '<' if !attr_mode => out.push_str("&lt;"),
            '>' if !attr_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_html;
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let html = "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Email</title></head><body><p>Hi</p></body></html>";
        assert_eq!(serialize(&parse_html(html)), html);
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let dom = parse_html(r#"<p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp;&nbsp;3</p>"#);
        let out = serialize(&dom);
        assert!(out.contains(r#"title="a &quot;b&quot; &amp; c""#));
        assert!(out.contains("1 &lt; 2 &amp;&nbsp;3"));
    }

    #[test]
    fn test_style_text_is_raw() {
        let dom = parse_html("<style>td > p { color: #000; }</style>");
        let style = dom.find_by_tag("style").unwrap();
        assert_eq!(serialize_children(&dom, style), "td > p { color: #000; }");
    }

    #[test]
    fn test_void_and_comment() {
        let dom = parse_html("<body><img src=\"a.png\" alt=\"\"><!--[if mso]>x<![endif]--></body>");
        let body = dom.find_by_tag("body").unwrap();
        assert_eq!(
            serialize_children(&dom, body),
            "<img src=\"a.png\" alt=\"\"><!--[if mso]>x<![endif]-->"
        );
    }
}
