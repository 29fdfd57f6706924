//! Arena DOM used by the sanitizer and the CSS inliner.
//!
//! ```
//! use blockmail::dom::{parse_html, serialize};
//!
//! let dom = parse_html("<p class='lead'>Hello</p>");
//! let p = dom.find_by_tag("p").unwrap();
//! assert_eq!(dom.element_classes(p), ["lead"]);
//! assert!(serialize(&dom).contains("<p class=\"lead\">Hello</p>"));
//! ```

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use serialize::{serialize, serialize_children};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse HTML into an arena DOM.
///
/// Fragments are parsed as documents; their nodes end up under `<body>`.
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
