//! Recursive, best-effort rendering of a block tree.
//!
//! A problem with one node (unknown type, failing renderer, excessive depth)
//! drops that node and its subtree and is recorded as a [`RenderIssue`];
//! siblings and ancestors render normally.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::blocks::{BlockContext, BlockError, Markup, PropReader, RenderedChild};
use crate::model::{BlockNode, Document};
use crate::registry::{DEFAULT_WIDTH, Registry};
use crate::util::IdGenerator;

/// Deepest nesting rendered. Nodes below it are reported and skipped.
pub const MAX_DEPTH: usize = 64;

/// Something that went wrong for a single node.
///
/// `path` locates the node in the document, e.g. `content[2].content[0]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderIssue {
    #[error("{path}: unknown block type `{type_name}`")]
    UnknownType { path: String, type_name: String },

    #[error("{path}: `{prop}` of {type_name} was null, default used")]
    DefaultSubstituted {
        path: String,
        type_name: String,
        prop: String,
    },

    #[error("{path}: {type_name} failed to render: {error}")]
    BlockFailed {
        path: String,
        type_name: String,
        error: BlockError,
    },

    #[error("{path}: nested deeper than {limit} levels")]
    TooDeep { path: String, limit: usize },
}

impl RenderIssue {
    pub fn path(&self) -> &str {
        match self {
            RenderIssue::UnknownType { path, .. }
            | RenderIssue::DefaultSubstituted { path, .. }
            | RenderIssue::BlockFailed { path, .. }
            | RenderIssue::TooDeep { path, .. } => path,
        }
    }

    /// Whether the node was dropped rather than rendered with a fallback.
    pub fn dropped_node(&self) -> bool {
        !matches!(self, RenderIssue::DefaultSubstituted { .. })
    }
}

/// Rendered document body and what went wrong along the way.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Root table containing every rendered top-level block.
    pub markup: Markup,
    /// Root width the markup was rendered at.
    pub width: String,
    /// Number of blocks that produced markup.
    pub rendered: usize,
    pub diagnostics: Vec<RenderIssue>,
}

/// Walks a document's block tree against a [`Registry`].
pub struct TreeRenderer<'a> {
    registry: &'a Registry,
    max_depth: usize,
    default_width: &'a str,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            max_depth: MAX_DEPTH,
            default_width: DEFAULT_WIDTH,
        }
    }

    /// Width used when the document's root width is empty.
    pub fn with_default_width(mut self, width: &'a str) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render every top-level block and wrap the result in the root table.
    pub fn render_document(&self, document: &Document, ids: &mut IdGenerator) -> RenderOutput {
        let mut diagnostics = Vec::new();
        let mut rendered = 0;
        let children = self.render_children(
            &document.content,
            "content",
            1,
            ids,
            &mut diagnostics,
            &mut rendered,
        );

        let width = match document.width() {
            "" => self.default_width,
            w => w,
        };
        let markup = self.registry.root().render(width, &children);
        RenderOutput {
            markup,
            width: width.to_string(),
            rendered,
            diagnostics,
        }
    }

    fn render_children(
        &self,
        nodes: &[BlockNode],
        prefix: &str,
        depth: usize,
        ids: &mut IdGenerator,
        diagnostics: &mut Vec<RenderIssue>,
        rendered: &mut usize,
    ) -> Vec<RenderedChild> {
        let mut children = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            let path = format!("{prefix}[{i}]");
            match self.render_node(node, &path, depth, ids, diagnostics, rendered) {
                Ok(Some(child)) => {
                    *rendered += 1;
                    children.push(child);
                }
                Ok(None) => {}
                Err(issue) => {
                    warn!(path = %issue.path(), "{issue}");
                    diagnostics.push(issue);
                }
            }
        }
        children
    }

    fn render_node(
        &self,
        node: &BlockNode,
        path: &str,
        depth: usize,
        ids: &mut IdGenerator,
        diagnostics: &mut Vec<RenderIssue>,
        rendered: &mut usize,
    ) -> Result<Option<RenderedChild>, RenderIssue> {
        if depth > self.max_depth {
            return Err(RenderIssue::TooDeep {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }

        let Some(entry) = self.registry.get(&node.kind) else {
            return Err(RenderIssue::UnknownType {
                path: path.to_string(),
                type_name: node.kind.clone(),
            });
        };

        let mut props = entry.default_props.clone();
        props.extend(node.props.iter().map(|(k, v)| (k.clone(), v.clone())));
        let key = node_key(&node.props).unwrap_or_else(|| ids.next_id("comp"));
        props.insert("key".to_string(), Value::String(key.clone()));

        for (name, value) in props.iter_mut() {
            if !value.is_null() {
                continue;
            }
            *value = entry
                .default_props
                .get(name)
                .filter(|d| !d.is_null())
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            let issue = RenderIssue::DefaultSubstituted {
                path: path.to_string(),
                type_name: node.kind.clone(),
                prop: name.clone(),
            };
            warn!(path, prop = %name, "{issue}");
            diagnostics.push(issue);
        }

        let children = if node.content.is_empty() {
            Vec::new()
        } else {
            self.render_children(
                &node.content,
                &format!("{path}.content"),
                depth + 1,
                ids,
                diagnostics,
                rendered,
            )
        };

        let ctx = BlockContext {
            props: PropReader::new(&props),
            children: &children,
            zones: self.registry.zones(),
        };
        let markup = entry
            .kind
            .render(&ctx)
            .map_err(|error| RenderIssue::BlockFailed {
                path: path.to_string(),
                type_name: node.kind.clone(),
                error,
            })?;
        debug!(
            path,
            block = entry.kind.name(),
            children = children.len(),
            visible = markup.is_some(),
            "rendered block"
        );

        Ok(markup.map(|markup| RenderedChild {
            key,
            kind: entry.kind,
            zone: node.zone_id.clone(),
            markup,
        }))
    }
}

/// The node's own `id` prop, when it has a usable one.
fn node_key(props: &serde_json::Map<String, Value>) -> Option<String> {
    match props.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn setup() -> (Registry, IdGenerator) {
        let mut ids = IdGenerator::deterministic(3);
        (Registry::build(&mut ids), ids)
    }

    #[test]
    fn test_unknown_type_skips_subtree() {
        let (registry, mut ids) = setup();
        let doc = Document::new("")
            .with_block(BlockNode::new("Hero").with_prop("title", "First"))
            .with_block(
                BlockNode::new("Carousel")
                    .with_child(BlockNode::new("Hero").with_prop("title", "Hidden")),
            )
            .with_block(BlockNode::new("Footer").with_prop("content", "Last"));
        let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);

        let html = out.markup.as_str();
        assert!(html.contains("First"));
        assert!(html.contains("Last"));
        assert!(!html.contains("Hidden"));
        assert_eq!(out.rendered, 2);
        assert_eq!(
            out.diagnostics,
            vec![RenderIssue::UnknownType {
                path: "content[1]".into(),
                type_name: "Carousel".into(),
            }]
        );
    }

    #[test]
    fn test_null_props_use_defaults() {
        let (registry, mut ids) = setup();
        let doc = Document::new("").with_block(
            BlockNode::new("Hero")
                .with_prop("title", Value::Null)
                .with_prop("mystery", Value::Null),
        );
        let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);
        assert!(out.markup.as_str().contains(">Verify Your Account</h1>"));
        let props: Vec<_> = out
            .diagnostics
            .iter()
            .map(|issue| match issue {
                RenderIssue::DefaultSubstituted { prop, .. } => prop.as_str(),
                other => panic!("unexpected issue {other}"),
            })
            .collect();
        assert_eq!(props, ["mystery", "title"]);
        assert!(out.diagnostics.iter().all(|d| !d.dropped_node()));
    }

    #[test]
    fn test_failed_block_reported() {
        let (registry, mut ids) = setup();
        let doc = Document::new("")
            .with_block(BlockNode::new("Accordion").with_prop("items", "oops"))
            .with_block(BlockNode::new("Spacer"));
        let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);
        assert_eq!(out.rendered, 1);
        assert!(matches!(
            &out.diagnostics[0],
            RenderIssue::BlockFailed { error: BlockError::NotAList("items"), .. }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let (registry, mut ids) = setup();
        let mut node = BlockNode::new("Spacer");
        for _ in 0..4 {
            node = BlockNode::new("Row").with_child(node);
        }
        let doc = Document::new("").with_block(node);
        let out = TreeRenderer::new(&registry)
            .with_max_depth(3)
            .render_document(&doc, &mut ids);
        assert_eq!(out.rendered, 3);
        assert_eq!(
            out.diagnostics,
            vec![RenderIssue::TooDeep {
                path: "content[0].content[0].content[0].content[0]".into(),
                limit: 3,
            }]
        );
    }

    #[test]
    fn test_invisible_child_dropped_without_issue() {
        let (registry, mut ids) = setup();
        let doc = Document::new("").with_block(
            BlockNode::new("Row")
                .with_child(BlockNode::new("Image").with_prop("isVisible", false))
                .with_child(BlockNode::new("Spacer")),
        );
        let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);
        assert!(out.diagnostics.is_empty());
        assert!(!out.markup.as_str().contains("<img"));
        assert_eq!(out.rendered, 2);
    }

    #[test]
    fn test_keys_prefer_node_id() {
        assert_eq!(
            node_key(json!({"id": "hero-1"}).as_object().unwrap()),
            Some("hero-1".into())
        );
        assert_eq!(node_key(json!({"id": 7}).as_object().unwrap()), Some("7".into()));
        assert_eq!(node_key(json!({"id": ""}).as_object().unwrap()), None);
    }

    #[test]
    fn test_generated_keys_do_not_reach_output() {
        let (registry, _) = setup();
        let doc = Document::new("").with_block(BlockNode::new("Hero"));
        let a = TreeRenderer::new(&registry).render_document(&doc, &mut IdGenerator::new());
        let b = TreeRenderer::new(&registry).render_document(&doc, &mut IdGenerator::new());
        assert_eq!(a.markup, b.markup);
        assert!(!a.markup.as_str().contains("comp-"));
    }

    #[test]
    fn test_width_defaults() {
        let (registry, mut ids) = setup();
        let doc = Document::new("").with_width("");
        let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);
        assert_eq!(out.width, "600px");
    }
}
