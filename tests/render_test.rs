//! Tree rendering tests.
//!
//! Exercise the registry and tree renderer together on realistic block trees:
//! fallbacks for bad props, node-local failures and zone routing.

use blockmail::render::MAX_DEPTH;
use blockmail::{BlockNode, Document, IdGenerator, Registry, RenderIssue, TreeRenderer};
use serde_json::{Value, json};

fn render(doc: &Document) -> blockmail::RenderOutput {
    let mut ids = IdGenerator::deterministic(42);
    let registry = Registry::build(&mut ids);
    TreeRenderer::new(&registry).render_document(doc, &mut ids)
}

fn render_json(value: Value) -> blockmail::RenderOutput {
    render(&serde_json::from_value(value).unwrap())
}

// ============================================================================
// Graceful Degradation
// ============================================================================

#[test]
fn test_unknown_type_keeps_siblings() {
    let out = render_json(json!({
        "content": [
            {"type": "Header", "props": {"text": "Before"}},
            {"type": "Marquee", "props": {}, "content": [
                {"type": "Footer", "props": {"content": "Nested"}}
            ]},
            {"type": "Footer", "props": {"content": "After"}}
        ]
    }));

    let html = out.markup.as_str();
    let before = html.find("Before").unwrap();
    let after = html.find("After").unwrap();
    assert!(before < after);
    assert!(!html.contains("Nested"));
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].path(), "content[1]");
}

#[test]
fn test_invalid_colors_never_reach_output() {
    for bad in ["notacolor", "#12", "#1234567", "red", "#ggg000"] {
        let out = render(
            &Document::new("")
                .with_block(BlockNode::new("Hero").with_prop("backgroundColor", bad))
                .with_block(BlockNode::new("Button").with_prop("color", bad))
                .with_block(BlockNode::new("Divider").with_prop("color", bad)),
        );
        let html = out.markup.as_str();
        assert!(!html.contains(bad), "{bad} leaked into output");
        assert!(html.contains("background-color:#007bff"));
        assert!(out.diagnostics.is_empty());
    }
}

#[test]
fn test_numbers_clamp_to_bounds() {
    let out = render(
        &Document::new("")
            .with_block(BlockNode::new("Row").with_prop("padding", 999))
            .with_block(BlockNode::new("Spacer").with_prop("height", -5))
            .with_block(BlockNode::new("Header").with_prop("fontSize", "72")),
    );
    let html = out.markup.as_str();
    assert!(html.contains("padding:50px"));
    assert!(!html.contains("999"));
    assert!(html.contains("height:10px"));
    assert!(html.contains("font-size:48px"));
}

#[test]
fn test_null_prop_gets_default_and_issue() {
    let out = render_json(json!({
        "content": [{"type": "OTPBlock", "props": {"otpCode": null}}]
    }));
    assert!(out.markup.as_str().contains(">123456</div>"));
    assert_eq!(
        out.diagnostics,
        vec![RenderIssue::DefaultSubstituted {
            path: "content[0]".into(),
            type_name: "OTPBlock".into(),
            prop: "otpCode".into(),
        }]
    );
}

#[test]
fn test_failed_block_does_not_affect_parent() {
    let out = render_json(json!({
        "content": [{"type": "Row", "props": {}, "content": [
            {"type": "SocialMedia", "props": {"platforms": {"not": "a list"}}},
            {"type": "OTPBlock", "props": {"otpCode": "777"}}
        ]}]
    }));
    assert!(out.markup.as_str().contains("777"));
    assert!(matches!(
        &out.diagnostics[..],
        [RenderIssue::BlockFailed { path, .. }] if path == "content[0].content[0]"
    ));
}

#[test]
fn test_pathological_depth_is_cut() {
    let mut node = BlockNode::new("OTPBlock").with_prop("otpCode", "deep");
    for _ in 0..MAX_DEPTH + 5 {
        node = BlockNode::new("Column").with_child(node);
    }
    let out = render(&Document::new("").with_block(node));
    assert!(!out.markup.as_str().contains("deep"));
    assert_eq!(out.rendered, MAX_DEPTH);
    assert!(matches!(&out.diagnostics[..], [RenderIssue::TooDeep { .. }]));
}

// ============================================================================
// Visibility and Layout
// ============================================================================

#[test]
fn test_hidden_blocks_contribute_nothing() {
    let visible = render(&Document::new("").with_block(BlockNode::new("Spacer")));
    let hidden = render(
        &Document::new("")
            .with_block(BlockNode::new("Spacer"))
            .with_block(BlockNode::new("Hero").with_prop("isVisible", false))
            .with_block(
                BlockNode::new("Row")
                    .with_prop("isVisible", false)
                    .with_child(BlockNode::new("Hero")),
            ),
    );
    assert_eq!(visible.markup, hidden.markup);
}

#[test]
fn test_two_column_routes_children_by_zone() {
    let mut ids = IdGenerator::deterministic(1);
    let registry = Registry::build(&mut ids);
    let zones = registry.zones().clone();

    let doc = Document::new("").with_block(
        BlockNode::new("TwoColumn")
            .with_child(
                BlockNode::new("Footer")
                    .with_prop("content", "Right side")
                    .in_zone(&zones.c),
            )
            .with_child(
                BlockNode::new("Footer")
                    .with_prop("content", "Left side")
                    .in_zone(&zones.b),
            ),
    );
    let out = TreeRenderer::new(&registry).render_document(&doc, &mut ids);
    let html = out.markup.as_str();

    let left = html.find(&format!("data-zone=\"{}\"", zones.b)).unwrap();
    let right = html.find(&format!("data-zone=\"{}\"", zones.c)).unwrap();
    assert!(left < html.find("Left side").unwrap());
    assert!(html.find("Left side").unwrap() < right);
    assert!(right < html.find("Right side").unwrap());
}

#[test]
fn test_root_width_from_document() {
    let out = render_json(json!({"root": {"props": {"width": "480px"}}, "content": []}));
    assert!(out.markup.as_str().contains("width=\"480px\""));
    assert_eq!(out.width, "480px");
}

#[test]
fn test_rich_text_is_sanitized() {
    let out = render(&Document::new("").with_block(BlockNode::new("TextBlock").with_prop(
        "content",
        "<p>Hello <img src=x onerror=\"alert(1)\"><script>alert(1)</script><strong>there</strong></p>",
    )));
    let html = out.markup.as_str();
    assert!(html.contains("<strong>there</strong>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("onerror"));
    assert!(!html.contains("alert(1)"));
}
