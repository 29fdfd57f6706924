//! The document an editor produces: a preheader, a root width and a tree of
//! blocks.
//!
//! Deserialization is lenient. Wrong JSON types never fail the parse: a
//! non-string preheader reads as `""`, non-object props read as `{}`, and
//! child entries that are not objects are skipped.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::registry::DEFAULT_WIDTH;

/// One block in the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    /// Registry type name, e.g. `"Hero"`.
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub props: Map<String, Value>,
    #[serde(default, deserialize_with = "nodes_or_empty", skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<BlockNode>,
    /// Zone of the enclosing column layout this block was dropped into.
    #[serde(default, deserialize_with = "optional_string", skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl BlockNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: BlockNode) -> Self {
        self.content.push(child);
        self
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone_id = Some(zone.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootProps {
    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub width: String,
}

impl Default for RootProps {
    fn default() -> Self {
        Self {
            width: default_width(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default, deserialize_with = "root_props_or_default")]
    pub props: RootProps,
}

/// A whole email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub preheader: String,
    #[serde(default, deserialize_with = "root_or_default")]
    pub root: Root,
    #[serde(default, deserialize_with = "nodes_or_empty")]
    pub content: Vec<BlockNode>,
}

impl Document {
    pub fn new(preheader: impl Into<String>) -> Self {
        Self {
            preheader: preheader.into(),
            ..Self::default()
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.root.props.width = width.into();
        self
    }

    pub fn with_block(mut self, block: BlockNode) -> Self {
        self.content.push(block);
        self
    }

    /// Root width, e.g. `"600px"`.
    pub fn width(&self) -> &str {
        &self.root.props.width
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> crate::Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn default_width() -> String {
    DEFAULT_WIDTH.to_string()
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn width_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => default_width(),
    })
}

fn object_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn nodes_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<BlockNode>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn root_props_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<RootProps, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn root_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Root, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_editor_json() {
        let doc: Document = serde_json::from_value(json!({
            "preheader": "Your code",
            "root": {"props": {"width": "640px"}},
            "content": [
                {"type": "Hero", "props": {"id": "hero-1", "title": "Hi"}},
                {"type": "Row", "props": {}, "content": [
                    {"type": "Column", "props": {}, "zoneId": "zone-x"}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(doc.preheader, "Your code");
        assert_eq!(doc.width(), "640px");
        assert_eq!(doc.content.len(), 2);
        assert_eq!(doc.content[0].props["title"], json!("Hi"));
        assert_eq!(doc.content[1].content[0].zone_id.as_deref(), Some("zone-x"));
    }

    #[test]
    fn test_lenient_fields() {
        let doc: Document = serde_json::from_value(json!({
            "preheader": 42,
            "root": {"props": {"width": 600}},
            "content": [
                {"type": "Hero", "props": null, "content": null},
                "not a node",
                {"type": 7, "props": [1, 2]}
            ]
        }))
        .unwrap();
        assert_eq!(doc.preheader, "");
        assert_eq!(doc.width(), "600px");
        assert_eq!(doc.content.len(), 2);
        assert!(doc.content[0].props.is_empty());
        assert!(doc.content[0].content.is_empty());
        assert_eq!(doc.content[1].kind, "");
    }

    #[test]
    fn test_missing_everything() {
        let doc = Document::from_json("{}").unwrap();
        assert_eq!(doc, Document::default());
        assert_eq!(doc.width(), "600px");

        let doc = Document::from_json(r#"{"root": null, "content": {}}"#).unwrap();
        assert_eq!(doc.width(), "600px");
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Document::from_json("{"),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_builders() {
        let doc = Document::new("Hello")
            .with_width("500px")
            .with_block(BlockNode::new("Spacer").with_prop("height", 40))
            .with_block(
                BlockNode::new("TwoColumn").with_child(BlockNode::new("Hero").in_zone("z")),
            );
        assert_eq!(doc.width(), "500px");
        assert_eq!(doc.content[0].props["height"], json!(40));
        assert_eq!(doc.content[1].content[0].zone_id.as_deref(), Some("z"));
    }
}
