//! Typed, validating access to a block's merged props.
//!
//! Every accessor returns a usable value: anything missing or malformed is
//! replaced by the caller's fallback.

use serde_json::{Map, Value};

use super::BlockError;
use crate::validate::{coerce_string, is_valid_css_width, is_valid_hex_color, is_valid_url};

/// Read-only view over a props object.
#[derive(Debug, Clone, Copy)]
pub struct PropReader<'a> {
    props: Option<&'a Map<String, Value>>,
}

impl<'a> PropReader<'a> {
    pub fn new(props: &'a Map<String, Value>) -> Self {
        Self { props: Some(props) }
    }

    /// A reader over any JSON value; non-objects read as empty.
    pub fn from_value(value: &'a Value) -> Self {
        Self {
            props: value.as_object(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.props.and_then(|p| p.get(key))
    }

    /// String prop, or `""`.
    pub fn string(&self, key: &str) -> &'a str {
        coerce_string(self.get(key), "")
    }

    pub fn string_or(&self, key: &str, fallback: &'a str) -> &'a str {
        coerce_string(self.get(key), fallback)
    }

    /// `#rrggbb` color, or `fallback`.
    pub fn color(&self, key: &str, fallback: &'a str) -> &'a str {
        self.optional_color(key).unwrap_or(fallback)
    }

    pub fn optional_color(&self, key: &str) -> Option<&'a str> {
        Some(self.string(key)).filter(|c| is_valid_hex_color(c))
    }

    /// Absolute URL, or `"#"`.
    pub fn url(&self, key: &str) -> &'a str {
        self.optional_url(key).unwrap_or("#")
    }

    /// Absolute URL; empty and invalid values are `None`.
    pub fn optional_url(&self, key: &str) -> Option<&'a str> {
        Some(self.string(key)).filter(|u| is_valid_url(u))
    }

    /// `<n>px` or `<n>%`, or `fallback`.
    pub fn css_width(&self, key: &str, fallback: &'a str) -> &'a str {
        Some(self.string(key))
            .filter(|w| is_valid_css_width(w))
            .unwrap_or(fallback)
    }

    /// Number clamped to `min..=max`.
    ///
    /// Numeric strings are accepted; anything else uses `default` before
    /// clamping.
    pub fn number(&self, key: &str, default: f64, min: f64, max: f64) -> f64 {
        let value = match self.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value
            .filter(|n| n.is_finite())
            .unwrap_or(default)
            .clamp(min, max)
    }

    /// One of `allowed`, or `default`.
    pub fn choice(
        &self,
        key: &str,
        allowed: &[&'static str],
        default: &'static str,
    ) -> &'static str {
        let value = self.string(key);
        allowed
            .iter()
            .find(|candidate| **candidate == value)
            .copied()
            .unwrap_or(default)
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    /// Array prop as one reader per item.
    pub fn list(&self, key: &'static str) -> Result<Vec<PropReader<'a>>, BlockError> {
        match self.get(key) {
            Some(Value::Array(items)) => Ok(items.iter().map(PropReader::from_value).collect()),
            _ => Err(BlockError::NotAList(key)),
        }
    }
}
