//! Component registry: block type names, editor field schemas and defaults.
//!
//! The registry is built once per [`IdGenerator`] and is immutable
//! afterwards. Building it mints the three zone identifiers the column
//! layouts default to.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::blocks::{self, BlockKind, Markup, RenderedChild};
use crate::util::IdGenerator;
use crate::validate::{is_valid_css_width, is_valid_hex_color, is_valid_url, scrub_class_name};

/// Width used when a document does not set one.
pub const DEFAULT_WIDTH: &str = "600px";

/// Zone identifiers generated when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zones {
    pub a: String,
    pub b: String,
    pub c: String,
}

/// Editor widget for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    RichText,
    Number,
    Select,
    Radio,
    Array,
}

/// Check an editor applies to a text field before accepting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValidator {
    HexColor,
    OptionalHexColor,
    Url,
    OptionalUrl,
    CssWidth,
    ClassName,
}

impl FieldValidator {
    /// Message the editor shows when the check fails.
    pub fn message(self) -> &'static str {
        match self {
            FieldValidator::HexColor | FieldValidator::OptionalHexColor => "Invalid HEX color",
            FieldValidator::Url | FieldValidator::OptionalUrl => "Invalid URL",
            FieldValidator::CssWidth => "Invalid width (e.g., 600px or 100%)",
            FieldValidator::ClassName => "Invalid class name",
        }
    }

    fn rule(self) -> &'static str {
        match self {
            FieldValidator::HexColor => "hexColor",
            FieldValidator::OptionalHexColor => "optionalHexColor",
            FieldValidator::Url => "url",
            FieldValidator::OptionalUrl => "optionalUrl",
            FieldValidator::CssWidth => "cssWidth",
            FieldValidator::ClassName => "className",
        }
    }

    pub fn check(self, value: &str) -> Result<(), &'static str> {
        let ok = match self {
            FieldValidator::HexColor => is_valid_hex_color(value),
            FieldValidator::OptionalHexColor => value.is_empty() || is_valid_hex_color(value),
            FieldValidator::Url => is_valid_url(value),
            FieldValidator::OptionalUrl => value.is_empty() || is_valid_url(value),
            FieldValidator::CssWidth => is_valid_css_width(value),
            FieldValidator::ClassName => value.is_empty() || scrub_class_name(value) == value,
        };
        if ok { Ok(()) } else { Err(self.message()) }
    }
}

impl Serialize for FieldValidator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FieldValidator", 2)?;
        s.serialize_field("rule", self.rule())?;
        s.serialize_field("message", self.message())?;
        s.end()
    }
}

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: Value,
    pub label: &'static str,
}

/// Declarative description of one editable prop.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    pub array_fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<FieldValidator>,
}

impl FieldSpec {
    fn new(kind: FieldKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            placeholder: None,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            array_fields: Fields::default(),
            validate: None,
        }
    }

    fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    fn validate(mut self, validator: FieldValidator) -> Self {
        self.validate = Some(validator);
        self
    }

    fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

/// Named fields in editor order.
#[derive(Debug, Clone, Default)]
pub struct Fields(Vec<(&'static str, FieldSpec)>);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldSpec)> {
        self.0.iter().map(|(n, f)| (*n, f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&'static str, FieldSpec); N]> for Fields {
    fn from(fields: [(&'static str, FieldSpec); N]) -> Self {
        Self(fields.into())
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, field) in &self.0 {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// A registered block type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub fields: Fields,
    pub default_props: Map<String, Value>,
}

/// The document root: one width field and the outer table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootEntry {
    pub fields: Fields,
    pub default_width: &'static str,
}

impl RootEntry {
    pub fn render(&self, width: &str, children: &[RenderedChild]) -> Markup {
        blocks::root(width, children)
    }
}

/// All block types known to the renderer.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    zones: Zones,
    root: RootEntry,
}

impl Registry {
    /// Build the registry, minting zone IDs from `ids`.
    pub fn build(ids: &mut IdGenerator) -> Self {
        let zones = Zones {
            a: ids.next_id("zone"),
            b: ids.next_id("zone"),
            c: ids.next_id("zone"),
        };
        let entries = BlockKind::ALL
            .into_iter()
            .map(|kind| entry_for(kind, &zones))
            .collect();
        let root = RootEntry {
            fields: Fields::from([(
                "width",
                text("Container Width (px)").placeholder("600"),
            )]),
            default_width: DEFAULT_WIDTH,
        };
        Self {
            entries,
            zones,
            root,
        }
    }

    /// Look up a block type by name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        let kind = BlockKind::from_name(name)?;
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    pub fn root(&self) -> &RootEntry {
        &self.root
    }
}

fn text(label: &'static str) -> FieldSpec {
    FieldSpec::new(FieldKind::Text, label)
}

fn color(label: &'static str, placeholder: &'static str) -> FieldSpec {
    text(label)
        .placeholder(placeholder)
        .validate(FieldValidator::HexColor)
}

fn url(label: &'static str) -> FieldSpec {
    text(label).validate(FieldValidator::Url)
}

fn number(label: &'static str, min: f64, max: f64) -> FieldSpec {
    let mut field = FieldSpec::new(FieldKind::Number, label);
    field.min = Some(min);
    field.max = Some(max);
    field
}

fn select(label: &'static str, options: &[(&'static str, &'static str)]) -> FieldSpec {
    let mut field = FieldSpec::new(FieldKind::Select, label);
    field.options = options
        .iter()
        .map(|&(value, label)| FieldOption {
            value: Value::from(value),
            label,
        })
        .collect();
    field
}

fn radio(label: &'static str, yes: &'static str, no: &'static str) -> FieldSpec {
    let mut field = FieldSpec::new(FieldKind::Radio, label);
    field.options = vec![
        FieldOption {
            value: Value::Bool(true),
            label: yes,
        },
        FieldOption {
            value: Value::Bool(false),
            label: no,
        },
    ];
    field
}

fn array(label: &'static str, fields: Fields) -> FieldSpec {
    let mut field = FieldSpec::new(FieldKind::Array, label);
    field.array_fields = fields;
    field
}

const ALIGN: &[(&str, &str)] = &[("left", "Left"), ("center", "Center"), ("right", "Right")];

fn defaults(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn entry_for(kind: BlockKind, zones: &Zones) -> RegistryEntry {
    let (fields, default_props): (Fields, Value) = match kind {
        BlockKind::Hero => (
            Fields::from([
                ("title", text("Title")),
                ("subtitle", text("Subtitle")),
                ("backgroundColor", color("Background Color (HEX)", "#007bff")),
            ]),
            json!({
                "title": "Verify Your Account",
                "subtitle": "Use the OTP below to complete your verification",
                "backgroundColor": "#007bff",
            }),
        ),
        BlockKind::Otp => (
            Fields::from([("otpCode", text("OTP Code").placeholder("123456"))]),
            json!({ "otpCode": "123456" }),
        ),
        BlockKind::Button => (
            Fields::from([
                ("text", text("Button Text")),
                ("color", color("Text Color (HEX)", "#ffffff")),
                ("backgroundColor", color("Background Color (HEX)", "#007bff")),
                (
                    "link",
                    url("Link URL").placeholder("https://example.com/verify"),
                ),
            ]),
            json!({
                "text": "Verify Now",
                "color": "#ffffff",
                "backgroundColor": "#007bff",
                "link": "https://example.com/verify",
            }),
        ),
        BlockKind::TextBlock => (
            Fields::from([
                ("content", FieldSpec::new(FieldKind::RichText, "Content")),
                ("backgroundColor", color("Background Color (HEX)", "#ffffff")),
            ]),
            json!({
                "content": "<p>Enter your text here</p>",
                "backgroundColor": "#ffffff",
            }),
        ),
        BlockKind::Spacer => (
            Fields::from([("height", number("Height (px)", 10.0, 200.0))]),
            json!({ "height": 20 }),
        ),
        BlockKind::Footer => (
            Fields::from([
                ("content", text("Footer Content")),
                ("backgroundColor", color("Background Color (HEX)", "#333333")),
            ]),
            json!({
                "content": "© 2025 Your Company. Contact us at support@example.com.",
                "backgroundColor": "#333333",
            }),
        ),
        BlockKind::Row => (
            Fields::from([
                ("align", select("Text Alignment", ALIGN)),
                ("backgroundColor", color("Background Color (HEX)", "#ffffff")),
                ("padding", number("Padding (px)", 0.0, 50.0)),
                ("borderWidth", number("Border Width (px)", 0.0, 5.0)),
                ("borderColor", color("Border Color (HEX)", "#000000")),
                (
                    "borderStyle",
                    select(
                        "Border Style",
                        &[("solid", "Solid"), ("dashed", "Dashed"), ("dotted", "Dotted")],
                    ),
                ),
                (
                    "verticalAlign",
                    select(
                        "Vertical Alignment",
                        &[("top", "Top"), ("middle", "Middle"), ("bottom", "Bottom")],
                    ),
                ),
                (
                    "maxWidth",
                    text("Max Width (px or %)")
                        .placeholder("100%")
                        .validate(FieldValidator::CssWidth),
                ),
                ("margin", number("Margin (px)", 0.0, 50.0)),
                (
                    "backgroundImage",
                    text("Background Image URL")
                        .placeholder("https://example.com/image.jpg")
                        .validate(FieldValidator::OptionalUrl),
                ),
                ("stackOnMobile", radio("Stack on Mobile", "Yes", "No")),
                (
                    "backgroundOpacity",
                    number("Background Opacity (0–1)", 0.0, 1.0).step(0.1),
                ),
                ("borderRadius", number("Border Radius (px)", 0.0, 20.0)),
                (
                    "boxShadow",
                    select(
                        "Box Shadow",
                        &[("none", "None"), ("light", "Light"), ("medium", "Medium")],
                    ),
                ),
                ("minHeight", number("Min Height (px)", 50.0, 500.0)),
                ("textColor", color("Text Color (HEX)", "#000000")),
                ("columnGap", number("Column Gap (px)", 0.0, 50.0)),
                ("isVisible", radio("Visibility", "Show", "Hide")),
                ("zIndex", number("Z-Index", 0.0, 100.0)),
                (
                    "hoverBackgroundColor",
                    text("Hover Background Color (HEX)")
                        .placeholder("#ffffff")
                        .validate(FieldValidator::OptionalHexColor),
                ),
                (
                    "customClass",
                    text("Custom Class")
                        .placeholder("my-row")
                        .validate(FieldValidator::ClassName),
                ),
            ]),
            json!({
                "align": "left",
                "backgroundColor": "#ffffff",
                "padding": 0,
                "borderWidth": 0,
                "borderColor": "#000000",
                "borderStyle": "solid",
                "verticalAlign": "top",
                "maxWidth": "100%",
                "margin": 0,
                "backgroundImage": "",
                "stackOnMobile": true,
                "backgroundOpacity": 1,
                "borderRadius": 0,
                "boxShadow": "none",
                "minHeight": 50,
                "textColor": "#000000",
                "columnGap": 0,
                "isVisible": true,
                "zIndex": 0,
                "hoverBackgroundColor": "",
                "customClass": "",
            }),
        ),
        BlockKind::Column => (Fields::default(), json!({ "zoneId": zones.a })),
        BlockKind::TwoColumn => (
            Fields::default(),
            json!({ "leftZone": zones.b, "rightZone": zones.c }),
        ),
        BlockKind::ThreeColumn => (
            Fields::default(),
            json!({ "leftZone": zones.a, "middleZone": zones.b, "rightZone": zones.c }),
        ),
        BlockKind::Image => (
            Fields::from([
                ("src", url("Image URL")),
                ("alt", text("Alt Text")),
                ("width", number("Width (px)", 50.0, 600.0)),
                ("height", number("Height (px)", 50.0, 600.0)),
                ("isVisible", radio("Visibility", "Show", "Hide")),
            ]),
            json!({
                "src": "https://via.placeholder.com/600x200",
                "alt": "Placeholder Image",
                "width": 600,
                "height": 200,
                "isVisible": true,
            }),
        ),
        BlockKind::Logo => (
            Fields::from([
                ("src", url("Logo URL")),
                ("alt", text("Alt Text")),
                ("width", number("Width (px)", 50.0, 300.0)),
                ("height", number("Height (px)", 50.0, 300.0)),
                ("align", select("Alignment", ALIGN)),
                (
                    "link",
                    text("Link URL").validate(FieldValidator::OptionalUrl),
                ),
            ]),
            json!({
                "src": "https://via.placeholder.com/150x50",
                "alt": "Company Logo",
                "width": 150,
                "height": 50,
                "align": "center",
                "link": "",
            }),
        ),
        BlockKind::SocialMedia => (
            Fields::from([
                (
                    "platforms",
                    array(
                        "Social Media Links",
                        Fields::from([
                            (
                                "platform",
                                select(
                                    "Platform",
                                    &[
                                        ("facebook", "Facebook"),
                                        ("twitter", "Twitter"),
                                        ("linkedin", "LinkedIn"),
                                        ("instagram", "Instagram"),
                                    ],
                                ),
                            ),
                            ("url", url("URL")),
                        ]),
                    ),
                ),
                ("iconSize", number("Icon Size (px)", 16.0, 48.0)),
                ("align", select("Alignment", ALIGN)),
            ]),
            json!({
                "platforms": [
                    { "platform": "facebook", "url": "https://facebook.com" },
                    { "platform": "twitter", "url": "https://twitter.com" },
                ],
                "iconSize": 32,
                "align": "center",
            }),
        ),
        BlockKind::Divider => (
            Fields::from([
                ("height", number("Height (px)", 1.0, 10.0)),
                ("color", color("Color (HEX)", "#000000")),
                ("width", number("Width (%)", 10.0, 100.0)),
            ]),
            json!({ "height": 2, "color": "#000000", "width": 100 }),
        ),
        BlockKind::Video => (
            Fields::from([
                ("thumbnail", url("Thumbnail URL")),
                ("videoUrl", url("Video URL")),
                ("alt", text("Alt Text")),
                ("width", number("Width (px)", 100.0, 600.0)),
            ]),
            json!({
                "thumbnail": "https://via.placeholder.com/600x300",
                "videoUrl": "https://example.com/video",
                "alt": "Video Thumbnail",
                "width": 600,
            }),
        ),
        BlockKind::Testimonial => (
            Fields::from([
                ("quote", text("Quote")),
                ("author", text("Author")),
                ("backgroundColor", color("Background Color (HEX)", "#f9f9f9")),
                ("textColor", color("Text Color (HEX)", "#000000")),
            ]),
            json!({
                "quote": "This product changed my life!",
                "author": "John Doe",
                "backgroundColor": "#f9f9f9",
                "textColor": "#000000",
            }),
        ),
        BlockKind::Countdown => (
            Fields::from([
                (
                    "deadline",
                    text("Deadline (YYYY-MM-DD HH:MM)").placeholder("2025-12-31 23:59"),
                ),
                ("text", text("Countdown Text")),
                ("textColor", color("Text Color (HEX)", "#000000")),
            ]),
            json!({
                "deadline": "2025-12-31 23:59",
                "text": "Hurry! Offer ends soon!",
                "textColor": "#000000",
            }),
        ),
        BlockKind::Header => (
            Fields::from([
                ("text", text("Header Text")),
                ("backgroundColor", color("Background Color (HEX)", "#ffffff")),
                ("textColor", color("Text Color (HEX)", "#000000")),
                ("fontSize", number("Font Size (px)", 16.0, 48.0)),
            ]),
            json!({
                "text": "Welcome to Our Newsletter",
                "backgroundColor": "#ffffff",
                "textColor": "#000000",
                "fontSize": 24,
            }),
        ),
        BlockKind::Cta => (
            Fields::from([
                ("text", text("CTA Text")),
                ("link", url("Link URL")),
                ("backgroundColor", color("Background Color (HEX)", "#ff4500")),
                ("textColor", color("Text Color (HEX)", "#ffffff")),
                ("borderRadius", number("Border Radius (px)", 0.0, 20.0)),
            ]),
            json!({
                "text": "Shop Now",
                "link": "https://example.com/shop",
                "backgroundColor": "#ff4500",
                "textColor": "#ffffff",
                "borderRadius": 5,
            }),
        ),
        BlockKind::Accordion => (
            Fields::from([
                (
                    "items",
                    array(
                        "Accordion Items",
                        Fields::from([
                            ("title", text("Title")),
                            ("content", text("Content")),
                        ]),
                    ),
                ),
                ("backgroundColor", color("Background Color (HEX)", "#ffffff")),
            ]),
            json!({
                "items": [
                    { "title": "Question 1", "content": "Answer to question 1." },
                    { "title": "Question 2", "content": "Answer to question 2." },
                ],
                "backgroundColor": "#ffffff",
            }),
        ),
        BlockKind::DynamicContent => (
            Fields::from([
                ("placeholder", text("Placeholder (e.g., {{user_name}})")),
                ("fallback", text("Fallback Text")),
                ("textColor", color("Text Color (HEX)", "#000000")),
            ]),
            json!({
                "placeholder": "{{user_name}}",
                "fallback": "Customer",
                "textColor": "#000000",
            }),
        ),
    };

    RegistryEntry {
        kind,
        fields,
        default_props: defaults(default_props),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockContext, PropReader};

    fn registry() -> Registry {
        Registry::build(&mut IdGenerator::deterministic(1))
    }

    #[test]
    fn test_every_kind_registered() {
        let registry = registry();
        assert_eq!(registry.entries().len(), BlockKind::ALL.len());
        for kind in BlockKind::ALL {
            let entry = registry.get(kind.name()).expect("registered");
            assert_eq!(entry.kind, kind);
        }
        assert!(registry.get("Carousel").is_none());
    }

    #[test]
    fn test_zones_are_distinct() {
        let registry = registry();
        let zones = registry.zones();
        assert!(zones.a.starts_with("zone-"));
        assert_ne!(zones.a, zones.b);
        assert_ne!(zones.b, zones.c);
        let two = registry.get("TwoColumn").unwrap();
        assert_eq!(two.default_props["leftZone"], Value::String(zones.b.clone()));
    }

    #[test]
    fn test_defaults_render() {
        let registry = registry();
        for entry in registry.entries() {
            let ctx = BlockContext {
                props: PropReader::new(&entry.default_props),
                children: &[],
                zones: registry.zones(),
            };
            let markup = entry.kind.render(&ctx).expect("defaults render");
            assert!(markup.is_some(), "{} rendered nothing", entry.kind.name());
        }
    }

    #[test]
    fn test_validators() {
        assert_eq!(FieldValidator::HexColor.check("#12"), Err("Invalid HEX color"));
        assert_eq!(FieldValidator::OptionalHexColor.check(""), Ok(()));
        assert_eq!(FieldValidator::Url.check("nope"), Err("Invalid URL"));
        assert_eq!(FieldValidator::OptionalUrl.check(""), Ok(()));
        assert_eq!(FieldValidator::CssWidth.check("100%"), Ok(()));
        assert!(FieldValidator::ClassName.check("my row").is_err());
    }

    #[test]
    fn test_schema_serializes_in_field_order() {
        let registry = registry();
        let hero = serde_json::to_string(registry.get("Hero").unwrap()).unwrap();
        assert!(hero.starts_with(r#"{"type":"Hero","fields":{"title":"#));
        assert!(hero.contains(
            r##""placeholder":"#007bff","validate":{"rule":"hexColor","message":"Invalid HEX color"}"##
        ));

        let row = serde_json::to_value(registry.get("Row").unwrap()).unwrap();
        assert_eq!(row["fields"]["backgroundOpacity"]["step"], json!(0.1));
        assert_eq!(row["fields"]["stackOnMobile"]["options"][0]["value"], json!(true));

        let social = serde_json::to_value(registry.get("SocialMedia").unwrap()).unwrap();
        assert_eq!(social["fields"]["platforms"]["type"], json!("array"));
        assert_eq!(
            social["fields"]["platforms"]["arrayFields"]["url"]["validate"]["rule"],
            json!("url")
        );
    }

    #[test]
    fn test_root_entry() {
        let registry = registry();
        assert_eq!(registry.root().default_width, "600px");
        assert!(registry.root().fields.get("width").is_some());
    }
}
