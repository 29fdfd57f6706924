//! Value validators and coercions shared by the renderers and the registry.
//!
//! These are deliberately strict: anything they reject is replaced by a
//! fallback at the call site rather than surfaced as an error.

use serde_json::Value;

/// Check for a `#rrggbb` color.
///
/// Three-digit short hex, `rgb()` and named colors are rejected.
///
/// # Examples
///
/// ```
/// use blockmail::validate::is_valid_hex_color;
///
/// assert!(is_valid_hex_color("#007bff"));
/// assert!(!is_valid_hex_color("#fff"));
/// assert!(!is_valid_hex_color("blue"));
/// ```
pub fn is_valid_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// Check that a string parses as an absolute URL.
///
/// # Examples
///
/// ```
/// use blockmail::validate::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/verify"));
/// assert!(is_valid_url("mailto:support@example.com"));
/// assert!(!is_valid_url("/relative/path"));
/// assert!(!is_valid_url(""));
/// ```
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Check for a CSS width written as whole pixels or a whole percentage.
pub fn is_valid_css_width(value: &str) -> bool {
    let digits = value
        .strip_suffix("px")
        .or_else(|| value.strip_suffix('%'))
        .unwrap_or("");
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Return the string inside `value`, or `fallback` for any other JSON type.
pub fn coerce_string<'a>(value: Option<&'a Value>, fallback: &'a str) -> &'a str {
    match value {
        Some(Value::String(s)) => s.as_str(),
        _ => fallback,
    }
}

/// Drop every character that cannot appear in a plain class name.
pub fn scrub_class_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
