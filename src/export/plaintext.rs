//! Plaintext alternative for multipart emails.

use std::sync::LazyLock;

use regex_lite::Regex;

static HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head(\s[^>]*)?>.*?</head>").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(h[1-6]|p|div|tr|table|li|br)\s*>|<br\s*/?>").unwrap()
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Reduce email HTML to readable text.
///
/// The head and comments are dropped, block-level closing tags become line
/// breaks, all other tags are stripped and the basic entities are decoded.
/// Runs of empty lines collapse to a single blank line.
///
/// ```
/// use blockmail::export::html_to_plaintext;
///
/// let html = "<html><head><title>x</title></head>\
///             <body><h1>Hello</h1><p>Your code is <b>42</b> &amp; valid</p></body></html>";
/// assert_eq!(html_to_plaintext(html), "Hello\nYour code is 42 & valid");
/// ```
pub fn html_to_plaintext(html: &str) -> String {
    let text = HEAD.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
