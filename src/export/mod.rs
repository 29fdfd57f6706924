//! Turn a rendered block tree into a complete email.
//!
//! The exporter wraps the tree in an HTML skeleton, inlines the embedded
//! stylesheet, collapses whitespace and derives a plaintext alternative.
//!
//! # Example
//!
//! ```
//! use blockmail::{BlockNode, Document, EmailExporter, IdGenerator, Registry};
//!
//! let mut ids = IdGenerator::deterministic(1);
//! let registry = Registry::build(&mut ids);
//! let doc = Document::new("Your code")
//!     .with_block(BlockNode::new("OTPBlock").with_prop("otpCode", "482913"));
//!
//! let export = EmailExporter::new().export(&doc, &registry, &mut ids)?;
//! assert!(export.html.starts_with("<!DOCTYPE html>"));
//! assert!(export.plaintext.contains("482913"));
//! # Ok::<(), blockmail::Error>(())
//! ```

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::{debug, error};

use crate::css::{InlineOptions, inline_css};
use crate::model::Document;
use crate::registry::{DEFAULT_WIDTH, Registry};
use crate::render::{RenderIssue, TreeRenderer};
use crate::sanitize::sanitize_text;
use crate::util::{IdGenerator, escape_html};

mod files;
mod plaintext;

pub use files::{ArtifactPaths, artifact_stem, write_artifacts};
pub use plaintext::html_to_plaintext;

/// Resets and mobile stacking rules every export carries.
const BASE_CSS: &str = "
      body { margin: 0; padding: 0; -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; background-color: #f4f4f4; }
      table { border-collapse: collapse; }
      img { border: 0; height: auto; line-height: 100%; outline: none; text-decoration: none; -ms-interpolation-mode: bicubic; }
      a { color: inherit; text-decoration: none; }
      p { margin: 0; }
      .stack-on-mobile:hover { background-color: inherit !important; }
      @media only screen and (max-width:600px) {
        .container { width: 100% !important; }
        .stack-column, .stack-column td { display: block !important; width: 100% !important; max-width: 100% !important; }
        .stack-on-mobile td { display: block !important; width: 100% !important; }
      }
";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Configuration for email export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Contents of the `<title>` element.
    pub title: String,
    /// Root width used when the document's own width is empty.
    pub default_width: String,
    /// Appended to the embedded stylesheet before inlining.
    pub extra_css: Option<String>,
    /// Collapse runs of whitespace and the gaps between tags.
    pub normalize_whitespace: bool,
    pub inline: InlineOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Email".to_string(),
            default_width: DEFAULT_WIDTH.to_string(),
            extra_css: None,
            normalize_whitespace: true,
            inline: InlineOptions::default(),
        }
    }
}

/// A finished email.
#[derive(Debug, Clone)]
pub struct Export {
    /// Standalone HTML with inlined styles.
    pub html: String,
    /// Plaintext alternative derived from `html`.
    pub plaintext: String,
    /// Sanitized preheader, HTML-escaped.
    pub preheader: String,
    /// Node-level problems encountered while rendering.
    pub diagnostics: Vec<RenderIssue>,
}

/// Renders documents to email HTML and plaintext.
#[derive(Debug, Clone, Default)]
pub struct EmailExporter {
    config: ExportConfig,
}

impl EmailExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render, assemble and inline `document`.
    ///
    /// Only CSS inlining can fail; node-level problems end up in
    /// [`Export::diagnostics`].
    pub fn export(
        &self,
        document: &Document,
        registry: &Registry,
        ids: &mut IdGenerator,
    ) -> crate::Result<Export> {
        let preheader = sanitize_text(&document.preheader);

        let output = TreeRenderer::new(registry)
            .with_default_width(&self.config.default_width)
            .render_document(document, ids);
        debug!(
            blocks = output.rendered,
            issues = output.diagnostics.len(),
            width = %output.width,
            "rendered block tree"
        );

        let skeleton = self.skeleton(&output.width, &preheader, output.markup.as_str());
        let inlined = inline_css(&skeleton, &self.config.inline).map_err(|e| {
            error!(line = e.line, column = e.column, "CSS inlining failed: {}", e.message);
            e
        })?;

        let html = if self.config.normalize_whitespace {
            normalize_whitespace(&inlined)
        } else {
            inlined
        };
        let plaintext = html_to_plaintext(&html);

        Ok(Export {
            html,
            plaintext,
            preheader,
            diagnostics: output.diagnostics,
        })
    }

    fn skeleton(&self, width: &str, preheader: &str, body: &str) -> String {
        let width = escape_html(width);
        let mut css = BASE_CSS.to_string();
        if let Some(extra) = &self.config.extra_css {
            css.push_str(extra);
            css.push('\n');
        }
        format!(
            r#"
  <!DOCTYPE html>
  <html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>{css}    </style>
  </head>
  <body style="margin:0;padding:0;background-color:#f4f4f4;">
    <div style="display:none;max-height:0px;overflow:hidden;mso-hide:all;">{preheader}</div>
    <table role="presentation" class="container" align="center" width="{width}" style="width:{width};margin:0 auto;background-color:#ffffff;border-collapse:collapse;">
      <tbody>
        <tr>
          <td>
            {body}
          </td>
        </tr>
      </tbody>
    </table>
  </body>
  </html>
"#,
            title = escape_html(&self.config.title),
        )
    }
}

/// Collapse whitespace runs to one space and drop the space between tags.
pub fn normalize_whitespace(html: &str) -> String {
    WHITESPACE
        .replace_all(html, " ")
        .replace("> <", "><")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockNode;

    fn export(doc: &Document, config: ExportConfig) -> Export {
        let mut ids = IdGenerator::deterministic(9);
        let registry = Registry::build(&mut ids);
        EmailExporter::new()
            .with_config(config)
            .export(doc, &registry, &mut ids)
            .unwrap()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("\n  <p>\n a \t b </p> <br>  "),
            "<p> a b </p><br>"
        );
    }

    #[test]
    fn test_skeleton_is_inlined() {
        let out = export(&Document::new(""), ExportConfig::default());
        let html = &out.html;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Email</title>"));
        assert!(html.contains("class=\"container\""));
        assert!(html.contains("border-collapse: collapse;"));
        // Media queries and hover rules cannot be inlined.
        assert!(html.contains("@media only screen and (max-width:600px)"));
        assert!(html.contains(".stack-on-mobile:hover"));
        assert!(!html.contains("borderCollapse"));
        assert!(!html.contains("\n"));
    }

    #[test]
    fn test_preheader_is_text_only() {
        let doc = Document::new("<b>Hi</b> <script>x()</script>there");
        let out = export(&doc, ExportConfig::default());
        assert_eq!(out.preheader, "Hi there");
        assert!(out.html.contains(">Hi there</div>"));
        assert!(!out.html.contains("x()"));
    }

    #[test]
    fn test_config_title_and_extra_css() {
        let config = ExportConfig {
            title: "Welcome & hello".into(),
            extra_css: Some("h1 { letter-spacing: 4px; }".into()),
            ..ExportConfig::default()
        };
        let doc = Document::new("").with_block(BlockNode::new("Hero"));
        let out = export(&doc, config);
        assert!(out.html.contains("<title>Welcome &amp; hello</title>"));
        assert!(out.html.contains("letter-spacing: 4px;"));
    }

    #[test]
    fn test_default_width_applies_to_empty_width() {
        let config = ExportConfig {
            default_width: "480px".into(),
            ..ExportConfig::default()
        };
        let out = export(&Document::new("").with_width(""), config);
        assert!(out.html.contains("width=\"480px\""));
    }

    #[test]
    fn test_malformed_extra_css_fails() {
        let mut ids = IdGenerator::deterministic(9);
        let registry = Registry::build(&mut ids);
        let exporter = EmailExporter::new().with_config(ExportConfig {
            extra_css: Some("p { color: }".into()),
            ..ExportConfig::default()
        });
        let result = exporter.export(&Document::new(""), &registry, &mut ids);
        assert!(matches!(result, Err(crate::Error::Inline(_))));
    }

    #[test]
    fn test_without_normalization() {
        let config = ExportConfig {
            normalize_whitespace: false,
            ..ExportConfig::default()
        };
        let out = export(&Document::new(""), config);
        assert!(out.html.contains('\n'));
    }
}
