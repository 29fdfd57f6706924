//! # blockmail
//!
//! Render block-based email templates to standalone, email-client-safe HTML.
//!
//! ## Features
//!
//! - Table-based renderers for 21 block types (hero, OTP code, buttons,
//!   multi-column layouts, social links, countdowns, ...)
//! - Lenient input: invalid property values fall back to defaults and
//!   unknown blocks are skipped with a diagnostic
//! - Allow-list sanitizing of rich text and preheaders
//! - CSS inlining with media queries and hover rules kept in `<style>`
//! - Plaintext alternative for multipart emails
//!
//! ## Quick Start
//!
//! ```
//! use blockmail::{BlockNode, Document, EmailExporter, IdGenerator, Registry};
//!
//! let mut ids = IdGenerator::new();
//! let registry = Registry::build(&mut ids);
//!
//! let doc = Document::new("Your code")
//!     .with_block(BlockNode::new("Hero").with_prop("title", "Welcome"))
//!     .with_block(BlockNode::new("OTPBlock").with_prop("otpCode", "654321"));
//!
//! let export = EmailExporter::new().export(&doc, &registry, &mut ids)?;
//! assert!(export.html.contains("654321"));
//! assert!(export.plaintext.starts_with("Your code"));
//! assert!(export.diagnostics.is_empty());
//! # Ok::<(), blockmail::Error>(())
//! ```
//!
//! ## Documents
//!
//! A [`Document`] deserializes from the JSON an editor produces:
//!
//! ```
//! use blockmail::Document;
//!
//! let doc = Document::from_json(r#"{
//!     "preheader": "Hello",
//!     "root": { "props": { "width": "640px" } },
//!     "content": [{ "type": "Spacer", "props": { "height": 40 } }]
//! }"#)?;
//! assert_eq!(doc.width(), "640px");
//! # Ok::<(), blockmail::Error>(())
//! ```

pub mod blocks;
pub mod css;
pub mod dom;
pub mod error;
pub mod export;
pub mod model;
pub mod registry;
pub mod render;
pub mod sanitize;
pub mod util;
pub mod validate;

pub use blocks::{BlockError, BlockKind};
pub use error::{Error, Result};
pub use export::{EmailExporter, Export, ExportConfig, html_to_plaintext, write_artifacts};
pub use model::{BlockNode, Document};
pub use registry::{Registry, RegistryEntry, Zones};
pub use render::{RenderIssue, RenderOutput, TreeRenderer};
pub use util::IdGenerator;
