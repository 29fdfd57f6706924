//! Error types for blockmail operations.

use thiserror::Error;

use crate::css::InlineError;

/// Errors that abort an export.
///
/// Everything below the document level (unknown blocks, bad props, failing
/// renderers) degrades gracefully and is reported through
/// [`RenderIssue`](crate::render::RenderIssue) instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSS inlining failed: {0}")]
    Inline(#[from] InlineError),
}

pub type Result<T> = std::result::Result<T, Error>;
