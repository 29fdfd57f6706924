//! Writing an export to disk as an `.html`/`.txt` pair.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::Export;
use crate::util::to_base36;

/// Where [`write_artifacts`] put the two files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub text: PathBuf,
}

/// File name without extension: `prefix` followed by the base-36 timestamp.
pub fn artifact_stem(prefix: &str, timestamp_ms: u64) -> String {
    format!("{prefix}{}", to_base36(timestamp_ms))
}

/// Write `export.html` and `export.plaintext` into `dir`.
///
/// If the plaintext file cannot be written the HTML file is removed again,
/// so either both artifacts exist or neither does.
pub fn write_artifacts(
    export: &Export,
    dir: &Path,
    prefix: &str,
    timestamp_ms: u64,
) -> crate::Result<ArtifactPaths> {
    let stem = artifact_stem(prefix, timestamp_ms);
    let html = dir.join(format!("{stem}.html"));
    let text = dir.join(format!("{stem}.txt"));

    fs::write(&html, &export.html)?;
    if let Err(e) = fs::write(&text, &export.plaintext) {
        if let Err(cleanup) = fs::remove_file(&html) {
            warn!(path = %html.display(), error = %cleanup, "could not remove partial export");
        }
        return Err(e.into());
    }

    info!(html = %html.display(), text = %text.display(), "wrote export");
    Ok(ArtifactPaths { html, text })
}
