//! JSON document persistence.
//!
//! Probe passes write one [`ResultDocument`] per source; the renderer reads
//! them back along with the identity table. Missing documents are a normal
//! condition (a source that was never probed) and surface as `None`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{IdentityTable, ResultDocument};

/// Load a result document.
pub fn load_document(path: &Path) -> Result<ResultDocument> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

/// Load a result document, treating a missing file as absence of the source.
pub fn load_document_opt(path: &Path) -> Result<Option<ResultDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    load_document(path).map(Some)
}

/// Write a result document in pretty JSON format.
pub fn write_document(path: &Path, doc: &ResultDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(doc).context("serialize result document")?;
    std::fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load the identity table.
pub fn load_identity_table(path: &Path) -> Result<IdentityTable> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}
