//! Result-document loading for a rendering pass.
//!
//! One JSON document per source lives in the data directory; a source that
//! was never probed simply has no file and renders as absent.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use toolgrid_core::{load_document_opt, load_identity_table, IdentityTable, ResultDocument};

/// Router source document file name.
pub const ROUTER_FILE: &str = "router.json";
/// Hub source document file name.
pub const HUB_FILE: &str = "hub.json";
/// Direct-platform document file name.
pub const DIRECT_FILE: &str = "direct.json";
/// Direct-platform-via-vendor-SDK document file name (library tab).
pub const DIRECT_LIBRARY_FILE: &str = "direct_library.json";

/// Everything one rendering pass consumes.
#[derive(Debug, Clone)]
pub struct SiteInputs {
    pub router: Option<ResultDocument>,
    pub hub: Option<ResultDocument>,
    pub direct: Option<ResultDocument>,
    pub direct_library: Option<ResultDocument>,
    pub identity: IdentityTable,
}

/// Load all source documents plus the identity table.
pub fn load_inputs(data_dir: &Path, identity_path: &Path) -> Result<SiteInputs> {
    let inputs = SiteInputs {
        router: load_document_opt(&data_dir.join(ROUTER_FILE))?,
        hub: load_document_opt(&data_dir.join(HUB_FILE))?,
        direct: load_document_opt(&data_dir.join(DIRECT_FILE))?,
        direct_library: load_document_opt(&data_dir.join(DIRECT_LIBRARY_FILE))?,
        identity: load_identity_table(identity_path)?,
    };

    info!(
        router = inputs.router.is_some(),
        hub = inputs.hub.is_some(),
        direct = inputs.direct.is_some(),
        direct_library = inputs.direct_library.is_some(),
        models = inputs.identity.len(),
        "loaded rendering inputs"
    );

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgrid_core::write_document;

    #[test]
    fn test_missing_documents_load_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let identity_path = dir.path().join("models.json");
        std::fs::write(&identity_path, r#"{"Foo": {"router": ["vendor/foo"]}}"#).expect("write");

        let inputs = load_inputs(dir.path(), &identity_path).expect("load");
        assert!(inputs.router.is_none());
        assert!(inputs.hub.is_none());
        assert_eq!(inputs.identity.len(), 1);
    }

    #[test]
    fn test_present_documents_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let identity_path = dir.path().join("models.json");
        std::fs::write(&identity_path, "{}").expect("write");

        let doc = ResultDocument::new(vec![]);
        write_document(&dir.path().join(ROUTER_FILE), &doc).expect("write document");

        let inputs = load_inputs(dir.path(), &identity_path).expect("load");
        assert!(inputs.router.is_some());
        assert!(inputs.hub.is_none());
    }
}
