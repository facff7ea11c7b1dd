//! Per-source result documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::ModelRecord;

/// The result document one probe pass writes for one source platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultDocument {
    /// When the probe pass finished.
    pub generated_at: DateTime<Utc>,

    /// Number of models probed.
    pub total_models: usize,

    /// One record per concrete model identifier.
    pub models: Vec<ModelRecord>,
}

impl ResultDocument {
    /// Create a document over the given records, stamped now.
    pub fn new(models: Vec<ModelRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            total_models: models.len(),
            models,
        }
    }

    /// Whether any record carries structured-output data.
    pub fn has_structured_output(&self) -> bool {
        self.models.iter().any(ModelRecord::has_structured_output)
    }

    /// Find a record by raw model identifier.
    pub fn find_model(&self, model_id: &str) -> Option<&ModelRecord> {
        self.models.iter().find(|m| m.model_id() == model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{DirectRecord, ProviderListRecord};

    fn provider_list(model_id: &str, structured: bool) -> ModelRecord {
        ModelRecord::ProviderList(ProviderListRecord {
            model_id: model_id.to_string(),
            providers: vec![],
            structured_output: if structured { Some(vec![]) } else { None },
            timestamp: None,
        })
    }

    #[test]
    fn test_document_counts_models() {
        let doc = ResultDocument::new(vec![provider_list("a", false), provider_list("b", false)]);
        assert_eq!(doc.total_models, 2);
    }

    #[test]
    fn test_has_structured_output_scans_all_records() {
        let doc = ResultDocument::new(vec![provider_list("a", false)]);
        assert!(!doc.has_structured_output());

        let doc = ResultDocument::new(vec![provider_list("a", false), provider_list("b", true)]);
        assert!(doc.has_structured_output());
    }

    #[test]
    fn test_find_model_matches_both_shapes() {
        let doc = ResultDocument::new(vec![
            provider_list("vendor/a", false),
            ModelRecord::Direct(DirectRecord {
                model_id: "org/b".to_string(),
                model_name: None,
                summary: None,
                test_runs: vec![],
                structured_output: vec![],
                timestamp: None,
            }),
        ]);

        assert!(doc.find_model("vendor/a").is_some());
        assert!(doc.find_model("org/b").is_some());
        assert!(doc.find_model("org/c").is_none());
    }
}
