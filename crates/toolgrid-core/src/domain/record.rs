//! Per-model result records.
//!
//! Two record shapes exist in the wild: router/hub sources report per-provider
//! lists, while the direct platform has no provider dimension and carries its
//! summaries at the top level. [`ModelRecord`] models this as a tagged union
//! so classification can branch exhaustively instead of probing for keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run::{RunSummary, TestRun};

/// Summary of the runs for one provider serving one model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderReport {
    /// Canonical (lowercased) provider name. See [`crate::normalize`].
    pub provider_name: String,

    /// Provider display name as reported by the source platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// The literal attempts behind `summary`.
    #[serde(default)]
    pub test_runs: Vec<TestRun>,

    /// Aggregate counts. Absent or incomplete means corrupted upstream data.
    #[serde(default)]
    pub summary: Option<RunSummary>,

    /// When the probe finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Provider-free summary used by direct-platform structured-output results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapabilityReport {
    #[serde(default)]
    pub test_runs: Vec<TestRun>,

    #[serde(default)]
    pub summary: Option<RunSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result record for one model on a router or hub source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderListRecord {
    /// Raw platform-specific model identifier.
    pub model_id: String,

    /// Tool-calling results, one entry per serving provider.
    pub providers: Vec<ProviderReport>,

    /// Structured-output results. Absent when the capability was not probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<Vec<ProviderReport>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result record for one model on the direct platform (no provider dimension).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectRecord {
    /// Raw platform-specific model identifier.
    pub model_id: String,

    /// Human-oriented model name, when the probe config supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Tool-calling summary.
    #[serde(default)]
    pub summary: Option<RunSummary>,

    /// The literal tool-calling attempts behind `summary`.
    #[serde(default)]
    pub test_runs: Vec<TestRun>,

    /// Structured-output results (zero or one entry in practice).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structured_output: Vec<CapabilityReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The full result record for one concrete model identifier on one source.
///
/// Untagged: the required `providers` field discriminates the provider-list
/// shape, so only records without a provider list fall through to `Direct`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ModelRecord {
    ProviderList(ProviderListRecord),
    Direct(DirectRecord),
}

impl ModelRecord {
    /// The raw model identifier this record describes.
    pub fn model_id(&self) -> &str {
        match self {
            ModelRecord::ProviderList(r) => &r.model_id,
            ModelRecord::Direct(r) => &r.model_id,
        }
    }

    /// Whether this record carries any structured-output data.
    pub fn has_structured_output(&self) -> bool {
        match self {
            ModelRecord::ProviderList(r) => r.structured_output.is_some(),
            ModelRecord::Direct(r) => !r.structured_output.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_list_record_parses_as_provider_list() {
        let value = json!({
            "model_id": "vendor/model-a",
            "providers": [
                {
                    "provider_name": "acme",
                    "test_runs": [],
                    "summary": {"total_runs": 3, "success_count": 3}
                }
            ],
            "structured_output": []
        });

        let record: ModelRecord = serde_json::from_value(value).expect("deserialize");
        match record {
            ModelRecord::ProviderList(r) => {
                assert_eq!(r.model_id, "vendor/model-a");
                assert_eq!(r.providers.len(), 1);
                assert_eq!(r.structured_output.as_deref(), Some(&[][..]));
            }
            ModelRecord::Direct(_) => panic!("expected provider-list record"),
        }
    }

    #[test]
    fn test_direct_record_parses_as_direct() {
        let value = json!({
            "model_id": "org/model-b",
            "model_name": "Model B",
            "summary": {"total_runs": 3, "success_count": 2},
            "test_runs": [],
            "structured_output": [
                {"test_runs": [], "summary": {"total_runs": 3, "success_count": 0}}
            ]
        });

        let record: ModelRecord = serde_json::from_value(value).expect("deserialize");
        match record {
            ModelRecord::Direct(r) => {
                assert_eq!(r.model_name.as_deref(), Some("Model B"));
                assert_eq!(r.structured_output.len(), 1);
            }
            ModelRecord::ProviderList(_) => panic!("expected direct record"),
        }
    }

    #[test]
    fn test_record_roundtrip_preserves_shape() {
        let record = ModelRecord::ProviderList(ProviderListRecord {
            model_id: "vendor/model-a".to_string(),
            providers: vec![],
            structured_output: None,
            timestamp: None,
        });

        let json = serde_json::to_string(&record).expect("serialize");
        let back: ModelRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, back);
    }

    #[test]
    fn test_has_structured_output() {
        let without = ModelRecord::ProviderList(ProviderListRecord {
            model_id: "a".to_string(),
            providers: vec![],
            structured_output: None,
            timestamp: None,
        });
        assert!(!without.has_structured_output());

        let with = ModelRecord::Direct(DirectRecord {
            model_id: "b".to_string(),
            model_name: None,
            summary: None,
            test_runs: vec![],
            structured_output: vec![CapabilityReport {
                test_runs: vec![],
                summary: None,
                timestamp: None,
            }],
            timestamp: None,
        });
        assert!(with.has_structured_output());
    }
}
