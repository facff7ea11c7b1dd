//! Unified model index.
//!
//! Reconciles the per-source result documents into one ordered list of
//! comparable entries, one per (canonical model, source) pair. Router
//! entries bundle their priced/free variants; hub and direct entries attach
//! a single record. Models absent from the identity table are excluded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify_record, CellOutcome, ReasonLimits};
use crate::domain::{Capability, IdentityTable, ModelRecord, ResultDocument};
use crate::merge::{classify_bundle, VariantBundle};

/// Suffix marking a router identifier as the free-tier variant.
///
/// An inherited platform convention, kept as a constant rather than an
/// invariant.
pub const FREE_VARIANT_SUFFIX: &str = ":free";

/// Which platform an entry's data came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Router,
    Hub,
    Direct,
}

impl Source {
    /// Stable tag used in display names, sort keys, and row attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Router => "router",
            Source::Hub => "hub",
            Source::Direct => "direct",
        }
    }

    /// Human-facing label for filters and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Router => "Router",
            Source::Hub => "Hub",
            Source::Direct => "Direct platform",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data behind one matrix row.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelData {
    /// Hub and direct sources: one record, no variant dimension.
    Single(ModelRecord),
    /// Router source: priced/free variant bundle.
    Variants(VariantBundle),
}

/// One row of the final matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedModelEntry {
    /// Identity-table key correlating this model across sources.
    pub canonical_name: String,

    /// Rendered row title: `"<canonical_name> (<source tag>)"`.
    pub display_name: String,

    pub source: Source,

    /// Representative raw identifier used as the sort tie-breaker.
    pub sort_id: String,

    pub data: ModelData,
}

impl UnifiedModelEntry {
    /// Classify this entry for one provider column and capability.
    pub fn classify(
        &self,
        provider: &str,
        capability: Capability,
        limits: &ReasonLimits,
    ) -> CellOutcome {
        match &self.data {
            ModelData::Single(record) => classify_record(Some(record), provider, capability, limits),
            ModelData::Variants(bundle) => classify_bundle(bundle, provider, capability, limits),
        }
    }

    /// Whether this entry carries any structured-output data.
    pub fn has_structured_output(&self) -> bool {
        match &self.data {
            ModelData::Single(record) => record.has_structured_output(),
            ModelData::Variants(bundle) => {
                bundle
                    .priced
                    .as_ref()
                    .is_some_and(ModelRecord::has_structured_output)
                    || bundle
                        .free
                        .as_ref()
                        .is_some_and(ModelRecord::has_structured_output)
            }
        }
    }
}

/// Split a model's router identifiers into (priced, free) variants.
///
/// An identifier is the free variant iff it carries the free-tier suffix.
/// Only the first matching identifier per variant kind is used when the
/// table lists several.
pub fn split_variants(ids: &[String]) -> (Option<&str>, Option<&str>) {
    let mut priced: Option<&str> = None;
    let mut free: Option<&str> = None;
    for id in ids {
        if id.ends_with(FREE_VARIANT_SUFFIX) {
            free.get_or_insert(id.as_str());
        } else {
            priced.get_or_insert(id.as_str());
        }
    }
    (priced, free)
}

fn display_name(canonical: &str, source: Source) -> String {
    format!("{} ({})", canonical, source.as_str())
}

fn record_map(doc: &ResultDocument) -> HashMap<&str, &ModelRecord> {
    doc.models.iter().map(|m| (m.model_id(), m)).collect()
}

/// Build router entries by iterating the identity table, so raw models with
/// no identity mapping are excluded.
fn router_entries(doc: &ResultDocument, identity: &IdentityTable) -> Vec<UnifiedModelEntry> {
    let records = record_map(doc);
    let mut entries = Vec::new();

    for (canonical, ids) in identity.iter() {
        if ids.router.is_empty() {
            continue;
        }

        let (priced_id, free_id) = split_variants(&ids.router);

        let priced = priced_id.and_then(|id| records.get(id).map(|r| (*r).clone()));
        let free = free_id.and_then(|id| records.get(id).map(|r| (*r).clone()));

        if priced.is_none() && free.is_none() {
            debug!(model = canonical, "no router data for identity entry");
            continue;
        }

        // The representative identifier prefers the priced variant.
        let sort_id = match (&priced, &free) {
            (Some(record), _) => record.model_id().to_string(),
            (None, Some(record)) => record.model_id().to_string(),
            (None, None) => unreachable!("at least one variant has data"),
        };

        entries.push(UnifiedModelEntry {
            canonical_name: canonical.to_string(),
            display_name: display_name(canonical, Source::Router),
            source: Source::Router,
            sort_id,
            data: ModelData::Variants(VariantBundle {
                priced,
                free,
                // Defined-ness reflects the identity table, not lookup success.
                priced_defined: priced_id.is_some(),
                free_defined: free_id.is_some(),
            }),
        });
    }

    entries
}

/// Build hub or direct entries by iterating the result document, keeping only
/// identifiers the identity table knows.
fn mapped_entries(
    doc: &ResultDocument,
    index: &HashMap<&str, &str>,
    source: Source,
) -> Vec<UnifiedModelEntry> {
    let mut entries = Vec::new();
    for record in &doc.models {
        let Some(canonical) = index.get(record.model_id()).copied() else {
            continue;
        };
        entries.push(UnifiedModelEntry {
            canonical_name: canonical.to_string(),
            display_name: display_name(canonical, source),
            source,
            sort_id: record.model_id().to_string(),
            data: ModelData::Single(record.clone()),
        });
    }
    entries
}

/// Build the ordered unified entry list spanning all sources.
pub fn build_unified_entries(
    router: Option<&ResultDocument>,
    hub: Option<&ResultDocument>,
    direct: Option<&ResultDocument>,
    identity: &IdentityTable,
) -> Vec<UnifiedModelEntry> {
    let mut entries = Vec::new();

    if let Some(doc) = router {
        entries.extend(router_entries(doc, identity));
    }
    if let Some(doc) = hub {
        entries.extend(mapped_entries(doc, &identity.hub_index(), Source::Hub));
    }
    if let Some(doc) = direct {
        entries.extend(mapped_entries(doc, &identity.direct_index(), Source::Direct));
    }

    // Total order even when two canonical names share a prefix.
    entries.sort_by(|a, b| {
        (a.canonical_name.as_str(), a.source.as_str(), a.sort_id.as_str()).cmp(&(
            b.canonical_name.as_str(),
            b.source.as_str(),
            b.sort_id.as_str(),
        ))
    });

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DirectRecord, PlatformIds, ProviderListRecord, ProviderReport, RunStatus, RunSummary,
        TestRun,
    };

    fn listed(model_id: &str, provider: &str, successes: usize) -> ModelRecord {
        let test_runs: Vec<TestRun> = (0..3)
            .map(|i| {
                TestRun::new(if i < successes {
                    RunStatus::Success
                } else {
                    RunStatus::Unclear
                })
            })
            .collect();
        let summary = RunSummary::from_runs(&test_runs, Capability::ToolCalls);
        ModelRecord::ProviderList(ProviderListRecord {
            model_id: model_id.to_string(),
            providers: vec![ProviderReport {
                provider_name: provider.to_string(),
                display_name: None,
                test_runs,
                summary: Some(summary),
                timestamp: None,
            }],
            structured_output: None,
            timestamp: None,
        })
    }

    fn direct(model_id: &str) -> ModelRecord {
        ModelRecord::Direct(DirectRecord {
            model_id: model_id.to_string(),
            model_name: None,
            summary: None,
            test_runs: vec![],
            structured_output: vec![],
            timestamp: None,
        })
    }

    fn identity(entries: &[(&str, PlatformIds)]) -> IdentityTable {
        IdentityTable(
            entries
                .iter()
                .map(|(name, ids)| (name.to_string(), ids.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_router_bundles_variants_with_defined_flags() {
        let doc = ResultDocument::new(vec![
            listed("vendor/foo", "x", 3),
            listed("vendor/foo:free", "x", 1),
        ]);
        let table = identity(&[(
            "Foo",
            PlatformIds {
                router: vec!["vendor/foo".to_string(), "vendor/foo:free".to_string()],
                ..Default::default()
            },
        )]);

        let entries = build_unified_entries(Some(&doc), None, None, &table);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.display_name, "Foo (router)");
        assert_eq!(entry.sort_id, "vendor/foo");

        let ModelData::Variants(bundle) = &entry.data else {
            panic!("expected variant bundle");
        };
        assert!(bundle.priced_defined);
        assert!(bundle.free_defined);
        assert!(bundle.priced.is_some());
        assert!(bundle.free.is_some());
    }

    #[test]
    fn test_router_defined_flags_survive_missing_data() {
        // The free variant is declared but was never probed.
        let doc = ResultDocument::new(vec![listed("vendor/foo", "x", 3)]);
        let table = identity(&[(
            "Foo",
            PlatformIds {
                router: vec!["vendor/foo".to_string(), "vendor/foo:free".to_string()],
                ..Default::default()
            },
        )]);

        let entries = build_unified_entries(Some(&doc), None, None, &table);
        let ModelData::Variants(bundle) = &entries[0].data else {
            panic!("expected variant bundle");
        };
        assert!(bundle.free_defined);
        assert!(bundle.free.is_none());
    }

    #[test]
    fn test_split_variants_first_match_wins() {
        let ids = vec![
            "vendor/foo".to_string(),
            "vendor/foo:free".to_string(),
            "vendor/foo-v2".to_string(),
            "vendor/foo-v2:free".to_string(),
        ];
        let (priced, free) = split_variants(&ids);
        assert_eq!(priced, Some("vendor/foo"));
        assert_eq!(free, Some("vendor/foo:free"));

        let (priced, free) = split_variants(&[]);
        assert_eq!(priced, None);
        assert_eq!(free, None);
    }

    #[test]
    fn test_router_first_matching_identifier_wins() {
        let doc = ResultDocument::new(vec![
            listed("vendor/foo-v1", "x", 3),
            listed("vendor/foo-v2", "x", 0),
        ]);
        let table = identity(&[(
            "Foo",
            PlatformIds {
                router: vec!["vendor/foo-v1".to_string(), "vendor/foo-v2".to_string()],
                ..Default::default()
            },
        )]);

        let entries = build_unified_entries(Some(&doc), None, None, &table);
        let ModelData::Variants(bundle) = &entries[0].data else {
            panic!("expected variant bundle");
        };
        assert_eq!(
            bundle.priced.as_ref().map(|r| r.model_id()),
            Some("vendor/foo-v1")
        );
        assert!(!bundle.free_defined);
    }

    #[test]
    fn test_unmapped_models_are_excluded() {
        let router = ResultDocument::new(vec![listed("vendor/unknown", "x", 3)]);
        let hub = ResultDocument::new(vec![listed("org/unknown", "x", 3)]);
        let table = identity(&[(
            "Foo",
            PlatformIds {
                router: vec!["vendor/foo".to_string()],
                hub: vec!["org/foo".to_string()],
                ..Default::default()
            },
        )]);

        let entries = build_unified_entries(Some(&router), Some(&hub), None, &table);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_hub_and_direct_attach_single_records() {
        let hub = ResultDocument::new(vec![listed("org/foo", "x", 2)]);
        let platform = ResultDocument::new(vec![direct("org/foo")]);
        let table = identity(&[(
            "Foo",
            PlatformIds {
                hub: vec!["org/foo".to_string()],
                direct: Some("org/foo".to_string()),
                ..Default::default()
            },
        )]);

        let entries = build_unified_entries(None, Some(&hub), Some(&platform), &table);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, Source::Direct);
        assert_eq!(entries[1].source, Source::Hub);
        assert!(matches!(entries[0].data, ModelData::Single(_)));
    }

    #[test]
    fn test_entries_sort_by_name_then_source_then_id() {
        let router = ResultDocument::new(vec![listed("vendor/a", "x", 3)]);
        let hub = ResultDocument::new(vec![listed("org/a", "x", 3), listed("org/b", "x", 3)]);
        let table = identity(&[
            (
                "A",
                PlatformIds {
                    router: vec!["vendor/a".to_string()],
                    hub: vec!["org/a".to_string()],
                    ..Default::default()
                },
            ),
            (
                "B",
                PlatformIds {
                    hub: vec!["org/b".to_string()],
                    ..Default::default()
                },
            ),
        ]);

        let entries = build_unified_entries(Some(&router), Some(&hub), None, &table);
        let keys: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.canonical_name.as_str(), e.source.as_str()))
            .collect();
        assert_eq!(keys, vec![("A", "hub"), ("A", "router"), ("B", "hub")]);
    }
}
