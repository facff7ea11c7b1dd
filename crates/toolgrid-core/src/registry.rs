//! Provider registry.
//!
//! The set of provider columns for one rendering pass: every provider name
//! appearing in any provider-list source, plus a synthetic column for
//! direct-platform results. Rebuilt from the input documents each pass and
//! never persisted.

use std::collections::BTreeSet;

use crate::domain::{ModelRecord, ResultDocument};

/// Synthetic provider name under which direct-platform results are rendered.
pub const DIRECT_PROVIDER: &str = "direct";

/// Sorted set of provider columns for one rendering pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderRegistry {
    providers: BTreeSet<String>,
}

impl ProviderRegistry {
    /// Collect provider names from the given documents. `include_direct`
    /// adds the synthetic direct-platform column.
    pub fn from_documents<'a>(
        docs: impl IntoIterator<Item = &'a ResultDocument>,
        include_direct: bool,
    ) -> Self {
        let mut providers = BTreeSet::new();

        for doc in docs {
            for model in &doc.models {
                if let ModelRecord::ProviderList(record) = model {
                    for report in &record.providers {
                        providers.insert(report.provider_name.clone());
                    }
                    if let Some(structured) = &record.structured_output {
                        for report in structured {
                            providers.insert(report.provider_name.clone());
                        }
                    }
                }
            }
        }

        if include_direct {
            providers.insert(DIRECT_PROVIDER.to_string());
        }

        Self { providers }
    }

    /// Provider names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(String::as_str)
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.providers.contains(provider)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
