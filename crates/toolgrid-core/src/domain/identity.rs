//! Model identity table.
//!
//! Maps canonical, human-readable model names to the raw identifiers each
//! source platform knows them by. The table is loaded from config and passed
//! explicitly wherever identifiers need resolving; there is no process-wide
//! table.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Raw identifiers for one canonical model, per source platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformIds {
    /// Router identifiers. May list a priced and a free-tier variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub router: Vec<String>,

    /// Hub identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hub: Vec<String>,

    /// Direct-platform identifier (the platform has exactly one per model).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct: Option<String>,
}

/// Canonical model name → per-platform raw identifiers.
///
/// `BTreeMap` keeps iteration (and thus router-entry construction) in a
/// deterministic order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IdentityTable(pub BTreeMap<String, PlatformIds>);

impl IdentityTable {
    /// Iterate (canonical name, platform ids) in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlatformIds)> {
        self.0.iter().map(|(name, ids)| (name.as_str(), ids))
    }

    /// Number of canonical models in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reverse index: hub identifier → canonical name.
    pub fn hub_index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for (name, ids) in self.iter() {
            for id in &ids.hub {
                index.entry(id.as_str()).or_insert(name);
            }
        }
        index
    }

    /// Reverse index: direct-platform identifier → canonical name.
    pub fn direct_index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for (name, ids) in self.iter() {
            if let Some(id) = &ids.direct {
                index.entry(id.as_str()).or_insert(name);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_table_parses_mixed_entries() {
        let value = json!({
            "Falcon 40B": {
                "router": ["vendor/falcon-40b", "vendor/falcon-40b:free"],
                "hub": ["org/falcon-40b-instruct"]
            },
            "Smol 1B": {
                "direct": "org/smol-1b"
            }
        });

        let table: IdentityTable = serde_json::from_value(value).expect("deserialize");
        assert_eq!(table.len(), 2);

        let falcon = &table.0["Falcon 40B"];
        assert_eq!(falcon.router.len(), 2);
        assert_eq!(falcon.direct, None);
        assert_eq!(table.0["Smol 1B"].direct.as_deref(), Some("org/smol-1b"));
    }

    #[test]
    fn test_reverse_indexes() {
        let value = json!({
            "A": {"hub": ["org/a", "org/a-gguf"], "direct": "org/a"},
            "B": {"hub": ["org/b"]}
        });
        let table: IdentityTable = serde_json::from_value(value).expect("deserialize");

        let hub = table.hub_index();
        assert_eq!(hub.get("org/a-gguf"), Some(&"A"));
        assert_eq!(hub.get("org/b"), Some(&"B"));
        assert_eq!(hub.get("org/c"), None);

        let direct = table.direct_index();
        assert_eq!(direct.get("org/a"), Some(&"A"));
        assert_eq!(direct.len(), 1);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let value = json!({
            "Zeta": {"hub": ["z"]},
            "Alpha": {"hub": ["a"]}
        });
        let table: IdentityTable = serde_json::from_value(value).expect("deserialize");

        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }
}
