//! Provider name canonicalisation.
//!
//! Source platforms spell the same serving backend differently
//! ("Fireworks-AI" vs "fireworks"). Every provider name is normalized in
//! place before any comparison or set-membership test, in both the
//! tool-calling and structured-output lists.

use crate::domain::{ModelRecord, ProviderReport, ResultDocument};

/// Alias table: normalized-but-still-divergent spelling → canonical form.
const PROVIDER_ALIASES: &[(&str, &str)] = &[("fireworks-ai", "fireworks")];

/// Canonical lowercase form of a raw provider name. Idempotent.
pub fn normalize_provider_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    for (alias, canonical) in PROVIDER_ALIASES {
        if lowered == *alias {
            return (*canonical).to_string();
        }
    }
    lowered
}

fn normalize_reports(reports: &mut [ProviderReport]) {
    for report in reports {
        report.provider_name = normalize_provider_name(&report.provider_name);
    }
}

/// Normalize every provider name in a result document, in place.
pub fn normalize_document(doc: &mut ResultDocument) {
    for model in &mut doc.models {
        if let ModelRecord::ProviderList(record) = model {
            normalize_reports(&mut record.providers);
            if let Some(structured) = &mut record.structured_output {
                normalize_reports(structured);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderListRecord;

    fn report(name: &str) -> ProviderReport {
        ProviderReport {
            provider_name: name.to_string(),
            display_name: None,
            test_runs: vec![],
            summary: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_normalization_lowercases() {
        assert_eq!(normalize_provider_name("Acme"), "acme");
        assert_eq!(normalize_provider_name("DEEPINFRA"), "deepinfra");
    }

    #[test]
    fn test_alias_applies_case_insensitively() {
        assert_eq!(normalize_provider_name("Fireworks-AI"), "fireworks");
        assert_eq!(normalize_provider_name("fireworks-ai"), "fireworks");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in ["Fireworks-AI", "Acme", "already-lower"] {
            let once = normalize_provider_name(raw);
            assert_eq!(normalize_provider_name(&once), once);
        }
    }

    #[test]
    fn test_document_normalization_covers_both_lists() {
        let mut doc = ResultDocument::new(vec![ModelRecord::ProviderList(ProviderListRecord {
            model_id: "vendor/a".to_string(),
            providers: vec![report("Acme"), report("Fireworks-AI")],
            structured_output: Some(vec![report("ACME")]),
            timestamp: None,
        })]);

        normalize_document(&mut doc);

        let ModelRecord::ProviderList(record) = &doc.models[0] else {
            panic!("expected provider-list record");
        };
        assert_eq!(record.providers[0].provider_name, "acme");
        assert_eq!(record.providers[1].provider_name, "fireworks");
        assert_eq!(
            record.structured_output.as_ref().expect("structured list")[0].provider_name,
            "acme"
        );
    }
}
