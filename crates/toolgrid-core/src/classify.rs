//! Status classification.
//!
//! Turns the 3-run record for one (model, provider, capability) triple into a
//! single comparable cell value: a tri-state-plus-none status, a fraction
//! label, and human-readable failure evidence. Every input permutation maps
//! to a valid [`CellOutcome`]: absent and corrupted data are states, not
//! errors, because the renderer cannot degrade gracefully otherwise.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Capability, ModelRecord, ProviderReport, RunStatus, RunSummary, TestRun, RUNS_PER_PROBE,
};
use crate::registry::DIRECT_PROVIDER;

/// Classified support level for one cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// All runs succeeded.
    Success,
    /// Some but not all runs succeeded.
    Partial,
    /// No run succeeded.
    Failure,
    /// No data exists for this pairing. Never means "tested and inconclusive".
    None,
}

impl CellStatus {
    /// Stable lowercase name (also the CSS class the renderer uses).
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Success => "success",
            CellStatus::Partial => "partial",
            CellStatus::Failure => "failure",
            CellStatus::None => "none",
        }
    }
}

impl std::fmt::Display for CellStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of one cell: status, fraction label, failure evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellOutcome {
    pub status: CellStatus,

    /// `"-"` for absent data, `"?"` for corrupted data, `"<n>/3"` otherwise.
    pub label: String,

    /// Evidence strings for non-successful runs; `None` when the status is
    /// `Success` or `None`-without-corruption.
    pub reasons: Option<Vec<String>>,
}

impl CellOutcome {
    /// No data exists for this pairing.
    pub fn absent() -> Self {
        Self {
            status: CellStatus::None,
            label: "-".to_string(),
            reasons: None,
        }
    }

    /// A summary exists but lost its success count upstream.
    pub fn corrupted() -> Self {
        Self {
            status: CellStatus::None,
            label: "?".to_string(),
            reasons: Some(vec!["Missing summary data".to_string()]),
        }
    }

    /// Whether this outcome carries queryable data (anything but absent).
    pub fn has_data(&self) -> bool {
        self.status != CellStatus::None
    }
}

/// Truncation lengths for evidence strings.
///
/// The values are inherited tuning constants, not semantics; they exist as a
/// struct so callers can widen them without touching the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonLimits {
    /// Max characters kept from an error message.
    pub error_chars: usize,

    /// Max characters kept from a raw response snippet.
    pub snippet_chars: usize,
}

impl Default for ReasonLimits {
    fn default() -> Self {
        Self {
            error_chars: 100,
            snippet_chars: 50,
        }
    }
}

/// Truncate to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Collect one evidence string per non-successful run, deduplicated by exact
/// text in first-seen order.
fn collect_reasons(runs: &[TestRun], limits: &ReasonLimits) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for run in runs {
        let reason = match run.status {
            RunStatus::Success => continue,
            RunStatus::Error => match &run.error {
                Some(error) => truncate_chars(error, limits.error_chars),
                None => continue,
            },
            RunStatus::Unclear => "Empty response".to_string(),
            status if status.is_malformed() => match &run.response_content {
                Some(content) => format!(
                    "No proper response: {}...",
                    truncate_chars(content, limits.snippet_chars)
                ),
                None => "No proper response (empty)".to_string(),
            },
            _ => continue,
        };
        if !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }
    reasons
}

/// Classify a summary plus the runs behind it.
///
/// `summary == None` and `success_count == None` are both the corrupted-data
/// sentinel: the report was present in the source document but its counts
/// were lost upstream.
fn classify_summary(
    summary: Option<&RunSummary>,
    runs: &[TestRun],
    limits: &ReasonLimits,
) -> CellOutcome {
    let Some(success_count) = summary.and_then(|s| s.success_count) else {
        return CellOutcome::corrupted();
    };

    let label = format!("{}/{}", success_count, RUNS_PER_PROBE);

    if success_count as usize >= RUNS_PER_PROBE {
        return CellOutcome {
            status: CellStatus::Success,
            label,
            reasons: None,
        };
    }

    let mut reasons = collect_reasons(runs, limits);
    let status = if success_count == 0 {
        if reasons.is_empty() {
            reasons.push("Unknown failure".to_string());
        }
        CellStatus::Failure
    } else {
        if reasons.is_empty() {
            reasons.push("Unknown partial failure".to_string());
        }
        CellStatus::Partial
    };

    CellOutcome {
        status,
        label,
        reasons: Some(reasons),
    }
}

/// Classify one provider report.
pub fn classify_report(report: &ProviderReport, limits: &ReasonLimits) -> CellOutcome {
    classify_summary(report.summary.as_ref(), &report.test_runs, limits)
}

fn find_report<'a>(reports: &'a [ProviderReport], provider: &str) -> Option<&'a ProviderReport> {
    reports.iter().find(|r| r.provider_name == provider)
}

/// Classify one (record, provider, capability) cell.
///
/// `record == None` means no data exists for the pairing at all. Direct
/// records answer only for the synthetic direct-platform provider; queried on
/// any other column they are absent, and provider-list records are absent on
/// the direct column for the symmetric reason.
pub fn classify_record(
    record: Option<&ModelRecord>,
    provider: &str,
    capability: Capability,
    limits: &ReasonLimits,
) -> CellOutcome {
    let Some(record) = record else {
        return CellOutcome::absent();
    };

    match record {
        ModelRecord::Direct(direct) => {
            if provider != DIRECT_PROVIDER {
                return CellOutcome::absent();
            }
            match capability {
                Capability::ToolCalls => match &direct.summary {
                    Some(summary) => classify_summary(Some(summary), &direct.test_runs, limits),
                    None => CellOutcome::absent(),
                },
                Capability::StructuredOutput => match direct.structured_output.first() {
                    Some(report) => {
                        classify_summary(report.summary.as_ref(), &report.test_runs, limits)
                    }
                    None => CellOutcome::absent(),
                },
            }
        }
        ModelRecord::ProviderList(listed) => {
            let reports = match capability {
                Capability::ToolCalls => &listed.providers,
                Capability::StructuredOutput => match &listed.structured_output {
                    Some(reports) => reports,
                    None => return CellOutcome::absent(),
                },
            };
            match find_report(reports, provider) {
                Some(report) => classify_report(report, limits),
                None => CellOutcome::absent(),
            }
        }
    }
}
