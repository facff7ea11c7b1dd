//! Test run outcomes and per-provider summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of attempts recorded per (model, provider, capability) probe.
pub const RUNS_PER_PROBE: usize = 3;

/// Which capability a probe exercised.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ToolCalls,
    StructuredOutput,
}

/// Outcome kind of a single test run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The model produced the expected tool call / schema-conforming payload.
    Success,
    /// The request itself failed (transport or API error).
    Error,
    /// The model returned an empty response.
    Unclear,
    /// The model answered in prose instead of calling the tool.
    NoToolCall,
    /// The response body was not parseable JSON.
    InvalidJson,
    /// The response parsed but did not match the requested schema.
    InvalidSchema,
    /// Placeholder for runs that never completed.
    Unknown,
}

impl RunStatus {
    /// Whether this status is one of the malformed-response kinds.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            RunStatus::NoToolCall | RunStatus::InvalidJson | RunStatus::InvalidSchema
        )
    }
}

/// A recorded tool call extracted from a model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRecord {
    /// Call id assigned by the API, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Tool/function name the model invoked.
    pub name: String,

    /// Raw JSON argument string as returned by the model.
    pub arguments: String,
}

/// One attempt against a (model, provider) pair for one capability.
///
/// Immutable once recorded; produced by the probing layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRun {
    /// Outcome kind.
    pub status: RunStatus,

    /// Error text when `status == Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Raw response body when the model answered in text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_content: Option<String>,

    /// Tool calls the model made, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,

    /// Finish reason reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// When the attempt completed.
    pub timestamp: DateTime<Utc>,
}

impl TestRun {
    /// Create a run with the given status, stamped now.
    pub fn new(status: RunStatus) -> Self {
        Self {
            status,
            error: None,
            response_content: None,
            tool_calls: None,
            finish_reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach error text.
    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    /// Attach the raw response body.
    pub fn with_content(mut self, content: String) -> Self {
        self.response_content = Some(content);
        self
    }

    /// Attach recorded tool calls.
    pub fn with_tool_calls(mut self, calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = Some(calls);
        self
    }

    /// Attach the finish reason.
    pub fn with_finish_reason(mut self, reason: String) -> Self {
        self.finish_reason = Some(reason);
        self
    }
}

/// Aggregate of the runs recorded for one (model, provider, capability) triple.
///
/// # Invariants
///
/// `success_count` must equal the number of `Success` runs in the literal run
/// list it was built from; the classification engine never re-derives it.
/// A summary deserialized without `success_count` is the corrupted-data
/// sentinel and classifies as `"?"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of attempts (always [`RUNS_PER_PROBE`] for probe output).
    pub total_runs: u32,

    /// Successful attempts. `None` signals upstream data corruption.
    #[serde(default)]
    pub success_count: Option<u32>,

    /// Attempts that failed at the request level.
    #[serde(default)]
    pub error_count: u32,

    /// Attempts that produced an empty response.
    #[serde(default)]
    pub unclear_count: u32,

    /// Tool-calling probes: attempts answered in prose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_tool_call_count: Option<u32>,

    /// Structured-output probes: attempts with unparsable or off-schema JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_count: Option<u32>,
}

impl RunSummary {
    /// Derive a summary from the literal run list for the given capability.
    pub fn from_runs(runs: &[TestRun], capability: Capability) -> Self {
        let count = |pred: fn(&RunStatus) -> bool| -> u32 {
            runs.iter().filter(|r| pred(&r.status)).count() as u32
        };

        let success = count(|s| *s == RunStatus::Success);
        let error = count(|s| *s == RunStatus::Error);
        let unclear = count(|s| *s == RunStatus::Unclear);

        let (no_tool_call, invalid) = match capability {
            Capability::ToolCalls => (Some(count(|s| *s == RunStatus::NoToolCall)), None),
            Capability::StructuredOutput => (
                None,
                Some(count(|s| {
                    matches!(s, RunStatus::InvalidJson | RunStatus::InvalidSchema)
                })),
            ),
        };

        Self {
            total_runs: runs.len() as u32,
            success_count: Some(success),
            error_count: error,
            unclear_count: unclear,
            no_tool_call_count: no_tool_call,
            invalid_count: invalid,
        }
    }
}
