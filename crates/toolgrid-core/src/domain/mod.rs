//! Domain models for toolgrid.
//!
//! Canonical definitions for the core entities:
//! - `TestRun` / `RunSummary`: one probe attempt and its 3-run aggregate
//! - `ModelRecord`: per-model results in provider-list or direct shape
//! - `ResultDocument`: everything one probe pass recorded for one source
//! - `IdentityTable`: canonical model names across source platforms

pub mod document;
pub mod identity;
pub mod record;
pub mod run;

// Re-export main types
pub use document::ResultDocument;
pub use identity::{IdentityTable, PlatformIds};
pub use record::{CapabilityReport, DirectRecord, ModelRecord, ProviderListRecord, ProviderReport};
pub use run::{Capability, RunStatus, RunSummary, TestRun, ToolCallRecord, RUNS_PER_PROBE};
