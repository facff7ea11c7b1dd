//! toolgrid Core Library
//!
//! The result aggregation and status classification engine: reconciles raw,
//! inconsistently-shaped per-provider test-run documents from the router,
//! hub, and direct-platform sources into one ordered, comparable matrix view.
//!
//! The engine is a pure function from immutable input documents to an
//! immutable unified view: no I/O (outside the [`store`] helpers), no shared
//! state, and a valid [`classify::CellOutcome`] for every input permutation.

pub mod classify;
pub mod domain;
pub mod merge;
pub mod normalize;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod unify;

pub use classify::{classify_record, classify_report, CellOutcome, CellStatus, ReasonLimits};
pub use domain::{
    Capability, CapabilityReport, DirectRecord, IdentityTable, ModelRecord, PlatformIds,
    ProviderListRecord, ProviderReport, ResultDocument, RunStatus, RunSummary, TestRun,
    ToolCallRecord, RUNS_PER_PROBE,
};
pub use merge::{classify_bundle, VariantBundle};
pub use normalize::{normalize_document, normalize_provider_name};
pub use registry::{ProviderRegistry, DIRECT_PROVIDER};
pub use store::{load_document, load_document_opt, load_identity_table, write_document};
pub use telemetry::init_tracing;
pub use unify::{
    build_unified_entries, split_variants, ModelData, Source, UnifiedModelEntry,
    FREE_VARIANT_SUFFIX,
};

/// toolgrid version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
