//! toolgrid Probe Library
//!
//! Platform checkers that exercise tool-calling and structured-output support
//! against the router, hub, and direct-platform APIs, three attempts per
//! (model, provider, capability) triple, and record the outcomes as
//! [`toolgrid_core::ResultDocument`]s.
//!
//! Each attempt is exactly one request, with no retry or backoff. Request
//! failures are recorded as `error` runs, never propagated, so a probe pass
//! always produces a complete document.

pub mod api;
pub mod direct;
pub mod hub;
pub mod router;
pub mod scenario;

use async_trait::async_trait;

use toolgrid_core::{IdentityTable, ResultDocument, Source};

pub use api::{ChatClient, ChatRequest, ChatResponse, ProbeError};
pub use direct::DirectChecker;
pub use hub::HubChecker;
pub use router::RouterChecker;

/// A source-platform checker.
///
/// Implementations own their endpoint configuration and concurrency limit;
/// the identity table decides which models get probed.
#[async_trait]
pub trait PlatformChecker: Send + Sync {
    /// Which source this checker probes.
    fn source(&self) -> Source;

    /// Probe every model the identity table declares for this source.
    async fn check(&self, identity: &IdentityTable) -> ResultDocument;
}
