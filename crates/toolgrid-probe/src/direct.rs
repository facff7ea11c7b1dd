//! Direct-platform checker.
//!
//! The compute platform serves each model itself, so there is no provider
//! dimension: three tool-calling runs and three structured-output runs per
//! model, recorded at the top level of the model record.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::info;

use toolgrid_core::{
    Capability, CapabilityReport, DirectRecord, IdentityTable, ModelRecord, ResultDocument,
    RunStatus, RunSummary, Source, TestRun, RUNS_PER_PROBE,
};

use crate::api::ChatClient;
use crate::scenario::{evaluate_run, structured_output_request, tool_call_request};
use crate::PlatformChecker;

/// Default concurrent-request limit; lower than the router/hub limits because
/// the platform rate-limits aggressively.
pub const DIRECT_CONCURRENCY: usize = 3;

/// Checker for the direct compute-platform source.
pub struct DirectChecker {
    client: ChatClient,
    semaphore: Arc<Semaphore>,
}

impl DirectChecker {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: ChatClient::new(base_url, api_key),
            semaphore: Arc::new(Semaphore::new(DIRECT_CONCURRENCY)),
        }
    }

    /// Override the concurrent-request limit.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    async fn run_once(&self, model_id: &str, capability: Capability) -> TestRun {
        let request = match capability {
            Capability::ToolCalls => tool_call_request(model_id),
            Capability::StructuredOutput => structured_output_request(model_id),
        };

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return TestRun::new(RunStatus::Error).with_error("probe semaphore closed".into())
            }
        };

        evaluate_run(capability, self.client.chat(&request).await)
    }

    async fn probe_capability(&self, model_id: &str, capability: Capability) -> Vec<TestRun> {
        join_all((0..RUNS_PER_PROBE).map(|_| self.run_once(model_id, capability))).await
    }

    /// Probe both capabilities of one model.
    pub async fn check_model(&self, model_id: &str, model_name: &str) -> DirectRecord {
        info!(model = model_id, name = model_name, "probing direct model");

        let tool_runs = self.probe_capability(model_id, Capability::ToolCalls).await;
        let structured_runs = self
            .probe_capability(model_id, Capability::StructuredOutput)
            .await;

        DirectRecord {
            model_id: model_id.to_string(),
            model_name: Some(model_name.to_string()),
            summary: Some(RunSummary::from_runs(&tool_runs, Capability::ToolCalls)),
            test_runs: tool_runs,
            structured_output: vec![CapabilityReport {
                summary: Some(RunSummary::from_runs(
                    &structured_runs,
                    Capability::StructuredOutput,
                )),
                test_runs: structured_runs,
                timestamp: Some(Utc::now()),
            }],
            timestamp: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl PlatformChecker for DirectChecker {
    fn source(&self) -> Source {
        Source::Direct
    }

    async fn check(&self, identity: &IdentityTable) -> ResultDocument {
        let mut records = Vec::new();
        for (canonical, ids) in identity.iter() {
            if let Some(model_id) = &ids.direct {
                records.push(ModelRecord::Direct(self.check_model(model_id, canonical).await));
            }
        }
        ResultDocument::new(records)
    }
}
