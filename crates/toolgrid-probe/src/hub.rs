//! Hub platform checker.
//!
//! The hub maps each model to the inference providers that serve it. Probes
//! go through the hub's own OpenAI-compatible gateway, addressing a specific
//! provider as `"<model_id>:<provider>"`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use toolgrid_core::{
    Capability, IdentityTable, ModelRecord, ProviderListRecord, ProviderReport, ResultDocument,
    RunStatus, RunSummary, Source, TestRun, RUNS_PER_PROBE,
};

use crate::api::{ChatClient, ProbeError};
use crate::scenario::{evaluate_run, structured_output_request, tool_call_request};
use crate::PlatformChecker;

/// Default concurrent-request limit against the hub gateway.
pub const HUB_CONCURRENCY: usize = 5;

/// Checker for the model-hub source.
pub struct HubChecker {
    /// Hub metadata API (provider-mapping discovery).
    api: ChatClient,
    /// OpenAI-compatible inference gateway.
    gateway: ChatClient,
    semaphore: Arc<Semaphore>,
}

impl HubChecker {
    /// `api_base` is the hub's metadata host, `gateway_base` the inference
    /// endpoint including its version segment.
    pub fn new(
        api_base: impl Into<String>,
        gateway_base: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let key = api_key.into();
        Self {
            api: ChatClient::new(api_base, key.clone()),
            gateway: ChatClient::new(gateway_base, key),
            semaphore: Arc::new(Semaphore::new(HUB_CONCURRENCY)),
        }
    }

    /// Override the concurrent-request limit.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Discover the inference providers serving one model.
    async fn model_providers(&self, model_id: &str) -> Result<Vec<String>, ProbeError> {
        let value = self
            .api
            .get_json(&format!(
                "api/models/{model_id}?expand[]=inferenceProviderMapping"
            ))
            .await?;

        let mut providers = Vec::new();
        if let Some(mapping) = value
            .get("inferenceProviderMapping")
            .and_then(Value::as_object)
        {
            for name in mapping.keys() {
                providers.push(name.clone());
            }
        }

        Ok(providers)
    }

    async fn run_once(&self, model_id: &str, provider: &str, capability: Capability) -> TestRun {
        // Provider addressing is part of the model slug on the hub gateway.
        let target = format!("{model_id}:{provider}");
        let request = match capability {
            Capability::ToolCalls => tool_call_request(&target),
            Capability::StructuredOutput => structured_output_request(&target),
        };

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return TestRun::new(RunStatus::Error).with_error("probe semaphore closed".into())
            }
        };

        evaluate_run(capability, self.gateway.chat(&request).await)
    }

    async fn probe_provider(
        &self,
        model_id: &str,
        provider: &str,
        capability: Capability,
    ) -> ProviderReport {
        let runs =
            join_all((0..RUNS_PER_PROBE).map(|_| self.run_once(model_id, provider, capability)))
                .await;

        ProviderReport {
            provider_name: provider.to_string(),
            display_name: None,
            summary: Some(RunSummary::from_runs(&runs, capability)),
            test_runs: runs,
            timestamp: Some(Utc::now()),
        }
    }

    /// Probe both capabilities of one model across all its providers.
    pub async fn check_model(&self, model_id: &str) -> ProviderListRecord {
        let providers = match self.model_providers(model_id).await {
            Ok(providers) => providers,
            Err(error) => {
                warn!(model = model_id, %error, "provider-mapping lookup failed");
                Vec::new()
            }
        };

        info!(
            model = model_id,
            providers = providers.len(),
            "probing hub model"
        );

        let tool_reports = join_all(
            providers
                .iter()
                .map(|p| self.probe_provider(model_id, p, Capability::ToolCalls)),
        )
        .await;
        let structured_reports = join_all(
            providers
                .iter()
                .map(|p| self.probe_provider(model_id, p, Capability::StructuredOutput)),
        )
        .await;

        ProviderListRecord {
            model_id: model_id.to_string(),
            providers: tool_reports,
            structured_output: Some(structured_reports),
            timestamp: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl PlatformChecker for HubChecker {
    fn source(&self) -> Source {
        Source::Hub
    }

    async fn check(&self, identity: &IdentityTable) -> ResultDocument {
        let mut records = Vec::new();
        for (_, ids) in identity.iter() {
            for model_id in &ids.hub {
                records.push(ModelRecord::ProviderList(self.check_model(model_id).await));
            }
        }
        ResultDocument::new(records)
    }
}
