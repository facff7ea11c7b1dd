//! Router platform checker.
//!
//! The router fronts many serving providers per model. Each model's provider
//! endpoints are discovered first, then every (provider, capability) pair is
//! probed three times with the request pinned to that provider.

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

/// Default concurrent-request limit against the router API.
pub const ROUTER_CONCURRENCY: usize = 5;

/// A provider endpoint discovered for one model.
#[derive(Debug, Clone)]
struct Endpoint {
    provider_name: String,
    display_name: Option<String>,
}

/// Checker for the multi-provider router source.
pub struct RouterChecker {
    client: ChatClient,
    semaphore: Arc<Semaphore>,
}

impl RouterChecker {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: ChatClient::new(base_url, api_key),
            semaphore: Arc::new(Semaphore::new(ROUTER_CONCURRENCY)),
        }
    }

    /// Override the concurrent-request limit.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Discover the provider endpoints serving one model.
    async fn model_endpoints(&self, model_id: &str) -> Result<Vec<Endpoint>, ProbeError> {
        let Some((author, slug)) = model_id.split_once('/') else {
            warn!(model = model_id, "invalid router model id, expected author/slug");
            return Ok(Vec::new());
        };

        let value = self
            .client
            .get_json(&format!("models/{author}/{slug}/endpoints"))
            .await?;

        let mut endpoints = Vec::new();
        if let Some(list) = value.pointer("/data/endpoints").and_then(Value::as_array) {
            for entry in list {
                let Some(provider_name) = entry
                    .get("provider_name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                else {
                    continue;
                };
                endpoints.push(Endpoint {
                    provider_name: provider_name.to_string(),
                    display_name: entry
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                });
            }
        }

        Ok(endpoints)
    }

    /// One attempt against one provider. Failures become run values.
    async fn run_once(&self, model_id: &str, provider_name: &str, capability: Capability) -> TestRun {
        let request = match capability {
            Capability::ToolCalls => tool_call_request(model_id),
            Capability::StructuredOutput => structured_output_request(model_id),
        }
        .with_provider_only(provider_name);

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return TestRun::new(RunStatus::Error).with_error("probe semaphore closed".into())
            }
        };

        evaluate_run(capability, self.client.chat(&request).await)
    }

    async fn probe_provider(
        &self,
        model_id: &str,
        endpoint: &Endpoint,
        capability: Capability,
    ) -> ProviderReport {
        let runs = join_all(
            (0..RUNS_PER_PROBE).map(|_| self.run_once(model_id, &endpoint.provider_name, capability)),
        )
        .await;

        ProviderReport {
            provider_name: endpoint.provider_name.clone(),
            display_name: endpoint.display_name.clone(),
            summary: Some(RunSummary::from_runs(&runs, capability)),
            test_runs: runs,
            timestamp: Some(Utc::now()),
        }
    }

    /// Probe both capabilities of one model across all its providers.
    pub async fn check_model(&self, model_id: &str) -> ProviderListRecord {
        let endpoints = match self.model_endpoints(model_id).await {
            Ok(endpoints) => endpoints,
            Err(error) => {
                warn!(model = model_id, %error, "endpoint discovery failed");
                Vec::new()
            }
        };

        info!(
            model = model_id,
            providers = endpoints.len(),
            "probing router model"
        );

        let providers = join_all(
            endpoints
                .iter()
                .map(|ep| self.probe_provider(model_id, ep, Capability::ToolCalls)),
        )
        .await;
        let structured = join_all(
            endpoints
                .iter()
                .map(|ep| self.probe_provider(model_id, ep, Capability::StructuredOutput)),
        )
        .await;

        ProviderListRecord {
            model_id: model_id.to_string(),
            providers,
            structured_output: Some(structured),
            timestamp: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl PlatformChecker for RouterChecker {
    fn source(&self) -> Source {
        Source::Router
    }

    async fn check(&self, identity: &IdentityTable) -> ResultDocument {
        let mut records = Vec::new();
        for (_, ids) in identity.iter() {
            for model_id in &ids.router {
                records.push(ModelRecord::ProviderList(self.check_model(model_id).await));
            }
        }
        ResultDocument::new(records)
    }
}
