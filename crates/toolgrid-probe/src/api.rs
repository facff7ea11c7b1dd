//! Minimal OpenAI-compatible chat-completions client.
//!
//! All three source platforms speak the same wire dialect; the only
//! platform-specific pieces are the base URL, the router's provider-pinning
//! body field, and the hub's `model:provider` addressing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Probe transport and API errors.
///
/// These are the only conditions a checker treats as `Err`; a completed
/// request with an unexpected body becomes a `TestRun` value instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("http transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed api payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// One chat message in the request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
///
/// Tools and response formats are free-form JSON schemas, kept as `Value`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,

    /// Router-only routing constraint (`{"only": ["<provider>"]}`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Value>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: 1000,
            tools: None,
            response_format: None,
            provider: None,
        }
    }

    /// Pin the request to a single serving provider (router sources).
    pub fn with_provider_only(mut self, provider_name: &str) -> Self {
        self.provider = Some(serde_json::json!({ "only": [provider_name] }));
        self
    }
}

/// A tool call in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: ApiFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// The assistant message in the response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Chat-completions response body (the subset the probes read).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// HTTP client for one platform endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    /// `base_url` includes the API version segment (e.g. `https://host/api/v1`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a chat-completions request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProbeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// GET a JSON endpoint relative to the base URL (discovery calls).
    pub async fn get_json(&self, path: &str) -> Result<Value, ProbeError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
