//! Completion wire types, the `CompletionClient` trait and `ApiClient`.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint,
//! including DashScope's compatible mode.  All connection details come from
//! [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Failure of a single completion attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("completion request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("completion service returned {code}: {message}")]
    Status { code: String, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse completion response: {0}")]
    Parse(String),

    /// The service returned no usable text content.
    #[error("completion service returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// Transport faults and non-success statuses may clear up on a retry.
    /// A success status with an unusable body will not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Parse(_) | LlmError::EmptyResponse)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Everything the completion service needs for one call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_format: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, alias = "input_tokens")]
    pub prompt_tokens: u32,
    #[serde(default, alias = "output_tokens")]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Usage>,
}

// ---------------------------------------------------------------------------
// CompletionClient trait
// ---------------------------------------------------------------------------

/// One remote call to the completion service.  No retries at this level.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client carries the per-attempt timeout from
    /// `config.timeout_secs`.  The credential is resolved once, here.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.resolve_api_key(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ApiClient {
    /// The `Authorization: Bearer …` header is attached only when a
    /// credential was resolved.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let mut req = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        parse_completion(&body)
    }
}

/// Extract content and usage from a chat-completions body.
pub fn parse_completion(body: &str) -> Result<Completion, LlmError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;

    // DashScope native responses nest choices under "output".
    let choices = json
        .get("choices")
        .or_else(|| json.pointer("/output/choices"))
        .ok_or_else(|| LlmError::Parse("response has no choices".into()))?;

    let content = choices[0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let usage = json
        .get("usage")
        .and_then(|u| serde_json::from_value::<Usage>(u.clone()).ok());

    Ok(Completion { content, usage })
}

/// Build a `Status` error from either `{"error":{"code","message"}}` or
/// `{"code","message"}` bodies, falling back to the HTTP status.
fn status_error(status: u16, body: &str) -> LlmError {
    let json: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let err = json.get("error").unwrap_or(&json);

    let field = |name: &str| -> Option<String> {
        err.get(name).and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
    };

    LlmError::Status {
        code: field("code").unwrap_or_else(|| status.to_string()),
        message: field("message").unwrap_or_else(|| body.trim().to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
