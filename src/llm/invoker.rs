//! Bounded retry with exponential backoff around a [`CompletionClient`].
//!
//! [`CompletionInvoker::invoke`] makes up to `max_retries` attempts.  After
//! each failed attempt it waits `initial_backoff`, `2 × initial_backoff`,
//! `4 × initial_backoff`, … before trying again; there is no jitter and no
//! concurrent attempt.  The wait is a `tokio::time::sleep`, so other requests
//! keep running on the same worker.
//!
//! The result is a [`CompletionOutcome`]: exhausting the retries is a normal
//! `Failure` value, never a panic or an `Err`.  A success status whose body
//! carries no usable text is returned at once as `Malformed`; repeating the
//! same request would only repeat the same reply.

use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::llm::client::{ChatMessage, Completion, CompletionClient, CompletionRequest, Usage};

/// Error text reported when every attempt failed.
pub const MAX_RETRIES_EXCEEDED: &str = "max retries exceeded";

// ---------------------------------------------------------------------------
// CompletionOutcome
// ---------------------------------------------------------------------------

/// Normalised result of [`CompletionInvoker::invoke`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Success(Completion),
    /// Every attempt failed.
    Failure { error: String },
    /// The service answered with a success status but an unusable body.
    Malformed { error: String },
}

impl CompletionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionOutcome::Success(_))
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            CompletionOutcome::Success(c) => Some(&c.content),
            _ => None,
        }
    }

    pub fn usage(&self) -> Option<&Usage> {
        match self {
            CompletionOutcome::Success(c) => c.usage.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CompletionOutcome::Success(_) => None,
            CompletionOutcome::Failure { error } | CompletionOutcome::Malformed { error } => {
                Some(error)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionInvoker
// ---------------------------------------------------------------------------

/// Sends assembled prompts to the completion service, retrying failures.
#[derive(Clone)]
pub struct CompletionInvoker {
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    result_format: Option<String>,
    max_retries: u32,
    initial_backoff: Duration,
}

impl CompletionInvoker {
    pub fn new(client: Arc<dyn CompletionClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            result_format: config.result_format.clone(),
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff(),
        }
    }

    /// Override the first backoff delay.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Invoke with the configured retry bound.
    pub async fn invoke(&self, instruction: &str, content: &str) -> CompletionOutcome {
        self.invoke_with_retries(instruction, content, self.max_retries)
            .await
    }

    /// Invoke with an explicit retry bound (total attempts).
    pub async fn invoke_with_retries(
        &self,
        instruction: &str,
        content: &str,
        max_retries: u32,
    ) -> CompletionOutcome {
        let request = self.build_request(instruction, content);
        let mut backoff = self.initial_backoff;

        for attempt in 1..=max_retries {
            match self.client.complete(&request).await {
                Ok(completion) => {
                    if let Some(usage) = &completion.usage {
                        log::debug!(
                            "completion succeeded on attempt {attempt} ({} tokens)",
                            usage.total_tokens
                        );
                    }
                    return CompletionOutcome::Success(completion);
                }
                Err(e) if !e.is_retryable() => {
                    log::warn!("completion attempt {attempt} returned an unusable reply: {e}");
                    return CompletionOutcome::Malformed {
                        error: e.to_string(),
                    };
                }
                Err(e) => {
                    log::warn!("completion attempt {attempt}/{max_retries} failed: {e}");
                }
            }

            log::warn!("retrying in {:?}", backoff);
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }

        CompletionOutcome::Failure {
            error: MAX_RETRIES_EXCEEDED.to_string(),
        }
    }

    fn build_request(&self, instruction: &str, content: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(instruction), ChatMessage::user(content)],
            result_format: self.result_format.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
