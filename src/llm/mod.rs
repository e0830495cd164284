//! Completion-service layer.
//!
//! This module provides:
//! * [`CompletionClient`]: async trait for one remote completion call.
//! * [`ApiClient`]: OpenAI-compatible REST client (DashScope compatible mode
//!   by default).
//! * [`CompletionInvoker`]: bounded retries with exponential backoff,
//!   normalised into a [`CompletionOutcome`].
//! * [`PromptBuilder`]: assembles translator instructions from language
//!   pair, terminology hits and context pairs.
//! * [`LlmError`]: per-attempt failure variants.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use term_translate::config::AppConfig;
//! use term_translate::llm::{ApiClient, CompletionInvoker, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let invoker = CompletionInvoker::new(Arc::new(ApiClient::from_config(&config.llm)), &config.llm);
//!
//!     let prompt = PromptBuilder::new().build("人工智能", "auto", "en", &[], &[]);
//!     let outcome = invoker.invoke(&prompt.instruction, &prompt.content).await;
//!     println!("{:?}", outcome.content());
//! }
//! ```

pub mod client;
pub mod invoker;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{
    ApiClient, ChatMessage, Completion, CompletionClient, CompletionRequest, LlmError, Usage,
};
pub use invoker::{CompletionInvoker, CompletionOutcome, MAX_RETRIES_EXCEEDED};
pub use prompt::{ContextPair, PromptBuilder, TranslationPrompt};
