//! Translation request and result types.

use serde::{Deserialize, Serialize};

use crate::lang::{Language, AUTO};
use crate::llm::ContextPair;
use crate::terminology::TermEntry;

use super::error::TranslateError;

fn default_source_language() -> String {
    AUTO.to_string()
}

fn default_use_terminology() -> bool {
    true
}

/// One translation call as received at the boundary.
///
/// Missing `text` / `target_language` deserialise as empty strings so that
/// [`validate`](Self::validate) can reject them with a readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    #[serde(default)]
    pub text: String,
    /// A language code, or `"auto"` to detect from `text`.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub context: Option<Vec<ContextPair>>,
    #[serde(default = "default_use_terminology")]
    pub use_terminology: bool,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: default_source_language(),
            target_language: target_language.into(),
            context: None,
            use_terminology: true,
        }
    }

    pub fn with_source(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    pub fn with_context(mut self, context: Vec<ContextPair>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn without_terminology(mut self) -> Self {
        self.use_terminology = false;
        self
    }

    /// Context pairs, empty when none were supplied.
    pub fn context(&self) -> &[ContextPair] {
        self.context.as_deref().unwrap_or_default()
    }

    /// Reject requests that cannot be translated before any remote call.
    pub fn validate(&self) -> Result<(), TranslateError> {
        if self.target_language.trim().is_empty() {
            return Err(TranslateError::Validation(
                "target_language is required".into(),
            ));
        }
        if self.source_language.trim().is_empty() {
            return Err(TranslateError::Validation(
                "source_language must be a language code or \"auto\"".into(),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(TranslateError::Validation("text must not be empty".into()));
        }
        Ok(())
    }
}

/// A completed translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Set only when the source language was `"auto"`.
    pub detected_language: Option<Language>,
    pub terminology_matches: Vec<TermEntry>,
}
