//! Translation orchestrator: one request from detection to extracted text.
//!
//! # Flow
//!
//! ```text
//! validate
//!   └─▶ Detect            (source = "auto" only)
//!   └─▶ MatchTerminology  (use_terminology only; read lock, blocking pool)
//!   └─▶ AssemblePrompt
//!   └─▶ Invoke            (retries live in CompletionInvoker)
//!   └─▶ Extract
//!         ├─ Ok  → Done
//!         └─ Err → Failed (propagated, never retried here)
//! ```

use crate::lang::resolve_source;
use crate::llm::{CompletionInvoker, CompletionOutcome, PromptBuilder};
use crate::terminology::{SearchOptions, SharedTerminology, TermEntry};

use super::error::TranslateError;
use super::request::{TranslationRequest, TranslationResult};
use super::stage::TranslationStage;

/// Composes language detection, terminology matching, prompt assembly and
/// completion into one request/response cycle.
///
/// Holds no per-request state; a single `Translator` serves concurrent
/// requests.
#[derive(Clone)]
pub struct Translator {
    terminology: SharedTerminology,
    invoker: CompletionInvoker,
    prompt_builder: PromptBuilder,
    search: SearchOptions,
}

impl Translator {
    pub fn new(
        terminology: SharedTerminology,
        invoker: CompletionInvoker,
        search: SearchOptions,
    ) -> Self {
        Self {
            terminology,
            invoker,
            prompt_builder: PromptBuilder::new(),
            search,
        }
    }

    pub fn terminology(&self) -> &SharedTerminology {
        &self.terminology
    }

    /// Translate one request.
    ///
    /// Backoff between completion attempts is a timer await, so a slow
    /// request does not hold up others on the same runtime.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        request.validate()?;
        let mut stage = TranslationStage::Start;

        // ── Detect ──────────────────────────────────────────────────────
        let (source, detected_language) = resolve_source(&request.source_language, &request.text);
        if let Some(lang) = detected_language {
            advance(&mut stage, TranslationStage::Detect);
            log::debug!("translate: detected source language {lang}");
        }

        // ── MatchTerminology ────────────────────────────────────────────
        let terminology_matches: Vec<TermEntry> = if request.use_terminology {
            advance(&mut stage, TranslationStage::MatchTerminology);
            // The read lock can wait on a refit, so keep it off the async workers.
            let terminology = self.terminology.clone();
            let text = request.text.clone();
            let search = self.search;
            let hits =
                tokio::task::spawn_blocking(move || terminology.batch_search(&text, &search))
                    .await
                    .map_err(|e| {
                        TranslateError::Runtime(format!("terminology search task failed: {e}"))
                    })?;
            log::debug!("translate: {} terminology match(es)", hits.len());
            hits
        } else {
            Vec::new()
        };

        // ── AssemblePrompt ──────────────────────────────────────────────
        advance(&mut stage, TranslationStage::AssemblePrompt);
        let prompt = self.prompt_builder.build(
            &request.text,
            &source,
            &request.target_language,
            request.context(),
            &terminology_matches,
        );

        // ── Invoke ──────────────────────────────────────────────────────
        advance(&mut stage, TranslationStage::Invoke);
        let outcome = self.invoker.invoke(&prompt.instruction, &prompt.content).await;

        // ── Extract ─────────────────────────────────────────────────────
        advance(&mut stage, TranslationStage::Extract);
        match extract_translation(outcome) {
            Ok(translated_text) => {
                advance(&mut stage, TranslationStage::Done);
                Ok(TranslationResult {
                    translated_text,
                    detected_language,
                    terminology_matches,
                })
            }
            Err(e) => {
                advance(&mut stage, TranslationStage::Failed);
                log::error!("translate: {e}");
                Err(e)
            }
        }
    }

    /// Synchronous variant of [`translate`](Self::translate) with identical
    /// semantics.
    ///
    /// Drives the same future on a private current-thread runtime, so it
    /// must not be called from inside an async context.
    pub fn translate_blocking(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TranslateError::Runtime(e.to_string()))?;
        rt.block_on(self.translate(request))
    }
}

/// Pull the translated text out of an invoker outcome.
pub fn extract_translation(outcome: CompletionOutcome) -> Result<String, TranslateError> {
    match outcome {
        CompletionOutcome::Success(completion) => {
            if completion.content.trim().is_empty() {
                Err(TranslateError::Extraction(
                    "completion contained no text".into(),
                ))
            } else {
                Ok(completion.content)
            }
        }
        CompletionOutcome::Malformed { error } => Err(TranslateError::Extraction(error)),
        CompletionOutcome::Failure { error } => Err(TranslateError::Completion(error)),
    }
}

fn advance(stage: &mut TranslationStage, next: TranslationStage) {
    log::debug!("translate: {} → {}", stage.label(), next.label());
    *stage = next;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
