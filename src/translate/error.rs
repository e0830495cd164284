//! Request-level failure type for the translation pipeline.

use thiserror::Error;

/// Request-level translation failure.  Never a partial result.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Malformed request; rejected before any remote call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The completion invoker gave up (retries exhausted).
    #[error("translation failed: {0}")]
    Completion(String),

    /// The completion succeeded but carried no usable translation.
    #[error("malformed completion: {0}")]
    Extraction(String),

    /// A runtime or worker task failed (blocking-path runtime startup,
    /// terminology search task).
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl TranslateError {
    /// Returns `true` for caller mistakes as opposed to service failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TranslateError::Validation(_))
    }
}
