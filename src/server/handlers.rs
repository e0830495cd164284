//! HTTP handlers.
//!
//! Failures are reported as `{ "detail": "..." }` with the original cause in
//! the message: 400 for malformed requests, 500 for everything else.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::terminology::{TermEntry, TerminologyError};
use crate::translate::{TranslateError, TranslationRequest, TranslationResult};

use super::AppState;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// A failure rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    fn bad_request(detail: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail,
        }
    }
}

impl From<TranslateError> for ApiError {
    fn from(e: TranslateError) -> Self {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: format!("translation error: {e}"),
        }
    }
}

impl From<TerminologyError> for ApiError {
    fn from(e: TerminologyError) -> Self {
        let status = match e {
            TerminologyError::EmptyTerm => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: format!("terminology error: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "translation service is running" }))
}

/// Liveness probe.  Constant payload, no side effects.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(request) = payload.map_err(|e| TranslateError::Validation(e.body_text()))?;
    log::info!(
        "POST /translate ({} chars, {} → {})",
        request.text.chars().count(),
        request.source_language,
        request.target_language
    );
    let result = state.translator.translate(&request).await?;
    Ok(Json(result))
}

pub async fn list_terminology(State(state): State<Arc<AppState>>) -> Json<Vec<TermEntry>> {
    Json(state.translator.terminology().entries())
}

/// Insert or update one entry.  The rebuild and file write run on the
/// blocking pool.
pub async fn upsert_terminology(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TermEntry>, JsonRejection>,
) -> Result<Json<TermEntry>, ApiError> {
    let Json(entry) = payload.map_err(|e| {
        ApiError::bad_request(format!("terminology error: invalid entry: {}", e.body_text()))
    })?;
    let terminology = state.translator.terminology().clone();
    let stored = entry.clone();

    tokio::task::spawn_blocking(move || {
        terminology.add_or_update(&stored.term, &stored.translation)
    })
    .await
    .map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: format!("terminology update task failed: {e}"),
    })??;

    Ok(Json(entry))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
