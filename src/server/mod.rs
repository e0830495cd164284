//! HTTP surface.
//!
//! | Method | Path           | Handler                                   |
//! |--------|----------------|-------------------------------------------|
//! | GET    | `/`            | [`handlers::root`]                        |
//! | GET    | `/health`      | [`handlers::health`]                      |
//! | POST   | `/translate`   | [`handlers::translate`]                   |
//! | GET    | `/terminology` | [`handlers::list_terminology`]            |
//! | POST   | `/terminology` | [`handlers::upsert_terminology`]          |

pub mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::translate::Translator;

pub use handlers::ApiError;

/// State shared by all handlers.
pub struct AppState {
    pub translator: Translator,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }
}

/// Build the router with permissive CORS.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/translate", post(handlers::translate))
        .route(
            "/terminology",
            get(handlers::list_terminology).post(handlers::upsert_terminology),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    log::info!("listening on http://{addr}");

    axum::serve(listener, create_router(state))
        .await
        .context("server error")?;
    Ok(())
}
