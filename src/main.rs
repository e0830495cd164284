//! Application entry point: terminology-aware translation server.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Read `.env` into the process environment (if present).
//! 3. Load [`AppConfig`] from `--config <path>` or the platform config
//!    directory (returns default on first run).
//! 4. Open the terminology store and fit its search model.
//! 5. Build the completion client and retrying invoker.
//! 6. Assemble the [`Translator`] and serve HTTP until stopped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use term_translate::{
    config::AppConfig,
    llm::{ApiClient, CompletionClient, CompletionInvoker},
    server::{self, AppState},
    terminology::{SearchOptions, SharedTerminology, TerminologyIndex},
    translate::Translator,
};

/// `--config <path>` is the only recognised argument.
fn config_path_from_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => match args.next() {
            Some(path) => Ok(Some(PathBuf::from(path))),
            None => bail!("--config requires a path"),
        },
        Some(other) => bail!("unrecognised argument: {other}"),
    }
}

fn load_config(path: Option<PathBuf>) -> AppConfig {
    let loaded = match &path {
        Some(p) => AppConfig::load_from(p),
        None => AppConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("term-translate starting up");

    // 2. Environment
    if dotenv::dotenv().is_ok() {
        log::debug!("loaded .env");
    }

    // 3. Configuration
    let config = load_config(config_path_from_args()?);
    if !config.llm.has_credentials() {
        log::warn!(
            "no API key configured; set llm.api_key or {} (requests will fail upstream)",
            config.llm.api_key_env
        );
    }

    // 4. Terminology
    let store_path = config.terminology.store_path();
    let index = tokio::task::spawn_blocking(move || TerminologyIndex::open(store_path)).await?;
    log::info!(
        "terminology store {} ({} entries)",
        index.path().display(),
        index.len()
    );
    let terminology = SharedTerminology::new(index);

    // 5. Completion client
    let client: Arc<dyn CompletionClient> = Arc::new(ApiClient::from_config(&config.llm));
    let invoker = CompletionInvoker::new(client, &config.llm);

    // 6. Translator + HTTP
    let search = SearchOptions {
        threshold: config.terminology.threshold,
        max_results: config.terminology.max_results,
        segmentation: config.terminology.segmentation,
    };
    let translator = Translator::new(terminology, invoker, search);

    server::serve(&config.server, Arc::new(AppState::new(translator))).await
}
