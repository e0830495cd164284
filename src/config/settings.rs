//! Service settings: listen address, completion endpoint, terminology
//! search parameters.  Persisted as TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Listen address for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the remote completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible endpoint; `/v1/chat/completions` is
    /// appended.
    pub base_url: String,
    /// Literal API key.  Takes precedence over `api_key_env` when non-empty.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature.  Kept low so translations stay literal.
    pub temperature: f32,
    /// Maximum output tokens per completion.
    pub max_tokens: u32,
    /// Provider-specific response-format flag (`"message"` for DashScope).
    pub result_format: Option<String>,
    /// Per-attempt HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Total number of attempts made by the completion invoker.
    pub max_retries: u32,
    /// First backoff delay in milliseconds; doubled after each failure.
    pub initial_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dashscope.aliyuncs.com/compatible-mode".into(),
            api_key: None,
            api_key_env: "DASHSCOPE_API_KEY".into(),
            model: "qwen-plus".into(),
            temperature: 0.3,
            max_tokens: 4096,
            result_format: Some("message".into()),
            timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 1000,
        }
    }
}

impl LlmConfig {
    /// Resolve the credential: the literal `api_key` first, then the
    /// environment variable named by `api_key_env`.  Empty values count as
    /// absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// Returns `true` when a credential is available.
    ///
    /// A missing credential is not fatal: the service still starts and
    /// requests fail at invocation time.
    pub fn has_credentials(&self) -> bool {
        self.resolve_api_key().is_some()
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

// ---------------------------------------------------------------------------
// TerminologyConfig
// ---------------------------------------------------------------------------

/// How `batch_search` splits input text into segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmentation {
    /// Split on the literal `". "` separator only.
    #[default]
    Literal,
    /// Also split on CJK sentence punctuation and newlines.
    LanguageAware,
}

/// Settings for the terminology store and fuzzy matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyConfig {
    /// Terminology JSON file.  `None` means `<config dir>/terminology.json`.
    pub path: Option<PathBuf>,
    /// Minimum similarity (exclusive) for a match to be kept.
    pub threshold: f32,
    /// Upper bound on matches per search segment.
    pub max_results: usize,
    pub segmentation: Segmentation,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            path: None,
            threshold: 0.3,
            max_results: 5,
            segmentation: Segmentation::default(),
        }
    }
}

impl TerminologyConfig {
    /// The effective store location.
    pub fn store_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppPaths::new().terminology_file)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Everything `settings.toml` can hold.  Missing sections and keys fall
/// back to their defaults, so a file only needs the values it changes.
///
/// ```rust,no_run
/// use term_translate::config::AppConfig;
///
/// let config = AppConfig::load().unwrap();
/// println!("listening on {}", config.server.bind_addr());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub terminology: TerminologyConfig,
}

impl AppConfig {
    /// Read `settings.toml` from the per-user config directory.  A missing
    /// file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Write as TOML, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let rendered = toml::to_string_pretty(self)?;
        std::fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
