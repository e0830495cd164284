//! Configuration: [`AppConfig`] and its per-subsystem sections, loaded from
//! `settings.toml` under [`AppPaths`].

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, LlmConfig, Segmentation, ServerConfig, TerminologyConfig};
