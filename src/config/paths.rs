//! Where the service keeps its files.
//!
//! Everything lives under one per-user directory resolved with `dirs`
//! (`~/.config/term-translate/` on Linux, `%APPDATA%\term-translate\` on
//! Windows, `~/Library/Application Support/term-translate/` on macOS):
//!
//! ```text
//! term-translate/
//! ├── settings.toml
//! └── terminology.json
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "term-translate";
const SETTINGS_FILE: &str = "settings.toml";
const TERMINOLOGY_FILE: &str = "terminology.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Default terminology store; `terminology.path` in settings overrides it.
    pub terminology_file: PathBuf,
}

impl AppPaths {
    /// Paths under the platform config directory, or `./term-translate`
    /// when the platform has none.
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under(base.join(APP_DIR))
    }

    /// Paths rooted at an explicit directory.
    pub fn under(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            terminology_file: config_dir.join(TERMINOLOGY_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_paths_end_in_app_dir() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert!(paths.terminology_file.starts_with(&paths.config_dir));
    }

    #[test]
    fn under_places_both_files_in_root() {
        let paths = AppPaths::under("/srv/tt");
        assert_eq!(paths.settings_file, PathBuf::from("/srv/tt/settings.toml"));
        assert_eq!(
            paths.terminology_file,
            PathBuf::from("/srv/tt/terminology.json")
        );
    }
}
