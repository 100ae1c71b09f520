//! User configuration.
//!
//! Read from `$BRANCHER_CONFIG` or `<config dir>/brancher/config.json`. Every
//! key is optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_LIMIT;
use crate::paint::ColorMode;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BRANCHER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Names pinned to id 0; the first one that exists wins.
    pub trunk_branches: Vec<String>,
    /// Number of history entries kept.
    pub history_limit: usize,
    pub color: ColorMode,
    /// List closed branches without `--list-all`.
    pub show_closed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trunk_branches: vec!["main".to_string(), "master".to_string()],
            history_limit: DEFAULT_LIMIT,
            color: ColorMode::Auto,
            show_closed: false,
        }
    }
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Path of the config file, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("brancher").join("config.json"))
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history_limit, 40);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"trunk_branches":["trunk"],"color":"never"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.trunk_branches, vec!["trunk"]);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.history_limit, DEFAULT_LIMIT);
        assert!(!config.show_closed);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
