//! User-level configuration for phishguard
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/phishguard/config.toml (or `$PHISHGUARD_CONFIG`)

use crate::engine::{EngineConfig, DEFAULT_MAX_INPUT_BYTES, DEFAULT_PREVIEW_CHARS};
use crate::history::paths::{default_data_dir, DATA_DIR_ENV};
use crate::history::DEFAULT_HISTORY_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "PHISHGUARD_CONFIG";

/// Overrides `[history] limit`
pub const HISTORY_LIMIT_ENV: &str = "PHISHGUARD_HISTORY_LIMIT";

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub history: HistorySection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSection {
    /// Reject emails larger than this many bytes
    pub max_input_bytes: Option<usize>,

    /// Characters of the email kept on each stored result
    pub preview_chars: Option<usize>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistorySection {
    /// Number of analyses kept in history
    pub limit: Option<usize>,

    /// Where history.json and stats.json live
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSection {
    /// Default report format: text, markdown, json
    pub format: Option<String>,

    /// Strip emoji from reports
    pub no_emoji: Option<bool>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/phishguard/config.toml)
    pub fn load() -> Self {
        let path = Self::user_config_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load from an explicit file and environment lookup
    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = UserConfig::default();

        if let Some(path) = path.filter(|p| p.exists()) {
            match Self::read_file(path) {
                Ok(file_config) => {
                    debug!("Loaded config from {}", path.display());
                    config.merge(file_config);
                }
                Err(e) => warn!("Ignoring config file: {:#}", e),
            }
        }

        // Environment variables override the file
        if let Some(dir) = env(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.history.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = env(HISTORY_LIMIT_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.history.limit = Some(limit),
                _ => warn!("Ignoring {}={:?}: expected a positive integer", HISTORY_LIMIT_ENV, raw),
            }
        }

        config
    }

    fn read_file(path: &Path) -> Result<UserConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|p| p.join("phishguard").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.engine.max_input_bytes.is_some() {
            self.engine.max_input_bytes = other.engine.max_input_bytes;
        }
        if other.engine.preview_chars.is_some() {
            self.engine.preview_chars = other.engine.preview_chars;
        }
        if other.history.limit.is_some() {
            self.history.limit = other.history.limit;
        }
        if other.history.data_dir.is_some() {
            self.history.data_dir = other.history.data_dir;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.no_emoji.is_some() {
            self.output.no_emoji = other.output.no_emoji;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_input_bytes: self.engine.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES),
            preview_chars: self.engine.preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history
            .limit
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.history.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn output_format(&self) -> &str {
        self.output.format.as_deref().unwrap_or("text")
    }

    pub fn no_emoji(&self) -> bool {
        self.output.no_emoji.unwrap_or(false)
    }

    /// Initialize user config directory and create example config.
    /// Returns the path and whether a new file was written.
    pub fn init_user_config() -> Result<(PathBuf, bool)> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        let created = Self::init_at(&config_path)?;
        Ok((config_path, created))
    }

    /// Write the example config to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn init_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let example = r#"# PhishGuard User Configuration

[engine]
# Reject emails larger than this (bytes)
# max_input_bytes = 262144

# Characters of each email kept in history
# preview_chars = 100

[history]
# Number of analyses to keep (env: PHISHGUARD_HISTORY_LIMIT)
# limit = 20

# Where history.json and stats.json are stored (env: PHISHGUARD_DATA_DIR)
# data_dir = "/path/to/phishguard-data"

[output]
# Default report format: "text", "markdown" or "json"
# format = "text"

# Strip emoji from reports (cleaner for logs)
# no_emoji = false
"#;
        std::fs::write(path, example)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert_eq!(config.engine_config(), EngineConfig::default());
        assert_eq!(config.history_limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.output_format(), "text");
        assert!(!config.no_emoji());
    }

    #[test]
    fn test_toml_parsing_all_sections() {
        let toml_str = r#"
[engine]
max_input_bytes = 1024
preview_chars = 40

[history]
limit = 5
data_dir = "/tmp/pg"

[output]
format = "json"
no_emoji = true
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine_config().max_input_bytes, 1024);
        assert_eq!(config.engine_config().preview_chars, 40);
        assert_eq!(config.history_limit(), 5);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/pg"));
        assert_eq!(config.output_format(), "json");
        assert!(config.no_emoji());
    }

    #[test]
    fn test_toml_parsing_minimal() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [[ not valid toml {{{}}}").unwrap();
        let config = UserConfig::load_from(Some(&path), no_env);
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nlimit = 5\ndata_dir = \"/from/file\"\n").unwrap();

        let env = |key: &str| match key {
            DATA_DIR_ENV => Some("/from/env".to_string()),
            HISTORY_LIMIT_ENV => Some("7".to_string()),
            _ => None,
        };
        let config = UserConfig::load_from(Some(&path), env);
        assert_eq!(config.data_dir(), PathBuf::from("/from/env"));
        assert_eq!(config.history_limit(), 7);
    }

    #[test]
    fn test_bad_env_limit_is_ignored() {
        let env = |key: &str| (key == HISTORY_LIMIT_ENV).then(|| "zero".to_string());
        let config = UserConfig::load_from(None, env);
        assert_eq!(config.history_limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_merge_preserves_base_when_other_is_none() {
        let mut base = UserConfig {
            output: OutputSection {
                format: Some("markdown".to_string()),
                no_emoji: None,
            },
            ..Default::default()
        };
        base.merge(UserConfig::default());
        assert_eq!(base.output_format(), "markdown");
    }

    #[test]
    fn test_init_writes_parseable_example_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(UserConfig::init_at(&path).unwrap());
        assert!(!UserConfig::init_at(&path).unwrap());

        let config = UserConfig::load_from(Some(&path), no_env);
        assert_eq!(config, UserConfig::default());
    }
}
