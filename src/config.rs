//! Configuration file parser for ~/.config/emoji-picker/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as likely typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::dataset::LoadPolicy;

/// Dataset file looked up in the config directory when `dataset` is unset.
pub const DEFAULT_DATASET_FILE: &str = "categories.min.json";
pub const DEFAULT_DATABASE_FILE: &str = "picker.db";
pub const DEFAULT_POPULAR_KEY: &str = "popularEmojis";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds the maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Any subset of keys can be specified; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset URL (`http`/`https`) or file path.
    /// Default: `<config dir>/categories.min.json`.
    pub dataset: Option<String>,

    /// Failure policy. When unset each front-end picks its own default.
    pub load_policy: Option<LoadPolicy>,

    /// Quiet period before a search keystroke re-filters, in milliseconds.
    pub search_debounce_ms: u64,

    /// SQLite file for the key-value store. Default: `<config dir>/picker.db`.
    pub database: Option<PathBuf>,

    /// Storage key holding the popular selection.
    pub popular_key: String,

    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: None,
            load_policy: None,
            search_debounce_ms: 300,
            database: None,
            popular_key: DEFAULT_POPULAR_KEY.to_string(),
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "dataset",
        "load_policy",
        "search_debounce_ms",
        "database",
        "popular_key",
        "fetch_timeout_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file is never pulled into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            dataset = ?config.dataset,
            load_policy = ?config.load_policy,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The configured dataset source, or the default file in `config_dir`.
    pub fn dataset_source(&self, config_dir: &Path) -> String {
        match &self.dataset {
            Some(dataset) if !dataset.trim().is_empty() => dataset.clone(),
            _ => config_dir.join(DEFAULT_DATASET_FILE).display().to_string(),
        }
    }

    pub fn database_path(&self, config_dir: &Path) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| config_dir.join(DEFAULT_DATABASE_FILE))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Fetch timeout, never below one second.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

// ============================================================================
// Tests
// ============================================================================
