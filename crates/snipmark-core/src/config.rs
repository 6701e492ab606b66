//! Snipmark configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` on each section fills missing fields from
//! `Default::default()`, so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use snipmark_highlight::{Vocabulary, VocabularyError};
use snipmark_store::StoreConfig;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Highlighting settings
    pub highlight: HighlightConfig,

    /// Snippet store settings
    pub store: StoreSection,

    /// Page rendering settings
    pub render: RenderConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("snipmark").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Builds the vocabulary: built-in tables plus configured extras.
    pub fn vocabulary(&self) -> Result<Vocabulary, VocabularyError> {
        Vocabulary::extended(
            self.highlight.extra_keywords.as_slice(),
            self.highlight.extra_globals.as_slice(),
        )
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.highlight.debounce_ms)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            ttl: Duration::from_secs(self.store.ttl_secs),
            list_limit: self.store.list_limit,
            id_length: self.store.id_length,
        }
    }
}

/// Highlighting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Words highlighted as keywords on top of the built-in set
    pub extra_keywords: Vec<String>,

    /// Words highlighted as platform globals on top of the built-in set
    pub extra_globals: Vec<String>,

    /// Quiet period after the last edit before re-highlighting (ms)
    pub debounce_ms: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            extra_keywords: Vec::new(),
            extra_globals: Vec::new(),
            debounce_ms: 500,
        }
    }
}

/// Snippet store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Snippet lifetime in seconds
    pub ttl_secs: u64,

    /// Maximum ids per listing
    pub list_limit: usize,

    /// Generated id length
    pub id_length: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        let defaults = StoreConfig::default();
        Self {
            ttl_secs: defaults.ttl.as_secs(),
            list_limit: defaults.list_limit,
            id_length: defaults.id_length,
        }
    }
}

/// Page rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title of rendered HTML pages
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "snipmark".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
