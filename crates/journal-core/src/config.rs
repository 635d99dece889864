//! Journal configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/community-journal/config.toml)
//! 3. Environment variables (JOURNAL_* prefix)
//!
//! Environment variables take precedence over config file values.
//! `validate` checks the store-related rules; `EntryStore::new` calls it
//! so a bad configuration fails at construction.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::draft::DRAFT_KEY;
use crate::error::{JournalError, JournalResult};
use crate::models::FIELD_NAMES;
use crate::storage::PROBE_KEY;

/// Environment variable prefix
const ENV_PREFIX: &str = "JOURNAL";

/// Directory name used under the platform config and data dirs
const APP_DIR: &str = "community-journal";

/// Default key the journal is stored under
pub const DEFAULT_STORAGE_KEY: &str = "communityLogEntries";

/// Default maximum length of a single text field, in characters
pub const DEFAULT_MAX_FIELD_LENGTH: i64 = 2000;

/// Journal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for file-backed storage
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the entry collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Maximum length of any submitted text field
    #[serde(default = "default_max_field_length")]
    pub max_field_length: i64,

    /// Fields that must be present and non-blank
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            max_field_length: default_max_field_length(),
            required_fields: default_required_fields(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // JOURNAL_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // JOURNAL_STORAGE_KEY
        if let Ok(val) = std::env::var(format!("{}_STORAGE_KEY", ENV_PREFIX)) {
            self.storage_key = val;
        }

        // JOURNAL_MAX_FIELD_LENGTH
        if let Ok(val) = std::env::var(format!("{}_MAX_FIELD_LENGTH", ENV_PREFIX)) {
            match val.trim().parse() {
                Ok(n) => self.max_field_length = n,
                Err(_) => warn!("Ignoring non-numeric {}_MAX_FIELD_LENGTH={:?}", ENV_PREFIX, val),
            }
        }
    }

    /// Check every store rule, reporting all violations at once
    pub fn validate(&self) -> JournalResult<()> {
        let mut errors = Vec::new();

        let key = self.storage_key.trim();
        if key.is_empty() {
            errors.push("storage_key must be a non-empty string.".to_string());
        } else if key == DRAFT_KEY || key == PROBE_KEY {
            errors.push(format!("storage_key '{}' is reserved.", key));
        }
        if self.max_field_length <= 0 {
            errors.push("max_field_length must be a positive number.".to_string());
        }
        if self.required_fields.is_empty() {
            errors.push("required_fields must be a non-empty list.".to_string());
        }
        for field in &self.required_fields {
            if !FIELD_NAMES.contains(&field.as_str()) {
                errors.push(format!(
                    "required_fields contains unknown field '{}' (expected one of: {}).",
                    field,
                    FIELD_NAMES.join(", ")
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(JournalError::ConfigInvalid(errors))
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with JOURNAL_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_max_field_length() -> i64 {
    DEFAULT_MAX_FIELD_LENGTH
}

fn default_required_fields() -> Vec<String> {
    vec![
        "title".to_string(),
        "summary".to_string(),
        "commitments".to_string(),
    ]
}
