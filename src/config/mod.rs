//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{NO_SHOW, UNKNOWN_DECK};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Defaults applied to dashboard views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Event types selected when none are given
    #[serde(default = "default_event_types")]
    pub default_event_types: Vec<String>,

    /// Decimal places for percentages in card output
    #[serde(default = "default_percent_precision")]
    pub percent_precision: usize,

    /// Placeholder deck names the dataset uses
    #[serde(default = "default_sentinel_decks")]
    pub sentinel_decks: Vec<String>,
}

fn default_event_types() -> Vec<String> {
    vec!["offline".to_string()]
}

fn default_percent_precision() -> usize {
    1
}

fn default_sentinel_decks() -> Vec<String> {
    vec![UNKNOWN_DECK.to_string(), NO_SHOW.to_string()]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_event_types: default_event_types(),
            percent_precision: default_percent_precision(),
            sentinel_decks: default_sentinel_decks(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/results.jsonl")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data_file must not be empty".to_string(),
            ));
        }

        if self.dashboard.default_event_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one default event type is required".to_string(),
            ));
        }

        if self.dashboard.percent_precision > 4 {
            return Err(ConfigError::ValidationError(
                "percent_precision must be between 0 and 4".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_file, PathBuf::from("./data/results.jsonl"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.dashboard.default_event_types, vec!["offline"]);
        assert_eq!(config.dashboard.percent_precision, 1);
        assert_eq!(config.dashboard.sentinel_decks, vec!["UNKNOWN", "No Show"]);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_no_event_types() {
        let mut config = AppConfig::default();
        config.dashboard.default_event_types.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_precision() {
        let mut config = AppConfig::default();
        config.dashboard.percent_precision = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_empty_data_file() {
        let mut config = AppConfig::default();
        config.data_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_file = \"/srv/results.jsonl\"").unwrap();
        writeln!(file, "[dashboard]").unwrap();
        writeln!(file, "default_event_types = [\"offline\", \"online\"]").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/results.jsonl"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.dashboard.default_event_types.len(), 2);
        assert_eq!(config.dashboard.percent_precision, 1);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_file = ").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_file, parsed.data_file);
        assert_eq!(
            config.dashboard.default_event_types,
            parsed.dashboard.default_event_types
        );
    }
}
