use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LiftRsError;
use crate::logging::LogConfig;
use crate::models::WeightUnit;
use crate::progression::PeriodizationConfig;

/// Main application configuration
///
/// Every section has defaults, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Load progression policy
    pub progression: PeriodizationConfig,

    /// Terminal output preferences
    pub display: DisplaySettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Terminal output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Unit label printed next to weights
    pub units: WeightUnit,

    /// Colour recovery statuses in terminal output
    pub color: bool,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            units: WeightUnit::Lbs,
            color: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata::default(),
            progression: PeriodizationConfig::default(),
            display: DisplaySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".liftrs")
            .join("config.toml")
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// Only a missing file at the default location falls back to defaults.
    /// An explicit path must exist, and any file found must parse.
    pub fn load_or_default(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::default_config_path();
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        Self::load_from_file(&config_path)
            .map_err(|err| LiftRsError::Configuration(format!("{:#}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_file() {
        let toml_str = r#"
            [progression]
            upper_body_increment = 2.5
            max_rpe = 8.5

            [display]
            units = "kg"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.progression.upper_body_increment, 2.5);
        assert_eq!(config.progression.max_rpe, 8.5);
        assert_eq!(config.progression.lower_body_increment, 10.0);
        assert_eq!(config.progression.target_reps, 8);
        assert_eq!(config.display.units, WeightUnit::Kg);
        assert!(config.display.color);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.progression.deload_percentage = 0.15;
        config.save_to_file(&config_path).unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.progression.deload_percentage, 0.15);
        assert_eq!(loaded.metadata.version, "1.0");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = AppConfig::load_or_default(Some(&temp_dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, LiftRsError::Configuration(_)));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_explicit_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[progression]\ndeload_percentage = \"ten\"\n").unwrap();

        let err = AppConfig::load_or_default(Some(&path)).unwrap_err();
        assert!(matches!(err, LiftRsError::Configuration(_)));
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_explicit_valid_file_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[progression]\ndeload_percentage = 0.2\n").unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.progression.deload_percentage, 0.2);
        assert_eq!(config.progression.upper_body_increment, 5.0);
    }
}
