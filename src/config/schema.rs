//! Configuration schema types
//!
//! This module defines the configuration structure for anonsearch.

use crate::adapters::oracle::StorageStrategy;
use crate::core::driver::AlgorithmKind;
use serde::{Deserialize, Serialize};

/// Main anonsearch configuration
///
/// This is the root configuration structure that maps to the TOML file. Every
/// section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonSearchConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Algorithm selection and budget
    #[serde(default)]
    pub search: SearchConfig,

    /// Snapshot cache settings used by FLASH
    #[serde(default)]
    pub flash: FlashConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonSearchConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.search.validate()?;
        self.flash.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Algorithm to run
    #[serde(default = "default_algorithm")]
    pub algorithm: AlgorithmKind,

    /// Time budget of the Lightning algorithm in milliseconds
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
}

impl SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.algorithm.uses_time_limit() && self.time_limit_ms == 0 {
            return Err(
                "search.time_limit_ms must be > 0 for lightning; use lightning-minimal to stop at the first solution"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            time_limit_ms: default_time_limit_ms(),
        }
    }
}

/// Snapshot cache configuration of the FLASH algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashConfig {
    /// Maximal number of snapshots held
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Largest snapshot as a fraction of the dataset
    #[serde(default = "default_snapshot_size_dataset")]
    pub snapshot_size_dataset: f64,

    /// Largest snapshot as a fraction of the snapshot it is derived from
    #[serde(default = "default_snapshot_size_snapshot")]
    pub snapshot_size_snapshot: f64,
}

impl FlashConfig {
    fn validate(&self) -> Result<(), String> {
        if self.history_size == 0 {
            return Err("flash.history_size must be > 0".to_string());
        }
        for (name, value) in [
            ("snapshot_size_dataset", self.snapshot_size_dataset),
            ("snapshot_size_snapshot", self.snapshot_size_snapshot),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("flash.{} must be in (0, 1], got {}", name, value));
            }
        }
        Ok(())
    }

    /// The cache storage strategy described by this section
    pub fn storage_strategy(&self) -> StorageStrategy {
        StorageStrategy::Fraction {
            history_size: self.history_size,
            snapshot_size_dataset: self.snapshot_size_dataset,
            snapshot_size_snapshot: self.snapshot_size_snapshot,
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            snapshot_size_dataset: default_snapshot_size_dataset(),
            snapshot_size_snapshot: default_snapshot_size_snapshot(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_algorithm() -> AlgorithmKind {
    AlgorithmKind::Flash
}

fn default_time_limit_ms() -> u64 {
    5000
}

fn default_history_size() -> usize {
    200
}

fn default_snapshot_size_dataset() -> f64 {
    0.2
}

fn default_snapshot_size_snapshot() -> f64 {
    0.8
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };

        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_config_validation() {
        let mut config = SearchConfig {
            algorithm: AlgorithmKind::Lightning,
            time_limit_ms: 100,
        };
        assert!(config.validate().is_ok());

        config.time_limit_ms = 0;
        assert!(config.validate().is_err());

        // Only the budgeted algorithm needs a budget
        config.algorithm = AlgorithmKind::LightningMinimal;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flash_config_validation() {
        let mut config = FlashConfig::default();
        assert!(config.validate().is_ok());

        config.snapshot_size_dataset = 0.0;
        assert!(config.validate().is_err());

        config.snapshot_size_dataset = 1.0;
        config.snapshot_size_snapshot = 1.5;
        assert!(config.validate().is_err());

        config.snapshot_size_snapshot = f64::NAN;
        assert!(config.validate().is_err());

        config.snapshot_size_snapshot = 0.5;
        config.history_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_storage_strategy() {
        assert_eq!(
            FlashConfig::default().storage_strategy(),
            StorageStrategy::DEFAULT_FRACTION
        );
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnonSearchConfig::default().validate().is_ok());
    }
}
