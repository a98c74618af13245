//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AnonSearchConfig;
use crate::domain::errors::SearchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AnonSearchConfig
/// 4. Applies environment variable overrides (ANONSEARCH_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use anonsearch::config::loader::load_config;
///
/// let config = load_config("anonsearch.toml").expect("Failed to load config");
/// println!("Algorithm: {}", config.search.algorithm);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonSearchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SearchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SearchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Performs the same substitution, override and validation steps as
/// [`load_config`].
///
/// # Errors
///
/// Returns a configuration error if any step fails.
pub fn parse_config(contents: &str) -> Result<AnonSearchConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AnonSearchConfig = toml::from_str(&contents)
        .map_err(|e| SearchError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SearchError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    tracing::debug!(
        algorithm = %config.search.algorithm,
        time_limit_ms = config.search.time_limit_ms,
        "Configuration loaded"
    );
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SearchError::Other(format!("Invalid substitution pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed_line = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|missing| missing == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SearchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ANONSEARCH_* prefix
///
/// Environment variables follow the pattern: ANONSEARCH_<SECTION>_<KEY>
/// For example: ANONSEARCH_SEARCH_ALGORITHM, ANONSEARCH_FLASH_HISTORY_SIZE
///
/// # Errors
///
/// Returns an error if an override cannot be parsed
fn apply_env_overrides(config: &mut AnonSearchConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ANONSEARCH_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Search overrides
    if let Ok(val) = std::env::var("ANONSEARCH_SEARCH_ALGORITHM") {
        config.search.algorithm = val.parse()?;
    }
    if let Ok(val) = std::env::var("ANONSEARCH_SEARCH_TIME_LIMIT_MS") {
        config.search.time_limit_ms = parse_override("ANONSEARCH_SEARCH_TIME_LIMIT_MS", &val)?;
    }

    // FLASH overrides
    if let Ok(val) = std::env::var("ANONSEARCH_FLASH_HISTORY_SIZE") {
        config.flash.history_size = parse_override("ANONSEARCH_FLASH_HISTORY_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("ANONSEARCH_FLASH_SNAPSHOT_SIZE_DATASET") {
        config.flash.snapshot_size_dataset =
            parse_override("ANONSEARCH_FLASH_SNAPSHOT_SIZE_DATASET", &val)?;
    }
    if let Ok(val) = std::env::var("ANONSEARCH_FLASH_SNAPSHOT_SIZE_SNAPSHOT") {
        config.flash.snapshot_size_snapshot =
            parse_override("ANONSEARCH_FLASH_SNAPSHOT_SIZE_SNAPSHOT", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ANONSEARCH_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANONSEARCH_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ANONSEARCH_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn parse_override<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        SearchError::Configuration(format!("Invalid value '{}' for {}: {}", value, name, e))
    })
}
