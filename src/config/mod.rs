//! Configuration management for anonsearch.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! anonsearch uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ANONSEARCH_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation before use
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anonsearch::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("anonsearch.toml")?;
//!
//! println!("Algorithm: {}", config.search.algorithm);
//! println!("Budget: {} ms", config.search.time_limit_ms);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`SearchConfig`] - Algorithm selector and Lightning time budget
//! - [`FlashConfig`] - Snapshot cache limits used by FLASH
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [search]
//! algorithm = "lightning"
//! time_limit_ms = 5000
//!
//! [flash]
//! history_size = 200
//! snapshot_size_dataset = 0.2
//! snapshot_size_snapshot = 0.8
//!
//! [logging]
//! local_enabled = true
//! local_path = "${ANONSEARCH_LOG_DIR}"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{AnonSearchConfig, ApplicationConfig, FlashConfig, LoggingConfig, SearchConfig};
