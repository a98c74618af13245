//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file logging with daily or hourly rotation
//!
//! The algorithms log through `tracing` directly: `debug!` per phase and level,
//! `trace!` per oracle call, and the macros below at `info` level for run
//! boundaries and optimum improvements.
//!
//! # Example
//!
//! ```no_run
//! use anonsearch::logging::init_logging;
//! use anonsearch::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Search service started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a search
///
/// # Example
///
/// ```no_run
/// use anonsearch::log_search_start;
///
/// log_search_start!("FLASH", 81u64);
/// ```
#[macro_export]
macro_rules! log_search_start {
    ($algorithm:expr, $lattice_size:expr) => {
        tracing::info!(
            algorithm = %$algorithm,
            lattice_size = $lattice_size,
            "Starting search"
        );
    };
}

/// Log the completion of a search
///
/// # Example
///
/// ```no_run
/// use anonsearch::log_search_complete;
/// use anonsearch::domain::InformationLoss;
/// use std::time::Duration;
///
/// log_search_complete!("Lightning", 42u64, Duration::from_millis(10), Some(InformationLoss::new(3.0)));
/// ```
#[macro_export]
macro_rules! log_search_complete {
    ($algorithm:expr, $checks:expr, $duration:expr, $information_loss:expr) => {
        tracing::info!(
            algorithm = %$algorithm,
            checks = $checks,
            duration_ms = $duration.as_millis(),
            information_loss = ?$information_loss,
            "Search completed"
        );
    };
}

/// Log an improvement of the global optimum
///
/// # Example
///
/// ```no_run
/// use anonsearch::log_optimum_improved;
/// use anonsearch::domain::{InformationLoss, TransformationId};
/// use std::time::Duration;
///
/// log_optimum_improved!(TransformationId::new(7), InformationLoss::new(1.5), Duration::from_millis(3));
/// ```
#[macro_export]
macro_rules! log_optimum_improved {
    ($id:expr, $information_loss:expr, $elapsed:expr) => {
        tracing::info!(
            id = %$id,
            information_loss = %$information_loss,
            elapsed_ms = $elapsed.as_millis(),
            "Optimum improved"
        );
    };
}
