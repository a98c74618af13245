//! Domain error types
//!
//! This module defines the error hierarchy for anonsearch.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main anonsearch error type
///
/// This is the primary error type used throughout the crate. Three families of
/// failure exist: configuration errors (fatal at construction, no partial state),
/// oracle errors (propagated unchanged from a [`NodeChecker`](crate::adapters::oracle::NodeChecker)),
/// and ambient I/O or serialization errors. Finding no feasible transformation is
/// not an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration-related errors (unknown selector, invalid values, oversized lattice)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Lattice store errors (malformed hierarchy heights, unknown identifiers)
    #[error("Lattice error: {0}")]
    Lattice(String),

    /// Failures reported by the privacy-model / information-loss oracle
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Oracle-specific errors
///
/// A failing check or evaluation is never retried: continuing a search after the
/// oracle reported corruption is meaningless, so these errors unwind `traverse()`.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A full check (grouping + privacy model + metric) failed
    #[error("Check failed for transformation {id}: {message}")]
    CheckFailed { id: u32, message: String },

    /// The analytic evaluation failed
    #[error("Evaluation failed for transformation {id}: {message}")]
    EvaluationFailed { id: u32, message: String },

    /// The metric cannot be evaluated without grouping the data
    #[error("Metric does not support analytic evaluation: {0}")]
    EvaluationUnsupported(String),

    /// The metric returned a value that cannot be ordered (NaN)
    #[error("Invalid information loss for transformation {id}")]
    InvalidInformationLoss { id: u32 },
}

// Conversion from std::io::Error
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Configuration(format!("TOML parse error: {err}"))
    }
}
