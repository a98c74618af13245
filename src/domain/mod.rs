//! Domain models and types for anonsearch.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TransformationId`])
//! - **Loss values and oracle results** ([`InformationLoss`], [`CheckResult`], [`LossWithBound`])
//! - **Predictive properties** ([`PredictiveProperty`], [`PropertySet`])
//! - **Transformation snapshots** ([`Transformation`])
//! - **Error types** ([`SearchError`], [`OracleError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so that arena indices are never confused with
//! levels or counts:
//!
//! ```rust
//! use anonsearch::domain::TransformationId;
//!
//! let id = TransformationId::new(4);
//! assert_eq!(id.index(), 4);
//! ```

pub mod errors;
pub mod ids;
pub mod loss;
pub mod property;
pub mod result;
pub mod transformation;

// Re-export commonly used types for convenience
pub use errors::{OracleError, SearchError};
pub use ids::TransformationId;
pub use loss::{CheckResult, InformationLoss, LossWithBound};
pub use property::{Direction, PredictiveProperty, PropertySet};
pub use result::Result;
pub use transformation::Transformation;
