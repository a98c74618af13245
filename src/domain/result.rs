//! Result type alias for anonsearch
//!
//! This module provides a convenient Result type alias that uses SearchError
//! as the error type.

use super::errors::SearchError;

/// Result type alias for anonsearch operations
///
/// # Examples
///
/// ```
/// use anonsearch::domain::result::Result;
/// use anonsearch::domain::errors::SearchError;
///
/// fn example_function() -> Result<u32> {
///     Ok(42)
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SearchError::Configuration("Unknown algorithm".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SearchError>;
