//! Domain identifier types with validation
//!
//! Transformations are addressed by a dense integer identifier assigned by the
//! lattice store. The newtype keeps identifiers from being mixed up with levels,
//! counts, or generalization values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest number of transformations a lattice may hold.
///
/// Identifiers must fit a signed 32-bit range so that per-node arenas can be
/// indexed densely.
pub const MAX_LATTICE_SIZE: u64 = i32::MAX as u64;

/// Dense transformation identifier
///
/// # Examples
///
/// ```
/// use anonsearch::domain::ids::TransformationId;
/// use std::str::FromStr;
///
/// let id = TransformationId::from_str("42").unwrap();
/// assert_eq!(id.index(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformationId(u32);

impl TransformationId {
    /// Creates an identifier from a raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from an arena index
    ///
    /// # Returns
    ///
    /// Returns `Err` if the index exceeds [`MAX_LATTICE_SIZE`]
    pub fn from_index(index: usize) -> Result<Self, String> {
        if index as u64 >= MAX_LATTICE_SIZE {
            return Err(format!(
                "Transformation index {index} exceeds the dense identifier range"
            ));
        }
        Ok(Self(index as u32))
    }

    /// Returns the arena index of this identifier
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TransformationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransformationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|e| format!("Invalid transformation identifier '{s}': {e}"))?;
        Self::from_index(raw as usize)
    }
}

/// Validates that a lattice of `size` transformations can be addressed densely
pub fn validate_lattice_size(size: u64) -> Result<(), String> {
    if size == 0 {
        return Err("Lattice must contain at least one transformation".to_string());
    }
    if size > MAX_LATTICE_SIZE {
        return Err(format!(
            "Lattice size {size} exceeds the maximum of {MAX_LATTICE_SIZE} transformations"
        ));
    }
    Ok(())
}
