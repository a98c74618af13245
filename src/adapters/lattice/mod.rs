//! Lattice store
//!
//! This module provides the [`SolutionSpace`] abstraction over transformation
//! lattices and [`GridLattice`], an in-memory implementation over the full
//! product of per-attribute generalization levels.

pub mod grid;
pub mod traits;

pub use grid::GridLattice;
pub use traits::SolutionSpace;
