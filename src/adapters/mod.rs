//! External collaborators of the search algorithms.
//!
//! This module provides the seams between the algorithms and the systems they
//! drive:
//!
//! - [`lattice`] - Transformation lattice store (trait-based, with an in-memory grid)
//! - [`oracle`] - Privacy-model and information-loss oracle (trait-based, with a synthetic oracle)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with substitute implementations. Algorithms are generic over
//! both traits and borrow them mutably for the duration of one search.
//!
//! ```rust
//! use anonsearch::adapters::lattice::{GridLattice, SolutionSpace};
//! use anonsearch::adapters::oracle::{NodeChecker, SyntheticChecker};
//!
//! # fn example() -> anonsearch::domain::Result<()> {
//! let mut lattice = GridLattice::new(vec![2, 2])?;
//! let mut checker = SyntheticChecker::new(
//!     |g: &[u32]| g.iter().sum::<u32>() >= 2,
//!     |g: &[u32]| g.iter().sum::<u32>() as f64,
//! );
//!
//! let bottom = lattice.transformation(lattice.bottom());
//! let result = checker.check(&bottom, true)?;
//! lattice.set_checked(bottom.id, result);
//! # Ok(())
//! # }
//! ```

pub mod lattice;
pub mod oracle;
