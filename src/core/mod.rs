//! Core search logic
//!
//! # Modules
//!
//! - [`search`] - The FLASH, Lightning and Minimal algorithms and their shared state
//! - [`driver`] - Algorithm selection, execution and result summaries
//!
//! # Search Workflow
//!
//! 1. **Build the lattice**: a [`SolutionSpace`](crate::adapters::lattice::SolutionSpace)
//!    with one dimension per quasi-identifier
//! 2. **Provide an oracle**: a [`NodeChecker`](crate::adapters::oracle::NodeChecker)
//!    deciding the privacy model and measuring information loss
//! 3. **Pick an algorithm**: by [`AlgorithmKind`](driver::AlgorithmKind)
//! 4. **Traverse**: the algorithm tags nodes and tracks the optimum
//! 5. **Report**: a serializable [`SearchOutcome`](driver::SearchOutcome)
//!
//! # Example
//!
//! ```rust
//! use anonsearch::adapters::lattice::GridLattice;
//! use anonsearch::adapters::oracle::SyntheticChecker;
//! use anonsearch::core::search::{Algorithm, Flash, FlashStrategy};
//!
//! # fn example() -> anonsearch::domain::Result<()> {
//! let mut lattice = GridLattice::new(vec![2, 2])?;
//! let mut checker = SyntheticChecker::new(
//!     |g: &[u32]| g.iter().sum::<u32>() >= 2,
//!     |g: &[u32]| g.iter().sum::<u32>() as f64,
//! );
//! let strategy = FlashStrategy::new(&lattice);
//!
//! let mut flash = Flash::new(&mut lattice, &mut checker, &strategy)?;
//! flash.traverse()?;
//!
//! let optimum = flash.global_optimum().expect("a feasible node exists");
//! println!("Optimum {:?} with loss {:?}", optimum.generalization, optimum.information_loss);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod driver;
pub mod search;
