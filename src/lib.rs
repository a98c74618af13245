// Anonsearch - Lattice search for privacy-preserving data publishing
// Copyright (c) 2025 Anonsearch Contributors
// Licensed under the MIT License

//! # Anonsearch - Lattice search for privacy-preserving data publishing
//!
//! Anonsearch finds the transformation of a dataset that satisfies a privacy
//! model while losing the least information. Transformations form a
//! generalization lattice with one dimension per quasi-identifier; the search
//! algorithms decide which lattice nodes to hand to an oracle and prune the
//! rest through predictive properties.
//!
//! ## Overview
//!
//! This library provides:
//! - **FLASH**: an exact, monotonicity-exploiting search combining a binary
//!   path search with a depth-first linear phase
//! - **Lightning**: an anytime best-first/greedy search under a time budget
//! - **Minimal**: a greedy descent that stops at the first feasible node
//! - A **driver** selecting the algorithm and summarizing the result
//!
//! ## Architecture
//!
//! Anonsearch follows a layered architecture:
//!
//! - [`core`] - Search algorithms and the driver
//! - [`adapters`] - Lattice store and node oracle (trait-based)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use anonsearch::adapters::lattice::GridLattice;
//! use anonsearch::adapters::oracle::SyntheticChecker;
//! use anonsearch::core::driver::{AlgorithmKind, SearchDriver};
//! use anonsearch::core::search::FlashStrategy;
//! use std::time::Duration;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Two quasi-identifiers with three generalization levels each
//!     let mut lattice = GridLattice::new(vec![2, 2])?;
//!
//!     // Feasible once two levels of generalization are applied
//!     let mut checker = SyntheticChecker::new(
//!         |g: &[u32]| g.iter().sum::<u32>() >= 2,
//!         |g: &[u32]| g.iter().sum::<u32>() as f64,
//!     );
//!     let strategy = FlashStrategy::new(&lattice);
//!
//!     let driver = SearchDriver::new(Duration::from_secs(5));
//!     let outcome = driver.run(AlgorithmKind::Flash, &mut lattice, &mut checker, &strategy)?;
//!
//!     println!("Optimal loss {:?} after {} checks", outcome.information_loss(), outcome.checks);
//!     Ok(())
//! }
//! ```
//!
//! ## Predictive Properties
//!
//! Every check tags the node and propagates the tag through the lattice:
//! anonymity travels up to all generalizations, non-anonymity travels down to
//! all specializations. Tagged nodes are never handed to the oracle again:
//!
//! ```rust
//! use anonsearch::adapters::lattice::{GridLattice, SolutionSpace};
//! use anonsearch::domain::PredictiveProperty;
//!
//! # fn example() -> anonsearch::domain::Result<()> {
//! let mut lattice = GridLattice::new(vec![1, 1])?;
//! lattice.set_anonymity_property_predictable(true);
//!
//! let bottom = lattice.bottom();
//! lattice.set_property(bottom, PredictiveProperty::Anonymous);
//! assert!(lattice.has_property(lattice.top(), PredictiveProperty::Anonymous));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::SearchError`]; the driver wraps it with
//! context through `anyhow`:
//!
//! ```rust,no_run
//! use anonsearch::domain::SearchError;
//!
//! fn example() -> Result<(), SearchError> {
//!     let config = anonsearch::config::load_config("anonsearch.toml")?;
//!     println!("{}", config.search.algorithm);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Anonsearch uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use anonsearch::config::LoggingConfig;
//! use anonsearch::logging::init_logging;
//!
//! let _guard = init_logging("debug", &LoggingConfig::default()).expect("logging");
//! tracing::info!(algorithm = "FLASH", "Starting search");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
