//! Node oracle
//!
//! This module provides the [`NodeChecker`] abstraction over privacy-model and
//! information-loss oracles, together with the snapshot cache configuration it
//! accepts, and [`SyntheticChecker`], an oracle computed from generalization
//! vectors.

pub mod synthetic;
pub mod traits;

pub use synthetic::{CheckerStats, SyntheticChecker};
pub use traits::{NodeChecker, PrivacyMonotonicity, StorageStrategy};
