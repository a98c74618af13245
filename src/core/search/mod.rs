//! Search algorithms over the generalization lattice
//!
//! Every algorithm borrows a [`SolutionSpace`](crate::adapters::lattice::SolutionSpace)
//! and a [`NodeChecker`](crate::adapters::oracle::NodeChecker) mutably for its
//! lifetime and keeps its results in a [`SearchSession`].
//!
//! - [`Flash`]: exact, exploits monotonicity of privacy model and metric
//! - [`Lightning`]: anytime best-first search with an optional time budget
//! - [`Minimal`]: greedy descent returning the first feasible node

pub mod flash;
pub mod lightning;
pub mod minimal;
pub mod session;
pub mod strategy;

pub use flash::{Flash, FlashConfiguration};
pub use lightning::Lightning;
pub use minimal::Minimal;
pub use session::{SearchSession, TrackEntry, TrackRecord};
pub use strategy::{FlashStrategy, SearchStrategy, StrategyOrder};

use crate::domain::{Result, Transformation};
use std::time::Duration;

/// A search over the lattice
pub trait Algorithm {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Runs the search to completion or until it is cancelled by its budget
    ///
    /// # Errors
    ///
    /// Oracle errors are returned unchanged; the lattice keeps the tags
    /// attached up to the failing call.
    fn traverse(&mut self) -> Result<()>;

    /// Results of the most recent run
    fn session(&self) -> &SearchSession;

    /// Best feasible node found, if any
    fn global_optimum(&self) -> Option<&Transformation> {
        self.session().global_optimum()
    }

    /// Improvements of the optimum over time
    fn track_record(&self) -> &TrackRecord {
        self.session().track_record()
    }

    /// Whether the last run explored its search space instead of stopping on
    /// its budget
    fn is_complete(&self) -> bool {
        true
    }

    /// Time at which the optimum was found
    fn discovery_time(&self) -> Option<Duration> {
        self.session().discovery_time()
    }
}
