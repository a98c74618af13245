//! Algorithm selection and execution
//!
//! The [`SearchDriver`] instantiates one algorithm by its [`AlgorithmKind`],
//! runs it to completion and packages the result as a [`SearchOutcome`].
//!
//! # Example
//!
//! ```
//! use anonsearch::adapters::lattice::GridLattice;
//! use anonsearch::adapters::oracle::SyntheticChecker;
//! use anonsearch::core::driver::{AlgorithmKind, SearchDriver};
//! use anonsearch::core::search::FlashStrategy;
//! use std::time::Duration;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut lattice = GridLattice::new(vec![2, 2])?;
//! let mut checker = SyntheticChecker::new(
//!     |g: &[u32]| g.iter().sum::<u32>() >= 2,
//!     |g: &[u32]| g.iter().sum::<u32>() as f64,
//! );
//! let strategy = FlashStrategy::new(&lattice);
//!
//! let driver = SearchDriver::new(Duration::from_secs(1));
//! let outcome = driver.run(AlgorithmKind::Flash, &mut lattice, &mut checker, &strategy)?;
//! assert_eq!(outcome.information_loss(), Some(2.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod outcome;
pub mod range;

pub use outcome::{OptimumSummary, SearchOutcome};
pub use range::{information_loss_range, LossRange};

use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::{NodeChecker, StorageStrategy};
use crate::config::AnonSearchConfig;
use crate::core::search::{Algorithm, Flash, Lightning, Minimal, SearchStrategy};
use crate::domain::ids::validate_lattice_size;
use crate::domain::SearchError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Selector of the search algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Exact search exploiting monotonicity
    #[serde(rename = "flash")]
    Flash,
    /// Anytime search within the configured time budget
    #[serde(rename = "lightning")]
    Lightning,
    /// Lightning stopping at its first feasible node
    #[serde(rename = "lightning-minimal")]
    LightningMinimal,
    /// Greedy descent, paired with a DataFly metric in the oracle
    #[serde(rename = "datafly")]
    DataFly,
    /// Greedy descent, paired with an improved greedy metric in the oracle
    #[serde(rename = "igreedy")]
    IGreedy,
}

impl AlgorithmKind {
    /// All selectors
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::Flash,
        AlgorithmKind::Lightning,
        AlgorithmKind::LightningMinimal,
        AlgorithmKind::DataFly,
        AlgorithmKind::IGreedy,
    ];

    /// Configuration name of the selector
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmKind::Flash => "flash",
            AlgorithmKind::Lightning => "lightning",
            AlgorithmKind::LightningMinimal => "lightning-minimal",
            AlgorithmKind::DataFly => "datafly",
            AlgorithmKind::IGreedy => "igreedy",
        }
    }

    /// Whether the algorithm is bounded by a time budget
    pub fn uses_time_limit(self) -> bool {
        matches!(self, AlgorithmKind::Lightning)
    }

    /// Whether the selector searches under a metric of its own
    ///
    /// Losses of these selectors are re-measured by
    /// [`SearchDriver::run_with_reference`].
    pub fn uses_own_metric(self) -> bool {
        matches!(self, AlgorithmKind::DataFly | AlgorithmKind::IGreedy)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SearchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                SearchError::Configuration(format!(
                    "Unknown algorithm '{}'. Must be one of: flash, lightning, lightning-minimal, datafly, igreedy",
                    s
                ))
            })
    }
}

/// Runs searches with shared settings
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDriver {
    time_limit: Duration,
    storage_strategy: StorageStrategy,
}

impl SearchDriver {
    /// Creates a driver with the given Lightning budget
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            storage_strategy: StorageStrategy::DEFAULT_FRACTION,
        }
    }

    /// Creates a driver from the `[search]` and `[flash]` configuration sections
    pub fn from_config(config: &AnonSearchConfig) -> Self {
        Self::new(Duration::from_millis(config.search.time_limit_ms))
            .with_storage_strategy(config.flash.storage_strategy())
    }

    /// Overrides the snapshot storage strategy used by FLASH
    pub fn with_storage_strategy(mut self, storage_strategy: StorageStrategy) -> Self {
        self.storage_strategy = storage_strategy;
        self
    }

    /// Lightning budget
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Runs one search and summarizes it
    ///
    /// The strategy is only consulted by FLASH.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`SearchError::Configuration`] if the lattice
    /// cannot be searched, or the oracle's error if a check fails.
    pub fn run<S, C, T>(
        &self,
        kind: AlgorithmKind,
        space: &mut S,
        checker: &mut C,
        strategy: &T,
    ) -> Result<SearchOutcome>
    where
        S: SolutionSpace + ?Sized,
        C: NodeChecker + ?Sized,
        T: SearchStrategy + ?Sized,
    {
        validate_lattice_size(space.size())
            .map_err(SearchError::Configuration)
            .with_context(|| format!("Cannot run {} on this lattice", kind))?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, algorithm = %kind, lattice_size = space.size(), "Running search");

        let run = RunContext {
            run_id,
            started_at,
            kind,
        };
        match kind {
            AlgorithmKind::Flash => {
                let mut flash =
                    Flash::with_storage_strategy(space, checker, strategy, self.storage_strategy)?;
                run.execute(&mut flash)
            }
            AlgorithmKind::Lightning => {
                let mut lightning = Lightning::new(space, checker, self.time_limit)?;
                run.execute(&mut lightning)
            }
            AlgorithmKind::LightningMinimal => {
                let mut lightning = Lightning::new(space, checker, Duration::ZERO)?;
                run.execute(&mut lightning)
            }
            AlgorithmKind::DataFly | AlgorithmKind::IGreedy => {
                let mut minimal = Minimal::new(space, checker)?;
                run.execute(&mut minimal)
            }
        }
    }

    /// Runs one search and reports its loss under a reference oracle
    ///
    /// For DataFly and IGreedy the optimum found with `checker` is re-checked
    /// with `reference`, so that the outcome can be compared with runs of the
    /// other selectors and with an [`information_loss_range`] computed by
    /// `reference`. The remaining selectors are reported unchanged and
    /// `reference` is not consulted.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SearchDriver::run`], or the reference oracle's
    /// error.
    pub fn run_with_reference<S, C, R, T>(
        &self,
        kind: AlgorithmKind,
        space: &mut S,
        checker: &mut C,
        reference: &mut R,
        strategy: &T,
    ) -> Result<SearchOutcome>
    where
        S: SolutionSpace + ?Sized,
        C: NodeChecker + ?Sized,
        R: NodeChecker + ?Sized,
        T: SearchStrategy + ?Sized,
    {
        let mut outcome = self.run(kind, space, checker, strategy)?;
        if kind.uses_own_metric() {
            let run_id = outcome.run_id;
            let own_loss = outcome.information_loss();
            outcome
                .rescore(reference)
                .with_context(|| format!("Reference check failed for {} (run {})", kind, run_id))?;
            tracing::debug!(
                %run_id,
                ?own_loss,
                information_loss = ?outcome.information_loss(),
                "Optimum re-measured with reference metric"
            );
        }
        Ok(outcome)
    }
}

/// Identity of one driver run
struct RunContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    kind: AlgorithmKind,
}

impl RunContext {
    fn execute<A: Algorithm>(&self, algorithm: &mut A) -> Result<SearchOutcome> {
        algorithm
            .traverse()
            .with_context(|| format!("{} search failed (run {})", algorithm.name(), self.run_id))?;
        let outcome =
            SearchOutcome::from_algorithm(self.run_id, self.started_at, self.kind, &*algorithm);
        tracing::info!(
            run_id = %self.run_id,
            complete = outcome.complete,
            elapsed_ms = outcome.elapsed_ms,
            information_loss = ?outcome.information_loss(),
            "Search finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("flash" => AlgorithmKind::Flash)]
    #[test_case("Lightning" => AlgorithmKind::Lightning)]
    #[test_case("lightning-minimal" => AlgorithmKind::LightningMinimal)]
    #[test_case(" datafly " => AlgorithmKind::DataFly)]
    #[test_case("IGREEDY" => AlgorithmKind::IGreedy)]
    fn test_parse_algorithm_kind(input: &str) -> AlgorithmKind {
        input.parse().unwrap()
    }

    #[test]
    fn test_unknown_algorithm_is_configuration_error() {
        let result = "exhaustive".parse::<AlgorithmKind>();
        assert!(matches!(result, Err(SearchError::Configuration(_))));
    }

    #[test]
    fn test_algorithm_kind_serde_names() {
        for kind in AlgorithmKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            let back: AlgorithmKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_only_lightning_uses_budget() {
        assert!(AlgorithmKind::Lightning.uses_time_limit());
        assert!(!AlgorithmKind::LightningMinimal.uses_time_limit());
        assert!(!AlgorithmKind::Flash.uses_time_limit());
    }

    #[test]
    fn test_only_greedy_selectors_use_own_metric() {
        let own: Vec<_> = AlgorithmKind::ALL
            .into_iter()
            .filter(|kind| kind.uses_own_metric())
            .collect();
        assert_eq!(own, vec![AlgorithmKind::DataFly, AlgorithmKind::IGreedy]);
    }
}
