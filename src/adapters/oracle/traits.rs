//! Node oracle abstraction
//!
//! The oracle decides whether a transformation satisfies the privacy model and
//! measures its information loss. How privacy models compute their per-class
//! predicates is outside of this crate; algorithms only see this trait.

use crate::domain::{CheckResult, InformationLoss, LossWithBound, Result, Transformation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonicity of the configured privacy model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMonotonicity {
    /// Every criterion is monotonic under generalization
    Full,
    /// Only the minimal class size requirement (k-anonymity) is monotonic
    Partial,
    /// No criterion can be predicted
    None,
}

impl PrivacyMonotonicity {
    /// Returns true if at least one monotonic criterion is active
    pub fn has_monotonic_criterion(self) -> bool {
        !matches!(self, PrivacyMonotonicity::None)
    }
}

impl fmt::Display for PrivacyMonotonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivacyMonotonicity::Full => write!(f, "full"),
            PrivacyMonotonicity::Partial => write!(f, "partial"),
            PrivacyMonotonicity::None => write!(f, "none"),
        }
    }
}

/// Storage strategy of the snapshot cache
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageStrategy {
    /// Retain every snapshot
    All,
    /// Retain snapshots selectively
    Fraction {
        /// Maximal number of snapshots held
        history_size: usize,
        /// A snapshot is only taken if the grouping has at most this fraction of the dataset's rows
        snapshot_size_dataset: f64,
        /// A snapshot is only derived from another if it has at most this fraction of its entries
        snapshot_size_snapshot: f64,
    },
}

impl StorageStrategy {
    /// Fraction-based strategy with the default limits
    pub const DEFAULT_FRACTION: StorageStrategy = StorageStrategy::Fraction {
        history_size: 200,
        snapshot_size_dataset: 0.2,
        snapshot_size_snapshot: 0.8,
    };
}

/// Privacy-model and information-loss oracle
///
/// `check` is the expensive operation (grouping of the data) and dominates the
/// cost of every search; the algorithms are built to call it as rarely as
/// possible. Errors are propagated to the caller of `traverse()` unchanged.
pub trait NodeChecker {
    /// Fully checks a transformation
    ///
    /// When `force` is true, information loss is measured even if the
    /// transformation does not satisfy the privacy model.
    fn check(&mut self, transformation: &Transformation, force: bool) -> Result<CheckResult>;

    /// Computes the information loss analytically, without grouping the data
    fn evaluate(&mut self, transformation: &Transformation) -> Result<LossWithBound>;

    /// Computes a lower bound without grouping the data, if the metric supports it
    fn lower_bound(&mut self, transformation: &Transformation) -> Result<Option<InformationLoss>>;

    /// Whether the information loss metric is monotonic
    fn is_monotonic(&self) -> bool;

    /// Maximal number of records that may be suppressed
    fn max_suppressed_records(&self) -> usize;

    /// Monotonicity of the privacy model
    fn monotonicity(&self) -> PrivacyMonotonicity;

    /// Configures the snapshot cache
    fn set_storage_strategy(&mut self, strategy: StorageStrategy);

    /// Best-effort progress callback, `fraction` in `[0, 1]`
    fn progress(&mut self, _fraction: f64) {}

    /// Whether bottom and top should be measured after a search to bound utility
    fn practical_monotonicity(&self) -> bool {
        false
    }

    /// Whether the metric can be evaluated independently of the grouping
    fn is_independent(&self) -> bool {
        false
    }

    /// A metric without suppression behaves monotonically for pruning purposes
    fn is_effectively_monotonic(&self) -> bool {
        self.is_monotonic() || self.max_suppressed_records() == 0
    }
}
