//! Synthetic oracle driven by functions of the generalization vector
//!
//! [`SyntheticChecker`] stands in for a data-backed oracle when the behaviour of
//! a search should be studied in isolation: feasibility and information loss
//! are plain functions of the generalization vector, and every call is counted.

use super::traits::{NodeChecker, PrivacyMonotonicity, StorageStrategy};
use crate::domain::{
    CheckResult, InformationLoss, LossWithBound, OracleError, Result, Transformation,
    TransformationId,
};

/// Predicate over a generalization vector
pub type Predicate = Box<dyn Fn(&[u32]) -> bool>;

/// Loss function over a generalization vector
pub type LossFunction = Box<dyn Fn(&[u32]) -> f64>;

/// Call counters of a [`SyntheticChecker`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckerStats {
    /// Number of full checks
    pub checks: usize,
    /// Number of analytic evaluations
    pub evaluations: usize,
    /// Number of lower bound requests
    pub lower_bounds: usize,
    /// Identifiers passed to `check`, in call order
    pub checked: Vec<TransformationId>,
}

/// Oracle whose answers are computed from the generalization vector
///
/// # Examples
///
/// ```
/// use anonsearch::adapters::oracle::{NodeChecker, SyntheticChecker};
///
/// // Feasible once at least two levels of generalization are applied
/// let checker = SyntheticChecker::new(
///     |g: &[u32]| g.iter().sum::<u32>() >= 2,
///     |g: &[u32]| g.iter().sum::<u32>() as f64,
/// );
/// assert!(checker.is_monotonic());
/// assert_eq!(checker.stats().checks, 0);
/// ```
pub struct SyntheticChecker {
    feasible: Predicate,
    k_anonymous: Option<Predicate>,
    loss: LossFunction,
    bound: Option<LossFunction>,
    monotonicity: PrivacyMonotonicity,
    metric_monotonic: bool,
    max_suppressed: usize,
    independent: bool,
    practical_monotonicity: bool,
    failing: Option<Vec<u32>>,
    storage_strategy: Option<StorageStrategy>,
    progress: Vec<f64>,
    stats: CheckerStats,
}

impl SyntheticChecker {
    /// Creates a fully monotonic oracle with a monotonic metric and no suppression
    pub fn new(
        feasible: impl Fn(&[u32]) -> bool + 'static,
        loss: impl Fn(&[u32]) -> f64 + 'static,
    ) -> Self {
        Self {
            feasible: Box::new(feasible),
            k_anonymous: None,
            loss: Box::new(loss),
            bound: None,
            monotonicity: PrivacyMonotonicity::Full,
            metric_monotonic: true,
            max_suppressed: 0,
            independent: false,
            practical_monotonicity: false,
            failing: None,
            storage_strategy: None,
            progress: Vec::new(),
            stats: CheckerStats::default(),
        }
    }

    /// Sets the monotonicity reported for the privacy model
    pub fn with_monotonicity(mut self, monotonicity: PrivacyMonotonicity) -> Self {
        self.monotonicity = monotonicity;
        self
    }

    /// Declares the metric monotonic or not
    pub fn with_monotonic_metric(mut self, monotonic: bool) -> Self {
        self.metric_monotonic = monotonic;
        self
    }

    /// Sets the suppression limit
    pub fn with_max_suppressed_records(mut self, records: usize) -> Self {
        self.max_suppressed = records;
        self
    }

    /// Uses a separate predicate for the minimal class size requirement
    pub fn with_k_anonymity(mut self, predicate: impl Fn(&[u32]) -> bool + 'static) -> Self {
        self.k_anonymous = Some(Box::new(predicate));
        self
    }

    /// Supplies lower bounds
    pub fn with_lower_bound(mut self, bound: impl Fn(&[u32]) -> f64 + 'static) -> Self {
        self.bound = Some(Box::new(bound));
        self
    }

    /// Enables utility estimation for bottom and top after a search
    pub fn with_practical_monotonicity(mut self, independent: bool) -> Self {
        self.practical_monotonicity = true;
        self.independent = independent;
        self
    }

    /// Makes `check` fail for the given generalization vector
    pub fn failing_on(mut self, generalization: Vec<u32>) -> Self {
        self.failing = Some(generalization);
        self
    }

    /// Call counters
    pub fn stats(&self) -> &CheckerStats {
        &self.stats
    }

    /// Storage strategy most recently configured by an algorithm
    pub fn storage_strategy(&self) -> Option<StorageStrategy> {
        self.storage_strategy
    }

    /// Progress fractions reported so far
    pub fn progress_reports(&self) -> &[f64] {
        &self.progress
    }

    fn measure(&self, transformation: &Transformation) -> Result<InformationLoss> {
        let loss = InformationLoss::new((self.loss)(&transformation.generalization));
        if !loss.is_valid() {
            return Err(OracleError::InvalidInformationLoss {
                id: transformation.id.get(),
            }
            .into());
        }
        Ok(loss)
    }

    fn bound_of(&self, transformation: &Transformation) -> Option<InformationLoss> {
        self.bound
            .as_ref()
            .map(|bound| InformationLoss::new(bound(&transformation.generalization)))
    }
}

impl NodeChecker for SyntheticChecker {
    fn check(&mut self, transformation: &Transformation, _force: bool) -> Result<CheckResult> {
        self.stats.checks += 1;
        self.stats.checked.push(transformation.id);
        tracing::trace!(id = %transformation.id, "Synthetic check");

        if self.failing.as_deref() == Some(transformation.generalization.as_slice()) {
            return Err(OracleError::CheckFailed {
                id: transformation.id.get(),
                message: "synthetic failure".to_string(),
            }
            .into());
        }

        let fulfilled = (self.feasible)(&transformation.generalization);
        let k_anonymous = self
            .k_anonymous
            .as_ref()
            .map_or(fulfilled, |predicate| predicate(&transformation.generalization));
        Ok(CheckResult {
            privacy_model_fulfilled: fulfilled,
            minimal_class_size_fulfilled: k_anonymous,
            information_loss: self.measure(transformation)?,
            lower_bound: self.bound_of(transformation),
        })
    }

    fn evaluate(&mut self, transformation: &Transformation) -> Result<LossWithBound> {
        self.stats.evaluations += 1;
        Ok(LossWithBound {
            information_loss: self.measure(transformation)?,
            lower_bound: self.bound_of(transformation),
        })
    }

    fn lower_bound(&mut self, transformation: &Transformation) -> Result<Option<InformationLoss>> {
        self.stats.lower_bounds += 1;
        Ok(self.bound_of(transformation))
    }

    fn is_monotonic(&self) -> bool {
        self.metric_monotonic
    }

    fn max_suppressed_records(&self) -> usize {
        self.max_suppressed
    }

    fn monotonicity(&self) -> PrivacyMonotonicity {
        self.monotonicity
    }

    fn set_storage_strategy(&mut self, strategy: StorageStrategy) {
        self.storage_strategy = Some(strategy);
    }

    fn progress(&mut self, fraction: f64) {
        self.progress.push(fraction);
    }

    fn practical_monotonicity(&self) -> bool {
        self.practical_monotonicity
    }

    fn is_independent(&self) -> bool {
        self.independent
    }
}
