//! Serializable summary of a search run

use super::range::LossRange;
use super::AlgorithmKind;
use crate::adapters::oracle::NodeChecker;
use crate::core::search::{Algorithm, TrackRecord};
use crate::domain::{InformationLoss, PropertySet, Transformation, TransformationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The optimum of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimumSummary {
    /// Node identifier in the lattice
    pub id: TransformationId,
    /// Generalization level per attribute
    pub generalization: Vec<u32>,
    /// Sum of the generalization levels
    pub level: u32,
    /// Information loss
    pub information_loss: InformationLoss,
}

/// Result of one [`SearchDriver`](super::SearchDriver) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Unique run identifier
    pub run_id: Uuid,

    /// Algorithm that produced the outcome
    pub algorithm: AlgorithmKind,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Duration of the search in milliseconds
    pub elapsed_ms: f64,

    /// Number of full oracle checks
    pub checks: u64,

    /// False if the search stopped on its time budget
    pub complete: bool,

    /// Best feasible node, if any
    pub optimum: Option<OptimumSummary>,

    /// Time at which the optimum was found, in milliseconds
    pub discovery_time_ms: Option<f64>,

    /// Improvements of the optimum over time
    pub track_record: TrackRecord,
}

impl SearchOutcome {
    /// Captures the state of an algorithm after `traverse()`
    pub fn from_algorithm<A: Algorithm + ?Sized>(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        algorithm_kind: AlgorithmKind,
        algorithm: &A,
    ) -> Self {
        let session = algorithm.session();
        let optimum = algorithm.global_optimum().and_then(|optimum| {
            optimum.information_loss.map(|loss| OptimumSummary {
                id: optimum.id,
                generalization: optimum.generalization.clone(),
                level: optimum.level,
                information_loss: loss,
            })
        });
        Self {
            run_id,
            algorithm: algorithm_kind,
            started_at,
            elapsed_ms: session.elapsed().as_secs_f64() * 1000.0,
            checks: session.checks(),
            complete: algorithm.is_complete(),
            optimum,
            discovery_time_ms: algorithm
                .discovery_time()
                .map(|time| time.as_secs_f64() * 1000.0),
            track_record: algorithm.track_record().clone(),
        }
    }

    /// Information loss of the optimum
    pub fn information_loss(&self) -> Option<f64> {
        self.optimum
            .as_ref()
            .map(|optimum| optimum.information_loss.value())
    }

    /// Loss of the optimum relative to the range of feasible losses
    ///
    /// 0.0 is the best and 1.0 the worst feasible node. A range without spread
    /// maps to 0.0.
    pub fn relative_loss(&self, range: &LossRange) -> Option<f64> {
        self.information_loss().map(|loss| range.normalize(loss))
    }

    /// Re-measures the optimum with another oracle
    ///
    /// Greedy selectors search under their own metric, so their loss is only
    /// comparable with other runs once it is expressed in the shared one. The
    /// optimum's generalization is checked with `force = true` and its loss
    /// replaces the reported one. The track record keeps the search metric.
    ///
    /// # Errors
    ///
    /// Returns the oracle's error; the outcome is left unchanged.
    pub fn rescore<C: NodeChecker + ?Sized>(
        &mut self,
        reference: &mut C,
    ) -> crate::domain::Result<Option<InformationLoss>> {
        let Some(optimum) = self.optimum.as_mut() else {
            return Ok(None);
        };
        let snapshot = Transformation {
            id: optimum.id,
            generalization: optimum.generalization.clone(),
            level: optimum.level,
            properties: PropertySet::EMPTY,
            information_loss: None,
            lower_bound: None,
        };
        let result = reference.check(&snapshot, true)?;
        optimum.information_loss = result.information_loss;
        Ok(Some(result.information_loss))
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the outcome contains non-finite numbers.
    pub fn to_json(&self) -> crate::domain::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
