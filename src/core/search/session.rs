//! Per-run search state shared by all algorithms
//!
//! A [`SearchSession`] owns the global optimum, the anytime track record and the
//! run clock. Each algorithm holds exactly one session; nothing is global.

use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::NodeChecker;
use crate::domain::{InformationLoss, PredictiveProperty, Result, Transformation, TransformationId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One improvement of the global optimum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Time since the start of the search
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,

    /// Information loss of the new optimum
    pub information_loss: InformationLoss,
}

impl TrackEntry {
    /// Elapsed time in (fractional) milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Append-only record of optimum improvements
///
/// Times are strictly increasing: an improvement that falls into the same
/// clock tick as its predecessor is recorded one nanosecond later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRecord {
    entries: Vec<TrackEntry>,
}

impl TrackRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an improvement
    pub fn push(&mut self, elapsed: Duration, information_loss: InformationLoss) {
        let elapsed = match self.entries.last() {
            Some(last) if elapsed <= last.elapsed => last.elapsed + Duration::from_nanos(1),
            _ => elapsed,
        };
        self.entries.push(TrackEntry {
            elapsed,
            information_loss,
        });
    }

    /// All entries in discovery order
    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    /// Number of improvements
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no feasible node was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent improvement
    pub fn last(&self) -> Option<&TrackEntry> {
        self.entries.last()
    }

    /// Rescales losses relative to the first and last improvement
    ///
    /// Returns `(elapsed_ms, utility)` pairs where the first entry maps to 1.0 and
    /// the final optimum to 0.0. If both losses are equal every entry maps to 1.0.
    pub fn normalized(&self) -> Vec<(f64, f64)> {
        let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) else {
            return Vec::new();
        };
        let min = first.information_loss.value();
        let max = last.information_loss.value();
        self.entries
            .iter()
            .map(|entry| {
                let utility = if min == max {
                    1.0
                } else {
                    (entry.information_loss.value() - max) / (min - max)
                };
                (entry.elapsed_ms(), utility)
            })
            .collect()
    }
}

/// Global optimum, track record and run clock of a single search
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    started: Option<Instant>,
    optimum: Option<Transformation>,
    discovery: Option<Duration>,
    track_record: TrackRecord,
    checks: u64,
}

impl SearchSession {
    /// Creates an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the run clock and forgets results of a previous run
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.optimum = None;
        self.discovery = None;
        self.track_record = TrackRecord::new();
        self.checks = 0;
    }

    /// Time since [`start`](Self::start), zero before the run
    pub fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |started| started.elapsed())
    }

    /// Best feasible node found so far
    pub fn global_optimum(&self) -> Option<&Transformation> {
        self.optimum.as_ref()
    }

    /// Time at which the current optimum was found
    pub fn discovery_time(&self) -> Option<Duration> {
        self.discovery
    }

    /// Improvements in discovery order
    pub fn track_record(&self) -> &TrackRecord {
        &self.track_record
    }

    /// Number of full oracle checks issued in this run
    pub fn checks(&self) -> u64 {
        self.checks
    }

    /// Counts one full oracle check and returns the new total
    pub fn record_check(&mut self) -> u64 {
        self.checks += 1;
        self.checks
    }

    /// Replaces the optimum if `id` is feasible and strictly better
    ///
    /// Strictly better means a lower information loss, or the same loss on a
    /// lower level. Returns true if the optimum changed.
    pub fn track_optimum<S>(&mut self, space: &S, id: TransformationId) -> bool
    where
        S: SolutionSpace + ?Sized,
    {
        let candidate = space.transformation(id);
        let Some(loss) = candidate.information_loss else {
            return false;
        };
        if !candidate.is_feasible() {
            return false;
        }

        let improves = match &self.optimum {
            None => true,
            Some(optimum) => match optimum.information_loss {
                Some(best) => loss < best || (loss == best && candidate.level < optimum.level),
                None => true,
            },
        };
        if !improves {
            return false;
        }

        let elapsed = self.elapsed();
        self.track_record.push(elapsed, loss);
        self.discovery = self.track_record.last().map(|entry| entry.elapsed);
        crate::log_optimum_improved!(candidate.id, loss, elapsed);
        self.optimum = Some(candidate);
        true
    }

    /// Checks a node unless it already carries the checked tag
    ///
    /// Checks are forced so that infeasible nodes also report their loss.
    /// Returns true if the oracle was consulted.
    pub fn assure_checked<S, C>(
        &mut self,
        space: &mut S,
        checker: &mut C,
        id: TransformationId,
    ) -> Result<bool>
    where
        S: SolutionSpace + ?Sized,
        C: NodeChecker + ?Sized,
    {
        if space.has_property(id, PredictiveProperty::Checked) {
            return Ok(false);
        }
        let result = checker.check(&space.transformation(id), true)?;
        self.record_check();
        space.set_checked(id, result);
        self.track_optimum(space, id);
        Ok(true)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::lattice::GridLattice;
    use crate::domain::CheckResult;

    #[test]
    fn test_track_record_is_strictly_increasing() {
        let mut record = TrackRecord::new();
        record.push(Duration::from_millis(5), InformationLoss::new(3.0));
        record.push(Duration::from_millis(5), InformationLoss::new(2.0));
        record.push(Duration::from_millis(1), InformationLoss::new(1.0));

        let times: Vec<Duration> = record.entries().iter().map(|e| e.elapsed).collect();
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_normalized_record() {
        let mut record = TrackRecord::new();
        record.push(Duration::from_millis(1), InformationLoss::new(10.0));
        record.push(Duration::from_millis(2), InformationLoss::new(5.0));
        record.push(Duration::from_millis(3), InformationLoss::new(0.0));

        let utilities: Vec<f64> = record.normalized().into_iter().map(|(_, u)| u).collect();
        assert_eq!(utilities, vec![1.0, 0.5, 0.0]);
        assert!(TrackRecord::new().normalized().is_empty());
    }

    #[test]
    fn test_track_optimum_requires_feasible_and_strictly_better() {
        let mut lattice = GridLattice::new(vec![2, 2]).unwrap();
        let mut session = SearchSession::new();
        session.start();

        let infeasible = lattice.find(&[1, 0]).unwrap();
        lattice.set_checked(infeasible, CheckResult::new(false, 0.5));
        assert!(!session.track_optimum(&lattice, infeasible));

        let first = lattice.find(&[2, 1]).unwrap();
        lattice.set_checked(first, CheckResult::new(true, 3.0));
        assert!(session.track_optimum(&lattice, first));

        let worse = lattice.find(&[2, 2]).unwrap();
        lattice.set_checked(worse, CheckResult::new(true, 4.0));
        assert!(!session.track_optimum(&lattice, worse));

        let tie_lower = lattice.find(&[1, 1]).unwrap();
        lattice.set_checked(tie_lower, CheckResult::new(true, 3.0));
        assert!(session.track_optimum(&lattice, tie_lower));

        assert_eq!(session.global_optimum().map(|t| t.id), Some(tie_lower));
        assert_eq!(session.track_record().len(), 2);
    }
}
