//! Anytime best-first search
//!
//! Lightning keeps a queue of checked nodes ordered by their utility and
//! repeatedly expands the most promising one. Every `stepping`-th step it dives
//! greedily towards the top instead, so that feasible nodes are found early.
//! The search is cancelled cooperatively once its time budget is exhausted; a
//! budget of zero stops at the first feasible node.

use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::{NodeChecker, StorageStrategy};
use crate::core::search::{Algorithm, SearchSession};
use crate::domain::ids::validate_lattice_size;
use crate::domain::{InformationLoss, PredictiveProperty, Result, SearchError, TransformationId};
use std::collections::BTreeSet;
use std::time::Duration;

/// Queue key: nodes without any utility estimate sort last
type QueueKey = (bool, InformationLoss, TransformationId);

/// Anytime heuristic search with a time budget
pub struct Lightning<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    space: &'a mut S,
    checker: &'a mut C,
    time_limit: Duration,
    stepping: u64,
    queue: BTreeSet<QueueKey>,
    cancelled: bool,
    session: SearchSession,
}

impl<'a, S, C> Lightning<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    /// Creates the algorithm; the cache retains every snapshot and anonymity
    /// tags are not propagated
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the lattice cannot be addressed by
    /// 32-bit identifiers.
    pub fn new(space: &'a mut S, checker: &'a mut C, time_limit: Duration) -> Result<Self> {
        validate_lattice_size(space.size()).map_err(SearchError::Configuration)?;
        checker.set_storage_strategy(StorageStrategy::All);
        space.set_anonymity_property_predictable(false);
        let stepping = u64::from(space.level(space.top()).max(1));
        Ok(Self {
            space,
            checker,
            time_limit,
            stepping,
            queue: BTreeSet::new(),
            cancelled: false,
            session: SearchSession::new(),
        })
    }

    /// Time budget; zero stops at the first feasible node
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Number of steps between two greedy dives
    pub fn stepping(&self) -> u64 {
        self.stepping
    }

    fn should_stop(&self) -> bool {
        if self.time_limit.is_zero() {
            self.session.global_optimum().is_some()
        } else {
            self.session.elapsed() > self.time_limit
        }
    }

    /// Records a cancellation once the budget is exhausted
    fn budget_exhausted(&mut self) -> bool {
        if self.should_stop() {
            self.cancelled = true;
        }
        self.cancelled
    }

    fn key(&self, id: TransformationId) -> QueueKey {
        match self.space.utility(id) {
            Some(utility) => (false, utility, id),
            None => (true, InformationLoss::new(0.0), id),
        }
    }

    fn assure_checked(&mut self, id: TransformationId) -> Result<()> {
        let checked = self
            .session
            .assure_checked(&mut *self.space, &mut *self.checker, id)?;
        if checked && !self.time_limit.is_zero() {
            let fraction =
                self.session.elapsed().as_secs_f64() / self.time_limit.as_secs_f64();
            self.checker.progress(fraction.min(1.0));
        }
        Ok(())
    }

    /// Discards expanded nodes and, for monotonic metrics, nodes whose lower
    /// bound cannot beat the optimum
    fn prune(&self, id: TransformationId) -> bool {
        if self.space.has_property(id, PredictiveProperty::Expanded) {
            return true;
        }
        let Some(optimum) = self
            .session
            .global_optimum()
            .and_then(|optimum| optimum.information_loss)
        else {
            return false;
        };
        if !self.checker.is_effectively_monotonic() {
            return false;
        }
        self.space
            .lower_bound(id)
            .or_else(|| self.space.information_loss(id))
            .is_some_and(|bound| bound >= optimum)
    }

    /// Checks and enqueues all unexpanded successors
    ///
    /// Returns the successor of least loss, or `None` if the search was
    /// cancelled in between.
    fn expand(&mut self, id: TransformationId) -> Result<Option<TransformationId>> {
        let mut best: Option<(InformationLoss, TransformationId)> = None;
        for successor in self.space.successors(id) {
            if !self.space.has_property(successor, PredictiveProperty::Expanded) {
                self.assure_checked(successor)?;
                let key = self.key(successor);
                self.queue.insert(key);
                if let Some(loss) = self.space.information_loss(successor) {
                    if best.map_or(true, |(least, _)| loss < least) {
                        best = Some((loss, successor));
                    }
                }
            }
            if self.budget_exhausted() {
                return Ok(None);
            }
        }
        self.space.set_property(id, PredictiveProperty::Expanded);
        Ok(best.map(|(_, id)| id))
    }

    /// Dives greedily through the best successor of each expanded node
    fn dfs(&mut self, start: TransformationId) -> Result<()> {
        let mut current = start;
        loop {
            if self.budget_exhausted() {
                return Ok(());
            }
            match self.expand(current)? {
                Some(next) => {
                    let key = self.key(next);
                    self.queue.remove(&key);
                    current = next;
                }
                None => return Ok(()),
            }
        }
    }
}

impl<'a, S, C> Algorithm for Lightning<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    fn name(&self) -> &'static str {
        "Lightning"
    }

    fn traverse(&mut self) -> Result<()> {
        self.session.start();
        self.queue.clear();
        self.cancelled = false;
        crate::log_search_start!(self.name(), self.space.size());
        tracing::debug!(
            time_limit_ms = self.time_limit.as_millis(),
            stepping = self.stepping,
            "Lightning budget"
        );

        let bottom = self.space.bottom();
        self.assure_checked(bottom)?;
        let key = self.key(bottom);
        self.queue.insert(key);

        let mut step = 0u64;
        while let Some((_, _, id)) = self.queue.pop_first() {
            if self.budget_exhausted() {
                break;
            }
            if self.prune(id) {
                continue;
            }
            step += 1;
            if step % self.stepping == 0 {
                self.dfs(id)?;
            } else {
                self.expand(id)?;
            }
        }
        // The last step may have run out of time after emptying the queue
        if self.budget_exhausted() {
            tracing::debug!(step, "Lightning stopped on its budget");
        }

        crate::log_search_complete!(
            self.name(),
            self.session.checks(),
            self.session.elapsed(),
            self.session.global_optimum().and_then(|t| t.information_loss)
        );
        Ok(())
    }

    fn session(&self) -> &SearchSession {
        &self.session
    }

    fn is_complete(&self) -> bool {
        !self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::lattice::GridLattice;
    use crate::adapters::oracle::SyntheticChecker;

    fn level_sum(g: &[u32]) -> u32 {
        g.iter().sum()
    }

    #[test]
    fn test_setup() {
        let mut lattice = GridLattice::new(vec![2, 3]).unwrap();
        let mut checker = SyntheticChecker::new(|_: &[u32]| true, |_: &[u32]| 0.0);
        let lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_millis(10)).unwrap();
        assert_eq!(lightning.stepping(), 5);
        drop(lightning);
        assert_eq!(checker.storage_strategy(), Some(StorageStrategy::All));
        assert!(!lattice.is_anonymity_property_predictable());

        let mut single = GridLattice::new(vec![0]).unwrap();
        let lightning = Lightning::new(&mut single, &mut checker, Duration::ZERO).unwrap();
        assert_eq!(lightning.stepping(), 1);
    }

    #[test]
    fn test_zero_budget_stops_at_first_feasible() {
        let mut lattice = GridLattice::new(vec![3, 3]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| level_sum(g) >= 1, |g: &[u32]| {
            level_sum(g) as f64
        });
        let mut lightning = Lightning::new(&mut lattice, &mut checker, Duration::ZERO).unwrap();
        lightning.traverse().unwrap();

        assert!(lightning.global_optimum().is_some());
        assert_eq!(lightning.track_record().len(), 1);
        assert!(!lightning.is_complete());
        assert_eq!(lightning.session().checks(), 2);
        drop(lightning);
        assert!(checker.progress_reports().is_empty());
    }

    #[test]
    fn test_budget_spent_on_last_expansion_is_not_complete() {
        // Checking the top alone takes longer than the whole budget
        let mut lattice = GridLattice::new(vec![1]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| g[0] == 1, |g: &[u32]| {
            std::thread::sleep(Duration::from_millis(15));
            f64::from(g[0])
        });
        let mut lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_millis(20)).unwrap();
        lightning.traverse().unwrap();

        assert!(!lightning.is_complete());
        assert!(lightning.session().checks() <= 2);
        assert!(lightning.session().elapsed() > lightning.time_limit());
    }

    #[test]
    fn test_exhausted_queue_within_budget_is_complete() {
        let mut lattice = GridLattice::new(vec![1, 1]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| level_sum(g) >= 1, |g: &[u32]| {
            level_sum(g) as f64
        })
        .with_monotonic_metric(false)
        .with_max_suppressed_records(1);
        let mut lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_secs(60)).unwrap();
        lightning.traverse().unwrap();

        assert!(lightning.is_complete());
        assert_eq!(lightning.session().checks(), 4);
    }

    #[test]
    fn test_explores_whole_lattice_with_generous_budget() {
        let mut lattice = GridLattice::new(vec![2, 2]).unwrap();
        // Non-monotonic loss: nothing can be pruned by bound
        let mut checker = SyntheticChecker::new(|g: &[u32]| level_sum(g) >= 2, |g: &[u32]| {
            f64::from((g[0] + 2 * g[1]) % 3)
        })
        .with_monotonic_metric(false)
        .with_max_suppressed_records(5);
        let mut lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_secs(60)).unwrap();
        lightning.traverse().unwrap();

        assert!(lightning.is_complete());
        let optimum = lightning.global_optimum().unwrap();
        assert_eq!(optimum.information_loss.map(|l| l.value()), Some(0.0));
        assert_eq!(lightning.session().checks(), 9);
    }

    #[test]
    fn test_prunes_by_lower_bound() {
        let mut lattice = GridLattice::new(vec![3, 3]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| level_sum(g) >= 1, |g: &[u32]| {
            level_sum(g) as f64
        });
        let mut lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_secs(60)).unwrap();
        lightning.traverse().unwrap();

        assert_eq!(
            lightning.global_optimum().and_then(|t| t.information_loss).map(|l| l.value()),
            Some(1.0)
        );
        assert!(lightning.session().checks() < 16);
    }

    #[test]
    fn test_track_record_improves_monotonically() {
        let mut lattice = GridLattice::new(vec![3, 3, 2]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| g[0] >= 1 || g[2] == 2, |g: &[u32]| {
            f64::from(g[0] * 7 + g[1] * 3 + g[2] * 2)
        })
        .with_monotonic_metric(false)
        .with_max_suppressed_records(1);
        let mut lightning =
            Lightning::new(&mut lattice, &mut checker, Duration::from_secs(60)).unwrap();
        lightning.traverse().unwrap();

        let entries = lightning.track_record().entries();
        assert!(!entries.is_empty());
        assert!(entries
            .windows(2)
            .all(|pair| pair[1].information_loss <= pair[0].information_loss
                && pair[1].elapsed > pair[0].elapsed));
        assert_eq!(
            entries.last().map(|e| e.information_loss.value()),
            Some(4.0)
        );
    }
}
