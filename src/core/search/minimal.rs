//! Greedy descent to the first feasible node
//!
//! Makes no monotonicity assumption. Starting at the bottom, every unchecked
//! successor of the current node is checked and the search continues with the
//! one of least information loss, until any feasible node has been recorded.
//! The result is the first feasible node met on that descent, not a verified
//! global minimum.

use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::{NodeChecker, StorageStrategy};
use crate::core::search::{Algorithm, SearchSession};
use crate::domain::ids::validate_lattice_size;
use crate::domain::{InformationLoss, PredictiveProperty, Result, SearchError, TransformationId};

/// Greedy minimal-loss descent
pub struct Minimal<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    space: &'a mut S,
    checker: &'a mut C,
    session: SearchSession,
}

impl<'a, S, C> Minimal<'a, S, C>
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
    pub fn new(space: &'a mut S, checker: &'a mut C) -> Result<Self> {
        validate_lattice_size(space.size()).map_err(SearchError::Configuration)?;
        checker.set_storage_strategy(StorageStrategy::All);
        space.set_anonymity_property_predictable(false);
        Ok(Self {
            space,
            checker,
            session: SearchSession::new(),
        })
    }

    fn assure_checked(&mut self, id: TransformationId) -> Result<bool> {
        self.session
            .assure_checked(&mut *self.space, &mut *self.checker, id)
    }

    /// Checks all unchecked successors and returns the one of least loss
    fn expand(&mut self, id: TransformationId) -> Result<Option<TransformationId>> {
        let mut best: Option<(InformationLoss, TransformationId)> = None;
        for successor in self.space.successors(id) {
            if !self.space.has_property(successor, PredictiveProperty::Checked) {
                self.assure_checked(successor)?;
                if let Some(loss) = self.space.information_loss(successor) {
                    if best.map_or(true, |(least, _)| loss < least) {
                        best = Some((loss, successor));
                    }
                }
            }
            if self.session.global_optimum().is_some() {
                break;
            }
        }
        Ok(best.map(|(_, id)| id))
    }
}

impl<'a, S, C> Algorithm for Minimal<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    fn name(&self) -> &'static str {
        "Minimal"
    }

    fn traverse(&mut self) -> Result<()> {
        self.session.start();
        crate::log_search_start!(self.name(), self.space.size());

        let mut current = self.space.bottom();
        loop {
            self.assure_checked(current)?;
            if self.session.global_optimum().is_some() {
                break;
            }
            let next = self.expand(current)?;
            if self.session.global_optimum().is_some() {
                break;
            }
            match next {
                Some(next) => {
                    tracing::trace!(from = %current, to = %next, "Descending");
                    current = next;
                }
                None => break,
            }
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
    fn test_configures_cache_and_prediction() {
        let mut lattice = GridLattice::new(vec![1]).unwrap();
        let mut checker = SyntheticChecker::new(|_: &[u32]| true, |_: &[u32]| 0.0);
        Minimal::new(&mut lattice, &mut checker).unwrap();
        assert_eq!(checker.storage_strategy(), Some(StorageStrategy::All));
        assert!(!lattice.is_anonymity_property_predictable());
    }

    #[test]
    fn test_single_node() {
        let mut lattice = GridLattice::new(vec![0]).unwrap();
        let mut checker = SyntheticChecker::new(|_: &[u32]| false, |_: &[u32]| 1.0);
        let mut minimal = Minimal::new(&mut lattice, &mut checker).unwrap();
        minimal.traverse().unwrap();
        assert!(minimal.global_optimum().is_none());
        assert_eq!(minimal.session().checks(), 1);
    }

    #[test]
    fn test_returns_first_feasible_on_descent() {
        let mut lattice = GridLattice::new(vec![2, 2]).unwrap();
        // Attribute 1 is cheap to generalize; [0, 2] would be the global minimum
        let mut checker = SyntheticChecker::new(
            |g: &[u32]| level_sum(g) >= 2,
            |g: &[u32]| f64::from(g[0] * 10 + g[1]),
        );
        let mut minimal = Minimal::new(&mut lattice, &mut checker).unwrap();
        minimal.traverse().unwrap();

        // Descends into [0, 1], whose first successor [1, 1] is feasible
        let optimum = minimal.global_optimum().unwrap();
        assert_eq!(optimum.generalization, vec![1, 1]);
        assert_eq!(minimal.track_record().len(), 1);
        assert_eq!(minimal.session().checks(), 4);
    }

    #[test]
    fn test_stops_at_first_feasible_successor() {
        let mut lattice = GridLattice::new(vec![1, 1, 1]).unwrap();
        let mut checker = SyntheticChecker::new(|g: &[u32]| level_sum(g) >= 1, |g: &[u32]| {
            level_sum(g) as f64
        });
        let mut minimal = Minimal::new(&mut lattice, &mut checker).unwrap();
        minimal.traverse().unwrap();
        // Bottom plus the first successor
        assert_eq!(minimal.session().checks(), 2);
    }
}
