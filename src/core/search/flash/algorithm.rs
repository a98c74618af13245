//! The FLASH traversal

use super::config::{FlashConfiguration, Phase, Trigger};
use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::{NodeChecker, StorageStrategy};
use crate::core::search::strategy::{SearchStrategy, StrategyOrder};
use crate::core::search::{Algorithm, SearchSession};
use crate::domain::ids::validate_lattice_size;
use crate::domain::{PredictiveProperty, Result, SearchError, TransformationId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

type SortedSuccessors = Box<[TransformationId]>;

/// Pending node of the depth-first sweep
struct Frame {
    id: TransformationId,
    successors: SortedSuccessors,
    next: usize,
}

/// Exact search exploiting monotonicity
///
/// Finds the feasible transformation with minimal information loss. With a
/// fully monotonic privacy model and metric, most of the lattice is never
/// checked: properties of checked nodes are predicted for their
/// generalizations and specializations.
pub struct Flash<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    space: &'a mut S,
    checker: &'a mut C,
    config: FlashConfiguration,
    order: StrategyOrder,
    sorted_successors: Vec<Option<SortedSuccessors>>,
    queue: BinaryHeap<Reverse<(u32, TransformationId)>>,
    checked: u64,
    session: SearchSession,
}

impl<'a, S, C> Flash<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    /// Creates the algorithm with the default snapshot storage strategy
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the lattice is empty or too large to
    /// be addressed by 32-bit identifiers.
    pub fn new<T>(space: &'a mut S, checker: &'a mut C, strategy: &T) -> Result<Self>
    where
        T: SearchStrategy + ?Sized,
    {
        Self::with_storage_strategy(space, checker, strategy, StorageStrategy::DEFAULT_FRACTION)
    }

    /// Creates the algorithm with an explicit snapshot storage strategy
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the lattice is empty or too large to
    /// be addressed by 32-bit identifiers.
    pub fn with_storage_strategy<T>(
        space: &'a mut S,
        checker: &'a mut C,
        strategy: &T,
        storage_strategy: StorageStrategy,
    ) -> Result<Self>
    where
        T: SearchStrategy + ?Sized,
    {
        validate_lattice_size(space.size()).map_err(SearchError::Configuration)?;

        let config = FlashConfiguration::create(
            checker.monotonicity(),
            checker.is_effectively_monotonic(),
            storage_strategy,
        );
        space.set_anonymity_property_predictable(config.is_anonymity_property_predictable());
        tracing::debug!(
            monotonicity = %checker.monotonicity(),
            binary = config.is_binary_phase_required(),
            linear = config.is_linear_phase_required(),
            predictable = config.is_anonymity_property_predictable(),
            "Configured FLASH phases"
        );

        let order = StrategyOrder::new(&*space, strategy);
        let size = space.size() as usize;
        Ok(Self {
            space,
            checker,
            config,
            order,
            sorted_successors: vec![None; size],
            queue: BinaryHeap::new(),
            checked: 0,
            session: SearchSession::new(),
        })
    }

    /// Phase configuration in use
    pub fn configuration(&self) -> &FlashConfiguration {
        &self.config
    }

    fn search(&mut self, bottom: TransformationId, top: TransformationId) -> Result<()> {
        let outer = self.config.outer_phase();
        let Some(skip) = self.config.phase(outer).map(|phase| phase.trigger_skip) else {
            return Ok(());
        };

        for level in self.space.level(bottom)..=self.space.level(top) {
            let nodes = self.sorted_unprocessed_nodes(level, skip);
            tracing::debug!(level, nodes = nodes.len(), "Processing level");
            for id in nodes {
                match outer {
                    Phase::Binary => self.binary_search(id)?,
                    Phase::Linear => self.linear_search(id)?,
                }
            }
        }

        self.compute_utility_for_monotonic_metrics(bottom)?;
        self.compute_utility_for_monotonic_metrics(top)
    }

    fn binary_search(&mut self, start: TransformationId) -> Result<()> {
        let Some(skip) = self
            .config
            .phase(Phase::Binary)
            .map(|phase| phase.trigger_skip)
        else {
            return Ok(());
        };

        self.enqueue(start);
        while let Some(Reverse((_, head))) = self.queue.pop() {
            if self.skips(skip, head) {
                continue;
            }
            let path = self.find_path(head, skip);
            let found = self.check_path(&path, skip)?;
            if let Some(found) = found {
                if self.config.is_linear_phase_required() {
                    self.linear_search(found)?;
                }
            }
        }
        Ok(())
    }

    /// Greedily ascends through the first non-skipped successor
    fn find_path(&mut self, start: TransformationId, skip: Trigger) -> Vec<TransformationId> {
        let mut path = vec![start];
        let mut current = start;
        loop {
            let successors = self.sorted_successors(current);
            match successors.iter().copied().find(|id| !self.skips(skip, *id)) {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => return path,
            }
        }
    }

    /// Binary search for the lowest node on the path with the target property
    fn check_path(
        &mut self,
        path: &[TransformationId],
        skip: Trigger,
    ) -> Result<Option<TransformationId>> {
        let target = self
            .config
            .phase(Phase::Binary)
            .map_or(PredictiveProperty::Anonymous, |phase| {
                phase.anonymity_property.property()
            });

        let mut low = 0isize;
        let mut high = path.len() as isize - 1;
        let mut lowest = None;

        while low <= high {
            let mid = (low + high) / 2;
            let id = path[mid as usize];

            if self.skips(skip, id) {
                high = mid - 1;
                continue;
            }

            self.check_and_tag(id, Phase::Binary)?;

            if self.space.has_property(id, target) {
                lowest = Some(id);
                high = mid - 1;
            } else {
                for up in self.sorted_successors(id).iter().copied() {
                    if !self.skips(skip, up) {
                        self.enqueue(up);
                    }
                }
                low = mid + 1;
            }
        }
        Ok(lowest)
    }

    /// Depth-first sweep in strategy order, pruning visited subtrees
    fn linear_search(&mut self, start: TransformationId) -> Result<()> {
        let Some(skip) = self
            .config
            .phase(Phase::Linear)
            .map(|phase| phase.trigger_skip)
        else {
            return Ok(());
        };

        if self.skips(skip, start) {
            self.space
                .set_property(start, PredictiveProperty::SuccessorsPruned);
            return Ok(());
        }

        self.check_and_tag(start, Phase::Linear)?;
        let mut stack = vec![Frame {
            id: start,
            successors: self.sorted_successors(start),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.successors.get(frame.next) {
                frame.next += 1;
                if !self.skips(skip, child) {
                    self.check_and_tag(child, Phase::Linear)?;
                    stack.push(Frame {
                        id: child,
                        successors: self.sorted_successors(child),
                        next: 0,
                    });
                }
            } else {
                let id = frame.id;
                stack.pop();
                self.space.set_property(id, PredictiveProperty::SuccessorsPruned);
            }
        }
        Ok(())
    }

    /// Evaluates or checks a node as the phase prescribes, then tags it
    fn check_and_tag(&mut self, id: TransformationId, phase: Phase) -> Result<()> {
        let Some(config) = self.config.phase(phase) else {
            return Ok(());
        };
        let properties = self.space.properties(id);

        if config.trigger_evaluate.applies_to(properties) {
            let snapshot = self.space.transformation(id);
            let loss = self.checker.evaluate(&snapshot)?;
            let bound = match loss.lower_bound {
                Some(bound) => Some(bound),
                None => self.checker.lower_bound(&snapshot)?,
            };
            self.space.set_information_loss(id, loss.information_loss);
            self.space.set_lower_bound(id, bound);
        } else if config.trigger_check.applies_to(properties) {
            let result = match self.space.data(id) {
                Some(cached) => cached,
                None => {
                    let result = self.checker.check(&self.space.transformation(id), false)?;
                    self.session.record_check();
                    result
                }
            };
            self.space.set_checked(id, result);
            self.checked += 1;
            self.checker
                .progress(self.checked as f64 / self.space.size() as f64);
        }

        self.session.track_optimum(&*self.space, id);

        for tag in &config.trigger_tag {
            if tag.when.applies_to(self.space.properties(id)) {
                self.space.set_property(id, tag.set);
            }
        }
        Ok(())
    }

    /// Measures bottom or top if the metric allows bounding utility with them
    fn compute_utility_for_monotonic_metrics(&mut self, id: TransformationId) -> Result<()> {
        if !self.checker.practical_monotonicity() || self.space.information_loss(id).is_some() {
            return Ok(());
        }
        let snapshot = self.space.transformation(id);
        if self.checker.is_independent() {
            let loss = self.checker.evaluate(&snapshot)?;
            self.space.set_information_loss(id, loss.information_loss);
            self.space.set_lower_bound(id, loss.lower_bound);
        } else {
            let result = self.checker.check(&snapshot, true)?;
            self.session.record_check();
            self.space.set_checked(id, result);
        }
        Ok(())
    }

    fn sorted_unprocessed_nodes(&self, level: u32, skip: Trigger) -> Vec<TransformationId> {
        let mut nodes: Vec<TransformationId> = self
            .space
            .level_members(level)
            .into_iter()
            .filter(|id| !self.skips(skip, *id))
            .collect();
        self.order.sort(&mut nodes);
        nodes
    }

    fn sorted_successors(&mut self, id: TransformationId) -> SortedSuccessors {
        let space = &*self.space;
        let order = &self.order;
        self.sorted_successors[id.index()]
            .get_or_insert_with(|| {
                let mut successors = space.successors(id);
                order.sort(&mut successors);
                successors.into_boxed_slice()
            })
            .clone()
    }

    fn enqueue(&mut self, id: TransformationId) {
        self.queue.push(Reverse((self.order.rank(id), id)));
    }

    fn skips(&self, skip: Trigger, id: TransformationId) -> bool {
        skip.applies_to(self.space.properties(id))
    }
}

impl<'a, S, C> Algorithm for Flash<'a, S, C>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    fn name(&self) -> &'static str {
        "FLASH"
    }

    fn traverse(&mut self) -> Result<()> {
        self.session.start();
        self.checked = 0;
        self.queue.clear();
        crate::log_search_start!(self.name(), self.space.size());

        self.checker.set_storage_strategy(self.config.storage_strategy());

        // The bottom is checked once up front; its result is reused when the
        // traversal reaches it.
        let bottom = self.space.bottom();
        let top = self.space.top();
        let result = self.checker.check(&self.space.transformation(bottom), false)?;
        self.session.record_check();
        self.space
            .set_property(bottom, PredictiveProperty::ForceSnapshot);
        self.space.set_data(bottom, Some(result));

        let outcome = self.search(bottom, top);
        self.space.set_data(bottom, None);
        outcome?;

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
