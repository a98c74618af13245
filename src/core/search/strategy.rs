//! Traversal order over transformations
//!
//! A [`SearchStrategy`] is a total order over node identifiers. Algorithms do not
//! call the comparator in their hot loops; they rank every node once through a
//! [`StrategyOrder`] and compare ranks afterwards.

use crate::adapters::lattice::SolutionSpace;
use crate::domain::{Result, SearchError, TransformationId};
use std::cmp::Ordering;

/// Total order used to prioritize nodes
pub trait SearchStrategy {
    /// Compares two nodes; `Less` means `a` is processed first
    fn compare(&self, a: TransformationId, b: TransformationId) -> Ordering;
}

/// Per-node sort key of the [`FlashStrategy`]
#[derive(Debug, Clone, Copy)]
struct FlashKey {
    level: u32,
    precision: f64,
    distinct: u64,
}

/// Default strategy of the FLASH algorithm
///
/// Orders by level, then by average relative generalization (less generalized
/// first), then by the number of retained distinct values (more first, only if
/// counts were supplied), then by identifier.
#[derive(Debug, Clone)]
pub struct FlashStrategy {
    keys: Vec<FlashKey>,
}

impl FlashStrategy {
    /// Builds the strategy for all nodes of a lattice
    pub fn new<S: SolutionSpace + ?Sized>(space: &S) -> Self {
        Self::build(space, None)
    }

    /// Builds the strategy using distinct value counts per attribute and level
    ///
    /// `distinct_values[attribute][level]` is the number of distinct values the
    /// attribute retains when generalized to `level`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the table does not cover every attribute
    /// and level of the lattice.
    pub fn with_distinct_values<S: SolutionSpace + ?Sized>(
        space: &S,
        distinct_values: &[Vec<u64>],
    ) -> Result<Self> {
        let heights = space.generalization(space.top());
        if distinct_values.len() != heights.len()
            || distinct_values
                .iter()
                .zip(&heights)
                .any(|(counts, height)| counts.len() <= *height as usize)
        {
            return Err(SearchError::Configuration(format!(
                "Distinct value table must cover {} attributes with heights {:?}",
                heights.len(),
                heights
            )));
        }
        Ok(Self::build(space, Some(distinct_values)))
    }

    fn build<S: SolutionSpace + ?Sized>(space: &S, distinct_values: Option<&[Vec<u64>]>) -> Self {
        let heights = space.generalization(space.top());
        let keys = (0..space.size())
            .map(|index| {
                let id = TransformationId::new(index as u32);
                let generalization = space.generalization(id);
                let precision = generalization
                    .iter()
                    .zip(&heights)
                    .map(|(value, height)| {
                        if *height == 0 {
                            0.0
                        } else {
                            f64::from(*value) / f64::from(*height)
                        }
                    })
                    .sum::<f64>()
                    / heights.len().max(1) as f64;
                let distinct = distinct_values.map_or(0, |table| {
                    generalization
                        .iter()
                        .zip(table)
                        .map(|(value, counts)| counts[*value as usize])
                        .sum()
                });
                FlashKey {
                    level: space.level(id),
                    precision,
                    distinct,
                }
            })
            .collect();
        Self { keys }
    }
}

impl SearchStrategy for FlashStrategy {
    fn compare(&self, a: TransformationId, b: TransformationId) -> Ordering {
        let (ka, kb) = (&self.keys[a.index()], &self.keys[b.index()]);
        ka.level
            .cmp(&kb.level)
            .then_with(|| ka.precision.total_cmp(&kb.precision))
            .then_with(|| kb.distinct.cmp(&ka.distinct))
            .then_with(|| a.cmp(&b))
    }
}

/// Dense rank of every node under a strategy
#[derive(Debug, Clone)]
pub struct StrategyOrder {
    rank: Vec<u32>,
}

impl StrategyOrder {
    /// Ranks all nodes of a lattice
    pub fn new<S, T>(space: &S, strategy: &T) -> Self
    where
        S: SolutionSpace + ?Sized,
        T: SearchStrategy + ?Sized,
    {
        let size = space.size() as usize;
        let mut ids: Vec<TransformationId> =
            (0..size).map(|index| TransformationId::new(index as u32)).collect();
        ids.sort_by(|a, b| strategy.compare(*a, *b));

        let mut rank = vec![0u32; size];
        for (position, id) in ids.into_iter().enumerate() {
            rank[id.index()] = position as u32;
        }
        Self { rank }
    }

    /// Rank of a node; lower ranks are processed first
    pub fn rank(&self, id: TransformationId) -> u32 {
        self.rank[id.index()]
    }

    /// Sorts identifiers in strategy order
    pub fn sort(&self, ids: &mut [TransformationId]) {
        ids.sort_unstable_by_key(|id| self.rank(*id));
    }
}
