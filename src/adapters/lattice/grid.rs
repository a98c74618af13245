//! In-memory grid lattice
//!
//! [`GridLattice`] is the full cartesian product of per-attribute generalization
//! levels. Identifiers are mixed-radix encodings of the generalization vector
//! with the first attribute varying fastest, so the bottom is `0` and the top is
//! `size - 1`. Per-node state lives in arenas indexed by identifier.

use super::traits::SolutionSpace;
use crate::domain::ids::validate_lattice_size;
use crate::domain::{
    CheckResult, Direction, InformationLoss, PredictiveProperty, PropertySet, Result,
    SearchError, TransformationId,
};
use std::collections::HashMap;

/// Reference lattice store backed by dense arenas
#[derive(Debug, Clone)]
pub struct GridLattice {
    /// Maximal generalization level per attribute
    heights: Vec<u32>,

    /// Mixed-radix multiplier per attribute
    multipliers: Vec<u32>,

    /// Node identifiers grouped by level
    levels: Vec<Vec<TransformationId>>,

    properties: Vec<PropertySet>,
    information_loss: Vec<Option<InformationLoss>>,
    lower_bound: Vec<Option<InformationLoss>>,
    data: HashMap<TransformationId, CheckResult>,
    anonymity_predictable: bool,
}

impl GridLattice {
    /// Creates a lattice from the maximal generalization level of each attribute
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no attribute is given or if the product of
    /// the level counts does not fit the dense identifier range.
    ///
    /// # Examples
    ///
    /// ```
    /// use anonsearch::adapters::lattice::{GridLattice, SolutionSpace};
    ///
    /// let lattice = GridLattice::new(vec![2, 2]).unwrap();
    /// assert_eq!(lattice.size(), 9);
    /// assert_eq!(lattice.level(lattice.top()), 4);
    /// ```
    pub fn new(heights: Vec<u32>) -> Result<Self> {
        if heights.is_empty() {
            return Err(SearchError::Configuration(
                "A lattice requires at least one quasi-identifying attribute".to_string(),
            ));
        }

        let mut size: u64 = 1;
        let mut multipliers = Vec::with_capacity(heights.len());
        for height in &heights {
            multipliers.push(size as u32);
            size = size
                .checked_mul(u64::from(*height) + 1)
                .filter(|size| validate_lattice_size(*size).is_ok())
                .ok_or_else(|| {
                    SearchError::Configuration(format!(
                        "Lattice with heights {heights:?} exceeds the dense identifier range"
                    ))
                })?;
        }
        validate_lattice_size(size).map_err(SearchError::Configuration)?;

        let height: u32 = heights.iter().sum();
        let mut levels = vec![Vec::new(); height as usize + 1];
        let mut lattice = Self {
            heights,
            multipliers,
            levels: Vec::new(),
            properties: vec![PropertySet::EMPTY; size as usize],
            information_loss: vec![None; size as usize],
            lower_bound: vec![None; size as usize],
            data: HashMap::new(),
            anonymity_predictable: true,
        };
        for index in 0..size as usize {
            let id = TransformationId::new(index as u32);
            levels[lattice.level(id) as usize].push(id);
        }
        lattice.levels = levels;

        tracing::debug!(
            attributes = lattice.heights.len(),
            size,
            height,
            "Grid lattice created"
        );
        Ok(lattice)
    }

    /// Maximal generalization level per attribute
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    /// Looks up the node with the given generalization vector
    pub fn find(&self, generalization: &[u32]) -> Option<TransformationId> {
        if generalization.len() != self.heights.len() {
            return None;
        }
        let mut raw = 0u32;
        for ((value, height), multiplier) in generalization
            .iter()
            .zip(&self.heights)
            .zip(&self.multipliers)
        {
            if value > height {
                return None;
            }
            raw += value * multiplier;
        }
        Some(TransformationId::new(raw))
    }

    /// Clears all properties, losses and cached data, keeping the structure
    pub fn reset(&mut self) {
        self.properties.fill(PropertySet::EMPTY);
        self.information_loss.fill(None);
        self.lower_bound.fill(None);
        self.data.clear();
        self.anonymity_predictable = true;
    }

    fn value(&self, id: TransformationId, attribute: usize) -> u32 {
        (id.get() / self.multipliers[attribute]) % (self.heights[attribute] + 1)
    }

    fn direction(&self, property: PredictiveProperty) -> Direction {
        if property.is_anonymity() && !self.anonymity_predictable {
            Direction::None
        } else {
            property.direction()
        }
    }

    /// Tags `id` and every node reachable in `direction` that lacks the tag.
    ///
    /// A node that already carries the tag has already implied it for its
    /// reachable set, so traversal stops there.
    fn propagate(&mut self, id: TransformationId, property: PredictiveProperty, direction: Direction) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let slot = &mut self.properties[current.index()];
            if slot.contains(property) {
                continue;
            }
            slot.insert(property);
            match direction {
                Direction::Up => pending.extend(self.successors(current)),
                Direction::Down => pending.extend(self.predecessors(current)),
                Direction::None => {}
            }
        }
    }
}

impl SolutionSpace for GridLattice {
    fn size(&self) -> u64 {
        self.properties.len() as u64
    }

    fn bottom(&self) -> TransformationId {
        TransformationId::new(0)
    }

    fn top(&self) -> TransformationId {
        TransformationId::new(self.properties.len() as u32 - 1)
    }

    fn level(&self, id: TransformationId) -> u32 {
        (0..self.heights.len())
            .map(|attribute| self.value(id, attribute))
            .sum()
    }

    fn generalization(&self, id: TransformationId) -> Vec<u32> {
        (0..self.heights.len())
            .map(|attribute| self.value(id, attribute))
            .collect()
    }

    fn successors(&self, id: TransformationId) -> Vec<TransformationId> {
        (0..self.heights.len())
            .filter(|attribute| self.value(id, *attribute) < self.heights[*attribute])
            .map(|attribute| TransformationId::new(id.get() + self.multipliers[attribute]))
            .collect()
    }

    fn predecessors(&self, id: TransformationId) -> Vec<TransformationId> {
        (0..self.heights.len())
            .filter(|attribute| self.value(id, *attribute) > 0)
            .map(|attribute| TransformationId::new(id.get() - self.multipliers[attribute]))
            .collect()
    }

    fn level_members(&self, level: u32) -> Vec<TransformationId> {
        self.levels
            .get(level as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn properties(&self, id: TransformationId) -> PropertySet {
        self.properties[id.index()]
    }

    fn set_property(&mut self, id: TransformationId, property: PredictiveProperty) {
        let direction = self.direction(property);
        self.propagate(id, property, direction);
    }

    fn set_anonymity_property_predictable(&mut self, predictable: bool) {
        self.anonymity_predictable = predictable;
    }

    fn is_anonymity_property_predictable(&self) -> bool {
        self.anonymity_predictable
    }

    fn information_loss(&self, id: TransformationId) -> Option<InformationLoss> {
        self.information_loss[id.index()]
    }

    fn set_information_loss(&mut self, id: TransformationId, loss: InformationLoss) {
        self.information_loss[id.index()] = Some(loss);
    }

    fn lower_bound(&self, id: TransformationId) -> Option<InformationLoss> {
        self.lower_bound[id.index()]
    }

    fn set_lower_bound(&mut self, id: TransformationId, bound: Option<InformationLoss>) {
        self.lower_bound[id.index()] = bound;
    }

    fn data(&self, id: TransformationId) -> Option<CheckResult> {
        self.data.get(&id).copied()
    }

    fn set_data(&mut self, id: TransformationId, data: Option<CheckResult>) {
        match data {
            Some(result) => {
                self.data.insert(id, result);
            }
            None => {
                self.data.remove(&id);
            }
        }
    }
}
