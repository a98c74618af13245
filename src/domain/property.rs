//! Predictive properties attached to transformations
//!
//! A predictive property is a boolean tag whose truth can be inferred for
//! neighbouring transformations without consulting the oracle. Each property
//! has a fixed [`Direction`] along which the lattice store propagates it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Propagation direction of a predictive property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Implied for every generalization (successor) of a tagged node
    Up,
    /// Implied for every specialization (predecessor) of a tagged node
    Down,
    /// Not propagated
    None,
}

/// The closed set of well-known tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictiveProperty {
    /// The oracle has fully checked the node
    Checked,
    /// The node fulfils the privacy model
    Anonymous,
    /// The node does not fulfil the privacy model
    NotAnonymous,
    /// The node fulfils the minimal class size requirement
    KAnonymous,
    /// The node does not fulfil the minimal class size requirement
    NotKAnonymous,
    /// All successors of the node have been expanded by a best-first search
    Expanded,
    /// All successors of the node have been processed or can be ignored
    SuccessorsPruned,
    /// The snapshot cache must retain the grouping state of this node
    ForceSnapshot,
}

impl PredictiveProperty {
    /// Every property, in bit order
    pub const ALL: [PredictiveProperty; 8] = [
        PredictiveProperty::Checked,
        PredictiveProperty::Anonymous,
        PredictiveProperty::NotAnonymous,
        PredictiveProperty::KAnonymous,
        PredictiveProperty::NotKAnonymous,
        PredictiveProperty::Expanded,
        PredictiveProperty::SuccessorsPruned,
        PredictiveProperty::ForceSnapshot,
    ];

    /// Bit used to store the property in a [`PropertySet`]
    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Propagation direction when the anonymity properties are predictable
    pub const fn direction(self) -> Direction {
        match self {
            PredictiveProperty::Anonymous
            | PredictiveProperty::KAnonymous
            | PredictiveProperty::SuccessorsPruned => Direction::Up,
            PredictiveProperty::NotAnonymous | PredictiveProperty::NotKAnonymous => {
                Direction::Down
            }
            PredictiveProperty::Checked
            | PredictiveProperty::Expanded
            | PredictiveProperty::ForceSnapshot => Direction::None,
        }
    }

    /// Returns true for the tags toggled by `set_anonymity_property_predictable`
    pub const fn is_anonymity(self) -> bool {
        matches!(
            self,
            PredictiveProperty::Anonymous | PredictiveProperty::NotAnonymous
        )
    }
}

impl fmt::Display for PredictiveProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PredictiveProperty::Checked => "checked",
            PredictiveProperty::Anonymous => "anonymous",
            PredictiveProperty::NotAnonymous => "not-anonymous",
            PredictiveProperty::KAnonymous => "k-anonymous",
            PredictiveProperty::NotKAnonymous => "not-k-anonymous",
            PredictiveProperty::Expanded => "expanded",
            PredictiveProperty::SuccessorsPruned => "successors-pruned",
            PredictiveProperty::ForceSnapshot => "force-snapshot",
        };
        f.write_str(label)
    }
}

/// Fixed-size bitset of predictive properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(u16);

impl PropertySet {
    /// The empty set
    pub const EMPTY: PropertySet = PropertySet(0);

    /// Builds a set from a list of properties
    pub fn of(properties: &[PredictiveProperty]) -> Self {
        properties
            .iter()
            .fold(Self::EMPTY, |set, property| set.with(*property))
    }

    /// Returns a copy with `property` added
    pub const fn with(self, property: PredictiveProperty) -> Self {
        Self(self.0 | property.bit())
    }

    /// Adds a property in place
    pub fn insert(&mut self, property: PredictiveProperty) {
        self.0 |= property.bit();
    }

    /// Removes a property in place
    pub fn remove(&mut self, property: PredictiveProperty) {
        self.0 &= !property.bit();
    }

    /// Returns true if the property is present
    pub const fn contains(self, property: PredictiveProperty) -> bool {
        self.0 & property.bit() != 0
    }

    /// Returns true if any property of `other` is present
    pub const fn intersects(self, other: PropertySet) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if every property of `other` is present
    pub const fn contains_all(self, other: PropertySet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the contained properties
    pub fn iter(self) -> impl Iterator<Item = PredictiveProperty> {
        PredictiveProperty::ALL
            .into_iter()
            .filter(move |property| self.contains(*property))
    }
}

impl FromIterator<PredictiveProperty> for PropertySet {
    fn from_iter<I: IntoIterator<Item = PredictiveProperty>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |set, property| set.with(property))
    }
}
