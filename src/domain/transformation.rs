//! Transformation snapshots
//!
//! The lattice store owns every transformation. Algorithms and oracles work on
//! owned snapshots that carry the identity of a node together with the state
//! the store held for it at the time of the request.

use super::ids::TransformationId;
use super::loss::InformationLoss;
use super::property::{PredictiveProperty, PropertySet};
use serde::{Deserialize, Serialize};

/// Snapshot of a lattice node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// Dense identifier
    pub id: TransformationId,

    /// Generalization level per quasi-identifying attribute
    pub generalization: Vec<u32>,

    /// Sum of the generalization vector
    pub level: u32,

    /// Predictive properties currently attached to the node
    pub properties: PropertySet,

    /// Information loss, once checked or evaluated
    pub information_loss: Option<InformationLoss>,

    /// Lower bound on the loss of this node and its generalizations
    pub lower_bound: Option<InformationLoss>,
}

impl Transformation {
    /// Returns true if the node carries the given property
    pub fn has_property(&self, property: PredictiveProperty) -> bool {
        self.properties.contains(property)
    }

    /// A node is feasible once it is known to be anonymous and its loss is known
    pub fn is_feasible(&self) -> bool {
        self.has_property(PredictiveProperty::Anonymous) && self.information_loss.is_some()
    }
}
