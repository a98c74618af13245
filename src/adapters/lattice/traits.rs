//! Lattice store abstraction
//!
//! This module defines the trait a transformation lattice must implement to be
//! searched by the algorithms in [`crate::core::search`].

use crate::domain::{
    CheckResult, InformationLoss, PredictiveProperty, PropertySet, Transformation,
    TransformationId,
};

/// Store of all transformations of a generalization lattice
///
/// Nodes are addressed by dense identifiers in `0..size()`. The store owns every
/// node; algorithms only read structure and mutate properties or cached results.
/// Setting a property with an UP or DOWN [`Direction`](crate::domain::Direction)
/// implies it for every generalization or specialization respectively, unless the
/// property is an anonymity tag and anonymity prediction is switched off.
pub trait SolutionSpace {
    /// Number of transformations in the lattice
    fn size(&self) -> u64;

    /// The least generalized transformation
    fn bottom(&self) -> TransformationId;

    /// The most generalized transformation
    fn top(&self) -> TransformationId;

    /// Level (sum of the generalization vector) of a transformation
    fn level(&self, id: TransformationId) -> u32;

    /// Generalization vector of a transformation
    fn generalization(&self, id: TransformationId) -> Vec<u32>;

    /// Direct generalizations, in a stable store-defined order
    fn successors(&self, id: TransformationId) -> Vec<TransformationId>;

    /// Direct specializations, in a stable store-defined order
    fn predecessors(&self, id: TransformationId) -> Vec<TransformationId>;

    /// All transformations on a level
    fn level_members(&self, level: u32) -> Vec<TransformationId>;

    /// Properties currently attached to a transformation
    fn properties(&self, id: TransformationId) -> PropertySet;

    /// Attaches a property, propagating it along its direction
    fn set_property(&mut self, id: TransformationId, property: PredictiveProperty);

    /// Enables or disables propagation of the anonymity tags
    fn set_anonymity_property_predictable(&mut self, predictable: bool);

    /// Whether anonymity tags are currently propagated
    fn is_anonymity_property_predictable(&self) -> bool;

    /// Information loss, if the node has been checked or evaluated
    fn information_loss(&self, id: TransformationId) -> Option<InformationLoss>;

    /// Stores the information loss of a node
    fn set_information_loss(&mut self, id: TransformationId, loss: InformationLoss);

    /// Lower bound, if known
    fn lower_bound(&self, id: TransformationId) -> Option<InformationLoss>;

    /// Stores the lower bound of a node
    fn set_lower_bound(&mut self, id: TransformationId, bound: Option<InformationLoss>);

    /// Cached oracle result attached to a node outside of the checked state
    fn data(&self, id: TransformationId) -> Option<CheckResult>;

    /// Attaches or clears a cached oracle result
    fn set_data(&mut self, id: TransformationId, data: Option<CheckResult>);

    /// Returns true if the node carries the property
    fn has_property(&self, id: TransformationId, property: PredictiveProperty) -> bool {
        self.properties(id).contains(property)
    }

    /// Records a full check: stores loss and bound and tags the outcome
    fn set_checked(&mut self, id: TransformationId, result: CheckResult) {
        self.set_information_loss(id, result.information_loss);
        if result.lower_bound.is_some() {
            self.set_lower_bound(id, result.lower_bound);
        }
        self.set_property(id, PredictiveProperty::Checked);
        if result.privacy_model_fulfilled {
            self.set_property(id, PredictiveProperty::Anonymous);
        } else {
            self.set_property(id, PredictiveProperty::NotAnonymous);
        }
        if result.minimal_class_size_fulfilled {
            self.set_property(id, PredictiveProperty::KAnonymous);
        } else {
            self.set_property(id, PredictiveProperty::NotKAnonymous);
        }
    }

    /// Cheap heuristic key used by best-first traversal
    ///
    /// Returns the information loss if known, else the lower bound.
    fn utility(&self, id: TransformationId) -> Option<InformationLoss> {
        self.information_loss(id).or_else(|| self.lower_bound(id))
    }

    /// Owned snapshot of a node
    fn transformation(&self, id: TransformationId) -> Transformation {
        Transformation {
            id,
            generalization: self.generalization(id),
            level: self.level(id),
            properties: self.properties(id),
            information_loss: self.information_loss(id),
            lower_bound: self.lower_bound(id),
        }
    }
}
