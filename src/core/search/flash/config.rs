//! Phase configuration of the FLASH algorithm
//!
//! FLASH runs up to two phases: a binary search along paths for the boundary of
//! a monotonic property, and a linear depth-first sweep. Which nodes each phase
//! skips, evaluates, checks and tags depends on the monotonicity of the privacy
//! model and of the metric. Triggers are plain data over [`PropertySet`]s.

use crate::adapters::oracle::{PrivacyMonotonicity, StorageStrategy};
use crate::domain::{PredictiveProperty, PropertySet};
use serde::{Deserialize, Serialize};

use PredictiveProperty::{
    Anonymous, Checked, KAnonymous, NotAnonymous, NotKAnonymous, SuccessorsPruned,
};

/// Predicate over the properties of a node
///
/// Applies if the node has every property in `all_of`, at least one in `any_of`
/// (when non-empty) and none in `none_of`. A disabled trigger never applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    enabled: bool,
    all_of: PropertySet,
    any_of: PropertySet,
    none_of: PropertySet,
}

impl Trigger {
    /// A trigger that never applies
    pub const fn never() -> Self {
        Self {
            enabled: false,
            all_of: PropertySet::EMPTY,
            any_of: PropertySet::EMPTY,
            none_of: PropertySet::EMPTY,
        }
    }

    /// A trigger that always applies
    pub const fn always() -> Self {
        Self {
            enabled: true,
            all_of: PropertySet::EMPTY,
            any_of: PropertySet::EMPTY,
            none_of: PropertySet::EMPTY,
        }
    }

    /// Applies if the node carries any of the properties
    pub fn any_of(properties: &[PredictiveProperty]) -> Self {
        Self {
            any_of: PropertySet::of(properties),
            ..Self::always()
        }
    }

    /// Applies if the node carries none of the properties
    pub fn none_of(properties: &[PredictiveProperty]) -> Self {
        Self {
            none_of: PropertySet::of(properties),
            ..Self::always()
        }
    }

    /// Additionally requires all of the properties
    pub fn requiring(mut self, properties: &[PredictiveProperty]) -> Self {
        self.all_of = PropertySet::of(properties);
        self
    }

    /// Evaluates the trigger
    pub fn applies_to(&self, properties: PropertySet) -> bool {
        self.enabled
            && properties.contains_all(self.all_of)
            && (self.any_of.is_empty() || properties.intersects(self.any_of))
            && !properties.intersects(self.none_of)
    }
}

/// Tags a node with `set` if `when` applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAction {
    /// Condition
    pub when: Trigger,
    /// Property to attach
    pub set: PredictiveProperty,
}

/// The property whose boundary the binary phase searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseAnonymityProperty {
    /// The full privacy model
    Anonymity,
    /// The minimal class size requirement only
    KAnonymity,
}

impl PhaseAnonymityProperty {
    /// The predictive property holding when the target is met
    pub fn property(self) -> PredictiveProperty {
        match self {
            PhaseAnonymityProperty::Anonymity => Anonymous,
            PhaseAnonymityProperty::KAnonymity => KAnonymous,
        }
    }
}

/// The two phases of the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Binary search along paths
    Binary,
    /// Depth-first sweep
    Linear,
}

/// Configuration of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashPhaseConfiguration {
    /// Search target of the binary phase
    pub anonymity_property: PhaseAnonymityProperty,
    /// Nodes to pass over
    pub trigger_skip: Trigger,
    /// Nodes to run a full check on
    pub trigger_check: Trigger,
    /// Nodes to evaluate analytically instead of checking
    pub trigger_evaluate: Trigger,
    /// Tags applied after a node was processed
    pub trigger_tag: Vec<TagAction>,
}

/// Phase setup for one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashConfiguration {
    binary: Option<FlashPhaseConfiguration>,
    linear: Option<FlashPhaseConfiguration>,
    anonymity_predictable: bool,
    storage_strategy: StorageStrategy,
}

impl FlashConfiguration {
    /// Derives the phases from the monotonicity of privacy model and metric
    ///
    /// `metric_monotonic` should already account for suppression: a metric with a
    /// suppression limit of zero behaves monotonically.
    pub fn create(
        monotonicity: PrivacyMonotonicity,
        metric_monotonic: bool,
        storage_strategy: StorageStrategy,
    ) -> Self {
        let prune_anonymous: Vec<TagAction> = if metric_monotonic {
            vec![TagAction {
                when: Trigger::always().requiring(&[Anonymous]),
                set: SuccessorsPruned,
            }]
        } else {
            Vec::new()
        };
        let check_unchecked = Trigger::none_of(&[Checked]);

        let (binary, linear, anonymity_predictable) = match (monotonicity, metric_monotonic) {
            (PrivacyMonotonicity::Full, true) => {
                let binary = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::Anonymity,
                    trigger_skip: Trigger::any_of(&[Anonymous, NotAnonymous, SuccessorsPruned]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::never(),
                    trigger_tag: Vec::new(),
                };
                (Some(binary), None, true)
            }
            (PrivacyMonotonicity::Full, false) => {
                let binary = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::Anonymity,
                    trigger_skip: Trigger::any_of(&[Anonymous, NotAnonymous, SuccessorsPruned]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::never(),
                    trigger_tag: Vec::new(),
                };
                let linear = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::Anonymity,
                    trigger_skip: Trigger::any_of(&[SuccessorsPruned, NotAnonymous]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::none_of(&[Checked]).requiring(&[Anonymous]),
                    trigger_tag: Vec::new(),
                };
                (Some(binary), Some(linear), true)
            }
            (PrivacyMonotonicity::Partial, _) => {
                let binary = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::KAnonymity,
                    trigger_skip: Trigger::any_of(&[KAnonymous, NotKAnonymous, SuccessorsPruned]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::never(),
                    trigger_tag: prune_anonymous.clone(),
                };
                let linear = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::KAnonymity,
                    trigger_skip: Trigger::any_of(&[SuccessorsPruned, NotKAnonymous]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::never(),
                    trigger_tag: prune_anonymous,
                };
                (Some(binary), Some(linear), false)
            }
            (PrivacyMonotonicity::None, _) => {
                let linear = FlashPhaseConfiguration {
                    anonymity_property: PhaseAnonymityProperty::Anonymity,
                    trigger_skip: Trigger::any_of(&[SuccessorsPruned]),
                    trigger_check: check_unchecked,
                    trigger_evaluate: Trigger::never(),
                    trigger_tag: prune_anonymous,
                };
                (None, Some(linear), false)
            }
        };

        Self {
            binary,
            linear,
            anonymity_predictable,
            storage_strategy,
        }
    }

    /// Whether the binary phase runs
    pub fn is_binary_phase_required(&self) -> bool {
        self.binary.is_some()
    }

    /// Whether the linear phase runs
    pub fn is_linear_phase_required(&self) -> bool {
        self.linear.is_some()
    }

    /// Binary phase, if required
    pub fn binary_phase(&self) -> Option<&FlashPhaseConfiguration> {
        self.binary.as_ref()
    }

    /// Linear phase, if required
    pub fn linear_phase(&self) -> Option<&FlashPhaseConfiguration> {
        self.linear.as_ref()
    }

    /// Configuration of a phase, if it is required
    pub fn phase(&self, phase: Phase) -> Option<&FlashPhaseConfiguration> {
        match phase {
            Phase::Binary => self.binary.as_ref(),
            Phase::Linear => self.linear.as_ref(),
        }
    }

    /// Phase driving the outer level-by-level loop
    pub fn outer_phase(&self) -> Phase {
        if self.binary.is_some() {
            Phase::Binary
        } else {
            Phase::Linear
        }
    }

    /// Whether anonymity tags may be propagated
    pub fn is_anonymity_property_predictable(&self) -> bool {
        self.anonymity_predictable
    }

    /// Snapshot storage strategy for the cache
    pub fn storage_strategy(&self) -> StorageStrategy {
        self.storage_strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const STORAGE: StorageStrategy = StorageStrategy::All;

    #[test]
    fn test_trigger_semantics() {
        let trigger = Trigger::none_of(&[Checked]).requiring(&[Anonymous]);
        assert!(trigger.applies_to(PropertySet::of(&[Anonymous])));
        assert!(!trigger.applies_to(PropertySet::of(&[Anonymous, Checked])));
        assert!(!trigger.applies_to(PropertySet::EMPTY));

        let any = Trigger::any_of(&[SuccessorsPruned, NotAnonymous]);
        assert!(any.applies_to(PropertySet::of(&[NotAnonymous])));
        assert!(!any.applies_to(PropertySet::of(&[Anonymous])));

        assert!(Trigger::always().applies_to(PropertySet::EMPTY));
        assert!(!Trigger::never().applies_to(PropertySet::of(&[Checked])));
    }

    #[test_case(PrivacyMonotonicity::Full, true => (true, false, true); "full monotonic metric")]
    #[test_case(PrivacyMonotonicity::Full, false => (true, true, true); "full non-monotonic metric")]
    #[test_case(PrivacyMonotonicity::Partial, true => (true, true, false); "partial")]
    #[test_case(PrivacyMonotonicity::None, true => (false, true, false); "none")]
    fn test_phase_selection(monotonicity: PrivacyMonotonicity, metric: bool) -> (bool, bool, bool) {
        let config = FlashConfiguration::create(monotonicity, metric, STORAGE);
        (
            config.is_binary_phase_required(),
            config.is_linear_phase_required(),
            config.is_anonymity_property_predictable(),
        )
    }

    #[test]
    fn test_outer_phase_is_linear_without_monotonic_criterion() {
        let config = FlashConfiguration::create(PrivacyMonotonicity::None, false, STORAGE);
        assert_eq!(config.outer_phase(), Phase::Linear);
        assert!(config.phase(Phase::Binary).is_none());
        assert!(config.phase(Phase::Linear).unwrap().trigger_tag.is_empty());
    }

    #[test]
    fn test_partial_targets_k_anonymity() {
        let config = FlashConfiguration::create(PrivacyMonotonicity::Partial, true, STORAGE);
        let binary = config.binary_phase().unwrap();
        assert_eq!(binary.anonymity_property.property(), KAnonymous);
        assert_eq!(binary.trigger_tag.len(), 1);
    }
}
