//! Integration tests for the grid lattice store and tag propagation

mod common;

use anonsearch::adapters::lattice::{GridLattice, SolutionSpace};
use anonsearch::adapters::oracle::SyntheticChecker;
use anonsearch::core::search::SearchSession;
use anonsearch::domain::{PredictiveProperty, SearchError, TransformationId};
use common::{sum_levels, Scenario};
use test_case::test_case;

fn dominates(upper: &[u32], lower: &[u32]) -> bool {
    upper.iter().zip(lower).all(|(u, l)| u >= l)
}

fn all_nodes(lattice: &GridLattice) -> Vec<TransformationId> {
    (0..lattice.size())
        .map(|index| TransformationId::new(index as u32))
        .collect()
}

#[test]
fn test_structure_of_grid() {
    let lattice = GridLattice::new(vec![2, 1, 3]).unwrap();
    assert_eq!(lattice.size(), 24);
    assert_eq!(lattice.generalization(lattice.bottom()), vec![0, 0, 0]);
    assert_eq!(lattice.generalization(lattice.top()), vec![2, 1, 3]);

    let mut counted = 0;
    for level in 0..=6 {
        for id in lattice.level_members(level) {
            assert_eq!(sum_levels(&lattice.generalization(id)), level);
            counted += 1;
        }
    }
    assert_eq!(counted, 24);

    for id in all_nodes(&lattice) {
        assert_eq!(lattice.find(&lattice.generalization(id)), Some(id));
        for up in lattice.successors(id) {
            assert_eq!(lattice.level(up), lattice.level(id) + 1);
            assert!(lattice.predecessors(up).contains(&id));
        }
    }
}

#[test]
fn test_find_rejects_out_of_range() {
    let lattice = GridLattice::new(vec![2, 2]).unwrap();
    assert_eq!(lattice.find(&[1, 0]), Some(TransformationId::new(1)));
    assert_eq!(lattice.find(&[0, 1]), Some(TransformationId::new(3)));
    assert_eq!(lattice.find(&[3, 0]), None);
    assert_eq!(lattice.find(&[1]), None);
}

#[test]
fn test_empty_heights_are_rejected() {
    let result = GridLattice::new(Vec::new());
    assert!(matches!(result, Err(SearchError::Configuration(_))));
}

#[test]
fn test_oversized_lattice_is_rejected() {
    let result = GridLattice::new(vec![u32::MAX, u32::MAX]);
    assert!(matches!(result, Err(SearchError::Configuration(_))));
}

#[test_case(PredictiveProperty::Anonymous, true; "anonymous goes up")]
#[test_case(PredictiveProperty::KAnonymous, true; "k-anonymous goes up")]
#[test_case(PredictiveProperty::SuccessorsPruned, true; "pruning goes up")]
#[test_case(PredictiveProperty::NotAnonymous, false; "not anonymous goes down")]
#[test_case(PredictiveProperty::NotKAnonymous, false; "not k-anonymous goes down")]
fn test_propagation_direction(property: PredictiveProperty, upward: bool) {
    let mut lattice = GridLattice::new(vec![2, 2, 1]).unwrap();
    let origin = lattice.find(&[1, 1, 0]).unwrap();
    let base = lattice.generalization(origin);
    lattice.set_property(origin, property);

    for id in all_nodes(&lattice) {
        let generalization = lattice.generalization(id);
        let expected = if upward {
            dominates(&generalization, &base)
        } else {
            dominates(&base, &generalization)
        };
        assert_eq!(
            lattice.has_property(id, property),
            expected,
            "{:?}",
            generalization
        );
    }
}

#[test_case(PredictiveProperty::Checked)]
#[test_case(PredictiveProperty::Expanded)]
#[test_case(PredictiveProperty::ForceSnapshot)]
fn test_local_properties_stay_local(property: PredictiveProperty) {
    let mut lattice = GridLattice::new(vec![1, 1]).unwrap();
    lattice.set_property(lattice.bottom(), property);

    let tagged: Vec<_> = all_nodes(&lattice)
        .into_iter()
        .filter(|id| lattice.has_property(*id, property))
        .collect();
    assert_eq!(tagged, vec![lattice.bottom()]);
}

#[test]
fn test_anonymity_stays_local_when_not_predictable() {
    let mut lattice = GridLattice::new(vec![1, 1]).unwrap();
    lattice.set_anonymity_property_predictable(false);

    lattice.set_property(lattice.bottom(), PredictiveProperty::Anonymous);
    lattice.set_property(lattice.top(), PredictiveProperty::NotAnonymous);
    lattice.set_property(lattice.bottom(), PredictiveProperty::KAnonymous);

    let middle = lattice.find(&[1, 0]).unwrap();
    assert!(!lattice.has_property(middle, PredictiveProperty::Anonymous));
    assert!(!lattice.has_property(middle, PredictiveProperty::NotAnonymous));
    assert!(lattice.has_property(middle, PredictiveProperty::KAnonymous));
}

#[test]
fn test_reset_clears_state() {
    let mut lattice = GridLattice::new(vec![1, 1]).unwrap();
    lattice.set_anonymity_property_predictable(false);
    lattice.set_property(lattice.bottom(), PredictiveProperty::SuccessorsPruned);
    lattice.reset();

    assert!(lattice.is_anonymity_property_predictable());
    assert!(all_nodes(&lattice)
        .iter()
        .all(|id| lattice.properties(*id).is_empty()));
}

#[test]
fn test_checked_tags_agree_with_oracle() {
    for seed in 0..20 {
        let scenario = Scenario::random(seed);
        let mut lattice = scenario.lattice();
        let mut checker = scenario.monotonic_checker();
        let mut session = SearchSession::new();
        session.start();

        // Check the nodes on one level; everything predicted must be right
        let level = lattice.level(lattice.top()) / 2;
        for id in lattice.level_members(level) {
            session.assure_checked(&mut lattice, &mut checker, id).unwrap();
        }
        common::assert_tags_consistent(&lattice, &scenario);
    }
}

#[test]
fn test_assure_checked_is_idempotent() {
    let mut lattice = GridLattice::new(vec![2, 2]).unwrap();
    let mut checker = SyntheticChecker::new(
        |g: &[u32]| sum_levels(g) >= 2,
        |g: &[u32]| sum_levels(g) as f64,
    );
    let mut session = SearchSession::new();
    session.start();
    let id = lattice.find(&[1, 1]).unwrap();

    assert!(session.assure_checked(&mut lattice, &mut checker, id).unwrap());
    assert!(!session.assure_checked(&mut lattice, &mut checker, id).unwrap());

    assert_eq!(checker.stats().checks, 1);
    assert_eq!(session.checks(), 1);
    assert_eq!(session.global_optimum().map(|t| t.id), Some(id));
    assert_eq!(session.track_record().len(), 1);
}

#[test]
fn test_optimum_prefers_lower_level_on_equal_loss() {
    let mut lattice = GridLattice::new(vec![2, 2]).unwrap();
    let mut checker = SyntheticChecker::new(|_: &[u32]| true, |_: &[u32]| 1.0);
    let mut session = SearchSession::new();
    session.start();

    let high = lattice.find(&[1, 1]).unwrap();
    let low = lattice.find(&[1, 0]).unwrap();
    session.assure_checked(&mut lattice, &mut checker, high).unwrap();
    session.assure_checked(&mut lattice, &mut checker, low).unwrap();

    assert_eq!(session.global_optimum().map(|t| t.id), Some(low));
    assert_eq!(session.track_record().len(), 2);

    // Higher level with equal loss does not replace it
    let top = lattice.top();
    session.assure_checked(&mut lattice, &mut checker, top).unwrap();
    assert_eq!(session.global_optimum().map(|t| t.id), Some(low));
}
