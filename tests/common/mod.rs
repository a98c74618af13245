//! Shared fixtures for the integration tests
//!
//! Scenarios are generated from a seed so failures can be replayed. Feasibility
//! is up-closed: a generalization is feasible if it dominates one of a few
//! random generator vectors.

#![allow(dead_code)]

use anonsearch::adapters::lattice::{GridLattice, SolutionSpace};
use anonsearch::adapters::oracle::{PrivacyMonotonicity, SyntheticChecker};
use anonsearch::core::driver::information_loss_range;
use anonsearch::domain::{InformationLoss, PredictiveProperty, TransformationId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomly generated lattice and oracle description
#[derive(Debug, Clone)]
pub struct Scenario {
    pub seed: u64,
    pub heights: Vec<u32>,
    pub generators: Vec<Vec<u32>>,
    pub weights: Vec<f64>,
}

impl Scenario {
    /// Generates a lattice with 2 to 4 attributes of height 1 to 3
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let attributes = rng.gen_range(2..=4);
        let heights: Vec<u32> = (0..attributes).map(|_| rng.gen_range(1..=3)).collect();

        let generator_count = rng.gen_range(1..=3);
        let generators = (0..generator_count)
            .map(|_| heights.iter().map(|&h| rng.gen_range(0..=h)).collect())
            .collect();
        let weights = (0..attributes).map(|_| rng.gen_range(1..=5) as f64).collect();

        Self {
            seed,
            heights,
            generators,
            weights,
        }
    }

    pub fn lattice(&self) -> GridLattice {
        GridLattice::new(self.heights.clone()).expect("valid heights")
    }

    pub fn is_feasible(&self, generalization: &[u32]) -> bool {
        feasible_by(&self.generators, generalization)
    }

    /// Fully monotonic oracle with a strictly increasing weighted loss
    pub fn monotonic_checker(&self) -> SyntheticChecker {
        let generators = self.generators.clone();
        let weights = self.weights.clone();
        SyntheticChecker::new(
            move |g: &[u32]| feasible_by(&generators, g),
            move |g: &[u32]| weighted(&weights, g),
        )
    }

    /// Fully monotonic privacy model with a non-monotonic loss
    ///
    /// Suppression is allowed so the metric is not treated as monotonic.
    pub fn noisy_checker(&self) -> SyntheticChecker {
        let generators = self.generators.clone();
        let weights = self.weights.clone();
        let seed = self.seed;
        SyntheticChecker::new(
            move |g: &[u32]| feasible_by(&generators, g),
            move |g: &[u32]| noisy(seed, &weights, g),
        )
        .with_monotonic_metric(false)
        .with_max_suppressed_records(10)
    }

    /// Oracle with the given privacy monotonicity and a monotonic loss
    pub fn checker_with(&self, monotonicity: PrivacyMonotonicity) -> SyntheticChecker {
        self.monotonic_checker().with_monotonicity(monotonicity)
    }

    /// Least loss among feasible nodes, computed exhaustively
    pub fn exhaustive_min(&self, checker: &mut SyntheticChecker) -> Option<f64> {
        let lattice = self.lattice();
        information_loss_range(&lattice, checker)
            .expect("synthetic oracle does not fail")
            .map(|range| range.min.value())
    }
}

/// True if `generalization` dominates any generator
pub fn feasible_by(generators: &[Vec<u32>], generalization: &[u32]) -> bool {
    generators
        .iter()
        .any(|base| base.iter().zip(generalization).all(|(b, g)| g >= b))
}

pub fn weighted(weights: &[f64], generalization: &[u32]) -> f64 {
    weights
        .iter()
        .zip(generalization)
        .map(|(w, &g)| w * g as f64)
        .sum()
}

/// Weighted loss plus a deterministic per-node perturbation
pub fn noisy(seed: u64, weights: &[f64], generalization: &[u32]) -> f64 {
    let mix = generalization
        .iter()
        .fold(seed ^ 0x9e37_79b9, |acc, &g| {
            acc.wrapping_mul(31).wrapping_add(g as u64 + 7)
        });
    weighted(weights, generalization) + (mix % 11) as f64 - 5.0
}

pub fn sum_levels(generalization: &[u32]) -> u32 {
    generalization.iter().sum()
}

/// Asserts that predicted tags agree with the oracle on every tagged node
pub fn assert_tags_consistent(lattice: &GridLattice, scenario: &Scenario) {
    for index in 0..lattice.size() {
        let id = TransformationId::new(index as u32);
        let generalization = lattice.generalization(id);
        let feasible = scenario.is_feasible(&generalization);
        if lattice.has_property(id, PredictiveProperty::Anonymous) {
            assert!(
                feasible,
                "seed {}: {:?} tagged anonymous",
                scenario.seed, generalization
            );
        }
        if lattice.has_property(id, PredictiveProperty::NotAnonymous) {
            assert!(
                !feasible,
                "seed {}: {:?} tagged not anonymous",
                scenario.seed, generalization
            );
        }
    }
}

pub fn loss_of(loss: Option<InformationLoss>) -> Option<f64> {
    loss.map(InformationLoss::value)
}
