//! Exhaustive range of feasible information loss

use crate::adapters::lattice::SolutionSpace;
use crate::adapters::oracle::NodeChecker;
use crate::domain::{InformationLoss, Result, TransformationId};
use serde::{Deserialize, Serialize};

/// Least and greatest information loss among feasible nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossRange {
    /// Loss of the best feasible node
    pub min: InformationLoss,
    /// Loss of the worst feasible node
    pub max: InformationLoss,
}

impl LossRange {
    /// Maps a loss into `[0, 1]` relative to the range
    pub fn normalize(&self, loss: f64) -> f64 {
        let (min, max) = (self.min.value(), self.max.value());
        if max == min {
            0.0
        } else {
            (loss - min) / (max - min)
        }
    }
}

/// Checks every node and returns the range of losses of feasible nodes
///
/// The lattice is left untouched; results are only used for the range. Returns
/// `None` if no node is feasible. This costs one oracle call per node and is
/// meant for small lattices and benchmarks.
///
/// # Errors
///
/// Returns the first oracle error.
pub fn information_loss_range<S, C>(space: &S, checker: &mut C) -> Result<Option<LossRange>>
where
    S: SolutionSpace + ?Sized,
    C: NodeChecker + ?Sized,
{
    let mut range: Option<LossRange> = None;
    for index in 0..space.size() {
        let id = TransformationId::new(index as u32);
        let result = checker.check(&space.transformation(id), true)?;
        if !result.privacy_model_fulfilled {
            continue;
        }
        let loss = result.information_loss;
        range = Some(match range {
            None => LossRange {
                min: loss,
                max: loss,
            },
            Some(range) => LossRange {
                min: range.min.min(loss),
                max: range.max.max(loss),
            },
        });
    }
    tracing::debug!(?range, "Computed information loss range");
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::lattice::GridLattice;
    use crate::adapters::oracle::SyntheticChecker;
    use crate::domain::PredictiveProperty;

    #[test]
    fn test_range_over_feasible_nodes() {
        let lattice = GridLattice::new(vec![2, 2]).unwrap();
        let mut checker = SyntheticChecker::new(
            |g: &[u32]| g.iter().sum::<u32>() >= 2,
            |g: &[u32]| g.iter().sum::<u32>() as f64,
        );
        let range = information_loss_range(&lattice, &mut checker).unwrap().unwrap();
        assert_eq!(range.min.value(), 2.0);
        assert_eq!(range.max.value(), 4.0);
        assert_eq!(checker.stats().checks, 9);
        assert!(!lattice.has_property(lattice.top(), PredictiveProperty::Checked));
    }

    #[test]
    fn test_no_feasible_node() {
        let lattice = GridLattice::new(vec![1]).unwrap();
        let mut checker = SyntheticChecker::new(|_: &[u32]| false, |_: &[u32]| 1.0);
        assert!(information_loss_range(&lattice, &mut checker).unwrap().is_none());
    }

    #[test]
    fn test_normalize() {
        let range = LossRange {
            min: InformationLoss::new(1.0),
            max: InformationLoss::new(3.0),
        };
        assert_eq!(range.normalize(2.0), 0.5);
        let flat = LossRange {
            min: InformationLoss::new(1.0),
            max: InformationLoss::new(1.0),
        };
        assert_eq!(flat.normalize(1.0), 0.0);
    }
}
