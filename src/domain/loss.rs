//! Information loss values and oracle results

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Scalar information loss with a total order
///
/// Lower values mean better utility. Ordering uses [`f64::total_cmp`], so the
/// type can be used as a priority-queue key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InformationLoss(f64);

impl InformationLoss {
    /// Creates a new information loss value
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true if the value can be ordered meaningfully
    pub fn is_valid(self) -> bool {
        !self.0.is_nan()
    }
}

impl PartialEq for InformationLoss {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for InformationLoss {}

impl PartialOrd for InformationLoss {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InformationLoss {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for InformationLoss {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for InformationLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a full check by the oracle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the complete privacy model is fulfilled
    pub privacy_model_fulfilled: bool,

    /// Whether the minimal class size requirement (k-anonymity) is fulfilled
    pub minimal_class_size_fulfilled: bool,

    /// Information loss of the transformation
    pub information_loss: InformationLoss,

    /// Lower bound on the information loss of this transformation and its generalizations
    pub lower_bound: Option<InformationLoss>,
}

impl CheckResult {
    /// Creates a result for a transformation that fulfills both requirements or neither
    pub fn new(fulfilled: bool, information_loss: impl Into<InformationLoss>) -> Self {
        Self {
            privacy_model_fulfilled: fulfilled,
            minimal_class_size_fulfilled: fulfilled,
            information_loss: information_loss.into(),
            lower_bound: None,
        }
    }

    /// Sets the k-anonymity outcome independently of the full privacy model
    pub fn with_minimal_class_size(mut self, fulfilled: bool) -> Self {
        self.minimal_class_size_fulfilled = fulfilled;
        self
    }

    /// Sets the lower bound
    pub fn with_lower_bound(mut self, bound: impl Into<InformationLoss>) -> Self {
        self.lower_bound = Some(bound.into());
        self
    }
}

/// Information loss computed analytically, without grouping the data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossWithBound {
    /// Information loss
    pub information_loss: InformationLoss,

    /// Lower bound, if the metric provides one alongside the loss
    pub lower_bound: Option<InformationLoss>,
}

impl LossWithBound {
    /// Creates a new value without a lower bound
    pub fn new(information_loss: impl Into<InformationLoss>) -> Self {
        Self {
            information_loss: information_loss.into(),
            lower_bound: None,
        }
    }

    /// Sets the lower bound
    pub fn with_lower_bound(mut self, bound: impl Into<InformationLoss>) -> Self {
        self.lower_bound = Some(bound.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_information_loss_total_order() {
        let low = InformationLoss::new(0.5);
        let high = InformationLoss::new(2.0);
        assert!(low < high);
        assert_eq!(low.max(high), high);
        assert_eq!(InformationLoss::new(1.0), InformationLoss::from(1.0));
    }

    #[test]
    fn test_information_loss_nan_is_invalid() {
        assert!(!InformationLoss::new(f64::NAN).is_valid());
        assert!(InformationLoss::new(-3.0).is_valid());
    }

    #[test]
    fn test_check_result_builder() {
        let result = CheckResult::new(false, 3.0)
            .with_minimal_class_size(true)
            .with_lower_bound(1.5);
        assert!(!result.privacy_model_fulfilled);
        assert!(result.minimal_class_size_fulfilled);
        assert_eq!(result.lower_bound, Some(InformationLoss::new(1.5)));
    }
}
