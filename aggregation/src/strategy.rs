//! Pluggable aggregation strategies over decrypted observations.
//!
//! All arithmetic is integer-only (widened to `i128`) so every aggregator
//! computes the same aggregate from the same observations.

use crate::error::AggregationError;
use oracle_types::Principal;
use serde::{Deserialize, Serialize};

/// One decrypted, quantized provider observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub provider: Principal,
    pub value: i64,
    /// Relative weight; ignored by unweighted strategies.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl Observation {
    pub fn new(provider: impl Into<Principal>, value: i64) -> Self {
        Self {
            provider: provider.into(),
            value,
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// Reduces a set of observations to a single quantized aggregate.
pub trait AggregationStrategy {
    /// Stable name, bound into the result commitment.
    fn name(&self) -> &'static str;

    fn aggregate(&self, observations: &[Observation]) -> Result<i64, AggregationError>;
}

/// Middle value; the mean of the two middle values for an even count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Median;

/// Arithmetic mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

/// `Σ weight·value / Σ weight`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedMean;

impl AggregationStrategy for Median {
    fn name(&self) -> &'static str {
        "median"
    }

    fn aggregate(&self, observations: &[Observation]) -> Result<i64, AggregationError> {
        if observations.is_empty() {
            return Err(AggregationError::NoObservations);
        }
        let mut values: Vec<i64> = observations.iter().map(|o| o.value).collect();
        values.sort_unstable();
        let mid = values.len() / 2;
        if values.len() % 2 == 1 {
            Ok(values[mid])
        } else {
            let sum = values[mid - 1] as i128 + values[mid] as i128;
            narrow(div_round_half_away(sum, 2))
        }
    }
}

impl AggregationStrategy for Mean {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn aggregate(&self, observations: &[Observation]) -> Result<i64, AggregationError> {
        if observations.is_empty() {
            return Err(AggregationError::NoObservations);
        }
        let sum: i128 = observations.iter().map(|o| o.value as i128).sum();
        narrow(div_round_half_away(sum, observations.len() as i128))
    }
}

impl AggregationStrategy for WeightedMean {
    fn name(&self) -> &'static str {
        "weighted_mean"
    }

    fn aggregate(&self, observations: &[Observation]) -> Result<i64, AggregationError> {
        if observations.is_empty() {
            return Err(AggregationError::NoObservations);
        }
        let total_weight: i128 = observations.iter().map(|o| o.weight as i128).sum();
        if total_weight == 0 {
            return Err(AggregationError::ZeroWeight);
        }
        let weighted: i128 = observations
            .iter()
            .map(|o| o.value as i128 * o.weight as i128)
            .sum();
        narrow(div_round_half_away(weighted, total_weight))
    }
}

/// Strategy selector for configuration files and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Median,
    Mean,
    WeightedMean,
}

impl StrategyKind {
    pub fn boxed(&self) -> Box<dyn AggregationStrategy + Send + Sync> {
        match self {
            Self::Median => Box::new(Median),
            Self::Mean => Box::new(Mean),
            Self::WeightedMean => Box::new(WeightedMean),
        }
    }
}

/// `num / den` rounded half away from zero. `den` must be positive.
pub(crate) fn div_round_half_away(num: i128, den: i128) -> i128 {
    let quotient = num / den;
    let remainder = num % den;
    let rounded = if 2 * remainder.abs() >= den {
        quotient + num.signum()
    } else {
        quotient
    };
    rounded
}

fn narrow(value: i128) -> Result<i64, AggregationError> {
    i64::try_from(value).map_err(|_| AggregationError::Overflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(values: &[i64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(format!("p{i}"), *v))
            .collect()
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(Median.aggregate(&obs(&[6550, 5820, 6210])), Ok(6210));
        assert_eq!(Median.aggregate(&obs(&[4, 1, 3, 2])), Ok(3)); // 2.5 rounds up
        assert_eq!(Median.aggregate(&obs(&[-3, -2])), Ok(-3)); // -2.5 rounds away
    }

    #[test]
    fn mean_rounds_half_away() {
        assert_eq!(Mean.aggregate(&obs(&[1, 2])), Ok(2));
        assert_eq!(Mean.aggregate(&obs(&[1, 1, 2])), Ok(1));
        assert_eq!(Mean.aggregate(&obs(&[i64::MAX, i64::MAX])), Ok(i64::MAX));
    }

    #[test]
    fn weighted_mean_uses_weights() {
        let observations = vec![
            Observation::new("a", 100).with_weight(3),
            Observation::new("b", 200).with_weight(1),
        ];
        assert_eq!(WeightedMean.aggregate(&observations), Ok(125));
        // Unweighted strategies ignore weights.
        assert_eq!(Mean.aggregate(&observations), Ok(150));
    }

    #[test]
    fn zero_weight_rejected() {
        let observations = vec![Observation::new("a", 5).with_weight(0)];
        assert_eq!(
            WeightedMean.aggregate(&observations),
            Err(AggregationError::ZeroWeight)
        );
    }

    #[test]
    fn empty_input_rejected() {
        for kind in [StrategyKind::Median, StrategyKind::Mean, StrategyKind::WeightedMean] {
            assert_eq!(
                kind.boxed().aggregate(&[]),
                Err(AggregationError::NoObservations)
            );
        }
    }

    #[test]
    fn rounding_keeps_full_width() {
        assert_eq!(div_round_half_away(i64::MAX as i128 * 100, 1), i64::MAX as i128 * 100);
        assert_eq!(div_round_half_away(-5, 2), -3);
        assert_eq!(narrow(i64::MAX as i128 + 1), Err(AggregationError::Overflow(i64::MAX as i128 + 1)));
    }

    #[test]
    fn observation_weight_defaults_to_one() {
        let o: Observation = serde_json::from_str(r#"{"provider":"p1","value":7}"#).unwrap();
        assert_eq!(o.weight, 1);
    }
}
