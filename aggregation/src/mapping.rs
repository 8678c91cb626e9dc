//! Mapping a quantized aggregate onto the bounded proposal value.

use crate::error::AggregationError;
use crate::strategy::div_round_half_away;
use oracle_types::OracleParams;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResultMapping {
    /// `round(aggregate · 100 / full_scale)`, e.g. a percent aggregate of
    /// 6210 at scale 10 000 proposes 62.
    Scaled { full_scale: i64 },
    /// Binary outcome: 100 when the aggregate is strictly above the threshold, else 0.
    Threshold { threshold: i64 },
}

impl ResultMapping {
    /// Map `aggregate` and check the result against the proposal bounds.
    pub fn apply(&self, aggregate: i64, params: &OracleParams) -> Result<u64, AggregationError> {
        let mapped = match *self {
            Self::Scaled { full_scale } => {
                if full_scale <= 0 {
                    return Err(AggregationError::InvalidScale(full_scale));
                }
                div_round_half_away(aggregate as i128 * 100, full_scale as i128)
            }
            Self::Threshold { threshold } => {
                if aggregate > threshold {
                    100
                } else {
                    0
                }
            }
        };
        match u64::try_from(mapped) {
            Ok(value) if params.result_in_bounds(value) => Ok(value),
            _ => Err(AggregationError::OutOfBounds {
                value: mapped,
                min: params.result_min,
                max: params.result_max,
            }),
        }
    }

    /// Canonical description bound into the result commitment.
    pub fn describe(&self) -> String {
        match self {
            Self::Scaled { full_scale } => format!("scaled:{full_scale}"),
            Self::Threshold { threshold } => format!("threshold:{threshold}"),
        }
    }
}
