//! Oracle protocol parameters: lifecycle windows and result bounds.

use serde::{Deserialize, Serialize};

/// Timing and bound parameters shared by every lifecycle component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleParams {
    /// Seconds after `proposed_at` during which the proposal may be disputed.
    pub dispute_window_secs: u64,

    /// Seconds after a dispute opens during which jurors may vote.
    pub voting_window_secs: u64,

    /// Lowest acceptable proposed result value (inclusive).
    pub result_min: u64,

    /// Highest acceptable proposed result value (inclusive).
    pub result_max: u64,
}

impl OracleParams {
    pub const DAY_SECS: u64 = 24 * 3600;

    /// Production defaults: one-day dispute and voting windows, results in `0..=100`.
    pub fn oracle_defaults() -> Self {
        Self {
            dispute_window_secs: Self::DAY_SECS,
            voting_window_secs: Self::DAY_SECS,
            result_min: 0,
            result_max: 100,
        }
    }

    /// Whether `value` lies inside `[result_min, result_max]`.
    pub fn result_in_bounds(&self, value: u64) -> bool {
        (self.result_min..=self.result_max).contains(&value)
    }
}

impl Default for OracleParams {
    fn default() -> Self {
        Self::oracle_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_zero_to_hundred() {
        let params = OracleParams::default();
        assert!(params.result_in_bounds(0));
        assert!(params.result_in_bounds(100));
        assert!(!params.result_in_bounds(101));
        assert_eq!(params.dispute_window_secs, 86_400);
    }
}
