//! Configured quantizer with closed dispatch over [`ValueKind`].

use crate::error::QuantizeError;
use crate::functions::{
    percent_with, price_with, ratio_with, DEFAULT_PERCENT_SCALE, DEFAULT_PRICE_DECIMALS,
    DEFAULT_RATIO_SCALE,
};
use oracle_types::ValueKind;
use serde::{Deserialize, Serialize};

/// Whether percent values that quantize to exactly 0 or the full scale are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeValuePolicy {
    /// Refuse 0% and 100% as unfalsifiable predictions.
    #[default]
    Reject,
    /// Accept the full closed range.
    Allow,
}

/// Scales and policies applied by a [`Quantizer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    pub percent_scale: u32,
    pub price_decimals: u32,
    pub ratio_scale: u32,
    pub extremes: ExtremeValuePolicy,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            percent_scale: DEFAULT_PERCENT_SCALE,
            price_decimals: DEFAULT_PRICE_DECIMALS,
            ratio_scale: DEFAULT_RATIO_SCALE,
            extremes: ExtremeValuePolicy::default(),
        }
    }
}

/// Quantizes raw observations according to a fixed [`QuantizerConfig`].
#[derive(Clone, Debug, Default)]
pub struct Quantizer {
    config: QuantizerConfig,
}

impl Quantizer {
    pub fn new(config: QuantizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuantizerConfig {
        &self.config
    }

    /// Quantize `raw` as an observation of the given kind.
    pub fn quantize(&self, kind: ValueKind, raw: f64) -> Result<i64, QuantizeError> {
        match kind {
            ValueKind::Percent => {
                percent_with(raw, self.config.percent_scale, self.config.extremes)
            }
            ValueKind::Price => price_with(raw, self.config.price_decimals),
            ValueKind::Ratio => ratio_with(raw, self.config.ratio_scale),
        }
    }

    /// The integer that represents "one whole unit" of the kind
    /// (100% for percent, 1.0 for price and ratio).
    pub fn full_scale(&self, kind: ValueKind) -> i64 {
        match kind {
            ValueKind::Percent => self.config.percent_scale as i64,
            ValueKind::Price => 10i64.saturating_pow(self.config.price_decimals),
            ValueKind::Ratio => self.config.ratio_scale as i64,
        }
    }
}
