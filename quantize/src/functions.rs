//! The three quantization functions.
//!
//! Each `*_with` variant takes explicit scale parameters; the short forms use
//! the wire-contract defaults.

use crate::error::QuantizeError;
use crate::quantizer::ExtremeValuePolicy;
use oracle_types::ValueKind;

/// Default percent scale: 4 decimal places of a percentage (50.5% → 5050).
pub const DEFAULT_PERCENT_SCALE: u32 = 10_000;

/// Default price decimals (satoshi-style fixed point).
pub const DEFAULT_PRICE_DECIMALS: u32 = 8;

/// Default ratio scale: parts per million.
pub const DEFAULT_RATIO_SCALE: u32 = 1_000_000;

/// Largest accepted raw price.
pub const MAX_PRICE: f64 = 92_233_720.36;

/// Largest accepted number of price decimals (`10^18` still fits an `i64`).
pub const MAX_PRICE_DECIMALS: u32 = 18;

/// `i64::MAX` is not representable as `f64`; this is the first value above it (2^63).
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Quantize a percentage with the default scale, rejecting the 0%/100% extremes.
pub fn percent(value: f64) -> Result<i64, QuantizeError> {
    percent_with(value, DEFAULT_PERCENT_SCALE, ExtremeValuePolicy::Reject)
}

/// Quantize a percentage in `[0, 100]` to `round(value * scale / 100)`.
///
/// With [`ExtremeValuePolicy::Reject`], a result of exactly `0` or `scale` is
/// refused: such a prediction can never be shown wrong.
pub fn percent_with(
    value: f64,
    scale: u32,
    extremes: ExtremeValuePolicy,
) -> Result<i64, QuantizeError> {
    let kind = ValueKind::Percent;
    if scale == 0 {
        return Err(QuantizeError::InvalidScale {
            kind,
            scale: scale as u64,
        });
    }
    ensure_finite(kind, value)?;
    ensure_range(kind, value, 0.0, 100.0)?;

    // Divide the scale first: for the decimal scales in use the factor is exact.
    let factor = scale as f64 / 100.0;
    let quantized = round_half_away(value * factor) as i64;

    if extremes == ExtremeValuePolicy::Reject && (quantized == 0 || quantized == scale as i64) {
        return Err(QuantizeError::Extreme { quantized, scale });
    }
    Ok(quantized)
}

/// Quantize a price with the default 8 decimals.
pub fn price(value: f64) -> Result<i64, QuantizeError> {
    price_with(value, DEFAULT_PRICE_DECIMALS)
}

/// Quantize a non-negative price to `round(value * 10^decimals)`.
pub fn price_with(value: f64, decimals: u32) -> Result<i64, QuantizeError> {
    let kind = ValueKind::Price;
    if decimals > MAX_PRICE_DECIMALS {
        return Err(QuantizeError::InvalidScale {
            kind,
            scale: decimals as u64,
        });
    }
    ensure_finite(kind, value)?;
    if value < 0.0 {
        return Err(QuantizeError::Negative(value));
    }
    if value > MAX_PRICE {
        return Err(QuantizeError::TooLarge {
            value,
            max: MAX_PRICE,
        });
    }

    let scaled = round_half_away(value * 10f64.powi(decimals as i32));
    if scaled >= I64_LIMIT {
        return Err(QuantizeError::TooLarge {
            value,
            max: MAX_PRICE,
        });
    }
    Ok(scaled as i64)
}

/// Quantize a ratio with the default parts-per-million scale.
pub fn ratio(value: f64) -> Result<i64, QuantizeError> {
    ratio_with(value, DEFAULT_RATIO_SCALE)
}

/// Quantize a ratio in `[0, 1]` to `round(value * scale)`.
pub fn ratio_with(value: f64, scale: u32) -> Result<i64, QuantizeError> {
    let kind = ValueKind::Ratio;
    if scale == 0 {
        return Err(QuantizeError::InvalidScale {
            kind,
            scale: scale as u64,
        });
    }
    ensure_finite(kind, value)?;
    ensure_range(kind, value, 0.0, 1.0)?;
    Ok(round_half_away(value * scale as f64) as i64)
}

/// `f64::round` already rounds half away from zero; named here because the
/// rounding rule is part of the wire contract.
fn round_half_away(x: f64) -> f64 {
    x.round()
}

fn ensure_finite(kind: ValueKind, value: f64) -> Result<(), QuantizeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QuantizeError::NotFinite { kind, value })
    }
}

fn ensure_range(kind: ValueKind, value: f64, min: f64, max: f64) -> Result<(), QuantizeError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(QuantizeError::OutOfRange {
            kind,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Percent ──────────────────────────────────────────────────────────

    #[test]
    fn percent_reference_values() {
        assert_eq!(percent(50.5), Ok(5050));
        assert_eq!(percent(75.25), Ok(7525));
        assert_eq!(percent(25.0), Ok(2500));
        assert_eq!(percent(99.99), Ok(9999));
        assert_eq!(percent(0.01), Ok(1));
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        assert_eq!(percent(50.555), Ok(5056));
        assert_eq!(percent(50.544), Ok(5054));
        assert_eq!(percent(0.005), Ok(1));
    }

    #[test]
    fn percent_rejects_out_of_range() {
        assert!(matches!(percent(-1.0), Err(QuantizeError::OutOfRange { .. })));
        assert!(matches!(percent(101.0), Err(QuantizeError::OutOfRange { .. })));
        assert!(matches!(percent(100.0001), Err(QuantizeError::OutOfRange { .. })));
    }

    #[test]
    fn percent_rejects_non_finite() {
        assert!(matches!(percent(f64::NAN), Err(QuantizeError::NotFinite { .. })));
        assert!(matches!(percent(f64::INFINITY), Err(QuantizeError::NotFinite { .. })));
        assert!(matches!(
            percent(f64::NEG_INFINITY),
            Err(QuantizeError::NotFinite { .. })
        ));
    }

    #[test]
    fn percent_extremes_depend_on_policy() {
        assert_eq!(
            percent(0.0),
            Err(QuantizeError::Extreme {
                quantized: 0,
                scale: 10_000
            })
        );
        assert!(matches!(percent(100.0), Err(QuantizeError::Extreme { quantized: 10_000, .. })));
        // Rounds down onto the extreme.
        assert!(matches!(percent(0.004), Err(QuantizeError::Extreme { quantized: 0, .. })));

        let allow = ExtremeValuePolicy::Allow;
        assert_eq!(percent_with(0.0, DEFAULT_PERCENT_SCALE, allow), Ok(0));
        assert_eq!(percent_with(100.0, DEFAULT_PERCENT_SCALE, allow), Ok(10_000));
    }

    #[test]
    fn percent_custom_scale() {
        assert_eq!(percent_with(62.0, 100, ExtremeValuePolicy::Reject), Ok(62));
        assert_eq!(percent_with(61.5, 100, ExtremeValuePolicy::Reject), Ok(62));
        assert!(matches!(
            percent_with(50.0, 0, ExtremeValuePolicy::Allow),
            Err(QuantizeError::InvalidScale { .. })
        ));
    }

    // ── Price ────────────────────────────────────────────────────────────

    #[test]
    fn price_reference_values() {
        assert_eq!(price(3250.50), Ok(325_050_000_000));
        assert_eq!(price(1.00), Ok(100_000_000));
        assert_eq!(price(0.01), Ok(1_000_000));
        assert_eq!(price(0.00000001), Ok(1));
        assert_eq!(price(50_000.0), Ok(5_000_000_000_000));
        assert_eq!(price(0.0), Ok(0));
    }

    #[test]
    fn price_bounds() {
        assert!(price(92_233_720.0).is_ok());
        assert_eq!(price(MAX_PRICE), Ok(9_223_372_036_000_000));
        assert!(matches!(price(92_233_720.37), Err(QuantizeError::TooLarge { .. })));
        assert!(matches!(price(-1.0), Err(QuantizeError::Negative(_))));
        assert!(matches!(price(-0.00000001), Err(QuantizeError::Negative(_))));
        assert!(matches!(price(f64::INFINITY), Err(QuantizeError::NotFinite { .. })));
        assert!(matches!(price(f64::NAN), Err(QuantizeError::NotFinite { .. })));
    }

    #[test]
    fn price_decimals() {
        assert_eq!(price_with(3250.5, 2), Ok(325_050));
        assert_eq!(price_with(3250.5, 0), Ok(3251));
        assert!(matches!(price_with(1.0, 19), Err(QuantizeError::InvalidScale { .. })));
        // 10^18 scaling of the max price no longer fits an i64.
        assert!(matches!(price_with(MAX_PRICE, 18), Err(QuantizeError::TooLarge { .. })));
    }

    // ── Ratio ────────────────────────────────────────────────────────────

    #[test]
    fn ratio_reference_values() {
        assert_eq!(ratio(0.527), Ok(527_000));
        assert_eq!(ratio(0.0), Ok(0));
        assert_eq!(ratio(1.0), Ok(1_000_000));
        assert_eq!(ratio(0.0000005), Ok(1));
        assert_eq!(ratio(0.123456), Ok(123_456));
    }

    #[test]
    fn ratio_rejects_out_of_range() {
        assert!(matches!(ratio(1.1), Err(QuantizeError::OutOfRange { .. })));
        assert!(matches!(ratio(-0.1), Err(QuantizeError::OutOfRange { .. })));
        assert!(matches!(ratio(f64::NAN), Err(QuantizeError::NotFinite { .. })));
        assert!(matches!(ratio_with(0.5, 0), Err(QuantizeError::InvalidScale { .. })));
    }
}
