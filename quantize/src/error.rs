use oracle_types::ValueKind;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum QuantizeError {
    #[error("{kind} value is not a finite number: {value}")]
    NotFinite { kind: ValueKind, value: f64 },

    #[error("{kind} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        kind: ValueKind,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("price cannot be negative: {0}")]
    Negative(f64),

    #[error("price {value} exceeds the representable maximum {max}")]
    TooLarge { value: f64, max: f64 },

    #[error("quantized percent {quantized} is an unfalsifiable extreme (scale {scale})")]
    Extreme { quantized: i64, scale: u32 },

    #[error("invalid {kind} scale: {scale}")]
    InvalidScale { kind: ValueKind, scale: u64 },
}
