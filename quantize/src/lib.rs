//! Value quantization for oracle submissions.
//!
//! Turns real-valued observations into bounded integers so that every
//! implementation (provider SDKs, the oracle core, off-chain aggregators)
//! agrees bit-for-bit on the stored value.
//!
//! | kind    | domain                 | output                      |
//! |---------|------------------------|-----------------------------|
//! | percent | `[0, 100]`             | `round(v * scale / 100)`    |
//! | price   | `[0, 92_233_720.36]`   | `round(v * 10^decimals)`    |
//! | ratio   | `[0, 1]`               | `round(v * scale)`          |
//!
//! Rounding is half-away-from-zero on the scaled value in every case.

pub mod error;
pub mod functions;
pub mod quantizer;

pub use error::QuantizeError;
pub use functions::{
    percent, percent_with, price, price_with, ratio, ratio_with, DEFAULT_PERCENT_SCALE,
    DEFAULT_PRICE_DECIMALS, DEFAULT_RATIO_SCALE, MAX_PRICE, MAX_PRICE_DECIMALS,
};
pub use quantizer::{ExtremeValuePolicy, Quantizer, QuantizerConfig};
