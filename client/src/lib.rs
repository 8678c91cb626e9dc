//! Client submission tool for oracle providers.
//!
//! Builds `(quantized value, ciphertext)` pairs with the same quantizer the
//! oracle uses and submits them, singly or in batches.

pub mod error;
pub mod provider;

pub use error::ClientError;
pub use provider::{BatchItem, BatchOutcome, PreparedSubmission, ProviderClient};
