//! Fundamental types for the encrypted prediction oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identifiers, timestamps, commitments, opaque ciphertexts, value kinds,
//! lifecycle state enums and the protocol parameters.

pub mod ciphertext;
pub mod error;
pub mod hash;
pub mod ids;
pub mod params;
pub mod state;
pub mod time;
pub mod value;

pub use ciphertext::Ciphertext;
pub use error::{ErrorKind, ParseError};
pub use hash::ResultHash;
pub use ids::{EventId, Principal};
pub use params::OracleParams;
pub use state::{EventState, FinalOutcome};
pub use time::Timestamp;
pub use value::ValueKind;
