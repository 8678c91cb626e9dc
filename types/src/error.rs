//! Error taxonomy shared across crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of every failure the oracle can report.
///
/// Off-chain tooling branches on this first, then on the specific reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Never worth retrying unchanged.
    Validation,
    /// The operation is invalid for the event's current lifecycle state or window.
    State,
    /// The caller lacks the role required by the active policy.
    Authorization,
    /// Unknown event, submission, proposal or dispute.
    NotFound,
    /// The storage substrate failed or rejected the commit.
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::State => "state",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
        }
    }
}

/// Failure to parse one of the textual forms defined in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown value kind: {0}")]
    UnknownValueKind(String),

    #[error("invalid result hash: {0}")]
    InvalidHash(String),
}
