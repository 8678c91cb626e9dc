//! Lifecycle state enums for oracle events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an event sits in the propose → dispute → vote → finalize lifecycle.
///
/// Transitions only move forward:
/// `Pending → Proposed → Disputed → Finalized` or `Pending → Proposed → Finalized`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    /// Accepting submissions until the deadline; no proposal yet.
    Pending,
    /// A result has been proposed and the dispute window is running.
    Proposed,
    /// The proposal was challenged; jurors are voting.
    Disputed,
    /// Terminal. The outcome is committed and immutable.
    Finalized,
}

impl EventState {
    /// Whether `next` is a legal forward transition from `self`.
    pub fn can_transition_to(&self, next: EventState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Proposed)
                | (Self::Proposed, Self::Disputed)
                | (Self::Proposed, Self::Finalized)
                | (Self::Disputed, Self::Finalized)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Proposed => "proposed",
            Self::Disputed => "disputed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The committed terminal result of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FinalOutcome {
    /// The proposed result stands (undisputed, or upheld by the jury).
    Resolved { value: u64 },
    /// The jury invalidated the proposal; no value is committed.
    Rejected,
}

impl FinalOutcome {
    /// The committed value, if the outcome carries one.
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Resolved { value } => Some(*value),
            Self::Rejected => None,
        }
    }
}
