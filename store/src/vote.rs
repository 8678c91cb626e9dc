//! Jury vote storage trait.

use crate::StoreError;
use oracle_types::{EventId, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// A juror's vote on a disputed proposal. Keyed by `(event_id, voter)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub event_id: EventId,
    pub voter: Principal,
    /// `true` agrees with the proposal, `false` disagrees.
    pub agree: bool,
    pub cast_at: Timestamp,
}

pub trait VoteStore {
    fn get_vote(&self, event: &EventId, voter: &Principal)
        -> Result<Option<VoteRecord>, StoreError>;

    /// All votes for an event, ordered by voter.
    fn iter_votes(&self, event: &EventId) -> Result<Vec<VoteRecord>, StoreError>;
}
