//! Proposal storage trait.

use crate::StoreError;
use oracle_types::{EventId, Principal, ResultHash, Timestamp};
use serde::{Deserialize, Serialize};

/// The single candidate result for an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub event_id: EventId,
    pub proposer: Principal,
    pub result_value: u64,
    /// Commitment to the off-chain aggregate that produced `result_value`.
    pub result_hash: ResultHash,
    pub proposed_at: Timestamp,
}

pub trait ProposalStore {
    fn get_proposal(&self, event: &EventId) -> Result<Option<ProposalRecord>, StoreError>;
}
