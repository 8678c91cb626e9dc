//! Dispute storage trait.

use crate::StoreError;
use oracle_types::{EventId, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// A challenge against an event's proposal. At most one per event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeRecord {
    pub event_id: EventId,
    pub disputer: Principal,
    pub reason: String,
    /// Start of the voting window.
    pub opened_at: Timestamp,
}

pub trait DisputeStore {
    fn get_dispute(&self, event: &EventId) -> Result<Option<DisputeRecord>, StoreError>;
}
