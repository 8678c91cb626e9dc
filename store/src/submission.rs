//! Submission storage trait.

use crate::StoreError;
use oracle_types::{Ciphertext, EventId, Principal, Timestamp, ValueKind};
use serde::{Deserialize, Serialize};

/// One provider's quantized, encrypted observation for an event.
///
/// Keyed by `(event_id, provider)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub event_id: EventId,
    pub provider: Principal,
    pub value_kind: ValueKind,
    pub quantized_value: i64,
    /// Opaque output of the encryption adapter.
    pub ciphertext: Ciphertext,
    pub submitted_at: Timestamp,
}

/// Trait for submission storage operations.
pub trait SubmissionStore {
    fn get_submission(
        &self,
        event: &EventId,
        provider: &Principal,
    ) -> Result<Option<SubmissionRecord>, StoreError>;

    fn submission_count(&self, event: &EventId) -> Result<u64, StoreError>;

    /// All submissions for an event, ordered by provider.
    fn iter_submissions(&self, event: &EventId) -> Result<Vec<SubmissionRecord>, StoreError>;
}
