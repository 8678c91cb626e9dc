//! Event storage trait.

use crate::StoreError;
use oracle_types::{EventId, EventState, FinalOutcome, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// What the event asks, plus an optional quantized threshold for
/// threshold-style questions ("will X exceed T").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub description: String,
    #[serde(default)]
    pub threshold: Option<i64>,
}

impl EventDescriptor {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// A tracked outcome question under oracle resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub descriptor: EventDescriptor,
    /// Last second at which submissions are accepted.
    pub deadline: Timestamp,
    pub created_at: Timestamp,
    pub creator: Principal,
    pub state: EventState,
    /// Set once, on finalization.
    pub outcome: Option<FinalOutcome>,
    pub finalized_at: Option<Timestamp>,
}

/// Trait for event storage operations.
pub trait EventStore {
    /// Fetch an event, or [`StoreError::NotFound`].
    fn get_event(&self, id: &EventId) -> Result<EventRecord, StoreError>;
    fn event_exists(&self, id: &EventId) -> Result<bool, StoreError>;
    fn event_count(&self) -> Result<u64, StoreError>;
    /// All events ordered by id.
    fn iter_events(&self) -> Result<Vec<EventRecord>, StoreError>;
}
