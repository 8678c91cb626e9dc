//! Event registry: creates events and serves lookups.

use crate::error::OracleError;
use crate::policy::{Action, AuthorizationPolicy};
use oracle_store::{EventDescriptor, EventRecord, EventStore, OracleStore, StoreError, WriteBatch};
use oracle_types::{EventId, EventState, Principal, Timestamp};
use tracing::info;

/// Arguments of a new event.
#[derive(Clone, Debug)]
pub struct NewEvent {
    pub id: EventId,
    pub descriptor: EventDescriptor,
    /// Last second at which submissions are accepted.
    pub deadline: Timestamp,
}

pub struct EventRegistry;

impl EventRegistry {
    /// Register a new event in `Pending`.
    pub fn create<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        policy: &dyn AuthorizationPolicy,
        new: NewEvent,
        now: Timestamp,
        caller: &Principal,
    ) -> Result<EventRecord, OracleError> {
        if !policy.is_allowed(Action::CreateEvent, caller) {
            return Err(OracleError::Unauthorized {
                action: Action::CreateEvent,
                caller: caller.clone(),
            });
        }
        if !new.id.is_valid() {
            return Err(OracleError::InvalidEventId(new.id.as_str().to_string()));
        }
        if store.event_exists(&new.id)? {
            return Err(OracleError::DuplicateEvent(new.id));
        }
        if new.deadline <= now {
            return Err(OracleError::InvalidDeadline {
                deadline: new.deadline,
                now,
            });
        }

        let record = EventRecord {
            id: new.id,
            descriptor: new.descriptor,
            deadline: new.deadline,
            created_at: now,
            creator: caller.clone(),
            state: EventState::Pending,
            outcome: None,
            finalized_at: None,
        };
        let mut batch = WriteBatch::new();
        batch.insert_event(record.clone());
        store.commit(batch)?;

        info!(deadline = %record.deadline, "event created");
        Ok(record)
    }

    pub fn get<S: EventStore + ?Sized>(
        &self,
        store: &S,
        id: &EventId,
    ) -> Result<EventRecord, OracleError> {
        load_event(store, id)
    }
}

/// Fetch an event, mapping a missing key to [`OracleError::NotFound`].
pub(crate) fn load_event<S: EventStore + ?Sized>(
    store: &S,
    id: &EventId,
) -> Result<EventRecord, OracleError> {
    match store.get_event(id) {
        Ok(record) => Ok(record),
        Err(StoreError::NotFound(_)) => Err(OracleError::NotFound(format!("event {id}"))),
        Err(e) => Err(e.into()),
    }
}
