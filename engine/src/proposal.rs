//! Proposal desk: accepts the single candidate result for an event.
//!
//! The desk never recomputes the aggregate behind `result_value`. It checks
//! bounds and timing, then stores the value with its commitment hash. Whether
//! the value is right is settled only through the dispute process.

use crate::error::OracleError;
use crate::registry::load_event;
use oracle_store::{OracleStore, ProposalRecord, ProposalStore, WriteBatch};
use oracle_types::{EventId, EventState, OracleParams, Principal, ResultHash, Timestamp};
use tracing::info;

#[derive(Clone, Debug)]
pub struct ProposalRequest {
    pub event_id: EventId,
    pub proposer: Principal,
    pub result_value: u64,
    pub result_hash: ResultHash,
}

pub struct ProposalDesk {
    params: OracleParams,
}

impl ProposalDesk {
    pub fn new(params: OracleParams) -> Self {
        Self { params }
    }

    pub fn propose<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        request: ProposalRequest,
        now: Timestamp,
    ) -> Result<ProposalRecord, OracleError> {
        let event = load_event(store, &request.event_id)?;
        if now <= event.deadline {
            return Err(OracleError::WindowNotOpen {
                event: event.id,
                deadline: event.deadline,
            });
        }
        if event.state != EventState::Pending || store.get_proposal(&event.id)?.is_some() {
            return Err(OracleError::AlreadyProposed(event.id));
        }
        if !self.params.result_in_bounds(request.result_value) {
            return Err(OracleError::InvalidResult {
                value: request.result_value,
                min: self.params.result_min,
                max: self.params.result_max,
            });
        }

        let record = ProposalRecord {
            event_id: request.event_id,
            proposer: request.proposer,
            result_value: request.result_value,
            result_hash: request.result_hash,
            proposed_at: now,
        };
        let mut proposed = event;
        proposed.state = EventState::Proposed;

        let mut batch = WriteBatch::new();
        batch
            .update_event(EventState::Pending, proposed)
            .insert_proposal(record.clone());
        store.commit(batch)?;

        info!(
            value = record.result_value,
            hash = %record.result_hash,
            "result proposed"
        );
        Ok(record)
    }

    pub fn get<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
    ) -> Result<Option<ProposalRecord>, OracleError> {
        Ok(store.get_proposal(event)?)
    }
}
