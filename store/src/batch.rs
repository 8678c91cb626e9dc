//! Write batching: groups every write of one oracle call so the backend can
//! apply them in a single atomic step.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.update_event(EventState::Pending, updated_event);
//! batch.insert_proposal(proposal);
//! store.commit(batch)?;
//! ```
//!
//! A batch that is dropped without being committed has no effect.

use crate::{DisputeRecord, EventRecord, ProposalRecord, SubmissionRecord, VoteRecord};
use oracle_types::{EventId, EventState};
use serde::{Deserialize, Serialize};

/// A single storage mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOp {
    InsertEvent(EventRecord),
    /// Replace an event, provided its stored state is still `expected`.
    UpdateEvent {
        expected: EventState,
        record: EventRecord,
    },
    InsertSubmission(SubmissionRecord),
    InsertProposal(ProposalRecord),
    InsertDispute(DisputeRecord),
    InsertVote(VoteRecord),
}

impl WriteOp {
    /// The event every op is scoped to.
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::InsertEvent(r) => &r.id,
            Self::UpdateEvent { record, .. } => &record.id,
            Self::InsertSubmission(r) => &r.event_id,
            Self::InsertProposal(r) => &r.event_id,
            Self::InsertDispute(r) => &r.event_id,
            Self::InsertVote(r) => &r.event_id,
        }
    }
}

/// An ordered group of [`WriteOp`]s applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_event(&mut self, record: EventRecord) -> &mut Self {
        self.ops.push(WriteOp::InsertEvent(record));
        self
    }

    pub fn update_event(&mut self, expected: EventState, record: EventRecord) -> &mut Self {
        self.ops.push(WriteOp::UpdateEvent { expected, record });
        self
    }

    pub fn insert_submission(&mut self, record: SubmissionRecord) -> &mut Self {
        self.ops.push(WriteOp::InsertSubmission(record));
        self
    }

    pub fn insert_proposal(&mut self, record: ProposalRecord) -> &mut Self {
        self.ops.push(WriteOp::InsertProposal(record));
        self
    }

    pub fn insert_dispute(&mut self, record: DisputeRecord) -> &mut Self {
        self.ops.push(WriteOp::InsertDispute(record));
        self
    }

    pub fn insert_vote(&mut self, record: VoteRecord) -> &mut Self {
        self.ops.push(WriteOp::InsertVote(record));
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
