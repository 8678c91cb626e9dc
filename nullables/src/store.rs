//! In-memory oracle ledger with atomic batch commits, for tests and replay.
//!
//! All tables sit behind one mutex, so a commit is a single critical section:
//! the batch is applied to a scratch copy and swapped in only if every op
//! succeeded.

use oracle_store::{
    DisputeRecord, DisputeStore, EventRecord, EventStore, OracleStore, ProposalRecord,
    ProposalStore, StoreError, SubmissionRecord, SubmissionStore, VoteRecord, VoteStore,
    WriteBatch, WriteOp,
};
use oracle_types::{EventId, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Tables {
    events: BTreeMap<EventId, EventRecord>,
    submissions: BTreeMap<(EventId, Principal), SubmissionRecord>,
    proposals: BTreeMap<EventId, ProposalRecord>,
    disputes: BTreeMap<EventId, DisputeRecord>,
    votes: BTreeMap<(EventId, Principal), VoteRecord>,
}

/// Rows of a `(event, principal)`-keyed table belonging to `event`.
///
/// Keys sort by event first, so one event's rows are contiguous and start at
/// the empty principal.
fn rows_for<'a, V>(
    table: &'a BTreeMap<(EventId, Principal), V>,
    event: &'a EventId,
) -> impl Iterator<Item = &'a V> + 'a {
    table
        .range((event.clone(), Principal::new(""))..)
        .take_while(move |((e, _), _)| e == event)
        .map(|(_, record)| record)
}

impl Tables {
    fn apply(&mut self, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::InsertEvent(record) => {
                if self.events.contains_key(&record.id) {
                    return Err(StoreError::Duplicate(format!("event {}", record.id)));
                }
                self.events.insert(record.id.clone(), record);
            }
            WriteOp::UpdateEvent { expected, record } => {
                let current = self
                    .events
                    .get_mut(&record.id)
                    .ok_or_else(|| StoreError::NotFound(format!("event {}", record.id)))?;
                if current.state != expected {
                    return Err(StoreError::Conflict(format!(
                        "event {} is {}, expected {}",
                        record.id,
                        current.state.as_str(),
                        expected.as_str()
                    )));
                }
                if !current.state.can_transition_to(record.state) {
                    return Err(StoreError::Conflict(format!(
                        "event {} cannot move from {} to {}",
                        record.id,
                        current.state.as_str(),
                        record.state.as_str()
                    )));
                }
                *current = record;
            }
            WriteOp::InsertSubmission(record) => {
                let key = (record.event_id.clone(), record.provider.clone());
                if self.submissions.contains_key(&key) {
                    return Err(StoreError::Duplicate(format!(
                        "submission {}/{}",
                        key.0, key.1
                    )));
                }
                self.submissions.insert(key, record);
            }
            WriteOp::InsertProposal(record) => {
                if self.proposals.contains_key(&record.event_id) {
                    return Err(StoreError::Duplicate(format!("proposal {}", record.event_id)));
                }
                self.proposals.insert(record.event_id.clone(), record);
            }
            WriteOp::InsertDispute(record) => {
                if self.disputes.contains_key(&record.event_id) {
                    return Err(StoreError::Duplicate(format!("dispute {}", record.event_id)));
                }
                self.disputes.insert(record.event_id.clone(), record);
            }
            WriteOp::InsertVote(record) => {
                let key = (record.event_id.clone(), record.voter.clone());
                if self.votes.contains_key(&key) {
                    return Err(StoreError::Duplicate(format!("vote {}/{}", key.0, key.1)));
                }
                self.votes.insert(key, record);
            }
        }
        Ok(())
    }
}

/// An in-memory [`OracleStore`] for tests and simulations.
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_next_commit: Mutex<Option<StoreError>>,
    commits: Mutex<u64>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::from_tables(Tables::default())
    }

    fn from_tables(tables: Tables) -> Self {
        Self {
            tables: Mutex::new(tables),
            fail_next_commit: Mutex::new(None),
            commits: Mutex::new(0),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }

    /// Make the next `commit` fail with `error` without applying anything.
    pub fn fail_next_commit(&self, error: StoreError) {
        if let Ok(mut slot) = self.fail_next_commit.lock() {
            *slot = Some(error);
        }
    }

    /// Number of batches successfully committed.
    pub fn commit_count(&self) -> u64 {
        self.commits.lock().map(|c| *c).unwrap_or(0)
    }

    /// Serialize every table into a byte snapshot.
    pub fn save_state(&self) -> Result<Vec<u8>, StoreError> {
        let tables = self.tables()?;
        bincode::serialize(&*tables).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Rebuild a store from a snapshot produced by [`NullStore::save_state`].
    pub fn load_state(bytes: &[u8]) -> Result<Self, StoreError> {
        let tables: Tables =
            bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self::from_tables(tables))
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for NullStore {
    fn get_event(&self, id: &EventId) -> Result<EventRecord, StoreError> {
        self.tables()?
            .events
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("event {id}")))
    }

    fn event_exists(&self, id: &EventId) -> Result<bool, StoreError> {
        Ok(self.tables()?.events.contains_key(id))
    }

    fn event_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.events.len() as u64)
    }

    fn iter_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        Ok(self.tables()?.events.values().cloned().collect())
    }
}

impl SubmissionStore for NullStore {
    fn get_submission(
        &self,
        event: &EventId,
        provider: &Principal,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        Ok(self
            .tables()?
            .submissions
            .get(&(event.clone(), provider.clone()))
            .cloned())
    }

    fn submission_count(&self, event: &EventId) -> Result<u64, StoreError> {
        Ok(rows_for(&self.tables()?.submissions, event).count() as u64)
    }

    fn iter_submissions(&self, event: &EventId) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(rows_for(&self.tables()?.submissions, event).cloned().collect())
    }
}

impl ProposalStore for NullStore {
    fn get_proposal(&self, event: &EventId) -> Result<Option<ProposalRecord>, StoreError> {
        Ok(self.tables()?.proposals.get(event).cloned())
    }
}

impl DisputeStore for NullStore {
    fn get_dispute(&self, event: &EventId) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self.tables()?.disputes.get(event).cloned())
    }
}

impl VoteStore for NullStore {
    fn get_vote(
        &self,
        event: &EventId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, StoreError> {
        Ok(self
            .tables()?
            .votes
            .get(&(event.clone(), voter.clone()))
            .cloned())
    }

    fn iter_votes(&self, event: &EventId) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(rows_for(&self.tables()?.votes, event).cloned().collect())
    }
}

impl OracleStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut tables = self.tables()?;

        if let Some(error) = self
            .fail_next_commit
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))?
            .take()
        {
            return Err(error);
        }

        let mut staged = tables.clone();
        for op in batch.into_ops() {
            staged.apply(op)?;
        }
        *tables = staged;

        if let Ok(mut commits) = self.commits.lock() {
            *commits += 1;
        }
        Ok(())
    }
}
