//! Abstract storage traits for the oracle ledger.
//!
//! The storage substrate is external to the oracle core. Components read
//! through the per-entity traits below and hand every write of one call to
//! [`OracleStore::commit`] as a single [`WriteBatch`], which a backend must
//! apply all-or-nothing.

pub mod batch;
pub mod dispute;
pub mod error;
pub mod event;
pub mod proposal;
pub mod submission;
pub mod vote;

pub use batch::{WriteBatch, WriteOp};
pub use dispute::{DisputeRecord, DisputeStore};
pub use error::StoreError;
pub use event::{EventDescriptor, EventRecord, EventStore};
pub use proposal::{ProposalRecord, ProposalStore};
pub use submission::{SubmissionRecord, SubmissionStore};
pub use vote::{VoteRecord, VoteStore};

/// The full transactional substrate: every read trait plus atomic commit.
pub trait OracleStore:
    EventStore + SubmissionStore + ProposalStore + DisputeStore + VoteStore
{
    /// Apply every op in `batch`, or none of them.
    ///
    /// Inserts fail with [`StoreError::Duplicate`] when the key exists;
    /// [`WriteOp::UpdateEvent`] fails with [`StoreError::Conflict`] when the
    /// stored state differs from the expected one.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
