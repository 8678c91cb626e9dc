//! Event lifecycle core for the encrypted prediction oracle.
//!
//! An event moves Pending → Proposed → (Disputed) → Finalized. Providers
//! submit sealed values while the event is open, a proposer commits the
//! aggregate after the deadline, anyone may dispute it once, and a jury
//! decides disputed results. [`Oracle`] ties the components together over
//! any [`oracle_store::OracleStore`].

pub mod config;
pub mod dispute;
pub mod error;
pub mod event;
pub mod finalize;
pub mod jury;
pub mod oracle;
pub mod policy;
pub mod proposal;
pub mod registry;
pub mod spans;
pub mod submission;

pub use config::{ConfigError, OracleConfig, PolicyConfig};
pub use dispute::{Ballot, DisputeCourt};
pub use error::OracleError;
pub use event::{EventBus, LedgerEvent};
pub use finalize::{Finalization, Finalizer};
pub use jury::{Tally, TieBreakRule, Verdict};
pub use oracle::Oracle;
pub use policy::{AccessRule, Action, AuthorizationPolicy, RolePolicy};
pub use proposal::{ProposalDesk, ProposalRequest};
pub use registry::{EventRegistry, NewEvent};
pub use submission::{SubmissionLedger, SubmissionRequest};
