use crate::policy::Action;
use oracle_quantize::QuantizeError;
use oracle_store::StoreError;
use oracle_types::{ErrorKind, EventId, Principal, Timestamp};
use thiserror::Error;

/// Every way a state-changing oracle call can be refused.
///
/// A refused call has no observable effect.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("event {0} already exists")]
    DuplicateEvent(EventId),

    #[error("deadline {deadline} is not after the current time {now}")]
    InvalidDeadline { deadline: Timestamp, now: Timestamp },

    #[error("invalid event id {0:?}: must be 1..={max} bytes", max = EventId::MAX_LEN)]
    InvalidEventId(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("submission window for {event} closed at {deadline}")]
    WindowClosed { event: EventId, deadline: Timestamp },

    #[error("provider {provider} already submitted for {event}")]
    DuplicateSubmission { event: EventId, provider: Principal },

    #[error("invalid value: {0}")]
    InvalidValue(#[from] QuantizeError),

    #[error("proposals for {event} open after {deadline}")]
    WindowNotOpen { event: EventId, deadline: Timestamp },

    #[error("event {0} already has a proposal")]
    AlreadyProposed(EventId),

    #[error("result {value} outside [{min}, {max}]")]
    InvalidResult { value: u64, min: u64, max: u64 },

    #[error("event {0} has no active proposal")]
    NoProposal(EventId),

    #[error("dispute window for {event} closed at {closed_at}")]
    DisputeWindowClosed { event: EventId, closed_at: Timestamp },

    #[error("proposal for {0} is already disputed")]
    AlreadyDisputed(EventId),

    #[error("event {0} is not under dispute")]
    NoDispute(EventId),

    #[error("juror {voter} already voted on {event}")]
    AlreadyVoted { event: EventId, voter: Principal },

    #[error("voting window for {event} closed at {closed_at}")]
    VotingWindowClosed { event: EventId, closed_at: Timestamp },

    #[error("event {event} cannot be finalized before {ready_after} has passed")]
    NotReady { event: EventId, ready_after: Timestamp },

    #[error("event {0} is already finalized")]
    AlreadyFinalized(EventId),

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { action: Action, caller: Principal },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl OracleError {
    /// Coarse classification for callers deciding whether to resubmit.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDeadline { .. }
            | Self::InvalidEventId(_)
            | Self::InvalidValue(_)
            | Self::InvalidResult { .. } => ErrorKind::Validation,

            Self::DuplicateEvent(_)
            | Self::WindowClosed { .. }
            | Self::DuplicateSubmission { .. }
            | Self::WindowNotOpen { .. }
            | Self::AlreadyProposed(_)
            | Self::NoProposal(_)
            | Self::DisputeWindowClosed { .. }
            | Self::AlreadyDisputed(_)
            | Self::NoDispute(_)
            | Self::AlreadyVoted { .. }
            | Self::VotingWindowClosed { .. }
            | Self::NotReady { .. }
            | Self::AlreadyFinalized(_) => ErrorKind::State,

            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Storage,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::DuplicateEvent(_) => "duplicate_event",
            Self::InvalidDeadline { .. } => "invalid_deadline",
            Self::InvalidEventId(_) => "invalid_event_id",
            Self::NotFound(_) => "not_found",
            Self::WindowClosed { .. } => "window_closed",
            Self::DuplicateSubmission { .. } => "duplicate_submission",
            Self::InvalidValue(_) => "invalid_value",
            Self::WindowNotOpen { .. } => "window_not_open",
            Self::AlreadyProposed(_) => "already_proposed",
            Self::InvalidResult { .. } => "invalid_result",
            Self::NoProposal(_) => "no_proposal",
            Self::DisputeWindowClosed { .. } => "dispute_window_closed",
            Self::AlreadyDisputed(_) => "already_disputed",
            Self::NoDispute(_) => "no_dispute",
            Self::AlreadyVoted { .. } => "already_voted",
            Self::VotingWindowClosed { .. } => "voting_window_closed",
            Self::NotReady { .. } => "not_ready",
            Self::AlreadyFinalized(_) => "already_finalized",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Store(_) => "storage",
        }
    }
}
