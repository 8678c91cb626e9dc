//! Pre-built [`tracing::Span`] constructors for oracle operations.
//!
//! Consistent span names and fields make it easy to filter and correlate a
//! single event's lifecycle across log lines.

use oracle_types::{EventId, Principal};
use tracing::{info_span, Span};

pub fn create_span(event: &EventId, caller: &Principal) -> Span {
    info_span!("create_event", event = %event, caller = %caller)
}

pub fn submit_span(event: &EventId, provider: &Principal) -> Span {
    info_span!("submit", event = %event, provider = %provider)
}

pub fn propose_span(event: &EventId, proposer: &Principal) -> Span {
    info_span!("propose", event = %event, proposer = %proposer)
}

pub fn dispute_span(event: &EventId, disputer: &Principal) -> Span {
    info_span!("dispute", event = %event, disputer = %disputer)
}

pub fn vote_span(event: &EventId, voter: &Principal) -> Span {
    info_span!("vote", event = %event, voter = %voter)
}

pub fn finalize_span(event: &EventId, caller: &Principal) -> Span {
    info_span!("finalize", event = %event, caller = %caller)
}
