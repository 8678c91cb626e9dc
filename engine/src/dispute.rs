//! Dispute court: challenges against a proposal and jury voting on them.

use crate::error::OracleError;
use crate::jury::Tally;
use crate::policy::{Action, AuthorizationPolicy};
use crate::registry::load_event;
use oracle_store::{
    DisputeRecord, DisputeStore, OracleStore, VoteRecord, VoteStore, WriteBatch,
};
use oracle_types::{EventId, EventState, OracleParams, Principal, Timestamp};
use tracing::info;

/// A juror's vote.
#[derive(Clone, Debug)]
pub struct Ballot {
    pub event_id: EventId,
    pub voter: Principal,
    pub agree: bool,
}

pub struct DisputeCourt {
    params: OracleParams,
}

impl DisputeCourt {
    pub fn new(params: OracleParams) -> Self {
        Self { params }
    }

    /// Open the single dispute allowed against an event's proposal.
    pub fn dispute<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        event_id: &EventId,
        disputer: &Principal,
        reason: &str,
        now: Timestamp,
    ) -> Result<DisputeRecord, OracleError> {
        let event = load_event(store, event_id)?;
        let proposal = store
            .get_proposal(event_id)?
            .ok_or_else(|| OracleError::NoProposal(event_id.clone()))?;
        if !proposal.proposed_at.within(self.params.dispute_window_secs, now) {
            return Err(OracleError::DisputeWindowClosed {
                event: event.id,
                closed_at: proposal
                    .proposed_at
                    .saturating_add(self.params.dispute_window_secs),
            });
        }
        if event.state != EventState::Proposed || store.get_dispute(event_id)?.is_some() {
            return Err(OracleError::AlreadyDisputed(event.id));
        }

        let record = DisputeRecord {
            event_id: event.id.clone(),
            disputer: disputer.clone(),
            reason: reason.to_string(),
            opened_at: now,
        };
        let mut disputed = event;
        disputed.state = EventState::Disputed;

        let mut batch = WriteBatch::new();
        batch
            .update_event(EventState::Proposed, disputed)
            .insert_dispute(record.clone());
        store.commit(batch)?;

        info!(reason = %record.reason, "result disputed");
        Ok(record)
    }

    /// Record a juror's vote. Returns the vote and the tally including it.
    pub fn vote<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        policy: &dyn AuthorizationPolicy,
        ballot: Ballot,
        now: Timestamp,
    ) -> Result<(VoteRecord, Tally), OracleError> {
        if !policy.is_allowed(Action::CastVote, &ballot.voter) {
            return Err(OracleError::Unauthorized {
                action: Action::CastVote,
                caller: ballot.voter,
            });
        }
        let event = load_event(store, &ballot.event_id)?;
        if event.state != EventState::Disputed {
            return Err(OracleError::NoDispute(event.id));
        }
        let dispute = store
            .get_dispute(&event.id)?
            .ok_or_else(|| OracleError::NoDispute(event.id.clone()))?;
        if store.get_vote(&event.id, &ballot.voter)?.is_some() {
            return Err(OracleError::AlreadyVoted {
                event: event.id,
                voter: ballot.voter,
            });
        }
        if !dispute.opened_at.within(self.params.voting_window_secs, now) {
            return Err(OracleError::VotingWindowClosed {
                event: event.id,
                closed_at: dispute
                    .opened_at
                    .saturating_add(self.params.voting_window_secs),
            });
        }

        let record = VoteRecord {
            event_id: ballot.event_id,
            voter: ballot.voter,
            agree: ballot.agree,
            cast_at: now,
        };
        let existing = store.iter_votes(&event.id)?;
        let tally = Tally::from_votes(existing.iter().chain(std::iter::once(&record)));

        let mut batch = WriteBatch::new();
        batch.insert_vote(record.clone());
        store.commit(batch)?;

        info!(
            agree = record.agree,
            agree_total = tally.agree,
            disagree_total = tally.disagree,
            "vote cast"
        );
        Ok((record, tally))
    }

    pub fn get_dispute<S: DisputeStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
    ) -> Result<Option<DisputeRecord>, OracleError> {
        Ok(store.get_dispute(event)?)
    }

    pub fn get_vote<S: VoteStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, OracleError> {
        Ok(store.get_vote(event, voter)?)
    }

    pub fn tally<S: VoteStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
    ) -> Result<Tally, OracleError> {
        Ok(Tally::from_votes(&store.iter_votes(event)?))
    }
}
