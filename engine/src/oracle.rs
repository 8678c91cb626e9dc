//! The oracle facade: one entry point per lifecycle operation.
//!
//! Calls take `&mut self`, so operations on one oracle are serialized and
//! never interleave their reads and writes. Each call validates, commits one
//! [`oracle_store::WriteBatch`], and only then journals and emits its
//! [`LedgerEvent`]. A refused call leaves the store, the journal and the
//! subscribers untouched.

use crate::config::OracleConfig;
use crate::dispute::{Ballot, DisputeCourt};
use crate::error::OracleError;
use crate::event::{EventBus, LedgerEvent};
use crate::finalize::{Finalization, Finalizer};
use crate::jury::Tally;
use crate::policy::AuthorizationPolicy;
use crate::proposal::{ProposalDesk, ProposalRequest};
use crate::registry::{EventRegistry, NewEvent};
use crate::spans;
use crate::submission::{SubmissionLedger, SubmissionRequest};
use oracle_quantize::{Quantizer, QuantizerConfig};
use oracle_store::{
    DisputeRecord, EventDescriptor, EventRecord, OracleStore, ProposalRecord, SubmissionRecord,
    VoteRecord,
};
use oracle_types::{EventId, OracleParams, Principal, ResultHash, Timestamp};
use tracing::debug;

pub struct Oracle<S: OracleStore> {
    store: S,
    params: OracleParams,
    registry: EventRegistry,
    ledger: SubmissionLedger,
    desk: ProposalDesk,
    court: DisputeCourt,
    finalizer: Finalizer,
    policy: Box<dyn AuthorizationPolicy + Send + Sync>,
    bus: EventBus,
    journal: Vec<LedgerEvent>,
}

impl<S: OracleStore> Oracle<S> {
    pub fn new(store: S, config: &OracleConfig) -> Self {
        Self {
            store,
            params: config.params.clone(),
            registry: EventRegistry,
            ledger: SubmissionLedger::new(Quantizer::new(config.quantizer.clone())),
            desk: ProposalDesk::new(config.params.clone()),
            court: DisputeCourt::new(config.params.clone()),
            finalizer: Finalizer::new(config.params.clone(), config.policy.tie_break),
            policy: Box::new(config.policy.role_policy()),
            bus: EventBus::new(),
            journal: Vec::new(),
        }
    }

    /// An oracle with default windows, quantizer and an open policy.
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, &OracleConfig::default())
    }

    /// Replace the authorization policy.
    pub fn with_policy(mut self, policy: impl AuthorizationPolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ── Mutations ────────────────────────────────────────────────────────

    pub fn create_event(
        &mut self,
        id: EventId,
        descriptor: EventDescriptor,
        deadline: Timestamp,
        now: Timestamp,
        caller: &Principal,
    ) -> Result<EventRecord, OracleError> {
        let span = spans::create_span(&id, caller);
        let _enter = span.enter();

        let result = self.registry.create(
            &self.store,
            self.policy.as_ref(),
            NewEvent {
                id,
                descriptor,
                deadline,
            },
            now,
            caller,
        );
        self.settle(result, |e| LedgerEvent::EventCreated {
            event_id: e.id.clone(),
            descriptor: e.descriptor.clone(),
            deadline: e.deadline,
            creator: e.creator.clone(),
            created_at: e.created_at,
        })
    }

    pub fn submit(
        &mut self,
        request: SubmissionRequest,
        now: Timestamp,
    ) -> Result<SubmissionRecord, OracleError> {
        let span = spans::submit_span(&request.event_id, &request.provider);
        let _enter = span.enter();

        let result = self.ledger.submit(&self.store, request, now);
        self.settle(result, |(s, count)| LedgerEvent::SubmissionRecorded {
            event_id: s.event_id.clone(),
            provider: s.provider.clone(),
            value_kind: s.value_kind,
            quantized_value: s.quantized_value,
            ciphertext: s.ciphertext.clone(),
            submitted_at: s.submitted_at,
            count: *count,
        })
        .map(|(record, _)| record)
    }

    pub fn propose(
        &mut self,
        event_id: &EventId,
        proposer: &Principal,
        result_value: u64,
        result_hash: ResultHash,
        now: Timestamp,
    ) -> Result<ProposalRecord, OracleError> {
        let span = spans::propose_span(event_id, proposer);
        let _enter = span.enter();

        let result = self.desk.propose(
            &self.store,
            ProposalRequest {
                event_id: event_id.clone(),
                proposer: proposer.clone(),
                result_value,
                result_hash,
            },
            now,
        );
        self.settle(result, |p| LedgerEvent::ResultProposed {
            event_id: p.event_id.clone(),
            proposer: p.proposer.clone(),
            result_value: p.result_value,
            result_hash: p.result_hash,
            proposed_at: p.proposed_at,
        })
    }

    pub fn dispute(
        &mut self,
        event_id: &EventId,
        disputer: &Principal,
        reason: &str,
        now: Timestamp,
    ) -> Result<DisputeRecord, OracleError> {
        let span = spans::dispute_span(event_id, disputer);
        let _enter = span.enter();

        let result = self
            .court
            .dispute(&self.store, event_id, disputer, reason, now);
        self.settle(result, |d| LedgerEvent::ResultDisputed {
            event_id: d.event_id.clone(),
            disputer: d.disputer.clone(),
            reason: d.reason.clone(),
            opened_at: d.opened_at,
        })
    }

    /// Cast a juror vote: `agree` upholds the proposal, `!agree` opposes it.
    pub fn vote(
        &mut self,
        event_id: &EventId,
        voter: &Principal,
        agree: bool,
        now: Timestamp,
    ) -> Result<VoteRecord, OracleError> {
        let span = spans::vote_span(event_id, voter);
        let _enter = span.enter();

        let result = self.court.vote(
            &self.store,
            self.policy.as_ref(),
            Ballot {
                event_id: event_id.clone(),
                voter: voter.clone(),
                agree,
            },
            now,
        );
        self.settle(result, |(v, tally)| LedgerEvent::VoteCast {
            event_id: v.event_id.clone(),
            voter: v.voter.clone(),
            agree: v.agree,
            cast_at: v.cast_at,
            tally: *tally,
        })
        .map(|(record, _)| record)
    }

    pub fn finalize(
        &mut self,
        event_id: &EventId,
        now: Timestamp,
        caller: &Principal,
    ) -> Result<Finalization, OracleError> {
        let span = spans::finalize_span(event_id, caller);
        let _enter = span.enter();

        let result = self
            .finalizer
            .finalize(&self.store, self.policy.as_ref(), event_id, now, caller);
        self.settle(result, |f| LedgerEvent::ResultFinalized {
            event_id: f.event.id.clone(),
            outcome: f.outcome,
            finalized_at: now,
            tally: f.tally,
        })
    }

    /// Journal and emit the event for a committed call, or log the refusal.
    fn settle<T>(
        &mut self,
        result: Result<T, OracleError>,
        to_event: impl FnOnce(&T) -> LedgerEvent,
    ) -> Result<T, OracleError> {
        match result {
            Ok(value) => {
                let event = to_event(&value);
                self.bus.emit(&event);
                self.journal.push(event);
                Ok(value)
            }
            Err(err) => {
                debug!(reason = err.reason(), kind = err.kind().as_str(), %err, "call rejected");
                Err(err)
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn get_event(&self, id: &EventId) -> Result<EventRecord, OracleError> {
        self.registry.get(&self.store, id)
    }

    pub fn exists(&self, id: &EventId) -> Result<bool, OracleError> {
        Ok(self.store.event_exists(id)?)
    }

    pub fn submission_count(&self, id: &EventId) -> Result<u64, OracleError> {
        self.ledger.count(&self.store, id)
    }

    pub fn get_submission(
        &self,
        id: &EventId,
        provider: &Principal,
    ) -> Result<Option<SubmissionRecord>, OracleError> {
        self.ledger.get(&self.store, id, provider)
    }

    /// Every submission for an event, ordered by provider. Input to off-chain
    /// aggregation.
    pub fn submissions(&self, id: &EventId) -> Result<Vec<SubmissionRecord>, OracleError> {
        Ok(self.store.iter_submissions(id)?)
    }

    pub fn get_proposal(&self, id: &EventId) -> Result<Option<ProposalRecord>, OracleError> {
        self.desk.get(&self.store, id)
    }

    pub fn get_dispute(&self, id: &EventId) -> Result<Option<DisputeRecord>, OracleError> {
        self.court.get_dispute(&self.store, id)
    }

    pub fn get_vote(
        &self,
        id: &EventId,
        voter: &Principal,
    ) -> Result<Option<VoteRecord>, OracleError> {
        self.court.get_vote(&self.store, id, voter)
    }

    pub fn tally(&self, id: &EventId) -> Result<Tally, OracleError> {
        self.court.tally(&self.store, id)
    }

    /// Events emitted so far, in commit order.
    pub fn journal(&self) -> &[LedgerEvent] {
        &self.journal
    }

    pub fn params(&self) -> &OracleParams {
        &self.params
    }

    pub fn quantizer_config(&self) -> &QuantizerConfig {
        self.ledger.quantizer().config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
