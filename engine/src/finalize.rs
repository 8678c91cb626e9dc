//! Finalization: the single irreversible commitment of an event's outcome.

use crate::error::OracleError;
use crate::jury::{Tally, TieBreakRule};
use crate::policy::{Action, AuthorizationPolicy};
use crate::registry::load_event;
use oracle_store::{EventRecord, OracleStore, WriteBatch};
use oracle_types::{EventId, EventState, FinalOutcome, OracleParams, Principal, Timestamp};
use tracing::info;

/// A finalized event and, if it was disputed, the tally that decided it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finalization {
    pub event: EventRecord,
    pub outcome: FinalOutcome,
    pub tally: Option<Tally>,
}

pub struct Finalizer {
    params: OracleParams,
    tie_break: TieBreakRule,
}

impl Finalizer {
    pub fn new(params: OracleParams, tie_break: TieBreakRule) -> Self {
        Self { params, tie_break }
    }

    pub fn tie_break(&self) -> TieBreakRule {
        self.tie_break
    }

    /// Commit the terminal result once every applicable window has elapsed.
    ///
    /// An undisputed proposal resolves to its own value; a disputed one
    /// resolves to the jury verdict over the votes cast.
    pub fn finalize<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        policy: &dyn AuthorizationPolicy,
        event_id: &EventId,
        now: Timestamp,
        caller: &Principal,
    ) -> Result<Finalization, OracleError> {
        if !policy.is_allowed(Action::Finalize, caller) {
            return Err(OracleError::Unauthorized {
                action: Action::Finalize,
                caller: caller.clone(),
            });
        }
        let event = load_event(store, event_id)?;

        let (outcome, tally) = match event.state {
            EventState::Finalized => return Err(OracleError::AlreadyFinalized(event.id)),
            EventState::Pending => return Err(OracleError::NoProposal(event.id)),
            EventState::Proposed => {
                let proposal = store
                    .get_proposal(event_id)?
                    .ok_or_else(|| OracleError::NoProposal(event_id.clone()))?;
                if proposal.proposed_at.within(self.params.dispute_window_secs, now) {
                    return Err(OracleError::NotReady {
                        event: event.id,
                        ready_after: proposal
                            .proposed_at
                            .saturating_add(self.params.dispute_window_secs),
                    });
                }
                (
                    FinalOutcome::Resolved {
                        value: proposal.result_value,
                    },
                    None,
                )
            }
            EventState::Disputed => {
                let proposal = store
                    .get_proposal(event_id)?
                    .ok_or_else(|| OracleError::NoProposal(event_id.clone()))?;
                let dispute = store
                    .get_dispute(event_id)?
                    .ok_or_else(|| OracleError::NoDispute(event_id.clone()))?;
                if dispute.opened_at.within(self.params.voting_window_secs, now) {
                    return Err(OracleError::NotReady {
                        event: event.id,
                        ready_after: dispute
                            .opened_at
                            .saturating_add(self.params.voting_window_secs),
                    });
                }
                let tally = Tally::from_votes(&store.iter_votes(event_id)?);
                (tally.outcome(proposal.result_value, self.tie_break), Some(tally))
            }
        };

        let prior = event.state;
        let mut finalized = event;
        finalized.state = EventState::Finalized;
        finalized.outcome = Some(outcome);
        finalized.finalized_at = Some(now);

        let mut batch = WriteBatch::new();
        batch.update_event(prior, finalized.clone());
        store.commit(batch)?;

        info!(?outcome, disputed = tally.is_some(), "result finalized");
        Ok(Finalization {
            event: finalized,
            outcome,
            tally,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispute::{Ballot, DisputeCourt};
    use crate::policy::{AccessRule, RolePolicy};
    use crate::proposal::{ProposalDesk, ProposalRequest};
    use crate::registry::{EventRegistry, NewEvent};
    use oracle_nullables::NullStore;
    use oracle_store::{EventDescriptor, EventStore};
    use oracle_types::ResultHash;

    const DEADLINE: u64 = 1_000;
    const PROPOSED_AT: u64 = DEADLINE + 1;
    const WINDOW: u64 = 100;

    fn params() -> OracleParams {
        OracleParams {
            dispute_window_secs: WINDOW,
            voting_window_secs: WINDOW,
            ..OracleParams::default()
        }
    }

    fn id() -> EventId {
        EventId::new("e1")
    }

    fn owner() -> Principal {
        Principal::new("owner")
    }

    fn proposed_store() -> NullStore {
        let store = NullStore::new();
        EventRegistry
            .create(
                &store,
                &RolePolicy::open(),
                NewEvent {
                    id: id(),
                    descriptor: EventDescriptor::new("q"),
                    deadline: Timestamp::new(DEADLINE),
                },
                Timestamp::new(0),
                &owner(),
            )
            .unwrap();
        ProposalDesk::new(params())
            .propose(
                &store,
                ProposalRequest {
                    event_id: id(),
                    proposer: Principal::new("aggregator"),
                    result_value: 62,
                    result_hash: ResultHash::ZERO,
                },
                Timestamp::new(PROPOSED_AT),
            )
            .unwrap();
        store
    }

    fn disputed_store(opened_at: u64, votes: &[(&str, bool)]) -> NullStore {
        let store = proposed_store();
        let court = DisputeCourt::new(params());
        court
            .dispute(&store, &id(), &"d".into(), "wrong", Timestamp::new(opened_at))
            .unwrap();
        for (voter, agree) in votes {
            court
                .vote(
                    &store,
                    &RolePolicy::open(),
                    Ballot {
                        event_id: id(),
                        voter: Principal::new(*voter),
                        agree: *agree,
                    },
                    Timestamp::new(opened_at + 1),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn undisputed_waits_for_dispute_window() {
        let store = proposed_store();
        let finalizer = Finalizer::new(params(), TieBreakRule::default());
        let policy = RolePolicy::open();

        let err = finalizer
            .finalize(&store, &policy, &id(), Timestamp::new(PROPOSED_AT + WINDOW), &owner())
            .unwrap_err();
        assert!(matches!(err, OracleError::NotReady { .. }));

        let done = finalizer
            .finalize(&store, &policy, &id(), Timestamp::new(PROPOSED_AT + WINDOW + 1), &owner())
            .unwrap();
        assert_eq!(done.outcome, FinalOutcome::Resolved { value: 62 });
        assert!(done.tally.is_none());
        assert_eq!(store.get_event(&id()).unwrap().state, EventState::Finalized);
    }

    #[test]
    fn second_finalize_rejected() {
        let store = proposed_store();
        let finalizer = Finalizer::new(params(), TieBreakRule::default());
        let policy = RolePolicy::open();
        let at = Timestamp::new(PROPOSED_AT + WINDOW + 1);
        finalizer.finalize(&store, &policy, &id(), at, &owner()).unwrap();
        let err = finalizer
            .finalize(&store, &policy, &id(), at, &owner())
            .unwrap_err();
        assert!(matches!(err, OracleError::AlreadyFinalized(_)));
    }

    #[test]
    fn disputed_waits_for_voting_window() {
        let opened = PROPOSED_AT + 50;
        let store = disputed_store(opened, &[("j1", true)]);
        let finalizer = Finalizer::new(params(), TieBreakRule::default());
        let policy = RolePolicy::open();

        // The undisputed deadline has passed but the vote is still open.
        let err = finalizer
            .finalize(&store, &policy, &id(), Timestamp::new(opened + WINDOW), &owner())
            .unwrap_err();
        assert!(matches!(err, OracleError::NotReady { .. }));
        assert!(finalizer
            .finalize(&store, &policy, &id(), Timestamp::new(opened + WINDOW + 1), &owner())
            .is_ok());
    }

    #[test]
    fn jury_majority_decides() {
        let opened = PROPOSED_AT + 1;
        let at = Timestamp::new(opened + WINDOW + 1);
        let policy = RolePolicy::open();
        let finalizer = Finalizer::new(params(), TieBreakRule::default());

        let upheld = disputed_store(opened, &[("a", true), ("b", true), ("c", false)]);
        let done = finalizer.finalize(&upheld, &policy, &id(), at, &owner()).unwrap();
        assert_eq!(done.outcome, FinalOutcome::Resolved { value: 62 });
        assert_eq!(done.tally, Some(Tally { agree: 2, disagree: 1 }));

        let rejected = disputed_store(opened, &[("a", false), ("b", false), ("c", true)]);
        let done = finalizer.finalize(&rejected, &policy, &id(), at, &owner()).unwrap();
        assert_eq!(done.outcome, FinalOutcome::Rejected);
    }

    #[test]
    fn tie_follows_configured_rule() {
        let opened = PROPOSED_AT + 1;
        let at = Timestamp::new(opened + WINDOW + 1);
        let policy = RolePolicy::open();

        let store = disputed_store(opened, &[("a", true), ("b", false)]);
        let done = Finalizer::new(params(), TieBreakRule::RejectProposal)
            .finalize(&store, &policy, &id(), at, &owner())
            .unwrap();
        assert_eq!(done.outcome, FinalOutcome::Rejected);

        let store = disputed_store(opened, &[]);
        let done = Finalizer::new(params(), TieBreakRule::UpholdProposal)
            .finalize(&store, &policy, &id(), at, &owner())
            .unwrap();
        assert_eq!(done.outcome, FinalOutcome::Resolved { value: 62 });
        assert_eq!(done.tally, Some(Tally::default()));
    }

    #[test]
    fn pending_event_has_nothing_to_finalize() {
        let store = NullStore::new();
        EventRegistry
            .create(
                &store,
                &RolePolicy::open(),
                NewEvent {
                    id: id(),
                    descriptor: EventDescriptor::new("q"),
                    deadline: Timestamp::new(DEADLINE),
                },
                Timestamp::new(0),
                &owner(),
            )
            .unwrap();
        let err = Finalizer::new(params(), TieBreakRule::default())
            .finalize(&store, &RolePolicy::open(), &id(), Timestamp::new(9_999), &owner())
            .unwrap_err();
        assert!(matches!(err, OracleError::NoProposal(_)));
    }

    #[test]
    fn restricted_finalizer() {
        let store = proposed_store();
        let policy = RolePolicy {
            finalize: AccessRule::restricted(["owner"]),
            ..RolePolicy::open()
        };
        let at = Timestamp::new(PROPOSED_AT + WINDOW + 1);
        let finalizer = Finalizer::new(params(), TieBreakRule::default());
        let err = finalizer
            .finalize(&store, &policy, &id(), at, &"eve".into())
            .unwrap_err();
        assert!(matches!(err, OracleError::Unauthorized { action: Action::Finalize, .. }));
        assert!(finalizer.finalize(&store, &policy, &id(), at, &owner()).is_ok());
    }
}
