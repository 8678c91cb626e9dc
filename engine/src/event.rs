//! Observable events emitted after each successful commit.

use crate::jury::Tally;
use oracle_store::EventDescriptor;
use oracle_types::{
    Ciphertext, EventId, FinalOutcome, Principal, ResultHash, Timestamp, ValueKind,
};
use serde::{Deserialize, Serialize};

/// Ledger-level events that indexers can subscribe to via the [`EventBus`].
///
/// Each variant carries the new fields of the entity the call mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    EventCreated {
        event_id: EventId,
        descriptor: EventDescriptor,
        deadline: Timestamp,
        creator: Principal,
        created_at: Timestamp,
    },
    SubmissionRecorded {
        event_id: EventId,
        provider: Principal,
        value_kind: ValueKind,
        quantized_value: i64,
        ciphertext: Ciphertext,
        submitted_at: Timestamp,
        /// Submissions for the event including this one.
        count: u64,
    },
    ResultProposed {
        event_id: EventId,
        proposer: Principal,
        result_value: u64,
        result_hash: ResultHash,
        proposed_at: Timestamp,
    },
    ResultDisputed {
        event_id: EventId,
        disputer: Principal,
        reason: String,
        opened_at: Timestamp,
    },
    VoteCast {
        event_id: EventId,
        voter: Principal,
        agree: bool,
        cast_at: Timestamp,
        /// Running tally including this vote.
        tally: Tally,
    },
    ResultFinalized {
        event_id: EventId,
        outcome: FinalOutcome,
        finalized_at: Timestamp,
        /// Present when the proposal went to the jury.
        tally: Option<Tally>,
    },
}

impl LedgerEvent {
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::SubmissionRecorded { event_id, .. }
            | Self::ResultProposed { event_id, .. }
            | Self::ResultDisputed { event_id, .. }
            | Self::VoteCast { event_id, .. }
            | Self::ResultFinalized { event_id, .. } => event_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "EventCreated",
            Self::SubmissionRecorded { .. } => "SubmissionRecorded",
            Self::ResultProposed { .. } => "ResultProposed",
            Self::ResultDisputed { .. } => "ResultDisputed",
            Self::VoteCast { .. } => "VoteCast",
            Self::ResultFinalized { .. } => "ResultFinalized",
        }
    }
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread, after the commit
/// that produced the event.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn disputed() -> LedgerEvent {
        LedgerEvent::ResultDisputed {
            event_id: EventId::new("e1"),
            disputer: Principal::new("d1"),
            reason: "median looks off".into(),
            opened_at: Timestamp::new(86_402),
        }
    }

    #[test]
    fn every_listener_sees_each_event() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&disputed());
        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn emitting_without_listeners_is_fine() {
        let bus = EventBus::new();
        bus.emit(&disputed());
    }

    #[test]
    fn json_is_tagged_by_type() {
        let json = serde_json::to_value(disputed()).unwrap();
        assert_eq!(json["type"], "result_disputed");
        assert_eq!(json["event_id"], "e1");
        assert_eq!(json["opened_at"], 86_402);

        let finalized = LedgerEvent::ResultFinalized {
            event_id: EventId::new("e1"),
            outcome: FinalOutcome::Resolved { value: 62 },
            finalized_at: Timestamp::new(259_201),
            tally: Some(Tally { agree: 2, disagree: 1 }),
        };
        let json = serde_json::to_value(&finalized).unwrap();
        assert_eq!(json["outcome"]["outcome"], "resolved");
        assert_eq!(json["outcome"]["value"], 62);
        assert_eq!(json["tally"]["agree"], 2);
        assert_eq!(finalized.name(), "ResultFinalized");
        assert_eq!(finalized.event_id().as_str(), "e1");
    }
}
