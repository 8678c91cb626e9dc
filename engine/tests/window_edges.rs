use proptest::prelude::*;

use oracle_engine::{Oracle, OracleConfig, OracleError, SubmissionRequest};
use oracle_nullables::NullStore;
use oracle_store::EventDescriptor;
use oracle_types::{Ciphertext, EventId, OracleParams, Principal, ResultHash, Timestamp, ValueKind};

const CREATED: u64 = 1_000;

fn oracle_with(dispute: u64, voting: u64) -> Oracle<NullStore> {
    let config = OracleConfig {
        params: OracleParams {
            dispute_window_secs: dispute,
            voting_window_secs: voting,
            ..OracleParams::default()
        },
        ..OracleConfig::default()
    };
    Oracle::new(NullStore::new(), &config)
}

fn create(oracle: &mut Oracle<NullStore>, deadline: u64) {
    oracle
        .create_event(
            EventId::new("e"),
            EventDescriptor::new("q"),
            Timestamp::new(deadline),
            Timestamp::new(CREATED),
            &Principal::new("owner"),
        )
        .expect("create");
}

fn submission() -> SubmissionRequest {
    SubmissionRequest {
        event_id: EventId::new("e"),
        provider: Principal::new("p"),
        value_kind: ValueKind::Ratio,
        raw_value: 0.5,
        ciphertext: Ciphertext::new(vec![1, 2, 3]),
    }
}

fn propose(oracle: &mut Oracle<NullStore>, now: u64) -> Result<(), OracleError> {
    oracle
        .propose(
            &EventId::new("e"),
            &Principal::new("agg"),
            50,
            ResultHash::ZERO,
            Timestamp::new(now),
        )
        .map(|_| ())
}

#[test]
fn deadline_must_be_in_the_future() {
    let mut oracle = oracle_with(10, 10);
    for deadline in [CREATED - 1, CREATED] {
        let err = oracle
            .create_event(
                EventId::new("e"),
                EventDescriptor::new("q"),
                Timestamp::new(deadline),
                Timestamp::new(CREATED),
                &Principal::new("owner"),
            )
            .unwrap_err();
        assert!(matches!(err, OracleError::InvalidDeadline { .. }));
    }
    create(&mut oracle, CREATED + 1);
}

#[test]
fn voting_window_counts_from_dispute_opening() {
    let mut oracle = oracle_with(10, 10);
    create(&mut oracle, CREATED + 5);
    propose(&mut oracle, CREATED + 6).unwrap();
    let id = EventId::new("e");
    // Opened on the last disputable second.
    oracle
        .dispute(&id, &"d1".into(), "a", Timestamp::new(CREATED + 16))
        .unwrap();
    oracle
        .vote(&id, &"j".into(), true, Timestamp::new(CREATED + 26))
        .unwrap();
    assert!(matches!(
        oracle.vote(&id, &"k".into(), true, Timestamp::new(CREATED + 27)),
        Err(OracleError::VotingWindowClosed { .. })
    ));
}

proptest! {
    /// Submissions are accepted up to and including the deadline second.
    #[test]
    fn submit_open_iff_not_past_deadline(lead in 1u64..1_000, offset in 0u64..2_000) {
        let deadline = CREATED + lead;
        let now = CREATED + offset;
        let mut oracle = oracle_with(10, 10);
        create(&mut oracle, deadline);

        let result = oracle.submit(submission(), Timestamp::new(now));
        if now <= deadline {
            prop_assert!(result.is_ok());
        } else {
            let is_closed = matches!(result, Err(OracleError::WindowClosed { .. }));
            prop_assert!(is_closed);
        }
    }

    /// Proposals open strictly after the deadline.
    #[test]
    fn propose_open_iff_past_deadline(lead in 1u64..1_000, offset in 0u64..2_000) {
        let deadline = CREATED + lead;
        let now = CREATED + offset;
        let mut oracle = oracle_with(10, 10);
        create(&mut oracle, deadline);

        let result = propose(&mut oracle, now);
        if now > deadline {
            prop_assert!(result.is_ok());
        } else {
            let not_open = matches!(result, Err(OracleError::WindowNotOpen { .. }));
            prop_assert!(not_open);
        }
    }

    /// A dispute is accepted through `proposed_at + dispute_window`, and an
    /// undisputed proposal finalizes only after that second.
    #[test]
    fn dispute_and_finalize_are_complementary(window in 1u64..500, delay in 0u64..1_000) {
        let deadline = CREATED + 10;
        let proposed_at = deadline + 1;
        let now = proposed_at + delay;

        let mut disputed = oracle_with(window, window);
        create(&mut disputed, deadline);
        propose(&mut disputed, proposed_at).unwrap();
        let dispute = disputed.dispute(
            &EventId::new("e"),
            &"d".into(),
            "r",
            Timestamp::new(now),
        );

        let mut undisputed = oracle_with(window, window);
        create(&mut undisputed, deadline);
        propose(&mut undisputed, proposed_at).unwrap();
        let finalize = undisputed.finalize(&EventId::new("e"), Timestamp::new(now), &"o".into());

        prop_assert_eq!(dispute.is_ok(), delay <= window);
        prop_assert_eq!(finalize.is_ok(), delay > window);
    }
}
