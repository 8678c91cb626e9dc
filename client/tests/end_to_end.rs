//! Providers seal observations, the aggregator opens and aggregates them
//! off-chain, and the oracle carries the committed result to finalization.

use oracle_aggregation::{Aggregator, Median, Observation, ResultMapping};
use oracle_client::{ClientError, ProviderClient};
use oracle_crypto::{open_sealed, DecryptionKey, SealedEncoder};
use oracle_engine::Oracle;
use oracle_nullables::{NullEncoder, NullStore};
use oracle_quantize::Quantizer;
use oracle_store::EventDescriptor;
use oracle_types::{EventId, FinalOutcome, Principal, Timestamp, ValueKind};

const DAY: u64 = 86_400;

fn open_oracle() -> Oracle<NullStore> {
    let mut oracle = Oracle::with_defaults(NullStore::new());
    oracle
        .create_event(
            EventId::new("e1"),
            EventDescriptor::new("Probability of rain tomorrow").with_threshold(5_000),
            Timestamp::new(DAY),
            Timestamp::new(0),
            &Principal::new("owner"),
        )
        .unwrap();
    oracle
}

fn observations_from(oracle: &Oracle<NullStore>, key: &DecryptionKey) -> Vec<Observation> {
    oracle
        .submissions(&EventId::new("e1"))
        .unwrap()
        .into_iter()
        .map(|s| Observation::new(s.provider, open_sealed(&s.ciphertext, key).unwrap()))
        .collect()
}

#[test]
fn sealed_submissions_aggregate_to_the_proposed_result() {
    let aggregator_key = DecryptionKey::from_bytes([3; 32]);
    let mut oracle = open_oracle();
    let e1 = EventId::new("e1");

    for (i, (provider, raw)) in [("p1", 65.5), ("p2", 58.2), ("p3", 62.1)].into_iter().enumerate() {
        let client = ProviderClient::for_oracle(
            provider,
            aggregator_key.public_key(),
            NullEncoder::new(i as u64),
            &oracle,
        );
        client
            .submit(&mut oracle, &e1, ValueKind::Percent, raw, Timestamp::new(100))
            .unwrap();
    }

    // Every stored ciphertext opens to the value the oracle recorded.
    for s in oracle.submissions(&e1).unwrap() {
        assert_eq!(open_sealed(&s.ciphertext, &aggregator_key).unwrap(), s.quantized_value);
    }

    let observations = observations_from(&oracle, &aggregator_key);
    let full_scale = Quantizer::new(oracle.quantizer_config().clone()).full_scale(ValueKind::Percent);
    let report = Aggregator::new(
        Median,
        ResultMapping::Scaled { full_scale },
        oracle.params().clone(),
    )
    .run(&e1, &observations)
    .unwrap();
    assert_eq!(report.aggregate, 6210);
    assert_eq!(report.result_value, 62);

    let proposal = oracle
        .propose(
            &e1,
            &Principal::new("aggregator"),
            report.result_value,
            report.result_hash,
            Timestamp::new(DAY + 1),
        )
        .unwrap();
    assert!(report.matches(&observations));

    let end = Timestamp::new(DAY + 1 + oracle.params().dispute_window_secs + 1);
    let done = oracle.finalize(&e1, end, &Principal::new("anyone")).unwrap();
    assert_eq!(done.outcome, FinalOutcome::Resolved { value: 62 });
    assert_eq!(oracle.get_proposal(&e1).unwrap(), Some(proposal));
}

#[test]
fn threshold_mapping_yields_binary_result() {
    let aggregator_key = DecryptionKey::from_bytes([5; 32]);
    let mut oracle = open_oracle();
    let e1 = EventId::new("e1");
    for (provider, raw) in [("p1", 40.0), ("p2", 55.0), ("p3", 70.0)] {
        ProviderClient::for_oracle(provider, aggregator_key.public_key(), SealedEncoder, &oracle)
            .submit(&mut oracle, &e1, ValueKind::Percent, raw, Timestamp::new(10))
            .unwrap();
    }

    let threshold = oracle
        .get_event(&e1)
        .unwrap()
        .descriptor
        .threshold
        .unwrap();
    let report = Aggregator::new(
        Median,
        ResultMapping::Threshold { threshold },
        oracle.params().clone(),
    )
    .run(&e1, &observations_from(&oracle, &aggregator_key))
    .unwrap();
    assert_eq!(report.aggregate, 5_500);
    assert_eq!(report.result_value, 100);
}

#[test]
fn late_submission_is_rejected_with_reason() {
    let key = DecryptionKey::from_bytes([9; 32]);
    let mut oracle = open_oracle();
    let client = ProviderClient::for_oracle("late", key.public_key(), NullEncoder::new(0), &oracle);
    let err = client
        .submit(&mut oracle, &EventId::new("e1"), ValueKind::Percent, 50.0, Timestamp::new(DAY + 1))
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(err.reason(), "window_closed");
}
