//! Submission ledger: one quantized, encrypted observation per provider per event.

use crate::error::OracleError;
use crate::registry::load_event;
use oracle_quantize::Quantizer;
use oracle_store::{OracleStore, SubmissionRecord, SubmissionStore, WriteBatch};
use oracle_types::{Ciphertext, EventId, Principal, Timestamp, ValueKind};
use tracing::info;

/// A provider's raw observation and its encrypted form.
#[derive(Clone, Debug)]
pub struct SubmissionRequest {
    pub event_id: EventId,
    pub provider: Principal,
    pub value_kind: ValueKind,
    pub raw_value: f64,
    pub ciphertext: Ciphertext,
}

pub struct SubmissionLedger {
    quantizer: Quantizer,
}

impl SubmissionLedger {
    pub fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Record a submission. Returns the record and the event's submission count
    /// including it.
    pub fn submit<S: OracleStore + ?Sized>(
        &self,
        store: &S,
        request: SubmissionRequest,
        now: Timestamp,
    ) -> Result<(SubmissionRecord, u64), OracleError> {
        let event = load_event(store, &request.event_id)?;
        if now > event.deadline {
            return Err(OracleError::WindowClosed {
                event: event.id,
                deadline: event.deadline,
            });
        }
        if store
            .get_submission(&request.event_id, &request.provider)?
            .is_some()
        {
            return Err(OracleError::DuplicateSubmission {
                event: request.event_id,
                provider: request.provider,
            });
        }
        let quantized_value = self
            .quantizer
            .quantize(request.value_kind, request.raw_value)?;

        let count = store.submission_count(&request.event_id)? + 1;
        let record = SubmissionRecord {
            event_id: request.event_id,
            provider: request.provider,
            value_kind: request.value_kind,
            quantized_value,
            ciphertext: request.ciphertext,
            submitted_at: now,
        };
        let mut batch = WriteBatch::new();
        batch.insert_submission(record.clone());
        store.commit(batch)?;

        info!(
            kind = %record.value_kind,
            quantized = record.quantized_value,
            count,
            "submission recorded"
        );
        Ok((record, count))
    }

    pub fn count<S: SubmissionStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
    ) -> Result<u64, OracleError> {
        Ok(store.submission_count(event)?)
    }

    pub fn get<S: SubmissionStore + ?Sized>(
        &self,
        store: &S,
        event: &EventId,
        provider: &Principal,
    ) -> Result<Option<SubmissionRecord>, OracleError> {
        Ok(store.get_submission(event, provider)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RolePolicy;
    use crate::registry::{EventRegistry, NewEvent};
    use oracle_nullables::NullStore;
    use oracle_quantize::QuantizeError;
    use oracle_store::EventDescriptor;

    fn setup() -> (NullStore, SubmissionLedger) {
        let store = NullStore::new();
        EventRegistry
            .create(
                &store,
                &RolePolicy::open(),
                NewEvent {
                    id: EventId::new("e1"),
                    descriptor: EventDescriptor::new("turnout above 60%"),
                    deadline: Timestamp::new(1_000),
                },
                Timestamp::new(0),
                &Principal::new("owner"),
            )
            .unwrap();
        (store, SubmissionLedger::new(Quantizer::default()))
    }

    fn request(provider: &str, raw: f64) -> SubmissionRequest {
        SubmissionRequest {
            event_id: EventId::new("e1"),
            provider: Principal::new(provider),
            value_kind: ValueKind::Percent,
            raw_value: raw,
            ciphertext: Ciphertext::new(vec![0xAA; 8]),
        }
    }

    #[test]
    fn records_quantized_value() {
        let (store, ledger) = setup();
        let (record, count) = ledger
            .submit(&store, request("p1", 65.5), Timestamp::new(10))
            .unwrap();
        assert_eq!(record.quantized_value, 6550);
        assert_eq!(count, 1);
        assert_eq!(
            ledger
                .get(&store, &EventId::new("e1"), &Principal::new("p1"))
                .unwrap(),
            Some(record)
        );
    }

    #[test]
    fn deadline_second_is_inclusive() {
        let (store, ledger) = setup();
        assert!(ledger
            .submit(&store, request("p1", 50.0), Timestamp::new(1_000))
            .is_ok());
        let err = ledger
            .submit(&store, request("p2", 50.0), Timestamp::new(1_001))
            .unwrap_err();
        assert!(matches!(err, OracleError::WindowClosed { .. }));
    }

    #[test]
    fn one_submission_per_provider() {
        let (store, ledger) = setup();
        ledger
            .submit(&store, request("p1", 50.0), Timestamp::new(10))
            .unwrap();
        let err = ledger
            .submit(&store, request("p1", 70.0), Timestamp::new(11))
            .unwrap_err();
        assert!(matches!(err, OracleError::DuplicateSubmission { .. }));
        ledger
            .submit(&store, request("p2", 70.0), Timestamp::new(12))
            .unwrap();
        assert_eq!(ledger.count(&store, &EventId::new("e1")).unwrap(), 2);
    }

    #[test]
    fn invalid_value_leaves_no_trace() {
        let (store, ledger) = setup();
        let err = ledger
            .submit(&store, request("p1", 101.0), Timestamp::new(10))
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::InvalidValue(QuantizeError::OutOfRange { .. })
        ));
        let err = ledger
            .submit(&store, request("p1", 100.0), Timestamp::new(10))
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::InvalidValue(QuantizeError::Extreme { .. })
        ));
        assert_eq!(ledger.count(&store, &EventId::new("e1")).unwrap(), 0);
    }

    #[test]
    fn unknown_event() {
        let (store, ledger) = setup();
        let mut req = request("p1", 50.0);
        req.event_id = EventId::new("e2");
        assert!(matches!(
            ledger.submit(&store, req, Timestamp::new(10)),
            Err(OracleError::NotFound(_))
        ));
    }

    #[test]
    fn window_checked_before_duplicate_and_value() {
        let (store, ledger) = setup();
        ledger
            .submit(&store, request("p1", 50.0), Timestamp::new(10))
            .unwrap();
        let err = ledger
            .submit(&store, request("p1", f64::NAN), Timestamp::new(2_000))
            .unwrap_err();
        assert!(matches!(err, OracleError::WindowClosed { .. }));
        let err = ledger
            .submit(&store, request("p1", f64::NAN), Timestamp::new(20))
            .unwrap_err();
        assert!(matches!(err, OracleError::DuplicateSubmission { .. }));
    }
}
