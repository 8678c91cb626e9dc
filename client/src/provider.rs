//! Provider-side submission: quantize → encode → submit.

use crate::error::ClientError;
use oracle_crypto::{CiphertextEncoder, EncryptionKey};
use oracle_engine::{Oracle, SubmissionRequest};
use oracle_quantize::{Quantizer, QuantizerConfig};
use oracle_store::{OracleStore, SubmissionRecord};
use oracle_types::{EventId, Principal, Timestamp, ValueKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A submission ready to hand to the oracle, with the value it will store.
#[derive(Clone, Debug)]
pub struct PreparedSubmission {
    pub request: SubmissionRequest,
    pub quantized_value: i64,
}

/// One item of a batch submission, as read from a batch file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub event_id: EventId,
    pub value_kind: ValueKind,
    pub raw_value: f64,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub event_id: EventId,
    pub result: Result<SubmissionRecord, ClientError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Submits observations on behalf of one provider.
///
/// The quantizer configuration must match the oracle's, or the stored value
/// will differ from the one sealed in the ciphertext.
pub struct ProviderClient<E: CiphertextEncoder> {
    provider: Principal,
    quantizer: Quantizer,
    encoder: E,
    key: EncryptionKey,
}

impl<E: CiphertextEncoder> ProviderClient<E> {
    pub fn new(
        provider: impl Into<Principal>,
        key: EncryptionKey,
        encoder: E,
        quantizer: QuantizerConfig,
    ) -> Self {
        Self {
            provider: provider.into(),
            quantizer: Quantizer::new(quantizer),
            encoder,
            key,
        }
    }

    /// A client whose quantizer is taken from `oracle`'s configuration.
    pub fn for_oracle<S: OracleStore>(
        provider: impl Into<Principal>,
        key: EncryptionKey,
        encoder: E,
        oracle: &Oracle<S>,
    ) -> Self {
        Self::new(provider, key, encoder, oracle.quantizer_config().clone())
    }

    pub fn provider(&self) -> &Principal {
        &self.provider
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Quantize `raw_value` and seal the quantized integer to the aggregator key.
    pub fn prepare(
        &self,
        event_id: &EventId,
        value_kind: ValueKind,
        raw_value: f64,
    ) -> Result<PreparedSubmission, ClientError> {
        let quantized_value = self.quantizer.quantize(value_kind, raw_value)?;
        let ciphertext = self.encoder.encode(quantized_value, &self.key)?;
        debug!(
            event = %event_id,
            kind = %value_kind,
            quantized = quantized_value,
            bytes = ciphertext.len(),
            "submission prepared"
        );
        Ok(PreparedSubmission {
            request: SubmissionRequest {
                event_id: event_id.clone(),
                provider: self.provider.clone(),
                value_kind,
                raw_value,
                ciphertext,
            },
            quantized_value,
        })
    }

    pub fn submit<S: OracleStore>(
        &self,
        oracle: &mut Oracle<S>,
        event_id: &EventId,
        value_kind: ValueKind,
        raw_value: f64,
        now: Timestamp,
    ) -> Result<SubmissionRecord, ClientError> {
        if oracle.quantizer_config() != self.quantizer.config() {
            warn!(event = %event_id, "client quantizer differs from oracle configuration");
        }
        let prepared = self.prepare(event_id, value_kind, raw_value)?;
        Ok(oracle.submit(prepared.request, now)?)
    }

    /// Submit every item in order, continuing past failures.
    pub fn submit_batch<S: OracleStore>(
        &self,
        oracle: &mut Oracle<S>,
        items: &[BatchItem],
        now: Timestamp,
    ) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = items
            .iter()
            .map(|item| BatchOutcome {
                event_id: item.event_id.clone(),
                result: self.submit(oracle, &item.event_id, item.value_kind, item.raw_value, now),
            })
            .collect();
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        debug!(total = outcomes.len(), failed, "batch submitted");
        outcomes
    }
}
