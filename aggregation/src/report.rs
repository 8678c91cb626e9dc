//! Running a strategy end to end and committing to its inputs.

use crate::error::AggregationError;
use crate::mapping::ResultMapping;
use crate::strategy::{AggregationStrategy, Observation, StrategyKind};
use oracle_crypto::Commitment;
use oracle_types::{EventId, OracleParams, ResultHash};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Domain tag of the aggregate commitment.
pub const COMMITMENT_TAG: &[u8] = b"oracle-aggregate-v1";

/// Everything a proposer needs to call `propose`, plus what an auditor
/// needs to check it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub event_id: EventId,
    pub strategy: String,
    pub mapping: ResultMapping,
    pub observations: usize,
    pub aggregate: i64,
    pub result_value: u64,
    pub result_hash: ResultHash,
}

pub struct Aggregator {
    strategy: Box<dyn AggregationStrategy + Send + Sync>,
    mapping: ResultMapping,
    params: OracleParams,
}

impl Aggregator {
    pub fn new(
        strategy: impl AggregationStrategy + Send + Sync + 'static,
        mapping: ResultMapping,
        params: OracleParams,
    ) -> Self {
        Self {
            strategy: Box::new(strategy),
            mapping,
            params,
        }
    }

    pub fn from_kind(kind: StrategyKind, mapping: ResultMapping, params: OracleParams) -> Self {
        Self {
            strategy: kind.boxed(),
            mapping,
            params,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn run(
        &self,
        event_id: &EventId,
        observations: &[Observation],
    ) -> Result<AggregateReport, AggregationError> {
        let aggregate = self.strategy.aggregate(observations)?;
        let result_value = self.mapping.apply(aggregate, &self.params)?;
        let result_hash = result_commitment(
            event_id,
            self.strategy.name(),
            &self.mapping,
            observations,
            aggregate,
            result_value,
        );
        debug!(
            event = %event_id,
            strategy = self.strategy.name(),
            observations = observations.len(),
            aggregate,
            result_value,
            "aggregate computed"
        );
        Ok(AggregateReport {
            event_id: event_id.clone(),
            strategy: self.strategy.name().to_string(),
            mapping: self.mapping,
            observations: observations.len(),
            aggregate,
            result_value,
            result_hash,
        })
    }
}

impl AggregateReport {
    /// Recompute the commitment from `observations` and compare.
    pub fn matches(&self, observations: &[Observation]) -> bool {
        observations.len() == self.observations
            && result_commitment(
                &self.event_id,
                &self.strategy,
                &self.mapping,
                observations,
                self.aggregate,
                self.result_value,
            ) == self.result_hash
    }
}

/// Blake2b commitment over the event, the computation and its inputs.
///
/// Observations are sorted first, so the hash does not depend on the order
/// they were collected in. Variable-length fields are length-prefixed.
pub fn result_commitment(
    event_id: &EventId,
    strategy: &str,
    mapping: &ResultMapping,
    observations: &[Observation],
    aggregate: i64,
    result_value: u64,
) -> ResultHash {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.provider, a.value, a.weight).cmp(&(&b.provider, b.value, b.weight))
    });

    let mut c = Commitment::new(COMMITMENT_TAG)
        .str(event_id.as_str())
        .str(strategy)
        .str(&mapping.describe())
        .u32(sorted.len() as u32);
    for o in sorted {
        c = c.str(o.provider.as_str()).i64(o.value).u32(o.weight);
    }
    c.i64(aggregate).u64(result_value).finish()
}
