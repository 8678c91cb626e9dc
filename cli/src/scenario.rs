//! Scripted lifecycle replay against an in-memory oracle.
//!
//! A scenario is a TOML file: an optional `[oracle]` table (same shape as
//! the config file) and an ordered list of `[[step]]` tables, each with an
//! `op`, the time `at` which it runs, and an optional `expect` (`"ok"` or a
//! rejection reason code).
//!
//! ```toml
//! [[step]]
//! op = "create"
//! at = 0
//! event = "e1"
//! deadline = 86400
//!
//! [[step]]
//! op = "submit"
//! at = 10
//! event = "e1"
//! provider = "p1"
//! kind = "percent"
//! value = 65.5
//! ```

use oracle_aggregation::{AggregationError, Aggregator, Observation, ResultMapping, StrategyKind};
use oracle_client::{ClientError, ProviderClient};
use oracle_crypto::{open_sealed, DecryptionKey, EncodeError};
use oracle_engine::{Oracle, OracleConfig, OracleError};
use oracle_nullables::{NullClock, NullEncoder, NullStore};
use oracle_quantize::Quantizer;
use oracle_store::EventDescriptor;
use oracle_types::{ErrorKind, EventId, Principal, ResultHash, Timestamp, ValueKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("step {index} runs at {at}, before the previous step at {previous}")]
    TimeTravel { index: usize, at: u64, previous: u64 },

    #[error("scenario has its own [oracle] table; it cannot also take a config file")]
    ConfigConflict,
}

/// Why a single step was refused.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("cannot open submission: {0}")]
    Open(#[from] EncodeError),

    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("cannot aggregate {first} and {other} submissions together")]
    MixedKinds { first: ValueKind, other: ValueKind },
}

impl StepError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Oracle(e) => e.reason(),
            Self::Client(e) => e.reason(),
            Self::Open(_) => "open_failed",
            Self::Aggregation(_) => "aggregation_failed",
            Self::MixedKinds { .. } => "mixed_value_kinds",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Oracle(e) => e.kind(),
            Self::Client(e) => e.kind(),
            Self::Open(_) | Self::Aggregation(_) | Self::MixedKinds { .. } => {
                ErrorKind::Validation
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Seed of the aggregator key providers seal their values to.
    #[serde(default)]
    pub key_seed: u8,

    /// Oracle configuration; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle: Option<OracleConfig>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    pub at: u64,
    /// `"ok"` or the reason code the step must fail with.
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Create {
        event: String,
        deadline: u64,
        #[serde(default = "default_principal")]
        caller: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        threshold: Option<i64>,
    },
    Submit {
        event: String,
        provider: String,
        kind: ValueKind,
        value: f64,
    },
    /// Propose `value` as given, or aggregate the event's sealed submissions
    /// with `strategy` when `value` is omitted.
    Propose {
        event: String,
        #[serde(default = "default_principal")]
        proposer: String,
        #[serde(default)]
        value: Option<u64>,
        #[serde(default)]
        strategy: StrategyKind,
    },
    Dispute {
        event: String,
        disputer: String,
        #[serde(default)]
        reason: String,
    },
    Vote {
        event: String,
        voter: String,
        agree: bool,
    },
    Finalize {
        event: String,
        #[serde(default = "default_principal")]
        caller: String,
    },
}

fn default_principal() -> String {
    "owner".to_string()
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Submit { .. } => "submit",
            Self::Propose { .. } => "propose",
            Self::Dispute { .. } => "dispute",
            Self::Vote { .. } => "vote",
            Self::Finalize { .. } => "finalize",
        }
    }
}

/// What replaying a scenario produced.
#[derive(Debug, Default)]
pub struct SimulationReport {
    /// One JSON object per emitted event or rejection, in order.
    pub lines: Vec<Value>,
    pub accepted: usize,
    pub rejected: usize,
    /// Steps whose outcome differed from their `expect`.
    pub mismatches: Vec<String>,
    /// Seconds between the first and the last step.
    pub elapsed_secs: u64,
}

impl Scenario {
    pub fn from_toml_file(path: &str) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(s)?)
    }

    /// Run against `config` instead of the defaults.
    ///
    /// Fails if the scenario already carries an `[oracle]` table.
    pub fn with_config(mut self, config: OracleConfig) -> Result<Self, ScenarioError> {
        if self.oracle.is_some() {
            return Err(ScenarioError::ConfigConflict);
        }
        self.oracle = Some(config);
        Ok(self)
    }

    /// Replay every step in order. Steps must not go back in time.
    pub fn run(&self) -> Result<SimulationReport, ScenarioError> {
        let key = DecryptionKey::from_bytes([self.key_seed; 32]);
        let clock = NullClock::starting_at(self.steps.first().map_or(0, |s| s.at));
        let config = self.oracle.clone().unwrap_or_default();
        let mut oracle = Oracle::new(NullStore::new(), &config);
        let mut report = SimulationReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            clock
                .advance_to(step.at)
                .map_err(|previous| ScenarioError::TimeTravel {
                    index,
                    at: step.at,
                    previous: previous.as_secs(),
                })?;

            let journal_len = oracle.journal().len();
            let outcome = apply(&mut oracle, &key, index, &step.action, &clock);
            let reason = match &outcome {
                Ok(()) => {
                    report.accepted += 1;
                    for event in &oracle.journal()[journal_len..] {
                        report
                            .lines
                            .push(serde_json::to_value(event).unwrap_or(Value::Null));
                    }
                    "ok"
                }
                Err(err) => {
                    report.rejected += 1;
                    report.lines.push(json!({
                        "type": "rejected",
                        "step": index,
                        "op": step.action.name(),
                        "reason": err.reason(),
                        "kind": err.kind().as_str(),
                        "error": err.to_string(),
                    }));
                    err.reason()
                }
            };
            debug!(step = index, op = step.action.name(), reason, "step replayed");

            if let Some(expected) = &step.expect {
                if expected != reason {
                    report.mismatches.push(format!(
                        "step {index} ({}): expected {expected}, got {reason}",
                        step.action.name()
                    ));
                }
            }
        }
        report.elapsed_secs = clock.now().as_secs().saturating_sub(
            self.steps.first().map_or(0, |s| s.at),
        );
        info!(
            accepted = report.accepted,
            rejected = report.rejected,
            mismatches = report.mismatches.len(),
            "scenario complete"
        );
        Ok(report)
    }
}

fn apply(
    oracle: &mut Oracle<NullStore>,
    key: &DecryptionKey,
    index: usize,
    action: &Action,
    clock: &NullClock,
) -> Result<(), StepError> {
    let now = clock.now();
    match action {
        Action::Create {
            event,
            deadline,
            caller,
            description,
            threshold,
        } => {
            let mut descriptor = EventDescriptor::new(description.as_str());
            if let Some(t) = threshold {
                descriptor = descriptor.with_threshold(*t);
            }
            oracle.create_event(
                EventId::new(event.as_str()),
                descriptor,
                Timestamp::new(*deadline),
                now,
                &Principal::new(caller.as_str()),
            )?;
        }
        Action::Submit {
            event,
            provider,
            kind,
            value,
        } => {
            let client = ProviderClient::for_oracle(
                provider.as_str(),
                key.public_key(),
                NullEncoder::new(index as u64),
                oracle,
            );
            client.submit(oracle, &EventId::new(event.as_str()), *kind, *value, now)?;
        }
        Action::Propose {
            event,
            proposer,
            value,
            strategy,
        } => {
            let id = EventId::new(event.as_str());
            let (value, hash) = match value {
                Some(v) => (*v, ResultHash::ZERO),
                None => aggregate(oracle, key, &id, *strategy)?,
            };
            oracle.propose(&id, &Principal::new(proposer.as_str()), value, hash, now)?;
        }
        Action::Dispute {
            event,
            disputer,
            reason,
        } => {
            oracle.dispute(
                &EventId::new(event.as_str()),
                &Principal::new(disputer.as_str()),
                reason,
                now,
            )?;
        }
        Action::Vote {
            event,
            voter,
            agree,
        } => {
            oracle.vote(
                &EventId::new(event.as_str()),
                &Principal::new(voter.as_str()),
                *agree,
                now,
            )?;
        }
        Action::Finalize { event, caller } => {
            oracle.finalize(
                &EventId::new(event.as_str()),
                now,
                &Principal::new(caller.as_str()),
            )?;
        }
    }
    Ok(())
}

/// Open the event's submissions and aggregate them the way a proposer would.
///
/// Events with a threshold map to a binary result; others scale the
/// aggregate onto the result range, so all submissions must share a kind.
fn aggregate(
    oracle: &Oracle<NullStore>,
    key: &DecryptionKey,
    id: &EventId,
    strategy: StrategyKind,
) -> Result<(u64, ResultHash), StepError> {
    let event = oracle.get_event(id)?;
    let submissions = oracle.submissions(id)?;
    let mut observations = Vec::with_capacity(submissions.len());
    for s in &submissions {
        observations.push(Observation::new(
            s.provider.clone(),
            open_sealed(&s.ciphertext, key)?,
        ));
    }

    if let Some(first) = submissions.first() {
        if let Some(other) = submissions.iter().find(|s| s.value_kind != first.value_kind) {
            return Err(StepError::MixedKinds {
                first: first.value_kind,
                other: other.value_kind,
            });
        }
    }

    let mapping = match (event.descriptor.threshold, submissions.first()) {
        (Some(threshold), _) => ResultMapping::Threshold { threshold },
        (None, Some(first)) => ResultMapping::Scaled {
            full_scale: Quantizer::new(oracle.quantizer_config().clone())
                .full_scale(first.value_kind),
        },
        (None, None) => ResultMapping::Scaled { full_scale: 1 },
    };
    let report = Aggregator::from_kind(strategy, mapping, oracle.params().clone())
        .run(id, &observations)?;
    Ok((report.result_value, report.result_hash))
}
