//! Off-chain aggregation for oracle proposals.
//!
//! A proposer decrypts the sealed submissions of an event, reduces them with
//! an [`AggregationStrategy`], maps the aggregate onto the bounded proposal
//! value and commits to the whole computation. The oracle core only ever sees
//! the resulting `(result_value, result_hash)` pair.

pub mod error;
pub mod mapping;
pub mod report;
pub mod strategy;

pub use error::AggregationError;
pub use mapping::ResultMapping;
pub use report::{result_commitment, AggregateReport, Aggregator, COMMITMENT_TAG};
pub use strategy::{AggregationStrategy, Mean, Median, Observation, StrategyKind, WeightedMean};
