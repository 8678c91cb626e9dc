use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("no observations to aggregate")]
    NoObservations,

    #[error("observation weights sum to zero")]
    ZeroWeight,

    #[error("mapped result {value} is outside [{min}, {max}]")]
    OutOfBounds { value: i128, min: u64, max: u64 },

    #[error("aggregate {0} does not fit in 64 bits")]
    Overflow(i128),

    #[error("invalid full scale: {0}")]
    InvalidScale(i64),
}
