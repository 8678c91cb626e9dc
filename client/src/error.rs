use oracle_crypto::EncodeError;
use oracle_engine::OracleError;
use oracle_quantize::QuantizeError;
use oracle_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("quantization failed: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("encryption failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("oracle rejected submission: {0}")]
    Rejected(#[from] OracleError),
}

impl ClientError {
    /// Stable code: the oracle's reason for rejections, else the local stage.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Quantize(_) => "invalid_value",
            Self::Encode(_) => "encode_failed",
            Self::Rejected(e) => e.reason(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Quantize(_) | Self::Encode(_) => ErrorKind::Validation,
            Self::Rejected(e) => e.kind(),
        }
    }
}
