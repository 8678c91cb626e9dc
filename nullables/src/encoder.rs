//! Nullable encryption adapter.

use oracle_crypto::{
    blake2b_256_multi, CiphertextEncoder, EncodeError, EncryptionKey, SealedEncoder,
};
use oracle_types::Ciphertext;
use std::sync::atomic::{AtomicU64, Ordering};

/// A [`CiphertextEncoder`] whose envelopes are reproducible run to run.
///
/// Ephemeral secrets are derived from a seed and a call counter, so output is
/// a valid sealed envelope (openable with `open_sealed`) but deterministic.
pub struct NullEncoder {
    seed: u64,
    calls: AtomicU64,
    fail: bool,
}

impl NullEncoder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            calls: AtomicU64::new(0),
            fail: false,
        }
    }

    /// An encoder that refuses every call, for exercising adapter failures.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0)
        }
    }

    /// Number of `encode` calls so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullEncoder {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CiphertextEncoder for NullEncoder {
    fn encode(&self, plain: i64, key: &EncryptionKey) -> Result<Ciphertext, EncodeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EncodeError::Cipher);
        }
        let ephemeral = blake2b_256_multi(&[
            b"null-encoder",
            &self.seed.to_le_bytes(),
            &n.to_le_bytes(),
        ]);
        SealedEncoder::seal_with_ephemeral(plain, key, ephemeral)
    }
}
