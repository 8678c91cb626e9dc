//! The encryption adapter boundary for provider submissions.
//!
//! The oracle core only ever sees the output of [`CiphertextEncoder::encode`]
//! as an opaque [`Ciphertext`]. [`SealedEncoder`] is the reference adapter:
//! an anonymous sealed envelope to the aggregator's X25519 key.
//!
//! Wire layout of a sealed submission:
//!
//! ```text
//! ephemeral_public (32) ‖ ChaCha20-Poly1305( i64 little-endian (8) ) ‖ tag (16)
//! ```
//!
//! The symmetric key is `blake2b(dh(ephemeral, recipient) ‖ "oracle-sealed-submission")`
//! and the nonce is the first 12 bytes of the ephemeral public key, which is
//! fresh for every envelope.

use std::fmt;
use std::str::FromStr;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use oracle_types::Ciphertext;
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

const KDF_CONTEXT: &[u8] = b"oracle-sealed-submission";

/// Total length of a sealed submission in bytes.
pub const SEALED_LEN: usize = 32 + 8 + 16;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    #[error("cipher failure")]
    Cipher,

    #[error("sealed submission must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("authentication failed: wrong key or tampered ciphertext")]
    Authentication,
}

/// Public key material submissions are encoded to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey({})", self.to_hex())
    }
}

impl FromStr for EncryptionKey {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_hex(s).map(Self)
    }
}

fn parse_key_hex(s: &str) -> Result<[u8; 32], EncodeError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| EncodeError::InvalidKey(e.to_string()))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        EncodeError::InvalidKey(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// The aggregator's secret half. Zeroized on drop.
///
/// Parses from the same hex form [`DecryptionKey::to_hex`] writes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DecryptionKey([u8; 32]);

impl DecryptionKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh key from the operating system's entropy source.
    pub fn generate() -> Result<Self, EncodeError> {
        Ok(Self(random_bytes()?))
    }

    /// Hex of the secret bytes, for writing to a key file.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn secret_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn public_key(&self) -> EncryptionKey {
        let secret = StaticSecret::from(self.0);
        EncryptionKey(X25519Public::from(&secret).to_bytes())
    }
}

impl FromStr for DecryptionKey {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_hex(s).map(Self)
    }
}

impl fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecryptionKey(..)")
    }
}

/// `encode(plainInteger, publicKeyMaterial) -> ciphertext`.
pub trait CiphertextEncoder {
    fn encode(&self, plain: i64, key: &EncryptionKey) -> Result<Ciphertext, EncodeError>;
}

/// Reference adapter: a fresh ephemeral X25519 key per envelope.
#[derive(Clone, Copy, Debug, Default)]
pub struct SealedEncoder;

impl SealedEncoder {
    /// Seal with a caller-chosen ephemeral secret. Reusing an ephemeral secret
    /// for two envelopes to the same recipient reuses the nonce.
    pub fn seal_with_ephemeral(
        plain: i64,
        key: &EncryptionKey,
        ephemeral: [u8; 32],
    ) -> Result<Ciphertext, EncodeError> {
        let secret = StaticSecret::from(ephemeral);
        let ephemeral_pub = X25519Public::from(&secret);
        let shared = secret.diffie_hellman(&X25519Public::from(key.0));

        let cipher = cipher_for(shared.as_bytes())?;
        let nonce = nonce_for(ephemeral_pub.as_bytes());
        let sealed = cipher
            .encrypt(&nonce, plain.to_le_bytes().as_ref())
            .map_err(|_| EncodeError::Cipher)?;

        let mut out = Vec::with_capacity(SEALED_LEN);
        out.extend_from_slice(ephemeral_pub.as_bytes());
        out.extend_from_slice(&sealed);
        Ok(Ciphertext::new(out))
    }
}

impl CiphertextEncoder for SealedEncoder {
    fn encode(&self, plain: i64, key: &EncryptionKey) -> Result<Ciphertext, EncodeError> {
        Self::seal_with_ephemeral(plain, key, random_bytes()?)
    }
}

/// Open a sealed submission. Used off-chain by the aggregator only.
pub fn open_sealed(ciphertext: &Ciphertext, key: &DecryptionKey) -> Result<i64, EncodeError> {
    let bytes = ciphertext.as_bytes();
    if bytes.len() != SEALED_LEN {
        return Err(EncodeError::Length {
            expected: SEALED_LEN,
            actual: bytes.len(),
        });
    }
    let (ephemeral, sealed) = bytes.split_at(32);
    let mut ephemeral_bytes = [0u8; 32];
    ephemeral_bytes.copy_from_slice(ephemeral);

    let secret = StaticSecret::from(key.0);
    let shared = secret.diffie_hellman(&X25519Public::from(ephemeral_bytes));

    let cipher = cipher_for(shared.as_bytes())?;
    let nonce = nonce_for(&ephemeral_bytes);
    let plain = cipher
        .decrypt(&nonce, sealed)
        .map_err(|_| EncodeError::Authentication)?;

    let plain: [u8; 8] = plain
        .as_slice()
        .try_into()
        .map_err(|_| EncodeError::Authentication)?;
    Ok(i64::from_le_bytes(plain))
}

fn cipher_for(shared: &[u8; 32]) -> Result<ChaCha20Poly1305, EncodeError> {
    let sym_key = crate::hash::blake2b_256_multi(&[shared, KDF_CONTEXT]);
    ChaCha20Poly1305::new_from_slice(&sym_key).map_err(|_| EncodeError::Cipher)
}

fn nonce_for(ephemeral_pub: &[u8; 32]) -> Nonce {
    let mut nonce_bytes = [0u8; 12];
    nonce_bytes.copy_from_slice(&ephemeral_pub[..12]);
    Nonce::from(nonce_bytes)
}

fn random_bytes() -> Result<[u8; 32], EncodeError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| EncodeError::Entropy(e.to_string()))?;
    Ok(bytes)
}
