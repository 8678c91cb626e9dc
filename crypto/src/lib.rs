//! Cryptographic primitives for the oracle.
//!
//! - **Blake2b-256** for result commitments and key derivation
//! - **X25519 + ChaCha20-Poly1305** for the reference sealed-submission
//!   encoder, the one concrete implementation of [`CiphertextEncoder`]
//! - **k-of-n key splitting** so no single holder can open submissions
//!
//! The oracle core stores ciphertexts as opaque bytes and never calls into
//! the decrypting half of this crate.

pub mod encryption;
pub mod hash;
pub mod threshold;

pub use encryption::{
    open_sealed, CiphertextEncoder, DecryptionKey, EncodeError, EncryptionKey, SealedEncoder,
    SEALED_LEN,
};
pub use hash::{blake2b_256, blake2b_256_multi, commit, Commitment};
pub use threshold::{
    recover_key, split_key, KeyShare, KeySplit, ShareCommitments, ShareError, ThresholdParams,
};
