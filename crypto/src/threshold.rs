//! k-of-n splitting of the aggregator's [`DecryptionKey`].
//!
//! Each of the 32 key bytes is shared with Shamir's scheme over GF(2^8), so
//! any `threshold` holders can rebuild the key and fewer learn nothing about
//! it. A split publishes one Blake2b commitment per share, bound to the key's
//! public half; a holder who hands in an altered share is caught before
//! Lagrange recovery runs.

use crate::encryption::{DecryptionKey, EncryptionKey};
use crate::hash::Commitment;
use oracle_types::ResultHash;
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

const SHARE_TAG: &[u8] = b"oracle-key-share-v1";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("{threshold}-of-{shares} is not a valid split; need 2 <= k <= n <= 255")]
    InvalidParams { threshold: u8, shares: u8 },

    #[error("need {need} shares to recover the key, got {have}")]
    NotEnoughShares { have: usize, need: u8 },

    #[error("share index {0} supplied twice")]
    DuplicateIndex(u8),

    #[error("share {0} does not belong to this split")]
    UnknownIndex(u8),

    #[error("share {index} does not match its commitment")]
    Corrupted { index: u8 },

    #[error("recovered key does not match the committed public key")]
    Inconsistent,

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

/// `threshold` of `shares` holders are needed to recover a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdParams {
    pub threshold: u8,
    pub shares: u8,
}

impl ThresholdParams {
    pub fn new(threshold: u8, shares: u8) -> Result<Self, ShareError> {
        if threshold < 2 || threshold > shares {
            return Err(ShareError::InvalidParams { threshold, shares });
        }
        Ok(Self { threshold, shares })
    }
}

/// One holder's share. `index` is the nonzero evaluation point.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyShare {
    index: u8,
    bytes: [u8; 32],
}

impl KeyShare {
    pub fn from_parts(index: u8, bytes: [u8; 32]) -> Self {
        Self { index, bytes }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyShare({}, ..)", self.index)
    }
}

/// Public record of a split: safe to hand to every holder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareCommitments {
    public_key: EncryptionKey,
    threshold: u8,
    /// `digests[i - 1]` commits to the share with index `i`.
    digests: Vec<ResultHash>,
}

impl ShareCommitments {
    pub fn public_key(&self) -> &EncryptionKey {
        &self.public_key
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn share_count(&self) -> usize {
        self.digests.len()
    }

    /// Whether `share` is the one dealt for its index.
    pub fn verify(&self, share: &KeyShare) -> bool {
        match self.digest_for(share.index) {
            Some(expected) => share_digest(&self.public_key, share) == *expected,
            None => false,
        }
    }

    fn digest_for(&self, index: u8) -> Option<&ResultHash> {
        usize::from(index)
            .checked_sub(1)
            .and_then(|slot| self.digests.get(slot))
    }
}

pub struct KeySplit {
    pub shares: Vec<KeyShare>,
    pub commitments: ShareCommitments,
}

/// Split `key` into `params.shares` shares with fresh random polynomials.
pub fn split_key(key: &DecryptionKey, params: ThresholdParams) -> Result<KeySplit, ShareError> {
    split_with(key, params, |buf| {
        getrandom::getrandom(buf).map_err(|e| ShareError::Entropy(e.to_string()))
    })
}

fn split_with(
    key: &DecryptionKey,
    params: ThresholdParams,
    fill: impl FnOnce(&mut [u8]) -> Result<(), ShareError>,
) -> Result<KeySplit, ShareError> {
    let ThresholdParams { threshold, shares } =
        ThresholdParams::new(params.threshold, params.shares)?;
    let secret = key.secret_bytes();
    let degree = usize::from(threshold) - 1;

    // Row `d` holds the degree-`d + 1` coefficient for every key byte.
    let mut coefficients = vec![0u8; degree * 32];
    fill(coefficients.as_mut_slice())?;

    let mut dealt = Vec::with_capacity(usize::from(shares));
    for index in 1..=shares {
        let mut bytes = [0u8; 32];
        for (pos, out) in bytes.iter_mut().enumerate() {
            // Horner from the highest coefficient down to the secret byte.
            let mut acc = 0u8;
            for row in (0..degree).rev() {
                acc = gf_mul(acc, index) ^ coefficients[row * 32 + pos];
            }
            *out = gf_mul(acc, index) ^ secret[pos];
        }
        dealt.push(KeyShare { index, bytes });
        bytes.zeroize();
    }
    coefficients.zeroize();

    let public_key = key.public_key();
    let digests = dealt.iter().map(|s| share_digest(&public_key, s)).collect();
    Ok(KeySplit {
        shares: dealt,
        commitments: ShareCommitments {
            public_key,
            threshold,
            digests,
        },
    })
}

/// Rebuild the key from at least `threshold` distinct, committed shares.
///
/// Every supplied share is checked against `commitments` first; a single
/// altered share fails the whole call with [`ShareError::Corrupted`].
pub fn recover_key(
    shares: &[KeyShare],
    commitments: &ShareCommitments,
) -> Result<DecryptionKey, ShareError> {
    if shares.len() < usize::from(commitments.threshold) {
        return Err(ShareError::NotEnoughShares {
            have: shares.len(),
            need: commitments.threshold,
        });
    }
    let mut seen = [false; 256];
    for share in shares {
        if commitments.digest_for(share.index).is_none() {
            return Err(ShareError::UnknownIndex(share.index));
        }
        if std::mem::replace(&mut seen[usize::from(share.index)], true) {
            return Err(ShareError::DuplicateIndex(share.index));
        }
        if !commitments.verify(share) {
            return Err(ShareError::Corrupted { index: share.index });
        }
    }

    let used = &shares[..usize::from(commitments.threshold)];
    let mut secret = [0u8; 32];
    for share in used {
        let weight = lagrange_at_zero(share.index, used);
        for (out, byte) in secret.iter_mut().zip(share.bytes.iter()) {
            *out ^= gf_mul(weight, *byte);
        }
    }

    let key = DecryptionKey::from_bytes(secret);
    secret.zeroize();
    if key.public_key() != commitments.public_key {
        return Err(ShareError::Inconsistent);
    }
    Ok(key)
}

fn share_digest(public_key: &EncryptionKey, share: &KeyShare) -> ResultHash {
    Commitment::new(SHARE_TAG)
        .bytes(public_key.as_bytes())
        .u32(u32::from(share.index))
        .bytes(&share.bytes)
        .finish()
}

/// `Π x_j / (x_j - x_i)` over the other points; subtraction is XOR.
fn lagrange_at_zero(index: u8, points: &[KeyShare]) -> u8 {
    let mut num = 1u8;
    let mut den = 1u8;
    for other in points.iter().filter(|p| p.index != index) {
        num = gf_mul(num, other.index);
        den = gf_mul(den, other.index ^ index);
    }
    gf_mul(num, gf_inv(den))
}

/// Multiplication in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1.
fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    product
}

/// `a^254`, the inverse of any nonzero `a`.
fn gf_inv(a: u8) -> u8 {
    let mut result = 1u8;
    let mut base = a;
    let mut exp = 254u8;
    while exp != 0 {
        if exp & 1 != 0 {
            result = gf_mul(result, base);
        }
        base = gf_mul(base, base);
        exp >>= 1;
    }
    result
}
