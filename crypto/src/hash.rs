//! Blake2b-256 digests and domain-separated result commitments.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use oracle_types::ResultHash;

type Blake2b256 = Blake2b<U32>;

fn finish(hasher: Blake2b256) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Digest of the concatenation of `parts`, without building it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}

/// `blake2b(len(tag) ‖ tag ‖ parts...)`, parts hashed as given.
pub fn commit(tag: &[u8], parts: &[&[u8]]) -> ResultHash {
    let mut c = Commitment::new(tag);
    for part in parts {
        c.hasher.update(part);
    }
    c.finish()
}

/// Incremental commitment with unambiguous framing.
///
/// Byte strings are length-prefixed (`u32` little-endian); integers are
/// fixed-width little-endian. Two different field sequences therefore never
/// hash the same input.
///
/// ```
/// use oracle_crypto::Commitment;
///
/// let hash = Commitment::new(b"example-v1")
///     .str("e1")
///     .i64(6210)
///     .u64(62)
///     .finish();
/// assert!(!hash.is_zero());
/// ```
#[derive(Clone)]
pub struct Commitment {
    hasher: Blake2b256,
}

impl Commitment {
    pub fn new(tag: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update((tag.len() as u32).to_le_bytes());
        hasher.update(tag);
        Self { hasher }
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.hasher.update((data.len() as u32).to_le_bytes());
        self.hasher.update(data);
        self
    }

    pub fn str(self, s: &str) -> Self {
        self.bytes(s.as_bytes())
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.hasher.update(v.to_le_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.hasher.update(v.to_le_bytes());
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        self.hasher.update(v.to_le_bytes());
        self
    }

    pub fn finish(self) -> ResultHash {
        ResultHash::new(finish(self.hasher))
    }
}
