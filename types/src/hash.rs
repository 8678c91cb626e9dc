//! Commitment hash attached to proposals.

use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 32-byte commitment to an off-chain aggregate computation.
///
/// The core stores it verbatim for later audit and never recomputes it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultHash([u8; 32]);

impl ResultHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl Default for ResultHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for ResultHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultHash({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for ResultHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for ResultHash {
    type Err = ParseError;

    /// Parse 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| ParseError::InvalidHash(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseError::InvalidHash(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl Serialize for ResultHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ResultHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_roundtrip() {
        let hash = ResultHash::new([0xAB; 32]);
        let parsed: ResultHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn parse_accepts_0x_prefix() {
        let s = format!("0x{}", "01".repeat(32));
        let parsed: ResultHash = s.parse().unwrap();
        assert_eq!(parsed.as_bytes(), &[1u8; 32]);
    }

    #[test]
    fn parse_rejects_wrong_length_and_garbage() {
        assert!("abcd".parse::<ResultHash>().is_err());
        assert!("zz".repeat(32).parse::<ResultHash>().is_err());
        assert!("é".repeat(32).parse::<ResultHash>().is_err());
    }

    #[test]
    fn json_uses_hex_and_bincode_uses_bytes() {
        let hash = ResultHash::new([0x0F; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "0f".repeat(32)));
        assert_eq!(serde_json::from_str::<ResultHash>(&json).unwrap(), hash);

        let bytes = bincode::serialize(&hash).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bincode::deserialize::<ResultHash>(&bytes).unwrap(), hash);
    }
}
