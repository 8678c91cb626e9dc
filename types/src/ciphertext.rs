//! Opaque ciphertext blob.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The encrypted form of a provider's quantized value.
///
/// Produced by an external encryption adapter and never decrypted, parsed or
/// otherwise interpreted by the oracle core.
///
/// Human-readable formats (JSON, TOML) carry it as a hex string.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Ciphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            hex::decode(s.strip_prefix("0x").unwrap_or(&s))
                .map(Self)
                .map_err(serde::de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer).map(Self)
        }
    }
}

// Contents are not printed.
impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_contents() {
        let ct = Ciphertext::new(vec![0xDE, 0xAD]);
        assert_eq!(format!("{ct:?}"), "Ciphertext(2 bytes)");
    }

    #[test]
    fn json_is_hex() {
        let ct = Ciphertext::new(vec![0xDE, 0xAD]);
        assert_eq!(serde_json::to_string(&ct).unwrap(), "\"dead\"");
        let back: Ciphertext = serde_json::from_str("\"0xdead\"").unwrap();
        assert_eq!(back, ct);
        assert!(serde_json::from_str::<Ciphertext>("\"xyz\"").is_err());
    }

    #[test]
    fn bincode_is_raw_bytes() {
        let ct = Ciphertext::new(vec![1, 2, 3]);
        let bytes = bincode::serialize(&ct).unwrap();
        assert_eq!(bincode::deserialize::<Ciphertext>(&bytes).unwrap(), ct);
    }
}
