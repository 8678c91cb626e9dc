//! The closed set of observation kinds a provider can submit.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a raw real-valued observation is quantized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A probability in percent, `[0, 100]`.
    Percent,
    /// A non-negative price with fixed decimals.
    Price,
    /// A ratio in `[0, 1]`.
    Ratio,
}

impl ValueKind {
    pub const ALL: [ValueKind; 3] = [Self::Percent, Self::Price, Self::Ratio];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Price => "price",
            Self::Ratio => "ratio",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "percent" | "percentage" => Ok(Self::Percent),
            "price" => Ok(Self::Price),
            "ratio" => Ok(Self::Ratio),
            _ => Err(ParseError::UnknownValueKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds_and_aliases() {
        assert_eq!("percentage".parse::<ValueKind>().unwrap(), ValueKind::Percent);
        assert_eq!("Price".parse::<ValueKind>().unwrap(), ValueKind::Price);
        for kind in ValueKind::ALL {
            assert_eq!(kind.as_str().parse::<ValueKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            "volume".parse::<ValueKind>(),
            Err(ParseError::UnknownValueKind(k)) if k == "volume"
        ));
    }
}
