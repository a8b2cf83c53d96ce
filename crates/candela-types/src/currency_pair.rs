//! Currency pair identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::CurrencyPairParseError;

/// Identifier of a traded currency pair, e.g. `EURUSD`.
///
/// Identifiers are normalized to upper case and are cheap to clone, since
/// every candle produced for a pair carries its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair(Arc<str>);

impl CurrencyPair {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyPair {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyPair {
    type Err = CurrencyPairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CurrencyPairParseError::Empty);
        }
        if let Some(ch) = trimmed.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CurrencyPairParseError::InvalidCharacter {
                input: s.to_string(),
                ch,
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase().into()))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = CurrencyPairParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(value: CurrencyPair) -> Self {
        value.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_pair_parse_normalizes() {
        let pair: CurrencyPair = " eurusd ".parse().unwrap();
        assert_eq!(pair.as_str(), "EURUSD");
        assert_eq!(pair.to_string(), "EURUSD");
    }

    #[test]
    fn test_currency_pair_parse_errors() {
        assert_eq!("".parse::<CurrencyPair>(), Err(CurrencyPairParseError::Empty));
        assert!(matches!(
            "EUR/USD".parse::<CurrencyPair>(),
            Err(CurrencyPairParseError::InvalidCharacter { ch: '/', .. })
        ));
    }
}
