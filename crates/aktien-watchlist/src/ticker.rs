//! Ticker symbols

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized ticker symbol such as `TSLA` or `SAP.DE`
///
/// Construction trims whitespace and uppercases, so two tickers compare
/// equal regardless of how the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize user input into a ticker
    ///
    /// Blank input and input with whitespace between characters yield `None`.
    ///
    /// ```
    /// use aktien_watchlist::Ticker;
    ///
    /// assert_eq!(Ticker::parse(" tsla ").unwrap().as_str(), "TSLA");
    /// assert!(Ticker::parse("   ").is_none());
    /// assert!(Ticker::parse("tsla aapl").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::parse(&value)
            .ok_or_else(|| "ticker must be a single non-blank word".to_string())
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let ticker = Ticker::parse("  aapl\t").unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker, Ticker::parse("AAPL").unwrap());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(Ticker::parse("").is_none());
        assert!(Ticker::parse("   ").is_none());
        assert!(Ticker::parse("\n").is_none());
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert!(Ticker::parse("tsla aapl").is_none());
        assert!(Ticker::parse("BRK\tB").is_none());
        assert!(Ticker::parse(" brk-b ").is_some());
    }

    #[test]
    fn test_exchange_suffix_kept() {
        assert_eq!(Ticker::parse("sap.de").unwrap().to_string(), "SAP.DE");
    }

    #[test]
    fn test_serde_roundtrip_normalizes() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
        assert!(serde_json::from_str::<Ticker>("\"  \"").is_err());
    }
}
