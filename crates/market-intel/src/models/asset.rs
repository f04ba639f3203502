//! Asset identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IntelError;

/// Short uppercase ticker such as `BTC`.
///
/// Tickers are not unique across upstreams; each source resolves them with
/// its own table (see [`crate::resolver`]).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    pub fn parse(raw: &str) -> Result<Self, IntelError> {
        let trimmed = raw.trim();
        let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.';
        if trimmed.is_empty() || !trimmed.chars().all(allowed) {
            return Err(IntelError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn chain_family(&self) -> ChainFamily {
        ChainFamily::of(self)
    }
}

impl FromStr for AssetSymbol {
    type Err = IntelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetSymbol {
    type Error = IntelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetSymbol> for String {
    fn from(symbol: AssetSymbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger design grouping used to pick an on-chain metric set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ChainFamily {
    /// Proof-of-work fee-market chain (BTC).
    Bitcoin,
    /// Account-based gas-fee chain (ETH).
    Ethereum,
    /// Everything else; served by the multi-chain provider.
    Other,
}

impl ChainFamily {
    pub fn of(symbol: &AssetSymbol) -> Self {
        match symbol.as_str() {
            "BTC" => Self::Bitcoin,
            "ETH" => Self::Ethereum,
            _ => Self::Other,
        }
    }

    /// Designated primary asset of the family, if any.
    pub fn primary_ticker(&self) -> Option<&'static str> {
        match self {
            Self::Bitcoin => Some("BTC"),
            Self::Ethereum => Some("ETH"),
            Self::Other => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Other => "Generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let symbol = AssetSymbol::parse("  btc ").unwrap();
        assert_eq!(symbol.as_str(), "BTC");
        assert_eq!(symbol.to_lowercase(), "btc");
    }

    #[test]
    fn test_parse_rejects_empty_and_inner_space() {
        assert!(AssetSymbol::parse("").is_err());
        assert!(AssetSymbol::parse("   ").is_err());
        assert!(AssetSymbol::parse("B TC").is_err());
    }

    #[test]
    fn test_parse_rejects_url_metacharacters() {
        for raw in ["a/b?x", "../btc", "eth#frag", "sol&x=1", "bitcoin%2F", "ÉTH"] {
            assert!(AssetSymbol::parse(raw).is_err(), "{} should be rejected", raw);
        }
        assert_eq!(AssetSymbol::parse("btc.b").unwrap().as_str(), "BTC.B");
        assert_eq!(AssetSymbol::parse("usdc-e").unwrap().as_str(), "USDC-E");
    }

    #[test]
    fn test_chain_family_is_case_insensitive() {
        assert_eq!(ChainFamily::of(&"btc".parse().unwrap()), ChainFamily::Bitcoin);
        assert_eq!(ChainFamily::of(&"Eth".parse().unwrap()), ChainFamily::Ethereum);
        assert_eq!(ChainFamily::of(&"SOL".parse().unwrap()), ChainFamily::Other);
    }

    #[test]
    fn test_serde_round_trip_normalizes() {
        let symbol: AssetSymbol = serde_json::from_str("\"doge\"").unwrap();
        assert_eq!(symbol.as_str(), "DOGE");
        assert!(serde_json::from_str::<AssetSymbol>("\"\"").is_err());
    }
}
