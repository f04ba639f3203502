//! Upstream source tags and their pacing configuration.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default minimum interval between CoinGecko requests (free tier).
pub const COINGECKO_MIN_INTERVAL: Duration = Duration::from_millis(1200);

/// Default minimum interval for every other upstream.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Identifies one upstream for pacing and diagnostics.
///
/// Each feed has its own tag so that a slow feed never delays the others.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SourceTag {
    CoinGecko,
    AlternativeMe,
    BlockchainCom,
    Etherscan,
    CryptoCompare,
    CryptoPanic,
    CoinTelegraph,
    Decrypt,
    CoinDesk,
    TheBlock,
    BitcoinMagazine,
}

impl SourceTag {
    pub const ALL: [SourceTag; 11] = [
        SourceTag::CoinGecko,
        SourceTag::AlternativeMe,
        SourceTag::BlockchainCom,
        SourceTag::Etherscan,
        SourceTag::CryptoCompare,
        SourceTag::CryptoPanic,
        SourceTag::CoinTelegraph,
        SourceTag::Decrypt,
        SourceTag::CoinDesk,
        SourceTag::TheBlock,
        SourceTag::BitcoinMagazine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::AlternativeMe => "alternative.me",
            Self::BlockchainCom => "blockchain.com",
            Self::Etherscan => "etherscan",
            Self::CryptoCompare => "cryptocompare",
            Self::CryptoPanic => "cryptopanic",
            Self::CoinTelegraph => "cointelegraph",
            Self::Decrypt => "decrypt",
            Self::CoinDesk => "coindesk",
            Self::TheBlock => "theblock",
            Self::BitcoinMagazine => "bitcoinmagazine",
        }
    }

    /// Environment variable that overrides this tag's interval, e.g.
    /// `CHAINLENS_PACING_BLOCKCHAIN_COM_MS`.
    pub fn pacing_env_key(&self) -> String {
        let normalized: String = self
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("CHAINLENS_PACING_{}_MS", normalized)
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum inter-request interval per source tag.
#[derive(Clone, Debug)]
pub struct PacingConfig {
    intervals: HashMap<SourceTag, Duration>,
    fallback: Duration,
}

impl PacingConfig {
    /// Same interval for every tag. Mostly useful in tests.
    pub fn uniform(interval: Duration) -> Self {
        Self {
            intervals: HashMap::new(),
            fallback: interval,
        }
    }

    pub fn with_interval(mut self, tag: SourceTag, interval: Duration) -> Self {
        self.intervals.insert(tag, interval);
        self
    }

    pub fn set_interval(&mut self, tag: SourceTag, interval: Duration) {
        self.intervals.insert(tag, interval);
    }

    pub fn interval(&self, tag: SourceTag) -> Duration {
        self.intervals.get(&tag).copied().unwrap_or(self.fallback)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_MIN_INTERVAL).with_interval(SourceTag::CoinGecko, COINGECKO_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.interval(SourceTag::CoinGecko), Duration::from_millis(1200));
        assert_eq!(pacing.interval(SourceTag::Etherscan), Duration::from_millis(1000));
        assert_eq!(pacing.interval(SourceTag::TheBlock), Duration::from_millis(1000));
    }

    #[test]
    fn test_override_interval() {
        let pacing = PacingConfig::default().with_interval(SourceTag::Decrypt, Duration::from_millis(250));
        assert_eq!(pacing.interval(SourceTag::Decrypt), Duration::from_millis(250));
        assert_eq!(pacing.interval(SourceTag::CoinDesk), DEFAULT_MIN_INTERVAL);
    }

    #[test]
    fn test_pacing_env_key() {
        assert_eq!(
            SourceTag::BlockchainCom.pacing_env_key(),
            "CHAINLENS_PACING_BLOCKCHAIN_COM_MS"
        );
        assert_eq!(
            SourceTag::CoinGecko.pacing_env_key(),
            "CHAINLENS_PACING_COINGECKO_MS"
        );
    }

    #[test]
    fn test_tags_are_distinct() {
        let names: std::collections::HashSet<_> = SourceTag::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names.len(), SourceTag::ALL.len());
    }
}
