//! Runtime configuration: provider credentials, HTTP timeout and pacing.

use std::time::Duration;

use tracing::warn;

use crate::http::{PacingConfig, SourceTag, DEFAULT_TIMEOUT};

pub const COINGECKO_KEY_VAR: &str = "COINGECKO_API_KEY";
pub const ETHERSCAN_KEY_VAR: &str = "ETHERSCAN_API_KEY";
pub const CRYPTOCOMPARE_KEY_VAR: &str = "CRYPTOCOMPARE_API_KEY";
pub const CRYPTOPANIC_KEY_VAR: &str = "CRYPTOPANIC_API_KEY";
pub const HTTP_TIMEOUT_VAR: &str = "CHAINLENS_HTTP_TIMEOUT_MS";

/// Credentials are optional; a missing one disables only the capability that
/// needs it.
#[derive(Clone, Debug)]
pub struct IntelConfig {
    pub coingecko_api_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    pub cryptocompare_api_key: Option<String>,
    pub cryptopanic_api_key: Option<String>,
    pub timeout: Duration,
    pub pacing: PacingConfig,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            coingecko_api_key: None,
            etherscan_api_key: None,
            cryptocompare_api_key: None,
            cryptopanic_api_key: None,
            timeout: DEFAULT_TIMEOUT,
            pacing: PacingConfig::default(),
        }
    }
}

impl IntelConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset;
    /// unparsable numbers are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let millis = |name: &str| {
            non_empty(name).and_then(|raw| match raw.parse::<u64>() {
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    warn!("Ignoring {}={:?}: not a whole number of milliseconds", name, raw);
                    None
                }
            })
        };

        let mut pacing = PacingConfig::default();
        for tag in SourceTag::ALL {
            if let Some(interval) = millis(&tag.pacing_env_key()) {
                pacing.set_interval(tag, interval);
            }
        }

        Self {
            coingecko_api_key: non_empty(COINGECKO_KEY_VAR),
            etherscan_api_key: non_empty(ETHERSCAN_KEY_VAR),
            cryptocompare_api_key: non_empty(CRYPTOCOMPARE_KEY_VAR),
            cryptopanic_api_key: non_empty(CRYPTOPANIC_KEY_VAR),
            timeout: millis(HTTP_TIMEOUT_VAR).unwrap_or(DEFAULT_TIMEOUT),
            pacing,
        }
    }

    pub fn with_coingecko_key(mut self, key: impl Into<String>) -> Self {
        self.coingecko_api_key = Some(key.into());
        self
    }

    pub fn with_etherscan_key(mut self, key: impl Into<String>) -> Self {
        self.etherscan_api_key = Some(key.into());
        self
    }

    pub fn with_cryptocompare_key(mut self, key: impl Into<String>) -> Self {
        self.cryptocompare_api_key = Some(key.into());
        self
    }

    pub fn with_cryptopanic_key(mut self, key: impl Into<String>) -> Self {
        self.cryptopanic_api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Names of the credential variables that are set, for startup logs.
    pub fn configured_credentials(&self) -> Vec<&'static str> {
        [
            (COINGECKO_KEY_VAR, &self.coingecko_api_key),
            (ETHERSCAN_KEY_VAR, &self.etherscan_api_key),
            (CRYPTOCOMPARE_KEY_VAR, &self.cryptocompare_api_key),
            (CRYPTOPANIC_KEY_VAR, &self.cryptopanic_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect()
    }
}
