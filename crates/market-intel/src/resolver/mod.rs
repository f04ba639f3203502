//! Ticker to source-native id resolution.
//!
//! Each upstream has its own id scheme, so resolution always names the
//! scheme. Tables are never shared across schemes.
//!
//! - CoinGecko: static table, then one `/search` call, then the lowercase
//!   ticker as a best-effort guess.
//! - CryptoCompare: static table only. A miss is reported as "no mapping";
//!   numeric ids are never guessed.

mod tables;

use tracing::{debug, warn};

use crate::models::AssetSymbol;
use crate::provider::coingecko::CoinGeckoApi;

use tables::{COINGECKO_IDS, CRYPTOCOMPARE_IDS};

/// Upstream id scheme a ticker is resolved into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IdScheme {
    CoinGecko,
    CryptoCompare,
}

/// How an id was obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolutionSource {
    /// From the static table; no network call.
    Static,
    /// First match of the source's search endpoint.
    Search,
    /// Lowercase ticker used as-is. May not exist upstream.
    Fallback,
}

/// Resolution result containing the native id and its origin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedSymbol {
    pub id: String,
    pub source: ResolutionSource,
}

impl ResolvedSymbol {
    fn new(id: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

pub struct SymbolResolver {
    coingecko: CoinGeckoApi,
}

impl SymbolResolver {
    pub fn new(coingecko: CoinGeckoApi) -> Self {
        Self { coingecko }
    }

    /// Resolve `symbol` into `scheme`. `None` means the scheme has no id for
    /// it and no way to look one up.
    pub async fn resolve(&self, symbol: &AssetSymbol, scheme: IdScheme) -> Option<ResolvedSymbol> {
        match scheme {
            IdScheme::CoinGecko => Some(self.coingecko_id(symbol).await),
            IdScheme::CryptoCompare => Self::cryptocompare_id(symbol)
                .map(|id| ResolvedSymbol::new(id.to_string(), ResolutionSource::Static)),
        }
    }

    /// Static CoinGecko id, without touching the network.
    pub fn static_coingecko_id(symbol: &AssetSymbol) -> Option<&'static str> {
        COINGECKO_IDS.get(symbol.as_str()).copied()
    }

    /// CoinGecko coin id. Always yields something; see [`ResolutionSource`].
    pub async fn coingecko_id(&self, symbol: &AssetSymbol) -> ResolvedSymbol {
        if let Some(id) = Self::static_coingecko_id(symbol) {
            return ResolvedSymbol::new(id, ResolutionSource::Static);
        }

        match self.coingecko.search_first_id(symbol.as_str()).await {
            Ok(Some(id)) => {
                debug!("Resolved {} to CoinGecko id '{}' via search", symbol, id);
                ResolvedSymbol::new(id, ResolutionSource::Search)
            }
            Ok(None) => {
                debug!("CoinGecko search found nothing for {}", symbol);
                ResolvedSymbol::new(symbol.to_lowercase(), ResolutionSource::Fallback)
            }
            Err(e) => {
                warn!("CoinGecko search failed for {}: {}", symbol, e);
                ResolvedSymbol::new(symbol.to_lowercase(), ResolutionSource::Fallback)
            }
        }
    }

    /// CryptoCompare internal coin id from the static table.
    pub fn cryptocompare_id(symbol: &AssetSymbol) -> Option<u64> {
        CRYPTOCOMPARE_IDS.get(symbol.as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RateLimitedClient, RateLimiter, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn resolver(transport: ScriptedTransport) -> (SymbolResolver, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let client = RateLimitedClient::new(
            transport.clone(),
            Arc::new(RateLimiter::unpaced()),
            Duration::from_secs(5),
        );
        (SymbolResolver::new(CoinGeckoApi::new(client, None)), transport)
    }

    fn sym(s: &str) -> AssetSymbol {
        AssetSymbol::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_static_hit_makes_no_call() {
        let (resolver, transport) = resolver(ScriptedTransport::new());
        let resolved = resolver.coingecko_id(&sym("avax")).await;
        assert_eq!(resolved, ResolvedSymbol::new("avalanche-2", ResolutionSource::Static));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_makes_exactly_one_search() {
        let (resolver, transport) = resolver(ScriptedTransport::new().json(
            "/search",
            json!({"coins": [{"id": "pepe", "symbol": "PEPE"}, {"id": "pepe-2"}]}),
        ));
        let resolved = resolver.coingecko_id(&sym("PEPE")).await;
        assert_eq!(resolved, ResolvedSymbol::new("pepe", ResolutionSource::Search));
        assert_eq!(transport.request_count(), 1);
        assert!(transport.requests()[0].url.contains("query=PEPE"));
    }

    #[tokio::test]
    async fn test_search_failure_falls_back_to_lowercase() {
        let (resolver, transport) = resolver(ScriptedTransport::new().respond("/search", 500, ""));
        let resolved = resolver.coingecko_id(&sym("WIF")).await;
        assert_eq!(resolved, ResolvedSymbol::new("wif", ResolutionSource::Fallback));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_search_falls_back() {
        let (resolver, _) = resolver(ScriptedTransport::new().json("/search", json!({"coins": []})));
        let resolved = resolver.coingecko_id(&sym("ZZZ")).await;
        assert_eq!(resolved.source, ResolutionSource::Fallback);
        assert_eq!(resolved.id, "zzz");
    }

    #[tokio::test]
    async fn test_cryptocompare_never_guesses() {
        let (resolver, transport) = resolver(ScriptedTransport::new());
        assert_eq!(
            resolver.resolve(&sym("SOL"), IdScheme::CryptoCompare).await,
            Some(ResolvedSymbol::new("699785", ResolutionSource::Static))
        );
        assert_eq!(resolver.resolve(&sym("DOGE"), IdScheme::CryptoCompare).await, None);
        assert_eq!(transport.request_count(), 0);
    }
}
