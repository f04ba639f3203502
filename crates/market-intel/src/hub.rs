//! Wires every client onto one shared transport and rate limiter.

use std::sync::Arc;

use tracing::info;

use crate::config::IntelConfig;
use crate::http::{RateLimitedClient, RateLimiter, ReqwestTransport, Transport};
use crate::market::MarketClient;
use crate::news::NewsAggregator;
use crate::onchain::OnChainClient;
use crate::provider::{
    BlockchainComApi, CoinGeckoApi, CryptoCompareApi, CryptoPanicApi, EtherscanApi, FearGreedApi,
};

/// All data clients for one process. The rate limiter is shared, so pacing
/// holds across clients that hit the same upstream.
pub struct IntelHub {
    client: RateLimitedClient,
    market: MarketClient,
    onchain: OnChainClient,
    news: NewsAggregator,
}

impl IntelHub {
    /// Production wiring over `reqwest`.
    pub fn from_config(config: &IntelConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new(config.timeout)))
    }

    pub fn with_transport(config: &IntelConfig, transport: Arc<dyn Transport>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.pacing.clone()));
        let client = RateLimitedClient::new(transport, limiter, config.timeout);

        let market = MarketClient::new(
            CoinGeckoApi::new(client.clone(), config.coingecko_api_key.clone()),
            FearGreedApi::new(client.clone()),
        );
        let onchain = OnChainClient::new(
            BlockchainComApi::new(client.clone()),
            config
                .etherscan_api_key
                .clone()
                .map(|key| EtherscanApi::new(client.clone(), key)),
            config
                .cryptocompare_api_key
                .clone()
                .map(|key| CryptoCompareApi::new(client.clone(), key)),
        );
        let news = NewsAggregator::new(
            client.clone(),
            config
                .cryptopanic_api_key
                .clone()
                .map(|token| CryptoPanicApi::new(client.clone(), token)),
        );

        info!(
            "Market intel ready (credentials: {:?}, timeout {:?})",
            config.configured_credentials(),
            config.timeout
        );

        Self {
            client,
            market,
            onchain,
            news,
        }
    }

    pub fn market(&self) -> &MarketClient {
        &self.market
    }

    pub fn onchain(&self) -> &OnChainClient {
        &self.onchain
    }

    pub fn news(&self) -> &NewsAggregator {
        &self.news
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        self.client.limiter()
    }
}
