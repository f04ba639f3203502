//! Price and market-wide data for one asset or the whole market.

use tracing::{debug, warn};

use crate::errors::IntelError;
use crate::models::{
    nearest_horizon, AssetSymbol, GlobalMarketSnapshot, OhlcvSeries, PriceSnapshot, SentimentIndex,
    TrendingCoin,
};
use crate::provider::{CoinGeckoApi, FearGreedApi};
use crate::resolver::{ResolvedSymbol, SymbolResolver};

pub struct MarketClient {
    coingecko: CoinGeckoApi,
    sentiment: FearGreedApi,
    resolver: SymbolResolver,
}

impl MarketClient {
    pub fn new(coingecko: CoinGeckoApi, sentiment: FearGreedApi) -> Self {
        Self {
            resolver: SymbolResolver::new(coingecko.clone()),
            coingecko,
            sentiment,
        }
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    /// Current price and market statistics.
    pub async fn current_snapshot(&self, symbol: &AssetSymbol) -> Result<PriceSnapshot, IntelError> {
        let resolved = self.resolver.coingecko_id(symbol).await;
        self.snapshot_resolved(symbol, &resolved).await
    }

    /// [`Self::current_snapshot`] for an id the caller already resolved.
    pub async fn snapshot_resolved(
        &self,
        symbol: &AssetSymbol,
        resolved: &ResolvedSymbol,
    ) -> Result<PriceSnapshot, IntelError> {
        self.coingecko.coin_snapshot(symbol, &resolved.id).await
    }

    /// Daily-ish candles covering roughly `days`.
    ///
    /// Candles use the nearest accepted horizon; volumes are fetched over the
    /// raw `days` and left-joined by timestamp. A failed volume call leaves
    /// every volume at zero.
    pub async fn history(&self, symbol: &AssetSymbol, days: u32) -> Result<OhlcvSeries, IntelError> {
        let resolved = self.resolver.coingecko_id(symbol).await;
        self.history_resolved(symbol, &resolved, days).await
    }

    /// [`Self::history`] for an id the caller already resolved.
    pub async fn history_resolved(
        &self,
        symbol: &AssetSymbol,
        resolved: &ResolvedSymbol,
        days: u32,
    ) -> Result<OhlcvSeries, IntelError> {
        let horizon = nearest_horizon(days);

        let candles = self.coingecko.ohlc(&resolved.id, horizon).await?;
        if candles.is_empty() {
            return Err(IntelError::no_data(format!(
                "No candles for {} over {} days",
                symbol, horizon
            )));
        }

        let mut series = OhlcvSeries::new(symbol.clone(), days, horizon, candles);

        match self.coingecko.total_volumes(&resolved.id, days).await {
            Ok(volumes) => series.merge_volumes(&volumes),
            Err(e) => {
                warn!("Volume data unavailable for {}: {}", symbol, e);
                series.merge_volumes(&[]);
            }
        }

        debug!(
            "History for {}: {} candles (requested {} days, horizon {})",
            symbol,
            series.len(),
            days,
            horizon
        );
        Ok(series)
    }

    /// Sentiment index from its own upstream, or the neutral default.
    pub async fn fear_greed(&self) -> SentimentIndex {
        self.sentiment.latest().await.unwrap_or_else(|e| {
            warn!("Fear & Greed index unavailable, using neutral default: {}", e);
            SentimentIndex::neutral()
        })
    }

    /// Market aggregates plus sentiment. Never fails: each half falls back
    /// to its neutral default and records a diagnostic.
    pub async fn global_snapshot(&self) -> GlobalMarketSnapshot {
        let mut snapshot = GlobalMarketSnapshot::default();

        match self.coingecko.global().await {
            Ok(aggregates) => {
                snapshot.aggregates = aggregates;
                snapshot.aggregates_available = true;
            }
            Err(e) => {
                warn!("Global market aggregates unavailable: {}", e);
                snapshot.diagnostics.push(format!("aggregates: {}", e.diagnostic()));
            }
        }

        match self.sentiment.latest().await {
            Ok(sentiment) => {
                snapshot.sentiment = sentiment;
                snapshot.sentiment_available = true;
            }
            Err(e) => {
                warn!("Fear & Greed index unavailable, using neutral default: {}", e);
                snapshot.sentiment = SentimentIndex::neutral();
                snapshot.diagnostics.push(format!("sentiment: {}", e.diagnostic()));
            }
        }

        snapshot
    }

    /// At most `limit` trending coins, in upstream order. Never padded.
    pub async fn trending(&self, limit: usize) -> Result<Vec<TrendingCoin>, IntelError> {
        let mut coins = self.coingecko.trending().await?;
        coins.truncate(limit);
        Ok(coins)
    }
}
