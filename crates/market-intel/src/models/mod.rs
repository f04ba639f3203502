//! Value types produced by the clients. Everything here is built fresh per
//! request and never mutated after it is returned.

mod asset;
mod news;
mod onchain;
mod price;

pub use asset::{AssetSymbol, ChainFamily};
pub use news::{parse_published, NewsArticle, Votes};
pub use onchain::{
    BitcoinMetrics, BitcoinNetworkStats, CongestionLevel, EthereumMetrics, GenericMetrics,
    MempoolStatus, OnChainSnapshot, SocialStats, WhaleTransaction, GAS_HIGH_THRESHOLD,
    GAS_LOW_THRESHOLD, MEMPOOL_HIGH_THRESHOLD, MEMPOOL_LOW_THRESHOLD,
};
pub use price::{
    nearest_horizon, Candle, GlobalMarketSnapshot, MarketAggregates, OhlcvSeries, PriceSnapshot,
    SentimentClass, SentimentIndex, TrendingCoin, CANDLE_HORIZONS,
};
