//! Chainlens Market Intel Crate
//!
//! Rate-limited clients for crypto market data, on-chain metrics and news,
//! plus plain-text report blocks built from their results.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |    IntelHub      |  (wiring from IntelConfig)
//! +------------------+
//!     |        |        |
//!     v        v        v
//! +--------+ +--------+ +--------+
//! | Market | |OnChain | |  News  |   (fallbacks, defaults, dispatch)
//! +--------+ +--------+ +--------+
//!     |        |        |
//!     v        v        v
//! +------------------------------+
//! |   Providers (one per API)    |   (fetch + normalize)
//! +------------------------------+
//!                |
//!                v
//! +------------------------------+
//! |  RateLimitedClient           |   (per-source pacing, timeout)
//! +------------------------------+
//!                |
//!                v
//! +------------------------------+
//! |  Transport (reqwest)         |
//! +------------------------------+
//! ```
//!
//! Failures never panic. Every client call returns `Result<_, IntelError>`
//! and callers decide whether to degrade to a placeholder, an omitted
//! section or a neutral default.

pub mod config;
pub mod errors;
pub mod http;
pub mod hub;
pub mod market;
pub mod models;
pub mod news;
pub mod onchain;
pub mod provider;
pub mod report;
pub mod resolver;

pub use config::IntelConfig;
pub use errors::{FailureKind, IntelError};
pub use hub::IntelHub;
pub use market::MarketClient;
pub use news::{regulatory_filter, NewsAggregator, REGULATORY_KEYWORDS};
pub use onchain::{OnChainClient, DEFAULT_WHALE_THRESHOLD_BTC};
pub use resolver::{IdScheme, ResolutionSource, ResolvedSymbol, SymbolResolver};

pub use models::{
    AssetSymbol, Candle, ChainFamily, CongestionLevel, GlobalMarketSnapshot, NewsArticle,
    OhlcvSeries, OnChainSnapshot, PriceSnapshot, SentimentClass, SentimentIndex, TrendingCoin,
};
