//! Typed wrappers over each upstream API.
//!
//! Providers only fetch and normalize. Combining sources, fallbacks and
//! defaults live in [`crate::market`], [`crate::onchain`] and [`crate::news`].

pub mod alternative_me;
pub mod blockchain_com;
pub mod coingecko;
pub mod cryptocompare;
pub mod cryptopanic;
pub mod etherscan;
pub mod feeds;

pub use alternative_me::FearGreedApi;
pub use blockchain_com::BlockchainComApi;
pub use coingecko::CoinGeckoApi;
pub use cryptocompare::CryptoCompareApi;
pub use cryptopanic::CryptoPanicApi;
pub use etherscan::{EtherscanApi, GasOracle};
pub use feeds::FeedSource;
