//! Static ticker tables, one per upstream id scheme.

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// Ticker -> CoinGecko coin id.
    pub(crate) static ref COINGECKO_IDS: HashMap<&'static str, &'static str> = HashMap::from([
        ("BTC", "bitcoin"),
        ("ETH", "ethereum"),
        ("SOL", "solana"),
        ("MATIC", "matic-network"),
        ("AVAX", "avalanche-2"),
        ("BNB", "binancecoin"),
        ("ADA", "cardano"),
        ("DOT", "polkadot"),
        ("LINK", "chainlink"),
        ("UNI", "uniswap"),
        ("ATOM", "cosmos"),
        ("XRP", "ripple"),
        ("DOGE", "dogecoin"),
        ("SHIB", "shiba-inu"),
        ("LTC", "litecoin"),
        ("BCH", "bitcoin-cash"),
        ("NEAR", "near"),
        ("APT", "aptos"),
        ("ARB", "arbitrum"),
        ("OP", "optimism"),
    ]);

    /// Ticker -> CryptoCompare internal coin id. Deliberately small: there is
    /// no search endpoint to fall back on.
    pub(crate) static ref CRYPTOCOMPARE_IDS: HashMap<&'static str, u64> = HashMap::from([
        ("BTC", 1182),
        ("ETH", 7605),
        ("SOL", 699785),
        ("MATIC", 321992),
        ("AVAX", 893373),
    ]);
}
