//! On-chain snapshot models. Each chain family has its own schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::{AssetSymbol, ChainFamily};

/// Mempool above this many unconfirmed transactions is congested.
pub const MEMPOOL_HIGH_THRESHOLD: u64 = 10_000;
/// Mempool below this many unconfirmed transactions is quiet.
pub const MEMPOOL_LOW_THRESHOLD: u64 = 2_000;
/// Fast gas above this (gwei) means congestion.
pub const GAS_HIGH_THRESHOLD: f64 = 50.0;
/// Fast gas below this (gwei) means a quiet network.
pub const GAS_LOW_THRESHOLD: f64 = 20.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub fn from_mempool(unconfirmed: u64) -> Self {
        if unconfirmed > MEMPOOL_HIGH_THRESHOLD {
            Self::High
        } else if unconfirmed < MEMPOOL_LOW_THRESHOLD {
            Self::Low
        } else {
            Self::Medium
        }
    }

    pub fn from_fast_gas(fast_gwei: f64) -> Self {
        if fast_gwei > GAS_HIGH_THRESHOLD {
            Self::High
        } else if fast_gwei < GAS_LOW_THRESHOLD {
            Self::Low
        } else {
            Self::Medium
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Network-wide figures from the blockchain stats endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinNetworkStats {
    pub market_price_usd: f64,
    /// Hash rate in GH/s as reported upstream.
    pub hash_rate_ghs: f64,
    pub difficulty: f64,
    pub minutes_between_blocks: f64,
    /// Total BTC mined so far.
    pub total_mined_btc: f64,
    pub total_btc_sent: f64,
    pub tx_count_24h: u64,
    pub blocks_total: u64,
    pub estimated_volume_usd: f64,
    pub miners_revenue_usd: f64,
}

impl BitcoinNetworkStats {
    /// Hash rate converted to EH/s.
    pub fn hash_rate_ehs(&self) -> f64 {
        self.hash_rate_ghs / 1e9
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolStatus {
    pub unconfirmed_count: u64,
    pub congestion: CongestionLevel,
}

impl MempoolStatus {
    pub fn new(unconfirmed_count: u64) -> Self {
        Self {
            unconfirmed_count,
            congestion: CongestionLevel::from_mempool(unconfirmed_count),
        }
    }
}

/// A single large pending transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleTransaction {
    pub hash: String,
    /// Value in native units (BTC).
    pub value_native: f64,
    /// Value in USD; absent when no price was available.
    pub value_usd: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinMetrics {
    pub network: BitcoinNetworkStats,
    /// Absent when the mempool endpoint failed.
    pub mempool: Option<MempoolStatus>,
    pub whale_threshold_btc: f64,
    pub whales: Vec<WhaleTransaction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumMetrics {
    pub safe_gas_gwei: f64,
    pub standard_gas_gwei: f64,
    pub fast_gas_gwei: f64,
    pub base_fee_gwei: f64,
    /// Comma-separated ratios of recent blocks, passed through as-is.
    pub gas_used_ratio: String,
    pub congestion: CongestionLevel,
    pub total_supply_eth: Option<f64>,
    pub staking_eth: Option<f64>,
}

/// Community size figures from the multi-chain provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStats {
    pub reddit_subscribers: u64,
    pub reddit_active_users: u64,
    pub reddit_posts_per_day: f64,
    pub twitter_followers: u64,
    pub twitter_statuses: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericMetrics {
    pub symbol: AssetSymbol,
    pub coin_id: u64,
    pub social: Option<SocialStats>,
    /// Numeric fields of the provider's latest blockchain record.
    pub blockchain: BTreeMap<String, f64>,
}

impl GenericMetrics {
    pub fn is_empty(&self) -> bool {
        self.social.is_none() && self.blockchain.is_empty()
    }
}

/// Chain-specific on-chain data. Callers branch on the variant; there is no
/// shared schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OnChainSnapshot {
    Bitcoin(BitcoinMetrics),
    Ethereum(EthereumMetrics),
    Generic(GenericMetrics),
    /// The provider for this chain needs a credential that is not configured.
    Unavailable {
        chain: ChainFamily,
        credential: String,
    },
    /// The generic provider has no id for this symbol.
    NoMapping { symbol: AssetSymbol },
}
