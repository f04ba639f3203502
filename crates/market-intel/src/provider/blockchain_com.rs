//! Bitcoin network data from blockchain.com (no credential needed).

use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::{BitcoinNetworkStats, MempoolStatus, WhaleTransaction};

pub const BASE_URL: &str = "https://blockchain.info";
const TAG: SourceTag = SourceTag::BlockchainCom;
const SATOSHI_PER_BTC: f64 = 1e8;

/// How many pending transactions the whale scan looks at.
pub const WHALE_SCAN_DEPTH: usize = 20;

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /stats. Amounts in satoshi unless noted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsResponse {
    market_price_usd: f64,
    /// GH/s
    hash_rate: f64,
    difficulty: f64,
    total_btc_sent: f64,
    n_tx: u64,
    n_blocks_total: u64,
    minutes_between_blocks: f64,
    totalbc: f64,
    estimated_transaction_volume_usd: f64,
    miners_revenue_usd: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UnconfirmedResponse {
    txs: Vec<PendingTx>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PendingTx {
    hash: String,
    time: Option<i64>,
    size: u64,
    out: Vec<TxOutput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TxOutput {
    value: f64,
}

// ============================================================================
// BlockchainComApi
// ============================================================================

#[derive(Clone)]
pub struct BlockchainComApi {
    client: RateLimitedClient,
    base_url: String,
}

impl BlockchainComApi {
    pub fn new(client: RateLimitedClient) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub async fn stats(&self) -> Result<BitcoinNetworkStats, IntelError> {
        let request = Request::get(format!("{}/stats", self.base_url)).query("format", "json");
        let stats: StatsResponse = self.client.get_json(TAG, request).await?;

        Ok(BitcoinNetworkStats {
            market_price_usd: stats.market_price_usd,
            hash_rate_ghs: stats.hash_rate,
            difficulty: stats.difficulty,
            minutes_between_blocks: stats.minutes_between_blocks,
            total_mined_btc: stats.totalbc / SATOSHI_PER_BTC,
            total_btc_sent: stats.total_btc_sent / SATOSHI_PER_BTC,
            tx_count_24h: stats.n_tx,
            blocks_total: stats.n_blocks_total,
            estimated_volume_usd: stats.estimated_transaction_volume_usd,
            miners_revenue_usd: stats.miners_revenue_usd,
        })
    }

    /// Unconfirmed transaction count (plain-text endpoint).
    pub async fn mempool(&self) -> Result<MempoolStatus, IntelError> {
        let body = self
            .client
            .get_text(TAG, Request::get(format!("{}/q/unconfirmedcount", self.base_url)))
            .await?;
        let count = body
            .trim()
            .parse::<u64>()
            .map_err(|e| IntelError::malformed(TAG, format!("unconfirmed count {:?}: {}", body.trim(), e)))?;
        Ok(MempoolStatus::new(count))
    }

    /// Pending transactions at or above `threshold_btc` among the most recent
    /// [`WHALE_SCAN_DEPTH`]. `price_usd` is used for fiat conversion when known.
    pub async fn whale_transactions(
        &self,
        threshold_btc: f64,
        price_usd: Option<f64>,
    ) -> Result<Vec<WhaleTransaction>, IntelError> {
        let request = Request::get(format!("{}/unconfirmed-transactions", self.base_url))
            .query("format", "json");
        let response: UnconfirmedResponse = self.client.get_json(TAG, request).await?;
        Ok(scan_whales(response, threshold_btc, price_usd))
    }
}

/// Value of a pending tx is its first output, as blockchain.com lists the
/// payment output first.
pub(crate) fn scan_whales(
    response: UnconfirmedResponse,
    threshold_btc: f64,
    price_usd: Option<f64>,
) -> Vec<WhaleTransaction> {
    let price = price_usd.filter(|p| *p > 0.0);

    response
        .txs
        .into_iter()
        .take(WHALE_SCAN_DEPTH)
        .filter_map(|tx| {
            let value_native = tx.out.first().map(|o| o.value / SATOSHI_PER_BTC).unwrap_or(0.0);
            if value_native < threshold_btc {
                return None;
            }
            Some(WhaleTransaction {
                hash: tx.hash,
                value_native,
                value_usd: price.map(|p| value_native * p),
                time: tx.time.and_then(|t| Utc.timestamp_opt(t, 0).single()),
                size: tx.size,
            })
        })
        .collect()
}
