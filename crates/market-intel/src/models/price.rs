//! Price, candle and market-wide aggregate models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::AssetSymbol;

/// Candle horizons (in days) accepted by the OHLC endpoint.
pub const CANDLE_HORIZONS: [u32; 7] = [1, 7, 14, 30, 90, 180, 365];

/// Nearest accepted candle horizon for `days`. Ties go to the smaller value.
pub fn nearest_horizon(days: u32) -> u32 {
    CANDLE_HORIZONS
        .iter()
        .copied()
        .min_by_key(|h| (h.abs_diff(days), *h))
        .unwrap_or(1)
}

/// Last known market figures for one asset, all from a single fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: Option<u32>,
    pub total_volume: f64,
    pub price_change_24h: f64,
    pub price_change_pct_24h: f64,
    pub price_change_pct_7d: f64,
    pub price_change_pct_30d: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    /// `None` means no hard cap.
    pub max_supply: Option<f64>,
    pub ath: f64,
    pub ath_change_pct: f64,
    pub ath_date: Option<String>,
    pub atl: f64,
    pub atl_change_pct: f64,
    pub atl_date: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candles ascending by timestamp, one row per period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvSeries {
    pub symbol: AssetSymbol,
    /// Window the caller asked for.
    pub requested_days: u32,
    /// Horizon actually sent to the candle endpoint.
    pub horizon_days: u32,
    pub candles: Vec<Candle>,
}

impl OhlcvSeries {
    /// Builds a series, sorting candles and collapsing duplicate timestamps
    /// (last one wins). Volumes start at zero.
    pub fn new(symbol: AssetSymbol, requested_days: u32, horizon_days: u32, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by(|later, earlier| {
            if later.timestamp == earlier.timestamp {
                *earlier = *later;
                true
            } else {
                false
            }
        });

        Self {
            symbol,
            requested_days,
            horizon_days,
            candles,
        }
    }

    /// Left-joins volume points onto the candles by exact timestamp.
    ///
    /// Candles without a matching point get zero. The volume column is
    /// overwritten, never accumulated, so merging the same data twice is a
    /// no-op.
    pub fn merge_volumes(&mut self, volumes: &[(DateTime<Utc>, f64)]) {
        let by_ts: HashMap<i64, f64> = volumes
            .iter()
            .map(|(ts, v)| (ts.timestamp_millis(), *v))
            .collect();

        for candle in &mut self.candles {
            candle.volume = by_ts
                .get(&candle.timestamp.timestamp_millis())
                .copied()
                .unwrap_or(0.0);
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.candles.first().map(|c| c.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// Percent change from the first to the last close.
    pub fn change_pct(&self) -> Option<f64> {
        match (self.first_close(), self.last_close()) {
            (Some(first), Some(last)) if first != 0.0 => Some((last - first) / first * 100.0),
            _ => None,
        }
    }

    pub fn max_high(&self) -> Option<f64> {
        self.candles.iter().map(|c| c.high).reduce(f64::max)
    }

    pub fn min_low(&self) -> Option<f64> {
        self.candles.iter().map(|c| c.low).reduce(f64::min)
    }

    pub fn average_volume(&self) -> Option<f64> {
        if self.candles.is_empty() {
            return None;
        }
        let total: f64 = self.candles.iter().map(|c| c.volume).sum();
        Some(total / self.candles.len() as f64)
    }
}

/// Five-bucket market mood classification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SentimentClass {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentClass {
    pub fn from_value(value: u8) -> Self {
        match value {
            0..=24 => Self::ExtremeFear,
            25..=44 => Self::Fear,
            45..=55 => Self::Neutral,
            56..=75 => Self::Greed,
            _ => Self::ExtremeGreed,
        }
    }

    /// Parses an upstream label ("Extreme Fear", "greed", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "extremefear" => Some(Self::ExtremeFear),
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            "extremegreed" => Some(Self::ExtremeGreed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ExtremeFear => "Extreme Fear",
            Self::Fear => "Fear",
            Self::Neutral => "Neutral",
            Self::Greed => "Greed",
            Self::ExtremeGreed => "Extreme Greed",
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Market sentiment score on a 0-100 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentIndex {
    pub value: u8,
    pub classification: SentimentClass,
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds until the provider publishes the next value.
    pub time_until_update: Option<u64>,
}

impl SentimentIndex {
    pub const NEUTRAL_VALUE: u8 = 50;

    /// Value 50, "Neutral". Used whenever the sentiment source fails.
    pub fn neutral() -> Self {
        Self {
            value: Self::NEUTRAL_VALUE,
            classification: SentimentClass::Neutral,
            timestamp: None,
            time_until_update: None,
        }
    }
}

impl Default for SentimentIndex {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Market-wide totals from the aggregates endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAggregates {
    pub total_market_cap_usd: f64,
    pub total_volume_usd: f64,
    pub market_cap_change_pct_24h: f64,
    pub btc_dominance: f64,
    pub eth_dominance: f64,
    pub active_cryptocurrencies: u64,
    pub markets: u64,
}

/// Aggregates plus sentiment. The two halves come from different upstreams
/// and are not time-aligned; each half falls back to defaults on failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMarketSnapshot {
    pub aggregates: MarketAggregates,
    pub aggregates_available: bool,
    pub sentiment: SentimentIndex,
    pub sentiment_available: bool,
    /// One entry per failed sub-call.
    pub diagnostics: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCoin {
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
    pub price_btc: f64,
}
