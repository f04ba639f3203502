//! CoinGecko market data provider.
//!
//! Endpoints used:
//! - `/search` for ticker to coin id resolution
//! - `/coins/{id}` for the current market snapshot
//! - `/coins/{id}/ohlc` for candles (discrete horizons only)
//! - `/coins/{id}/market_chart` for volumes
//! - `/global` and `/search/trending`
//!
//! The free tier needs roughly 1.2 s between calls; pacing lives in the
//! shared [`RateLimitedClient`].
//! API documentation: https://docs.coingecko.com/reference/introduction

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::{AssetSymbol, Candle, MarketAggregates, PriceSnapshot, TrendingCoin};

pub const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const API_KEY_HEADER: &str = "x-cg-pro-api-key";
const TAG: SourceTag = SourceTag::CoinGecko;
const VS_CURRENCY: &str = "usd";

// ============================================================================
// API Response Structures
// ============================================================================

/// Per-currency values, e.g. `{"usd": 64000.0, "eur": 59000.0}`. Individual
/// values may be null.
type CurrencyMap<T> = Option<HashMap<String, Option<T>>>;

fn usd<T: Clone>(map: &CurrencyMap<T>) -> Option<T> {
    map.as_ref()
        .and_then(|m| m.get(VS_CURRENCY))
        .and_then(|v| v.clone())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    #[serde(default)]
    id: String,
}

/// Response from /coins/{id}
#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    name: String,
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CoinMarketData {
    current_price: CurrencyMap<f64>,
    market_cap: CurrencyMap<f64>,
    market_cap_rank: Option<u32>,
    total_volume: CurrencyMap<f64>,
    price_change_24h: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_30d: Option<f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    max_supply: Option<f64>,
    ath: CurrencyMap<f64>,
    ath_change_percentage: CurrencyMap<f64>,
    ath_date: CurrencyMap<String>,
    atl: CurrencyMap<f64>,
    atl_change_percentage: CurrencyMap<f64>,
    atl_date: CurrencyMap<String>,
}

/// Response from /coins/{id}/market_chart
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    total_volumes: Vec<Vec<Option<f64>>>,
}

/// Response from /global
#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: Option<GlobalData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GlobalData {
    active_cryptocurrencies: u64,
    markets: u64,
    total_market_cap: CurrencyMap<f64>,
    total_volume: CurrencyMap<f64>,
    market_cap_change_percentage_24h_usd: Option<f64>,
    market_cap_percentage: Option<HashMap<String, f64>>,
}

/// Response from /search/trending
#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TrendingItem {
    symbol: String,
    name: String,
    market_cap_rank: Option<u32>,
    price_btc: Option<f64>,
}

// ============================================================================
// CoinGeckoApi
// ============================================================================

/// Thin typed wrapper over the CoinGecko REST API.
#[derive(Clone)]
pub struct CoinGeckoApi {
    client: RateLimitedClient,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoApi {
    pub fn new(client: RateLimitedClient, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, endpoint: &str) -> Request {
        let request = Request::get(format!("{}{}", self.base_url, endpoint));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.clone()),
            None => request,
        }
    }

    /// First coin id returned by `/search`, if any.
    pub async fn search_first_id(&self, query: &str) -> Result<Option<String>, IntelError> {
        let response: SearchResponse = self
            .client
            .get_json(TAG, self.request("/search").query("query", query))
            .await?;

        Ok(response
            .coins
            .into_iter()
            .map(|c| c.id)
            .find(|id| !id.is_empty()))
    }

    /// Current market snapshot for a resolved coin id.
    pub async fn coin_snapshot(
        &self,
        symbol: &AssetSymbol,
        coin_id: &str,
    ) -> Result<PriceSnapshot, IntelError> {
        let request = self
            .request(&format!("/coins/{}", coin_id))
            .query("localization", "false")
            .query("tickers", "false")
            .query("market_data", "true")
            .query("community_data", "false")
            .query("developer_data", "false");

        let response: CoinResponse = self.client.get_json(TAG, request).await?;
        parse_snapshot(symbol, response)
    }

    /// Candles for one of the accepted horizons.
    pub async fn ohlc(&self, coin_id: &str, horizon_days: u32) -> Result<Vec<Candle>, IntelError> {
        let request = self
            .request(&format!("/coins/{}/ohlc", coin_id))
            .query("vs_currency", VS_CURRENCY)
            .query("days", horizon_days);

        let rows: Vec<Vec<Option<f64>>> = self.client.get_json(TAG, request).await?;
        let candles = parse_ohlc(rows);
        debug!("CoinGecko returned {} candles for {}", candles.len(), coin_id);
        Ok(candles)
    }

    /// Total volume points over `days` (capped at 365).
    pub async fn total_volumes(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Vec<(DateTime<Utc>, f64)>, IntelError> {
        let request = self
            .request(&format!("/coins/{}/market_chart", coin_id))
            .query("vs_currency", VS_CURRENCY)
            .query("days", days.min(365));

        let response: MarketChartResponse = self.client.get_json(TAG, request).await?;
        Ok(response
            .total_volumes
            .into_iter()
            .filter_map(|point| match point.as_slice() {
                [Some(ts), Some(volume), ..] => millis_to_utc(*ts).map(|ts| (ts, *volume)),
                _ => None,
            })
            .collect())
    }

    /// Market-wide totals and dominance.
    pub async fn global(&self) -> Result<MarketAggregates, IntelError> {
        let response: GlobalResponse = self.client.get_json(TAG, self.request("/global")).await?;
        let data = response
            .data
            .ok_or_else(|| IntelError::no_data("CoinGecko /global returned no data"))?;

        let dominance = data.market_cap_percentage.unwrap_or_default();
        Ok(MarketAggregates {
            total_market_cap_usd: usd(&data.total_market_cap).unwrap_or_default(),
            total_volume_usd: usd(&data.total_volume).unwrap_or_default(),
            market_cap_change_pct_24h: data.market_cap_change_percentage_24h_usd.unwrap_or_default(),
            btc_dominance: dominance.get("btc").copied().unwrap_or_default(),
            eth_dominance: dominance.get("eth").copied().unwrap_or_default(),
            active_cryptocurrencies: data.active_cryptocurrencies,
            markets: data.markets,
        })
    }

    /// Trending coins in upstream order.
    pub async fn trending(&self) -> Result<Vec<TrendingCoin>, IntelError> {
        let response: TrendingResponse = self
            .client
            .get_json(TAG, self.request("/search/trending"))
            .await?;

        Ok(response
            .coins
            .into_iter()
            .map(|entry| TrendingCoin {
                symbol: entry.item.symbol,
                name: entry.item.name,
                market_cap_rank: entry.item.market_cap_rank,
                price_btc: entry.item.price_btc.unwrap_or_default(),
            })
            .collect())
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn millis_to_utc(ms: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms as i64).single()
}

fn parse_snapshot(symbol: &AssetSymbol, response: CoinResponse) -> Result<PriceSnapshot, IntelError> {
    let md = response
        .market_data
        .ok_or_else(|| IntelError::no_data(format!("No market data for {}", symbol)))?;

    Ok(PriceSnapshot {
        symbol: symbol.to_string(),
        name: response.name,
        current_price: usd(&md.current_price).unwrap_or_default(),
        market_cap: usd(&md.market_cap).unwrap_or_default(),
        market_cap_rank: md.market_cap_rank,
        total_volume: usd(&md.total_volume).unwrap_or_default(),
        price_change_24h: md.price_change_24h.unwrap_or_default(),
        price_change_pct_24h: md.price_change_percentage_24h.unwrap_or_default(),
        price_change_pct_7d: md.price_change_percentage_7d.unwrap_or_default(),
        price_change_pct_30d: md.price_change_percentage_30d.unwrap_or_default(),
        circulating_supply: md.circulating_supply.unwrap_or_default(),
        total_supply: md.total_supply.unwrap_or_default(),
        max_supply: md.max_supply.filter(|v| *v > 0.0),
        ath: usd(&md.ath).unwrap_or_default(),
        ath_change_pct: usd(&md.ath_change_percentage).unwrap_or_default(),
        ath_date: usd(&md.ath_date).filter(|d| !d.is_empty()),
        atl: usd(&md.atl).unwrap_or_default(),
        atl_change_pct: usd(&md.atl_change_percentage).unwrap_or_default(),
        atl_date: usd(&md.atl_date).filter(|d| !d.is_empty()),
    })
}

/// Rows are `[timestamp_ms, open, high, low, close]`; incomplete rows are skipped.
fn parse_ohlc(rows: Vec<Vec<Option<f64>>>) -> Vec<Candle> {
    rows.into_iter()
        .filter_map(|row| match row.as_slice() {
            [Some(ts), Some(open), Some(high), Some(low), Some(close), ..] => {
                millis_to_utc(*ts).map(|timestamp| Candle {
                    timestamp,
                    open: *open,
                    high: *high,
                    low: *low,
                    close: *close,
                    volume: 0.0,
                })
            }
            _ => None,
        })
        .collect()
}
