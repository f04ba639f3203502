use std::fmt::Write;

use crate::models::{
    GlobalMarketSnapshot, OhlcvSeries, PriceSnapshot, SentimentIndex, TrendingCoin,
};

use super::format::{grouped, grouped_int, signed_pct, usd};

fn date_prefix(date: Option<&str>) -> String {
    date.map(|d| d.chars().take(10).collect())
        .filter(|d: &String| !d.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn market_snapshot(s: &PriceSnapshot) -> String {
    let rank = s
        .market_cap_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let max_supply = s
        .max_supply
        .map(|m| grouped(m, 0))
        .unwrap_or_else(|| "Unlimited".to_string());

    format!(
        "=== {name} ({symbol}) Market Data ===

Current Price: {price}
Market Cap: {mcap} (Rank #{rank})
24h Volume: {volume}

Price Changes:
  24h: {c24}
  7d:  {c7}
  30d: {c30}

Supply:
  Circulating: {circ}
  Total: {total}
  Max: {max_supply}

All-Time High: {ath} ({ath_pct} from ATH)
  Date: {ath_date}

All-Time Low: {atl} ({atl_pct} from ATL)
  Date: {atl_date}",
        name = s.name,
        symbol = s.symbol,
        price = usd(s.current_price, 2),
        mcap = usd(s.market_cap, 0),
        volume = usd(s.total_volume, 0),
        c24 = signed_pct(s.price_change_pct_24h),
        c7 = signed_pct(s.price_change_pct_7d),
        c30 = signed_pct(s.price_change_pct_30d),
        circ = grouped(s.circulating_supply, 0),
        total = grouped(s.total_supply, 0),
        ath = usd(s.ath, 2),
        ath_pct = signed_pct(s.ath_change_pct),
        ath_date = date_prefix(s.ath_date.as_deref()),
        atl = usd(s.atl, 2),
        atl_pct = signed_pct(s.atl_change_pct),
        atl_date = date_prefix(s.atl_date.as_deref()),
    )
}

/// Summary of a candle series. `days` is the caller's requested window.
pub fn price_history(series: &OhlcvSeries, days: u32) -> String {
    format!(
        "Price History ({days} days):
  Current: {current}
  Change: {change}
  High: {high}
  Low: {low}
  Avg Volume: {volume}",
        current = usd(series.last_close().unwrap_or_default(), 2),
        change = signed_pct(series.change_pct().unwrap_or_default()),
        high = usd(series.max_high().unwrap_or_default(), 2),
        low = usd(series.min_low().unwrap_or_default(), 2),
        volume = usd(series.average_volume().unwrap_or_default(), 0),
    )
}

/// Market-wide overview. Each half degrades on its own: missing aggregates
/// are called out, a defaulted sentiment is marked as such.
pub fn global_overview(g: &GlobalMarketSnapshot) -> String {
    let mut out = String::from("=== Global Crypto Market Overview ===\n\n");

    if g.aggregates_available {
        let a = &g.aggregates;
        let _ = write!(
            out,
            "Total Market Cap: {}
24h Market Cap Change: {}
Total 24h Volume: {}

Market Dominance:
  Bitcoin: {:.2}%
  Ethereum: {:.2}%

Active Cryptocurrencies: {}
Active Markets: {}

",
            usd(a.total_market_cap_usd, 0),
            signed_pct(a.market_cap_change_pct_24h),
            usd(a.total_volume_usd, 0),
            a.btc_dominance,
            a.eth_dominance,
            grouped_int(a.active_cryptocurrencies),
            grouped_int(a.markets),
        );
    } else {
        out.push_str("Could not fetch global market data\n\n");
    }

    let _ = write!(
        out,
        "Fear & Greed Index: {}/100 ({})",
        g.sentiment.value, g.sentiment.classification
    );
    if !g.sentiment_available {
        out.push_str(" [default, source unavailable]");
    }
    out
}

pub fn fear_greed(index: &SentimentIndex) -> String {
    format!(
        "=== Crypto Fear & Greed Index ===

Current Value: {value}/100
Classification: {class}

Interpretation:
- This index measures market sentiment on a 0-100 scale
- Current reading suggests: {class} market conditions",
        value = index.value,
        class = index.classification,
    )
}

pub fn trending(coins: &[TrendingCoin]) -> String {
    if coins.is_empty() {
        return "No trending coins data available".to_string();
    }

    let mut out = format!("=== Top {} Trending Cryptocurrencies ===\n", coins.len());
    for (i, coin) in coins.iter().enumerate() {
        let rank = coin
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = write!(
            out,
            "\n{}. {} ({})\n   Market Cap Rank: #{}\n   Price (BTC): {:.8} BTC\n",
            i + 1,
            coin.name,
            coin.symbol,
            rank,
            coin.price_btc
        );
    }
    out.trim_end().to_string()
}
