//! End-to-end behavior of the hub over a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use chainlens_market_intel::http::{PacingConfig, ScriptedTransport};
use chainlens_market_intel::{
    report, AssetSymbol, IntelConfig, IntelHub, OnChainSnapshot, SentimentClass,
};
use serde_json::json;

fn hub(transport: ScriptedTransport, config: IntelConfig) -> (IntelHub, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    let config = config.with_pacing(PacingConfig::uniform(Duration::ZERO));
    (IntelHub::with_transport(&config, transport.clone()), transport)
}

fn sym(s: &str) -> AssetSymbol {
    AssetSymbol::parse(s).unwrap()
}

const DAY_MS: u64 = 86_400_000;
const T0: u64 = 1_709_251_200_000;

#[tokio::test]
async fn history_returns_every_mocked_candle() {
    let closes = [61000.0, 61500.0, 60800.0, 62200.0, 63050.5];
    let candles: Vec<_> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| json!([T0 + i as u64 * DAY_MS, close - 100.0, close + 250.0, close - 300.0, close]))
        .collect();
    let volumes: Vec<_> = (0..5).map(|i| json!([T0 + i * DAY_MS, 1.0e9 + i as f64])).collect();

    let (hub, transport) = hub(
        ScriptedTransport::new()
            .json("/coins/bitcoin/ohlc", json!(candles))
            .json("/coins/bitcoin/market_chart", json!({ "total_volumes": volumes })),
        IntelConfig::default(),
    );

    let series = hub.market().history(&sym("BTC"), 5).await.unwrap();

    assert_eq!(series.len(), 5);
    assert_eq!(series.horizon_days, 7);
    assert_eq!(series.last_close(), Some(63050.5));
    assert_eq!(series.candles[4].volume, 1.0e9 + 4.0);
    assert_eq!(transport.count_matching("/ohlc?vs_currency=usd&days=7"), 1);
    assert_eq!(transport.count_matching("/market_chart?vs_currency=usd&days=5"), 1);
    assert_eq!(transport.count_matching("/search"), 0);
}

#[tokio::test]
async fn failed_sentiment_defaults_to_neutral_with_real_aggregates() {
    let (hub, _) = hub(
        ScriptedTransport::new()
            .json(
                "/api/v3/global",
                json!({"data": {
                    "active_cryptocurrencies": 13500,
                    "markets": 1100,
                    "total_market_cap": {"usd": 2.4e12},
                    "total_volume": {"usd": 9.1e10},
                    "market_cap_change_percentage_24h_usd": -1.25,
                    "market_cap_percentage": {"btc": 52.4, "eth": 16.9}
                }}),
            )
            .fail("alternative.me/fng", "connection refused"),
        IntelConfig::default(),
    );

    let snapshot = hub.market().global_snapshot().await;

    assert_eq!(snapshot.sentiment.value, 50);
    assert_eq!(snapshot.sentiment.classification, SentimentClass::Neutral);
    assert!(!snapshot.sentiment_available);
    assert!(snapshot.aggregates_available);
    assert_eq!(snapshot.aggregates.total_market_cap_usd, 2.4e12);
    assert_eq!(snapshot.aggregates.btc_dominance, 52.4);
    assert_eq!(snapshot.diagnostics.len(), 1);

    let text = report::global_overview(&snapshot);
    assert!(text.contains("24h Market Cap Change: -1.25%"));
    assert!(text.contains("Fear & Greed Index: 50/100 (Neutral)"));
}

#[tokio::test]
async fn unmapped_generic_asset_reports_no_mapping() {
    let (hub, transport) = hub(
        ScriptedTransport::new(),
        IntelConfig::default().with_cryptocompare_key("cc-key"),
    );

    let snapshot = hub.onchain().snapshot(&sym("DOGE")).await.unwrap();

    assert!(matches!(snapshot, OnChainSnapshot::NoMapping { ref symbol } if symbol.as_str() == "DOGE"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn generic_asset_sends_key_as_authorization_header() {
    let (hub, transport) = hub(
        ScriptedTransport::new()
            .json(
                "/data/social/coin/latest",
                json!({"Response": "Success", "Data": {
                    "Reddit": {"subscribers": 250000, "active_users": 900},
                    "Twitter": {"followers": 2600000}
                }}),
            )
            .json(
                "/data/blockchain/latest",
                json!({"Response": "Error", "Message": "no blockchain data", "Data": {}}),
            ),
        IntelConfig::default().with_cryptocompare_key("cc-key"),
    );

    let snapshot = hub.onchain().snapshot(&sym("sol")).await.unwrap();
    let OnChainSnapshot::Generic(metrics) = &snapshot else {
        panic!("expected generic metrics, got {:?}", snapshot);
    };
    assert_eq!(metrics.coin_id, 699785);
    assert!(metrics.blockchain.is_empty());
    assert_eq!(metrics.social.as_ref().unwrap().twitter_followers, 2_600_000);

    let requests = transport.requests();
    assert!(requests[0].url.contains("coinId=699785"));
    assert_eq!(requests[0].header("Authorization"), Some("Apikey cc-key"));
    assert!(report::onchain(&snapshot).contains("Reddit Subscribers: 250,000"));
}

fn rss(prefix: &str, count: usize, base_day: u32) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                "<item><title>{prefix} {i}</title><link>https://{prefix}/{i}</link>\
                 <pubDate>{:02} Mar 2024 {:02}:00:00 +0000</pubDate></item>",
                base_day,
                i
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>{prefix}</title>\
         <link>https://{prefix}</link><description>d</description>{items}</channel></rss>"
    )
}

#[tokio::test]
async fn news_is_capped_per_source_and_sorted_newest_first() {
    let (hub, transport) = hub(
        ScriptedTransport::new()
            .text("cointelegraph.com/rss", rss("ct", 8, 1))
            .text("decrypt.co/feed", rss("dc", 8, 3))
            .text("coindesk.com", rss("cd", 2, 2))
            .respond("theblock.co", 503, "")
            .text("bitcoinmagazine.com", rss("bm", 4, 4))
            .json(
                "cryptopanic.com",
                json!({"results": [
                    {"title": "Panic undated", "url": "https://cp/1", "source": {"title": "CP"}, "published_at": "soon"},
                    {"title": "Panic dated", "url": "https://cp/2", "source": {"title": "CP"}, "published_at": "2024-03-05T09:00:00Z",
                     "votes": {"positive": 3, "negative": 0, "important": 1}}
                ]}),
            ),
        IntelConfig::default().with_cryptopanic_key("cp-token"),
    );

    let articles = hub.news().aggregate(Some(&sym("BTC")), 5).await;

    // 2 aggregator + 5 + 5 + 2 + 0 + 4
    assert_eq!(articles.len(), 18);
    assert_eq!(articles[0].title, "Panic dated");
    assert_eq!(articles.last().unwrap().title, "Panic undated");
    let dated: Vec<_> = articles.iter().filter_map(|a| a.published_at).collect();
    assert_eq!(dated.len(), 17);
    assert!(dated.windows(2).all(|w| w[0] >= w[1]));

    let panic_url = transport
        .requests()
        .into_iter()
        .find(|r| r.url.contains("cryptopanic"))
        .unwrap()
        .url;
    assert!(panic_url.contains("filter=hot"));
    assert!(panic_url.contains("currencies=BTC"));

    let text = report::news_digest(&articles, Some(&sym("BTC")), 24, 10);
    assert!(text.contains("1. Panic dated\n   Source: CP | 2024-03-05 09:00 | Important (1) | Bullish"));
    assert!(text.ends_with("Total Articles: 10"));
}

#[tokio::test]
async fn regulatory_news_filters_aggregated_articles() {
    let feed = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>t</title><link>https://x</link>\
        <description>d</description>\
        <item><title>SEC sues exchange</title><link>https://x/1</link></item>\
        <item><title>Price rallies</title><link>https://x/2</link><description>Traders cheer</description></item>\
        <item><title>Weekly wrap</title><link>https://x/3</link><description>Congress weighs stablecoin rules</description></item>\
        </channel></rss>";
    let (hub, transport) = hub(ScriptedTransport::new().text("decrypt.co/feed", feed), IntelConfig::default());

    let articles = hub.news().regulatory_news().await;
    let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["SEC sues exchange", "Weekly wrap"]);
    assert_eq!(transport.count_matching("bitcoinmagazine"), 0);
    assert_eq!(transport.count_matching("cryptopanic"), 0);
}
