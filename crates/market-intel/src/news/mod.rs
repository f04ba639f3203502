//! News aggregation across the optional aggregator API and public feeds.

use std::collections::HashSet;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::errors::IntelError;
use crate::http::RateLimitedClient;
use crate::models::{AssetSymbol, ChainFamily, NewsArticle};
use crate::provider::feeds::{self, FeedSource, BITCOIN_MAGAZINE, GENERAL_FEEDS};
use crate::provider::CryptoPanicApi;

/// Per-source cap used for regulatory scans.
pub const REGULATORY_MAX_PER_SOURCE: usize = 10;

/// Matched as case-insensitive substrings, so "ban" also hits "bank".
pub const REGULATORY_KEYWORDS: [&str; 16] = [
    "sec",
    "regulation",
    "regulatory",
    "ban",
    "legal",
    "lawsuit",
    "compliance",
    "government",
    "legislation",
    "policy",
    "etf",
    "securities",
    "cftc",
    "congress",
    "senate",
    "court",
];

pub struct NewsAggregator {
    client: RateLimitedClient,
    cryptopanic: Option<CryptoPanicApi>,
}

impl NewsAggregator {
    pub fn new(client: RateLimitedClient, cryptopanic: Option<CryptoPanicApi>) -> Self {
        Self { client, cryptopanic }
    }

    /// Feeds queried for `symbol`, in merge order.
    pub fn feeds_for(symbol: Option<&AssetSymbol>) -> Vec<FeedSource> {
        let mut sources = GENERAL_FEEDS.to_vec();
        if symbol.map(AssetSymbol::chain_family) == Some(ChainFamily::Bitcoin) {
            sources.push(BITCOIN_MAGAZINE);
        }
        sources
    }

    /// Articles from every source, newest first.
    ///
    /// Sources are fetched concurrently; a failing source contributes nothing.
    /// Each source yields at most `max_per_source` articles. Articles without
    /// a parseable timestamp go last.
    pub async fn aggregate(
        &self,
        symbol: Option<&AssetSymbol>,
        max_per_source: usize,
    ) -> Vec<NewsArticle> {
        let mut tasks: Vec<BoxFuture<'_, (String, Result<Vec<NewsArticle>, IntelError>)>> =
            Vec::new();

        if let Some(api) = &self.cryptopanic {
            tasks.push(
                async move {
                    let result = api.hot_posts(symbol, max_per_source).await;
                    ("CryptoPanic".to_string(), result)
                }
                .boxed(),
            );
        }

        for feed in Self::feeds_for(symbol) {
            let client = &self.client;
            tasks.push(
                async move {
                    let result = feeds::fetch_feed(client, feed, max_per_source).await;
                    (feed.name.to_string(), result)
                }
                .boxed(),
            );
        }

        let mut articles = Vec::new();
        for (source, result) in join_all(tasks).await {
            match result {
                Ok(mut batch) => {
                    batch.truncate(max_per_source);
                    articles.append(&mut batch);
                }
                Err(e) => warn!("News source {} failed: {}", source, e),
            }
        }

        articles.sort_by(NewsArticle::recency_order);
        debug!("Aggregated {} news articles", articles.len());
        articles
    }

    /// Regulatory-looking articles from an unfiltered aggregation.
    pub async fn regulatory_news(&self) -> Vec<NewsArticle> {
        let articles = self.aggregate(None, REGULATORY_MAX_PER_SOURCE).await;
        regulatory_filter(&articles)
    }
}

pub fn is_regulatory(article: &NewsArticle) -> bool {
    let haystack = format!(
        "{} {}",
        article.title,
        article.summary.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    REGULATORY_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

/// Articles whose title or summary mentions a regulatory keyword, order kept.
pub fn regulatory_filter(articles: &[NewsArticle]) -> Vec<NewsArticle> {
    articles.iter().filter(|a| is_regulatory(a)).cloned().collect()
}

/// Drop later articles sharing a (title, source) identity. Aggregation does
/// not apply this; callers opt in.
pub fn dedup_by_identity(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| {
            let (title, source) = a.identity();
            seen.insert((title, source.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RateLimiter, ScriptedTransport};
    use std::sync::Arc;
    use std::time::Duration;

    fn article(title: &str, summary: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            summary: summary.map(str::to_string),
            source: "Test".to_string(),
            ..Default::default()
        }
    }

    fn rss(items: &[(&str, Option<&str>)]) -> String {
        let body: String = items
            .iter()
            .map(|(title, date)| match date {
                Some(d) => format!("<item><title>{}</title><link>https://x/{}</link><pubDate>{}</pubDate></item>", title, title.len(), d),
                None => format!("<item><title>{}</title><link>https://x/{}</link></item>", title, title.len()),
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description>{}</channel></rss>"#,
            body
        )
    }

    fn aggregator(transport: ScriptedTransport) -> (NewsAggregator, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let client = RateLimitedClient::new(
            transport.clone(),
            Arc::new(RateLimiter::unpaced()),
            Duration::from_secs(5),
        );
        (NewsAggregator::new(client, None), transport)
    }

    #[test]
    fn test_regulatory_filter_matches_case_insensitively() {
        let articles = vec![
            article("sec approves spot ETF", None),
            article("Bitcoin hits new high", None),
            article("Market update", Some("Senators discuss new legislation")),
            article("Whale moves coins", Some("Large transfer spotted")),
        ];
        let filtered = regulatory_filter(&articles);
        let titles: Vec<_> = filtered.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["sec approves spot ETF", "Market update"]);
    }

    #[test]
    fn test_regulatory_partial_word_match() {
        assert!(is_regulatory(&article("Bank partners with exchange", None)));
        assert!(!is_regulatory(&article("Hash rate climbs", None)));
    }

    #[test]
    fn test_bitcoin_magazine_only_for_btc() {
        let btc = AssetSymbol::parse("BTC").unwrap();
        let eth = AssetSymbol::parse("ETH").unwrap();
        assert_eq!(NewsAggregator::feeds_for(Some(&btc)).len(), 5);
        assert_eq!(NewsAggregator::feeds_for(Some(&eth)).len(), 4);
        assert_eq!(NewsAggregator::feeds_for(None).len(), 4);
    }

    #[test]
    fn test_dedup_by_identity() {
        let articles = vec![
            article("Same Title", None),
            article("same title ", None),
            article("Other", None),
        ];
        assert_eq!(dedup_by_identity(articles).len(), 2);
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let (news, transport) = aggregator(
            ScriptedTransport::new()
                .text("cointelegraph.com", rss(&[("A", Some("Fri, 01 Mar 2024 12:00:00 +0000"))]))
                .fail("decrypt.co", "connection reset")
                .text("coindesk.com", "not a feed")
                .text("theblock.co", rss(&[("B", Some("Sat, 02 Mar 2024 12:00:00 +0000"))])),
        );

        let articles = news.aggregate(None, 5).await;
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_caps_and_undated_last() {
        let feed = rss(&[
            ("Undated", None),
            ("Old", Some("Thu, 29 Feb 2024 08:00:00 +0000")),
            ("New", Some("Fri, 01 Mar 2024 08:00:00 +0000")),
        ]);
        let (news, _) = aggregator(ScriptedTransport::new().text("cointelegraph.com", feed));

        let articles = news.aggregate(None, 2).await;
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Old", "Undated"]);
    }
}
