//! RSS / Atom news feeds.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use feed_rs::model::Entry;
use tracing::debug;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::{parse_published, NewsArticle};

/// A news feed with its own pacing tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedSource {
    pub tag: SourceTag,
    pub name: &'static str,
    pub url: &'static str,
}

pub const COINTELEGRAPH: FeedSource = FeedSource {
    tag: SourceTag::CoinTelegraph,
    name: "CoinTelegraph",
    url: "https://cointelegraph.com/rss",
};

pub const DECRYPT: FeedSource = FeedSource {
    tag: SourceTag::Decrypt,
    name: "Decrypt",
    url: "https://decrypt.co/feed",
};

pub const COINDESK: FeedSource = FeedSource {
    tag: SourceTag::CoinDesk,
    name: "CoinDesk",
    url: "https://www.coindesk.com/arc/outboundfeeds/rss/",
};

pub const THE_BLOCK: FeedSource = FeedSource {
    tag: SourceTag::TheBlock,
    name: "The Block",
    url: "https://www.theblock.co/rss.xml",
};

/// Bitcoin-only outlet; included when the asset is BTC.
pub const BITCOIN_MAGAZINE: FeedSource = FeedSource {
    tag: SourceTag::BitcoinMagazine,
    name: "Bitcoin Magazine",
    url: "https://bitcoinmagazine.com/.rss/full/",
};

/// Feeds fetched for every aggregation, in merge order.
pub const GENERAL_FEEDS: [FeedSource; 4] = [COINTELEGRAPH, DECRYPT, COINDESK, THE_BLOCK];

/// Fetch and parse one feed, keeping at most `limit` entries.
pub async fn fetch_feed(
    client: &RateLimitedClient,
    feed: FeedSource,
    limit: usize,
) -> Result<Vec<NewsArticle>, IntelError> {
    let body = client.get_text(feed.tag, Request::get(feed.url)).await?;
    let articles = parse_feed(feed, body.as_bytes(), limit)?;
    debug!("{} feed yielded {} articles", feed.name, articles.len());
    Ok(articles)
}

pub(crate) fn parse_feed(feed: FeedSource, body: &[u8], limit: usize) -> Result<Vec<NewsArticle>, IntelError> {
    // feed-rs only hands out parsed timestamps. Each date string is recorded
    // and the entry gets its index as a placeholder timestamp, so the string
    // as delivered survives and parsing goes through `parse_published`.
    let raw_dates = Rc::new(RefCell::new(Vec::<String>::new()));
    let recorder = Rc::clone(&raw_dates);
    let parser = feed_rs::parser::Builder::new()
        .timestamp_parser(move |text: &str| {
            let mut seen = recorder.borrow_mut();
            seen.push(text.trim().to_string());
            Utc.timestamp_opt(seen.len() as i64 - 1, 0).single()
        })
        .build();

    let parsed = parser.parse(body).map_err(|e| IntelError::malformed(feed.tag, e))?;
    let raw_dates = raw_dates.borrow();
    Ok(parsed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| into_article(feed, entry, &raw_dates))
        .collect())
}

fn into_article(feed: FeedSource, entry: Entry, raw_dates: &[String]) -> NewsArticle {
    let (published_raw, published_at) = match entry.published.or(entry.updated) {
        Some(slot) => match usize::try_from(slot.timestamp()).ok().and_then(|i| raw_dates.get(i)) {
            Some(raw) if raw.is_empty() => (None, None),
            Some(raw) => (Some(raw.clone()), parse_published(raw)),
            // Not routed through the recorder; already a real timestamp.
            None => (Some(slot.to_rfc3339()), Some(slot)),
        },
        None => (None, None),
    };
    let summary = entry
        .summary
        .map(|text| text.content)
        .or_else(|| entry.content.and_then(|content| content.body))
        .filter(|s| !s.trim().is_empty());

    NewsArticle {
        title: entry.title.map(|t| t.content.trim().to_string()).unwrap_or_default(),
        url: entry.links.into_iter().next().map(|l| l.href).unwrap_or_default(),
        source: feed.name.to_string(),
        published_raw,
        published_at,
        summary,
        votes: None,
        kind: None,
        currencies: Vec::new(),
        domain: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test feed</title>
    <link>https://example.com</link>
    <description>News</description>
    <item>
      <title>SEC delays decision on spot ETF</title>
      <link>https://example.com/a</link>
      <pubDate>Fri, 01 Mar 2024 12:30:00 +0000</pubDate>
      <description><![CDATA[<p>The <b>SEC</b> pushed its deadline.</p>]]></description>
    </item>
    <item>
      <title>Undated item</title>
      <link>https://example.com/b</link>
    </item>
    <item>
      <title>Third item</title>
      <link>https://example.com/c</link>
      <pubDate>Thu, 29 Feb 2024 08:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom feed</title>
  <id>urn:feed</id>
  <updated>2024-03-02T10:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:entry:1</id>
    <link href="https://example.com/atom/1"/>
    <updated>2024-03-02T10:00:00Z</updated>
    <summary>Short summary</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let articles = parse_feed(DECRYPT, RSS.as_bytes(), 10).unwrap();
        assert_eq!(articles.len(), 3);

        let first = &articles[0];
        assert_eq!(first.title, "SEC delays decision on spot ETF");
        assert_eq!(first.url, "https://example.com/a");
        assert_eq!(first.source, "Decrypt");
        assert!(first.published_at.is_some());
        assert!(first.summary.as_deref().unwrap().contains("<b>SEC</b>"));

        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_unparsable_pub_date_keeps_raw_string() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description>
  <item><title>Loose date</title><link>https://x/1</link><pubDate>March 1st, 2024 at 9am</pubDate></item>
  <item><title>Strict date</title><link>https://x/2</link><pubDate>Fri, 01 Mar 2024 12:30:00 +0000</pubDate></item>
</channel></rss>"#;
        let articles = parse_feed(DECRYPT, rss.as_bytes(), 10).unwrap();

        assert_eq!(articles[0].published_raw.as_deref(), Some("March 1st, 2024 at 9am"));
        assert!(articles[0].published_at.is_none());
        assert_eq!(
            crate::report::display_date(&articles[0]).as_deref(),
            Some("March 1st, 2024 ")
        );

        assert_eq!(
            articles[1].published_raw.as_deref(),
            Some("Fri, 01 Mar 2024 12:30:00 +0000")
        );
        assert_eq!(
            crate::report::display_date(&articles[1]).as_deref(),
            Some("2024-03-01 12:30")
        );
    }

    #[test]
    fn test_parse_respects_limit() {
        let articles = parse_feed(COINDESK, RSS.as_bytes(), 2).unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[test]
    fn test_parse_atom_uses_updated() {
        let articles = parse_feed(THE_BLOCK, ATOM.as_bytes(), 10).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://example.com/atom/1");
        assert!(articles[0].published_at.is_some());
        assert_eq!(articles[0].summary.as_deref(), Some("Short summary"));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_feed(COINTELEGRAPH, b"not xml at all", 10).unwrap_err();
        assert_eq!(err.kind(), crate::FailureKind::MalformedPayload);
    }
}
