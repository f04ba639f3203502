//! News article model.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Community votes; only the aggregator API provides them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub positive: u32,
    pub negative: u32,
    pub important: u32,
}

impl Votes {
    pub fn is_bullish(&self) -> bool {
        self.positive > self.negative
    }

    pub fn is_bearish(&self) -> bool {
        self.negative > self.positive
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    /// Display name of the outlet ("CoinDesk", ...).
    pub source: String,
    /// Publication time exactly as delivered; format varies by source.
    pub published_raw: Option<String>,
    /// Parsed publication time, when the raw value could be parsed.
    pub published_at: Option<DateTime<Utc>>,
    /// May contain HTML.
    pub summary: Option<String>,
    pub votes: Option<Votes>,
    /// Aggregator item kind ("news", "media", ...).
    pub kind: Option<String>,
    pub currencies: Vec<String>,
    pub domain: Option<String>,
}

impl NewsArticle {
    /// Identity used when de-duplicating across sources.
    pub fn identity(&self) -> (String, &str) {
        (self.title.trim().to_lowercase(), self.source.as_str())
    }

    /// Newest first; undated articles last, in stable order.
    pub fn recency_order(a: &NewsArticle, b: &NewsArticle) -> Ordering {
        match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Parses the timestamp formats seen across news sources: RFC 3339 (API),
/// RFC 2822 (RSS) and naive `YYYY-MM-DD HH:MM:SS` (assumed UTC).
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
