//! Crypto Fear & Greed index from alternative.me.

use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::{SentimentClass, SentimentIndex};

pub const FNG_URL: &str = "https://api.alternative.me/fng/";
const TAG: SourceTag = SourceTag::AlternativeMe;

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

/// All fields arrive as strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FngEntry {
    value: String,
    value_classification: String,
    timestamp: String,
    time_until_update: Option<String>,
}

#[derive(Clone)]
pub struct FearGreedApi {
    client: RateLimitedClient,
    url: String,
}

impl FearGreedApi {
    pub fn new(client: RateLimitedClient) -> Self {
        Self {
            client,
            url: FNG_URL.to_string(),
        }
    }

    pub async fn latest(&self) -> Result<SentimentIndex, IntelError> {
        let response: FngResponse = self.client.get_json(TAG, Request::get(&self.url)).await?;
        let entry = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| IntelError::no_data("Fear & Greed index returned no entries"))?;
        parse_entry(entry)
    }
}

fn parse_entry(entry: FngEntry) -> Result<SentimentIndex, IntelError> {
    let value = entry
        .value
        .trim()
        .parse::<u32>()
        .map_err(|e| IntelError::malformed(TAG, format!("value {:?}: {}", entry.value, e)))?
        .min(100) as u8;

    let classification = SentimentClass::from_label(&entry.value_classification)
        .unwrap_or_else(|| SentimentClass::from_value(value));

    let timestamp = entry
        .timestamp
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

    let time_until_update = entry
        .time_until_update
        .and_then(|s| s.trim().parse::<u64>().ok());

    Ok(SentimentIndex {
        value,
        classification,
        timestamp,
        time_until_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        let response: FngResponse = serde_json::from_str(
            r#"{"name":"Fear and Greed Index","data":[{"value":"72","value_classification":"Greed","timestamp":"1700000000","time_until_update":"3600"}],"metadata":{"error":null}}"#,
        )
        .unwrap();
        let index = parse_entry(response.data.into_iter().next().unwrap()).unwrap();
        assert_eq!(index.value, 72);
        assert_eq!(index.classification, SentimentClass::Greed);
        assert_eq!(index.timestamp.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(index.time_until_update, Some(3600));
    }

    #[test]
    fn test_unknown_label_falls_back_to_value() {
        let entry = FngEntry {
            value: "10".to_string(),
            value_classification: "Panic".to_string(),
            ..Default::default()
        };
        let index = parse_entry(entry).unwrap();
        assert_eq!(index.classification, SentimentClass::ExtremeFear);
        assert_eq!(index.timestamp, None);
    }

    #[test]
    fn test_non_numeric_value_is_malformed() {
        let entry = FngEntry {
            value: "n/a".to_string(),
            ..Default::default()
        };
        assert!(matches!(parse_entry(entry), Err(IntelError::MalformedPayload { .. })));
    }
}
