//! Multi-chain social and blockchain data from CryptoCompare (API key
//! required, sent as an `authorization` header).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::SocialStats;

pub const BASE_URL: &str = "https://min-api.cryptocompare.com";
pub const CREDENTIAL: &str = "CRYPTOCOMPARE_API_KEY";
const TAG: SourceTag = SourceTag::CryptoCompare;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocialData {
    #[serde(rename = "Reddit")]
    reddit: RedditStats,
    #[serde(rename = "Twitter")]
    twitter: TwitterStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RedditStats {
    subscribers: u64,
    active_users: u64,
    posts_per_day: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TwitterStats {
    followers: u64,
    statuses: u64,
}

#[derive(Clone)]
pub struct CryptoCompareApi {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
}

impl CryptoCompareApi {
    pub fn new(client: RateLimitedClient, api_key: String) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    async fn call(&self, endpoint: &str, param: (&str, String)) -> Result<Value, IntelError> {
        let request = Request::get(format!("{}{}", self.base_url, endpoint))
            .query(param.0, param.1)
            .header("authorization", format!("Apikey {}", self.api_key));

        let envelope: Envelope = self.client.get_json(TAG, request).await?;
        if envelope.response != "Success" || envelope.data.is_null() {
            return Err(IntelError::no_data(format!(
                "CryptoCompare {} answered {:?}: {}",
                endpoint, envelope.response, envelope.message
            )));
        }
        Ok(envelope.data)
    }

    pub async fn social_stats(&self, coin_id: u64) -> Result<SocialStats, IntelError> {
        let data = self
            .call("/data/social/coin/latest", ("coinId", coin_id.to_string()))
            .await?;
        let social: SocialData =
            serde_json::from_value(data).map_err(|e| IntelError::malformed(TAG, e))?;

        Ok(SocialStats {
            reddit_subscribers: social.reddit.subscribers,
            reddit_active_users: social.reddit.active_users,
            reddit_posts_per_day: social.reddit.posts_per_day,
            twitter_followers: social.twitter.followers,
            twitter_statuses: social.twitter.statuses,
        })
    }

    /// Latest blockchain record for `fsym`, reduced to its numeric fields.
    pub async fn blockchain_latest(&self, fsym: &str) -> Result<BTreeMap<String, f64>, IntelError> {
        let data = self
            .call("/data/blockchain/latest", ("fsym", fsym.to_string()))
            .await?;
        Ok(numeric_fields(&data))
    }
}

fn numeric_fields(data: &Value) -> BTreeMap<String, f64> {
    data.as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}
