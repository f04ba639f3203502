//! CryptoPanic news aggregator API (auth token required).

use serde::Deserialize;

use crate::errors::IntelError;
use crate::http::{RateLimitedClient, Request, SourceTag};
use crate::models::{parse_published, AssetSymbol, NewsArticle, Votes};

pub const POSTS_URL: &str = "https://cryptopanic.com/api/v1/posts/";
pub const CREDENTIAL: &str = "CRYPTOPANIC_API_KEY";
const TAG: SourceTag = SourceTag::CryptoPanic;

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    results: Vec<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    title: String,
    url: String,
    source: PostSource,
    published_at: String,
    domain: Option<String>,
    votes: Option<PostVotes>,
    kind: Option<String>,
    currencies: Option<Vec<PostCurrency>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostSource {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostVotes {
    positive: u32,
    negative: u32,
    important: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostCurrency {
    code: String,
}

#[derive(Clone)]
pub struct CryptoPanicApi {
    client: RateLimitedClient,
    url: String,
    auth_token: String,
}

impl CryptoPanicApi {
    pub fn new(client: RateLimitedClient, auth_token: String) -> Self {
        Self {
            client,
            url: POSTS_URL.to_string(),
            auth_token,
        }
    }

    /// "Hot" public posts, optionally filtered to one currency.
    pub async fn hot_posts(
        &self,
        symbol: Option<&AssetSymbol>,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, IntelError> {
        let mut request = Request::get(&self.url)
            .query("auth_token", &self.auth_token)
            .query("filter", "hot")
            .query("public", "true");
        if let Some(symbol) = symbol {
            request = request.query("currencies", symbol);
        }

        let response: PostsResponse = self.client.get_json(TAG, request).await?;
        Ok(response
            .results
            .into_iter()
            .take(limit)
            .map(into_article)
            .collect())
    }
}

fn into_article(post: Post) -> NewsArticle {
    let published_raw = Some(post.published_at).filter(|s| !s.is_empty());
    NewsArticle {
        published_at: published_raw.as_deref().and_then(parse_published),
        published_raw,
        title: post.title,
        url: post.url,
        source: post.source.title,
        summary: None,
        votes: post.votes.map(|v| Votes {
            positive: v.positive,
            negative: v.negative,
            important: v.important,
        }),
        kind: post.kind,
        currencies: post
            .currencies
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.code)
            .filter(|c| !c.is_empty())
            .collect(),
        domain: post.domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_article() {
        let response: PostsResponse = serde_json::from_str(
            r#"{"count": 1, "results": [{
                "kind": "news",
                "domain": "coindesk.com",
                "source": {"title": "CoinDesk", "region": "en", "domain": "coindesk.com"},
                "title": "Bitcoin ETF inflows hit record",
                "published_at": "2024-03-01T12:30:00Z",
                "url": "https://cryptopanic.com/news/1",
                "currencies": [{"code": "BTC", "title": "Bitcoin"}],
                "votes": {"positive": 5, "negative": 1, "important": 2, "liked": 3}
            }]}"#,
        )
        .unwrap();

        let article = into_article(response.results.into_iter().next().unwrap());
        assert_eq!(article.source, "CoinDesk");
        assert_eq!(article.currencies, vec!["BTC"]);
        assert!(article.votes.unwrap().is_bullish());
        assert!(article.published_at.is_some());
        assert_eq!(article.kind.as_deref(), Some("news"));
    }

    #[test]
    fn test_post_with_missing_fields() {
        let post: Post = serde_json::from_str(r#"{"title": "Untitled", "currencies": null, "votes": null}"#).unwrap();
        let article = into_article(post);
        assert!(article.votes.is_none());
        assert!(article.currencies.is_empty());
        assert!(article.published_raw.is_none());
        assert!(article.published_at.is_none());
    }
}
