//! Rate-limited, timeout-bounded GET client shared by every provider.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::rate_limiter::RateLimiter;
use super::source::SourceTag;
use super::transport::{HttpRequest, Transport};
use crate::errors::IntelError;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A GET request under construction.
#[derive(Clone, Debug)]
pub struct Request {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// URL without the query string; safe to log.
    pub fn path(&self) -> &str {
        &self.url
    }

    fn build(self) -> HttpRequest {
        let url = if self.query.is_empty() {
            self.url
        } else {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            let separator = if self.url.contains('?') { '&' } else { '?' };
            format!("{}{}{}", self.url, separator, query)
        };

        HttpRequest {
            url,
            headers: self.headers,
        }
    }
}

/// GET client that paces requests per [`SourceTag`] and bounds each call by
/// a timeout.
///
/// Failures come back as [`IntelError`] values; nothing here panics.
#[derive(Clone)]
pub struct RateLimitedClient {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    timeout: Duration,
}

impl RateLimitedClient {
    pub fn new(transport: Arc<dyn Transport>, limiter: Arc<RateLimiter>, timeout: Duration) -> Self {
        Self {
            transport,
            limiter,
            timeout,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the body as text. Status >= 400 is an error.
    pub async fn get_text(&self, tag: SourceTag, request: Request) -> Result<String, IntelError> {
        let path = request.path().to_string();
        let request = request.build();

        self.limiter.acquire(tag).await;
        debug!("{} request: {}", tag, path);

        let response = match tokio::time::timeout(self.timeout, self.transport.execute(&request)).await {
            Err(_) => {
                warn!("{} request timed out after {:?}: {}", tag, self.timeout, path);
                return Err(IntelError::Timeout { tag });
            }
            Ok(Err(message)) => {
                warn!("{} request failed: {} ({})", tag, path, message);
                return Err(IntelError::Transport { tag, message });
            }
            Ok(Ok(response)) => response,
        };

        if response.status >= 400 {
            warn!("{} returned HTTP {} for {}", tag, response.status, path);
            return Err(IntelError::UpstreamStatus {
                tag,
                status: response.status,
            });
        }

        Ok(response.body)
    }

    /// Fetch and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        tag: SourceTag,
        request: Request,
    ) -> Result<T, IntelError> {
        let body = self.get_text(tag, request).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("{} returned an unexpected payload: {}", tag, e);
            IntelError::malformed(tag, e)
        })
    }
}
