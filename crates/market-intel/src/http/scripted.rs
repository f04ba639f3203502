//! In-memory transport with canned answers.
//!
//! Routes are matched by substring against the final request URL; when
//! several routes match, the longest pattern wins. Unmatched requests answer
//! 404. Every request is recorded so callers can assert on call counts.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Clone, Debug)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

#[derive(Clone, Debug)]
struct Route {
    pattern: String,
    reply: Reply,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            reply: Reply::Respond(HttpResponse {
                status,
                body: body.into(),
            }),
        });
        self
    }

    pub fn json(self, pattern: &str, value: serde_json::Value) -> Self {
        self.respond(pattern, 200, value.to_string())
    }

    pub fn text(self, pattern: &str, body: impl Into<String>) -> Self {
        self.respond(pattern, 200, body)
    }

    /// Transport-level failure (no HTTP answer at all).
    pub fn fail(mut self, pattern: &str, message: &str) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            reply: Reply::Fail(message.to_string()),
        });
        self
    }

    /// Never answers; exercises the caller's timeout.
    pub fn hang(mut self, pattern: &str) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            reply: Reply::Hang,
        });
        self
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<HttpRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock_requests().clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Number of recorded requests whose URL contains `pattern`.
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.lock_requests()
            .iter()
            .filter(|r| r.url.contains(pattern))
            .count()
    }

    fn route_for(&self, url: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|route| url.contains(&route.pattern))
            .max_by_key(|route| route.pattern.len())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        self.lock_requests().push(request.clone());

        match self.route_for(&request.url).map(|route| route.reply.clone()) {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(message),
            Some(Reply::Hang) => {
                std::future::pending::<()>().await;
                Err("unreachable".to_string())
            }
            None => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}
