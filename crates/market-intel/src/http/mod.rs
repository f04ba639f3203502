//! Outbound HTTP plumbing: transport, per-source pacing and the shared client.

mod client;
mod rate_limiter;
#[cfg(any(test, feature = "test-util"))]
mod scripted;
mod source;
mod transport;

pub use client::{RateLimitedClient, Request, DEFAULT_TIMEOUT};
pub use rate_limiter::RateLimiter;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedTransport;
pub use source::{PacingConfig, SourceTag, COINGECKO_MIN_INTERVAL, DEFAULT_MIN_INTERVAL};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
