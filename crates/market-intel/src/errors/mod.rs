//! Error types and failure classification for the market intel crate.
//!
//! This module provides:
//! - [`IntelError`]: The error enum returned by every client operation
//! - [`FailureKind`]: The five-way classification callers use for diagnostics

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

use crate::http::SourceTag;

/// Errors that can occur while fetching market intelligence.
///
/// None of these are fatal. Callers are expected to match on the result and
/// degrade (placeholder text, omitted section, neutral default).
#[derive(Error, Debug)]
pub enum IntelError {
    /// The request never produced a response (connect/DNS/TLS failure).
    #[error("Transport error: {tag} - {message}")]
    Transport {
        /// Upstream the request was tagged with
        tag: SourceTag,
        /// Error message from the transport
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {tag}")]
    Timeout {
        /// Upstream that timed out
        tag: SourceTag,
    },

    /// The upstream answered with HTTP status >= 400.
    #[error("Upstream status {status}: {tag}")]
    UpstreamStatus {
        /// Upstream that returned the status
        tag: SourceTag,
        /// HTTP status code
        status: u16,
    },

    /// The body could not be decoded into the expected shape.
    #[error("Malformed payload from {tag}: {message}")]
    MalformedPayload {
        /// Upstream that produced the body
        tag: SourceTag,
        /// Decoder message
        message: String,
    },

    /// A provider credential is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// The upstream answered but there was nothing usable in it.
    #[error("No data: {0}")]
    NoData(String),

    /// The ticker could not be parsed.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

impl IntelError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainlens_market_intel::errors::{FailureKind, IntelError};
    /// use chainlens_market_intel::http::SourceTag;
    ///
    /// let error = IntelError::Timeout { tag: SourceTag::CoinGecko };
    /// assert_eq!(error.kind(), FailureKind::Transport);
    ///
    /// let error = IntelError::MissingCredential("ETHERSCAN_API_KEY");
    /// assert_eq!(error.kind(), FailureKind::MissingCredential);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => FailureKind::Transport,
            Self::UpstreamStatus { .. } => FailureKind::UpstreamStatus,
            Self::MalformedPayload { .. } => FailureKind::MalformedPayload,
            Self::MissingCredential(_) => FailureKind::MissingCredential,
            Self::NoData(_) | Self::InvalidSymbol(_) => FailureKind::NoData,
        }
    }

    /// Short `kind: message` string suitable for a diagnostics list.
    pub fn diagnostic(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }

    pub(crate) fn malformed(tag: SourceTag, err: impl std::fmt::Display) -> Self {
        Self::MalformedPayload {
            tag,
            message: err.to_string(),
        }
    }

    pub(crate) fn no_data(message: impl Into<String>) -> Self {
        Self::NoData(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_and_timeout_share_kind() {
        let transport = IntelError::Transport {
            tag: SourceTag::BlockchainCom,
            message: "connection refused".to_string(),
        };
        let timeout = IntelError::Timeout {
            tag: SourceTag::BlockchainCom,
        };
        assert_eq!(transport.kind(), FailureKind::Transport);
        assert_eq!(timeout.kind(), FailureKind::Transport);
    }

    #[test]
    fn test_upstream_status_kind() {
        let error = IntelError::UpstreamStatus {
            tag: SourceTag::CoinGecko,
            status: 429,
        };
        assert_eq!(error.kind(), FailureKind::UpstreamStatus);
        assert_eq!(error.to_string(), "Upstream status 429: coingecko");
    }

    #[test]
    fn test_malformed_payload_kind() {
        let error = IntelError::malformed(SourceTag::Etherscan, "expected value at line 1");
        assert_eq!(error.kind(), FailureKind::MalformedPayload);
    }

    #[test]
    fn test_missing_credential_kind() {
        let error = IntelError::MissingCredential("CRYPTOCOMPARE_API_KEY");
        assert_eq!(error.kind(), FailureKind::MissingCredential);
        assert!(error.to_string().contains("CRYPTOCOMPARE_API_KEY"));
        assert_eq!(
            error.diagnostic(),
            "missing-credential: Missing credential: CRYPTOCOMPARE_API_KEY"
        );
    }

    #[test]
    fn test_no_data_kind() {
        assert_eq!(IntelError::no_data("empty").kind(), FailureKind::NoData);
        assert_eq!(
            IntelError::InvalidSymbol(String::new()).kind(),
            FailureKind::NoData
        );
    }

    #[test]
    fn test_diagnostic_prefix() {
        let error = IntelError::Timeout {
            tag: SourceTag::AlternativeMe,
        };
        assert_eq!(error.diagnostic(), "transport: Timeout: alternative.me");
    }
}
