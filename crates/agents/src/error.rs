//! Routing error types.
//!
//! These are contract violations between the caller and the router. Data
//! unavailability never shows up here; it is rendered into the tool text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Mode string is neither standard nor crypto.
    #[error("Unrecognized operating mode: {0}")]
    UnrecognizedMode(String),

    /// Role string does not name an analyst role.
    #[error("Unrecognized analyst role: {0}")]
    UnrecognizedRole(String),

    /// No operation has this name.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The operation exists but is outside the role's capability profile.
    #[error("Tool not allowed: {0}")]
    ToolNotAllowed(String),

    /// Arguments could not be decoded for the operation.
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// The session already recorded its final report.
    #[error("Session already finished")]
    SessionFinished,
}

impl RouterError {
    pub fn invalid_arguments(tool: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    /// Error code for programmatic handling by consumers.
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::UnrecognizedMode(_) => "UNRECOGNIZED_MODE",
            RouterError::UnrecognizedRole(_) => "UNRECOGNIZED_ROLE",
            RouterError::ToolNotFound(_) => "TOOL_NOT_FOUND",
            RouterError::ToolNotAllowed(_) => "TOOL_NOT_ALLOWED",
            RouterError::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            RouterError::SessionFinished => "SESSION_FINISHED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let err = RouterError::ToolNotAllowed("get_regulatory_news".to_string());
        assert_eq!(err.code(), "TOOL_NOT_ALLOWED");
        assert_eq!(err.to_string(), "Tool not allowed: get_regulatory_news");

        let err = RouterError::invalid_arguments("get_crypto_price_data", "missing field `symbol`");
        assert_eq!(err.code(), "INVALID_ARGUMENTS");
        assert!(err.to_string().contains("get_crypto_price_data"));
    }
}
