//! Unified error types for the send core
//!
//! Every failure inside the core is a `HawalaError`. The orchestrator is the
//! only place that turns them into user-facing strings (see `send::result`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw message a signer reports when the user (or a hardware device)
/// rejects a signing request.
pub const TRANSACTION_DECLINED: &str = "Transaction declined";

/// Message shown to the user in place of [`TRANSACTION_DECLINED`].
pub const TX_DECLINED_USER_MESSAGE: &str = "Transaction declined by the user.";

/// Upper bound, in characters, for any raw error text surfaced to the UI.
pub const MAX_ERROR_MESSAGE_LEN: usize = 200;

/// Main error type for all send operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HawalaError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl HawalaError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, msg)
    }

    pub fn unsupported_chain(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedChain, msg)
    }

    pub fn channel_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ChannelUnavailable, msg)
    }

    pub fn signer_declined() -> Self {
        Self::new(ErrorCode::SignerDeclined, TRANSACTION_DECLINED)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn handler_init(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::HandlerInit, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// A signer rejection, reported either through the dedicated code or
    /// through the raw message of a client that only returns text.
    pub fn is_signer_declined(&self) -> bool {
        self.code == ErrorCode::SignerDeclined || self.message == TRANSACTION_DECLINED
    }

    /// Whether the user can fix this by changing their input or choice.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.code, ErrorCode::HandlerInit | ErrorCode::Internal)
    }
}

impl fmt::Display for HawalaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for HawalaError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    Validation,
    InvalidAddress,
    InvalidAmount,

    // Routing errors
    UnsupportedChain,
    ChannelUnavailable,

    // Signing / broadcast errors
    SignerDeclined,
    NetworkError,
    HandlerInit,

    // Parse errors
    ParseError,
    JsonError,
    ConfigError,

    // Internal
    Internal,
}

/// Result type alias for send operations
pub type HawalaResult<T> = Result<T, HawalaError>;

// Conversions from common error types

impl From<serde_json::Error> for HawalaError {
    fn from(e: serde_json::Error) -> Self {
        HawalaError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<std::io::Error> for HawalaError {
    fn from(e: std::io::Error) -> Self {
        HawalaError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<url::ParseError> for HawalaError {
    fn from(e: url::ParseError) -> Self {
        HawalaError::new(ErrorCode::HandlerInit, format!("Invalid endpoint URL: {}", e))
    }
}

impl From<reqwest::Error> for HawalaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HawalaError::new(ErrorCode::NetworkError, "Request timed out")
        } else if e.is_connect() {
            HawalaError::new(ErrorCode::NetworkError, "Connection failed")
        } else {
            HawalaError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = HawalaError::channel_unavailable("No active IBC channels")
            .with_details("cosmoshub -> osmosis");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("channel_unavailable"));
        assert!(json.contains("No active IBC channels"));
    }

    #[test]
    fn test_signer_declined_by_code_or_message() {
        assert!(HawalaError::signer_declined().is_signer_declined());
        assert!(HawalaError::network_error(TRANSACTION_DECLINED).is_signer_declined());
        assert!(!HawalaError::network_error("Transaction declined!").is_signer_declined());
    }

    #[test]
    fn test_display_includes_details() {
        let err = HawalaError::handler_init("missing rest endpoint").with_details("injective");
        assert_eq!(err.to_string(), "[HandlerInit] missing rest endpoint (injective)");
        assert!(!err.is_recoverable());
        assert!(HawalaError::validation("x").is_recoverable());
    }
}
