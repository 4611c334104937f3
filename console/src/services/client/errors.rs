use std::fmt;

use thiserror::Error;

/// Message surfaced when a request produced no response at all
pub const CONNECTIVITY_MESSAGE: &str = "No connection to server. Check your network connection.";

/// Message surfaced when nothing more specific is known
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Message surfaced when a success body does not have the expected shape
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// The request never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Network error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure taxonomy of the request pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received
    Network,
    /// Credentials expired and could not be recovered by a refresh
    SessionExpired,
    /// A credential-issuing call itself was rejected
    Unauthorized,
    /// Structured field errors
    Validation,
    /// Single-message business error
    Domain,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::SessionExpired => "session_expired",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Validation => "validation",
            ErrorKind::Domain => "domain",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The single failure shape handed to UI code.
///
/// `Display` renders only the message, which is always fit for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status of the failed call, when a response was received
    pub status: Option<u16>,
    fallback: bool,
}

impl NormalizedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            fallback: false,
        }
    }

    /// An error whose message is a placeholder rather than backend detail
    pub fn fallback(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            fallback: true,
            ..Self::new(kind, message, status)
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorKind::Network, CONNECTIVITY_MESSAGE, None)
    }

    pub fn unexpected_response(status: Option<u16>) -> Self {
        Self::fallback(ErrorKind::Unknown, UNEXPECTED_RESPONSE_MESSAGE, status)
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replace a placeholder message; backend detail is kept as is
    pub fn or_message(mut self, message: &str) -> Self {
        if self.fallback {
            self.message = message.to_string();
        }
        self
    }
}

pub type ClientResult<T> = Result<T, NormalizedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message_only() {
        let err = NormalizedError::new(ErrorKind::Domain, "Insufficient balance", Some(400));
        assert_eq!(err.to_string(), "Insufficient balance");
    }

    #[test]
    fn test_or_message_only_replaces_fallbacks() {
        let specific = NormalizedError::new(ErrorKind::Unauthorized, "Account disabled", Some(401));
        assert_eq!(
            specific.or_message("Login failed").message,
            "Account disabled"
        );

        let placeholder = NormalizedError::fallback(ErrorKind::Unknown, GENERIC_MESSAGE, None);
        let replaced = placeholder.or_message("Login failed");
        assert_eq!(replaced.message, "Login failed");
        assert!(replaced.is_fallback());
    }

    #[test]
    fn test_network_error_is_specific() {
        let err = NormalizedError::network();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.message, CONNECTIVITY_MESSAGE);
        assert!(!err.is_fallback());
        assert_eq!(err.status, None);
    }
}
