//! Error types for OpenL2M operations.
//!
//! Every failure of a client call surfaces as one [`Error`] variant. HTTP
//! status codes are mapped onto the variants by the client crates; transport
//! and decoding failures arrive through the `From` conversions below.

use thiserror::Error;

/// Main error type for OpenL2M operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad construction input (URL, token, timeouts).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The server rejected the credential (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Requested resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the request payload (HTTP 400).
    ///
    /// Carries the server message verbatim.
    #[error("{0}")]
    ValidationError(String),

    /// The server failed while handling the request (HTTP 5xx).
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Transport failure: connection refused, DNS, TLS, timeout.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body was not JSON or lacked expected fields.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Any other non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    HttpError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
}

/// Specialized result type for OpenL2M operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::NetworkError(_) => "NETWORK_ERROR",
            Self::ProtocolError(_) => "PROTOCOL_ERROR",
            Self::HttpError { .. } => "HTTP_ERROR",
        }
    }

    /// HTTP status carried by the error, for variants that keep one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } | Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if repeating the same request might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::ServerError { .. })
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkError(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::ProtocolError(err.to_string())
        } else if err.is_builder() {
            Self::ConfigError(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(format!("invalid URL: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ProtocolError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
