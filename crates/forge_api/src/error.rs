//! Error types for the API client.
//!
//! [`ApiServiceError`] is the only error that leaves the client. Transport
//! and configuration failures have their own types and are converted at the
//! client boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiServiceError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Category of a failed model request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Credential absent or rejected
    InvalidKey,
    /// Too many requests
    RateLimit,
    /// Connectivity failure
    Network,
    /// Response present but empty or unparseable
    BadResponse,
    /// Safety or policy filtering stopped generation
    ResponseBlocked,
    /// Anything the classifier did not recognise
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidKey => "INVALID_KEY",
            Self::RateLimit => "RATE_LIMIT",
            Self::Network => "NETWORK",
            Self::BadResponse => "BAD_RESPONSE",
            Self::ResponseBlocked => "RESPONSE_BLOCKED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure from one of the client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ApiServiceError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKey, message)
    }

    pub fn bad_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadResponse, message)
    }

    /// Generation stopped for a reason other than normal completion.
    pub fn blocked(reason: &str) -> Self {
        Self::new(
            ErrorKind::ResponseBlocked,
            format!("Response was blocked. Reason: {}", reason),
        )
    }
}

/// How a transport call failed, when the transport can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The request never reached the server (DNS, connect, TLS, timeout)
    Connect,
    /// The server answered with a non-success HTTP status
    Status(u16),
    /// The server answered but the body could not be decoded
    Decode,
    /// No structured information available
    Other,
}

/// Raw failure reported by a [`crate::transport::ModelTransport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    /// HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::Status(code) => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::connect(format!("Network error: {}", err))
        } else if err.is_decode() {
            Self::decode(format!("Failed to decode response: {}", err))
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16(), err.to_string())
        } else {
            Self::other(err.to_string())
        }
    }
}

/// Errors raised while loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
