//! Shared error classifier.
//!
//! Maps whatever a transport raised onto an [`ErrorKind`]. Structured
//! information (HTTP status, connection failure) wins; message sniffing is
//! the fallback and depends on the upstream wording staying stable.

use tracing::error;

use crate::error::{ApiServiceError, ErrorKind, TransportError, TransportErrorKind};

const INVALID_KEY_MARKERS: &[&str] = &["API key not valid", "Requested entity was not found"];
const RATE_LIMIT_MARKERS: &[&str] = &["Rate limit exceeded"];

/// Anything that can reach the classifier.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Already classified, passed through unchanged
    Classified(ApiServiceError),
    /// Raw transport failure
    Transport(TransportError),
}

impl From<ApiServiceError> for Failure {
    fn from(err: ApiServiceError) -> Self {
        Self::Classified(err)
    }
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<TransportError> for ApiServiceError {
    fn from(err: TransportError) -> Self {
        classify(err)
    }
}

/// Classify a failure into an [`ApiServiceError`].
pub fn classify(failure: impl Into<Failure>) -> ApiServiceError {
    let err = match failure.into() {
        Failure::Classified(err) => return err,
        Failure::Transport(err) => err,
    };

    let kind = structured_kind(&err).or_else(|| sniffed_kind(&err));
    match kind {
        Some(kind) => ApiServiceError::new(kind, err.message),
        None => {
            error!(kind = ?err.kind, message = %err.message, "Unclassified model API error");
            ApiServiceError::new(ErrorKind::Unknown, err.message)
        }
    }
}

fn structured_kind(err: &TransportError) -> Option<ErrorKind> {
    match err.kind {
        TransportErrorKind::Status(401) | TransportErrorKind::Status(403) => {
            Some(ErrorKind::InvalidKey)
        }
        TransportErrorKind::Status(429) => Some(ErrorKind::RateLimit),
        // The request never got an answer
        TransportErrorKind::Connect => Some(ErrorKind::Network),
        TransportErrorKind::Decode => Some(ErrorKind::BadResponse),
        _ => None,
    }
}

fn sniffed_kind(err: &TransportError) -> Option<ErrorKind> {
    let message = err.message.as_str();

    if INVALID_KEY_MARKERS.iter().any(|m| message.contains(m)) {
        return Some(ErrorKind::InvalidKey);
    }
    if RATE_LIMIT_MARKERS.iter().any(|m| message.contains(m)) {
        return Some(ErrorKind::RateLimit);
    }

    None
}
