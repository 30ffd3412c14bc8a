//! Transport error types.

use thiserror::Error;

/// Errors returned by a `Transport` when no response could be obtained.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be turned into a network request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to connect to, or exchange data with, the search service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the per-attempt timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Every attempt failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

impl TransportError {
    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a retries exhausted error.
    pub fn retries_exhausted(attempts: u32, msg: impl Into<String>) -> Self {
        Self::RetriesExhausted {
            attempts,
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}
