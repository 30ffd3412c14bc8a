//! Search index error types.
//!
//! This module defines the errors a dispatched call can end with. The set is
//! closed: every failure of `SearchClient::send` is exactly one of these.

use thiserror::Error;

use super::{SigningError, TransportError};

/// Errors that can occur while dispatching a request to the search service.
///
/// Diagnostic context (url, method, payload and body previews) is logged at
/// the point of failure and is not carried here.
#[derive(Debug, Error)]
pub enum SearchIndexError {
    /// The target path or request could not be built. No network call was made.
    #[error("Path build error: {0}")]
    PathBuild(String),

    /// The configured signer rejected the request. No network call was made.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// The transport failed before a response was available.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response arrived but its body could not be read.
    #[error("Failed to read response body (status {status}): {message}")]
    ResponseRead { status: u16, message: String },

    /// The response status was outside `[200, 300)`.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatusCode(u16),
}

impl SearchIndexError {
    /// Create a path build error.
    pub fn path_build(msg: impl Into<String>) -> Self {
        Self::PathBuild(msg.into())
    }

    /// Create a response read error for a response with the given status.
    pub fn response_read(status: u16, msg: impl Into<String>) -> Self {
        Self::ResponseRead {
            status,
            message: msg.into(),
        }
    }

    /// The HTTP status code associated with this failure.
    ///
    /// Returns `0` when the call failed before a response was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PathBuild(_) | Self::Signing(_) | Self::Transport(_) => 0,
            Self::ResponseRead { status, .. } => *status,
            Self::UnexpectedStatusCode(status) => *status,
        }
    }
}
