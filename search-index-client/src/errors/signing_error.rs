//! Signing error types.

use thiserror::Error;

/// Errors that can occur while signing a request.
#[derive(Debug, Clone, Error)]
pub enum SigningError {
    /// No usable credentials were found.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A header could not be read or written.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The request body could not be read for hashing.
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// The signing key could not be derived.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),
}

impl SigningError {
    /// Create a missing credentials error.
    pub fn missing_credentials(msg: impl Into<String>) -> Self {
        Self::MissingCredentials(msg.into())
    }

    /// Create an invalid header error.
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Create a body read error.
    pub fn body_read(msg: impl Into<String>) -> Self {
        Self::BodyRead(msg.into())
    }

    /// Create a key derivation error.
    pub fn key_derivation(msg: impl Into<String>) -> Self {
        Self::KeyDerivation(msg.into())
    }
}
