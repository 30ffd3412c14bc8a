//! # Search Index CLI
//!
//! Library side of the `search-index` tool: argument parsing, dependency
//! wiring and the commands themselves.

pub mod commands;
pub mod config;
pub mod logging;

pub use config::{Cli, Command, Dependencies};

use search_index_client::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A file did not contain valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
