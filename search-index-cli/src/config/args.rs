//! Command-line arguments.
//!
//! Every connection option can also be given through the environment (or a
//! `.env` file).

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use search_index_client::config::{DEFAULT_REGION, DEFAULT_SERVICE};

/// Default search service URL.
const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

#[derive(Debug, Parser)]
#[command(name = "search-index", about = "Manage search indexes and documents")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// How to reach, and authenticate with, the search service.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Base URL of the search service.
    #[arg(long, env = "SEARCH_SERVICE_URL", default_value = DEFAULT_SEARCH_URL)]
    pub url: String,

    /// Sign requests with AWS SigV4.
    #[arg(long, env = "SIGN_REQUESTS", default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub sign_requests: bool,

    /// AWS region used for signing.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub aws_region: String,

    /// AWS service identifier used for signing.
    #[arg(long, env = "AWS_SERVICE", default_value = DEFAULT_SERVICE)]
    pub aws_service: String,

    /// Use the SDK-native signing mode.
    #[arg(long, env = "AWS_SDK_SIGNER", default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub aws_sdk_signer: bool,

    /// Retries after the first attempt for failed requests.
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create an index, with settings and mappings from a JSON file.
    CreateIndex {
        index: String,
        /// JSON settings file. An empty object is sent when omitted.
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Delete an index.
    DeleteIndex { index: String },
    /// Add or replace a JSON document.
    AddDocument {
        index: String,
        id: String,
        /// JSON document file.
        #[arg(long)]
        file: PathBuf,
        /// Document type path segment.
        #[arg(long = "type", default_value = "_doc")]
        doc_type: String,
    },
}
