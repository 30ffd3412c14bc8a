//! # Search Index Client
//!
//! This crate provides a small client for Elasticsearch/OpenSearch compatible
//! search services: creating and deleting indexes and adding documents.
//! Requests can optionally be signed with AWS Signature Version 4 and are
//! sent through a retrying HTTP transport.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod signing;
pub mod transport;
pub mod types;

pub use client::SearchClient;
pub use config::ClientConfig;
pub use errors::{SearchIndexError, SigningError, TransportError};
pub use interfaces::{RequestSigner, Transport};
pub use signing::{AwsSigner, Credentials, SigningMode};
pub use transport::{HttpTransport, HttpTransportConfig};
pub use types::{IndexResponse, Payload, ResponseBody};
