//! Error types for the search index client.

mod search_index_error;
mod signing_error;
mod transport_error;

pub use search_index_error::SearchIndexError;
pub use signing_error::SigningError;
pub use transport_error::TransportError;
