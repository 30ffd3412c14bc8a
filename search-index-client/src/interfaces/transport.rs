//! Transport trait definition.

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::types::{SearchRequest, SearchResponse};

/// Executes prepared requests against the search service.
///
/// Implementations own any retry policy. A request that is retried is still a
/// single call from the point of view of the caller.
///
/// Cancellation is driven by the caller: dropping the returned future must
/// abort any in-flight request and any pending back-off.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse)` - A response was received, whatever its status
    /// * `Err(TransportError)` - No response is available
    async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, TransportError>;
}
