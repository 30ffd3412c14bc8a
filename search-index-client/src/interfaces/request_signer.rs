//! Request signer trait definition.

use chrono::{DateTime, Utc};

use crate::errors::SigningError;
use crate::types::{PayloadReader, SearchRequest};

/// Adds authentication headers to a prepared request.
pub trait RequestSigner: Send + Sync {
    /// Sign `request` in place.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to annotate
    /// * `body` - An independent reader over the request payload, if any
    /// * `timestamp` - The signing time
    fn sign(
        &self,
        request: &mut SearchRequest,
        body: Option<PayloadReader>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SigningError>;
}
