//! Request and response types for search index operations.

use std::fmt;

use bytes::{buf::Reader, Buf, Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};

/// Maximum number of bytes of a payload or response body copied into log fields.
const PREVIEW_LIMIT: usize = 512;

/// Error produced while reading a response body stream.
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// Sequential reader over a [`Payload`].
pub type PayloadReader = Reader<Bytes>;

/// A prepared request, ready to be signed and executed.
pub type SearchRequest = http::Request<Option<Payload>>;

/// A raw response as returned by a `Transport`.
pub type SearchResponse = http::Response<ResponseBody>;

/// Immutable request payload.
///
/// Cloning is cheap and every call to [`Payload::reader`] starts a fresh
/// cursor at the beginning of the bytes, so the signer and the transport can
/// each consume the body independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
    /// Create a payload from anything convertible into `Bytes`.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Create a new independent reader positioned at the start of the payload.
    pub fn reader(&self) -> PayloadReader {
        self.0.clone().reader()
    }

    /// The underlying bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

/// Streaming body of a response.
///
/// Dropping the body releases the underlying connection, whether or not it
/// has been read to the end.
pub struct ResponseBody {
    stream: BoxStream<'static, Result<Bytes, BodyError>>,
}

impl ResponseBody {
    /// An empty body.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// A body that yields the given bytes as a single chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }

    /// Wrap a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BodyError>> + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
        }
    }

    /// Read the whole body into memory.
    pub async fn collect(mut self) -> Result<Bytes, BodyError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

/// Successful response from the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse {
    /// HTTP status code, always in `[200, 300)`.
    pub status: u16,
    /// The raw, uninterpreted response body.
    pub body: Bytes,
}

/// Lossy UTF-8 preview of a byte buffer, for log fields.
pub(crate) fn preview(bytes: &[u8]) -> String {
    if bytes.len() <= PREVIEW_LIMIT {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        format!("{}...", String::from_utf8_lossy(&bytes[..PREVIEW_LIMIT]))
    }
}
