//! Search client implementation.
//!
//! This module provides the main client for the search service. Every public
//! operation maps its arguments onto a path and payload and goes through
//! [`SearchClient::send`], which builds, signs, executes and classifies the
//! request.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request};
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, instrument, Dispatch};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::{RequestSigner, Transport};
use crate::signing::AwsSigner;
use crate::transport::HttpTransport;
use crate::types::{preview, IndexResponse, Payload, SearchRequest};

const APPLICATION_JSON: &str = "application/json";

/// The main client for interacting with the search service.
///
/// The client holds only immutable state and can be shared between tasks
/// behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// let client = SearchClient::new("http://localhost:9200", false, 3, ["ons"]);
///
/// let status = client.create_index("ons", br#"{"settings":{}}"#.to_vec()).await?;
/// client
///     .add_document("ons", "_doc", "1", br#"{"title":"CPI"}"#.to_vec())
///     .await?;
/// ```
pub struct SearchClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    signer: Option<Arc<dyn RequestSigner>>,
    diagnostics: Option<Dispatch>,
}

impl SearchClient {
    /// Create a client with the default HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `url` - Base URL of the search service
    /// * `sign_requests` - Whether to sign requests with AWS SigV4
    /// * `max_retries` - Retries performed by the transport after the first attempt
    /// * `indexes` - Index names this client works with (informational)
    pub fn new<I, S>(url: impl Into<String>, sign_requests: bool, max_retries: u32, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = Arc::new(HttpTransport::with_max_retries(max_retries));
        Self::with_transport(url, sign_requests, transport, indexes)
    }

    /// Create a client on top of a caller-supplied transport, using the
    /// default signing region and service.
    pub fn with_transport<I, S>(
        url: impl Into<String>,
        sign_requests: bool,
        transport: Arc<dyn Transport>,
        indexes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = ClientConfig::new(url)
            .with_sign_requests(sign_requests)
            .with_indexes(indexes);
        Self::from_config(config, transport)
    }

    /// Create a client with every option spelled out.
    pub fn with_transport_and_signing<I, S>(
        url: impl Into<String>,
        aws_region: impl Into<String>,
        aws_service: impl Into<String>,
        aws_sdk_signer: bool,
        sign_requests: bool,
        transport: Arc<dyn Transport>,
        indexes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = ClientConfig::new(url)
            .with_aws_scope(aws_region, aws_service)
            .with_aws_sdk_signer(aws_sdk_signer)
            .with_sign_requests(sign_requests)
            .with_indexes(indexes);
        Self::from_config(config, transport)
    }

    /// Create a client from a configuration and a transport.
    ///
    /// When signing is enabled the AWS signer is chosen here, once.
    pub fn from_config(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let signer: Option<Arc<dyn RequestSigner>> = if config.sign_requests {
            Some(Arc::new(AwsSigner::from_config(&config)))
        } else {
            None
        };

        debug!(
            url = %config.url,
            service = %config.service_name,
            sign_requests = config.sign_requests,
            aws_sdk_signer = config.aws_sdk_signer,
            indexes = ?config.indexes,
            "Created search client"
        );

        Self {
            config,
            transport,
            signer,
            diagnostics: None,
        }
    }

    /// Replace the signer. Only used when signing is enabled.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = self.config.sign_requests.then_some(signer);
        self
    }

    /// Route this client's diagnostics to `dispatch` instead of the global
    /// subscriber.
    pub fn with_diagnostics(mut self, dispatch: Dispatch) -> Self {
        self.diagnostics = Some(dispatch);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create an index.
    ///
    /// # Arguments
    ///
    /// * `index_name` - Name of the index to create
    /// * `settings` - JSON settings and mappings for the index
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` - The 2xx status code
    /// * `Err(SearchIndexError)` - The failure; `status_code()` gives the status, if any
    pub async fn create_index(
        &self,
        index_name: &str,
        settings: impl Into<Bytes>,
    ) -> Result<u16, SearchIndexError> {
        let path = format!("{}/{}", self.config.url, index_name);
        self.send(&path, Method::PUT, Some(Payload::new(settings)))
            .await
            .map(|response| response.status)
    }

    /// Delete an index.
    pub async fn delete_index(&self, index_name: &str) -> Result<u16, SearchIndexError> {
        let path = format!("{}/{}", self.config.url, index_name);
        self.send(&path, Method::DELETE, None)
            .await
            .map(|response| response.status)
    }

    /// Add (or replace) a JSON document.
    ///
    /// # Arguments
    ///
    /// * `index_name` - Target index
    /// * `document_type` - Document type segment of the path (e.g. `_doc`)
    /// * `document_id` - Document identifier
    /// * `document` - The JSON document
    pub async fn add_document(
        &self,
        index_name: &str,
        document_type: &str,
        document_id: &str,
        document: impl Into<Bytes>,
    ) -> Result<u16, SearchIndexError> {
        let path = format!(
            "{}/{}/{}/{}",
            self.config.url, index_name, document_type, document_id
        );
        self.send(&path, Method::PUT, Some(Payload::new(document)))
            .await
            .map(|response| response.status)
    }

    /// Send a request to `path` and classify the response.
    ///
    /// Only responses with a status in `[200, 300)` are successful; for any
    /// other status the body is read, logged and dropped.
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        payload: Option<Payload>,
    ) -> Result<IndexResponse, SearchIndexError> {
        match &self.diagnostics {
            Some(dispatch) => {
                self.dispatch(path, method, payload)
                    .with_subscriber(dispatch.clone())
                    .await
            }
            None => self.dispatch(path, method, payload).await,
        }
    }

    #[instrument(
        name = "search_request",
        skip(self, payload),
        fields(service = %self.config.service_name)
    )]
    async fn dispatch(
        &self,
        path: &str,
        method: Method,
        payload: Option<Payload>,
    ) -> Result<IndexResponse, SearchIndexError> {
        let payload_preview = payload
            .as_ref()
            .map(|p| preview(p.bytes()))
            .unwrap_or_default();

        let url = parse_url(path).map_err(|e| {
            error!(
                url = %path.escape_debug(),
                method = %method,
                error = %e,
                "Failed to create url for search call"
            );
            SearchIndexError::path_build(e)
        })?;

        let mut request = build_request(&method, &url, payload.as_ref()).map_err(|e| {
            error!(
                url = %url,
                method = %method,
                payload = %payload_preview,
                error = %e,
                "Failed to create request for search call"
            );
            e
        })?;

        if let Some(signer) = &self.signer {
            let body = payload.as_ref().map(Payload::reader);
            signer.sign(&mut request, body, Utc::now()).map_err(|e| {
                error!(
                    url = %url,
                    method = %method,
                    payload = %payload_preview,
                    error = %e,
                    "Failed to sign request for search call"
                );
                SearchIndexError::from(e)
            })?;
        }

        let response = self.transport.execute(request).await.map_err(|e| {
            error!(
                url = %url,
                method = %method,
                payload = %payload_preview,
                error = %e,
                "Failed to call search service"
            );
            SearchIndexError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.into_body().collect().await.map_err(|e| {
            error!(
                url = %url,
                method = %method,
                payload = %payload_preview,
                http_code = status,
                error = %e,
                "Failed to read response body from search call"
            );
            SearchIndexError::response_read(status, e.to_string())
        })?;

        if !(200..300).contains(&status) {
            error!(
                url = %url,
                method = %method,
                payload = %payload_preview,
                status_code = status,
                json_body = %preview(&body),
                "Search call returned unexpected status code"
            );
            return Err(SearchIndexError::UnexpectedStatusCode(status));
        }

        debug!(url = %url, method = %method, status_code = status, "Search call succeeded");

        Ok(IndexResponse { status, body })
    }
}

/// Build the HTTP request for `method` and `url`, attaching `payload` as a
/// JSON body.
/// Parse an absolute request URL. Any ASCII control character is an error,
/// never stripped or percent-encoded.
fn parse_url(path: &str) -> Result<Url, String> {
    if let Some(c) = path.chars().find(|c| c.is_ascii_control()) {
        return Err(format!("url contains control character {:?}", c));
    }
    Url::parse(path).map_err(|e| e.to_string())
}

fn build_request(
    method: &Method,
    url: &Url,
    payload: Option<&Payload>,
) -> Result<SearchRequest, SearchIndexError> {
    let mut builder = Request::builder().method(method.clone()).uri(url.as_str());
    if payload.is_some() {
        builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    }
    builder
        .body(payload.cloned())
        .map_err(|e| SearchIndexError::path_build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{SigningError, TransportError};
    use crate::types::{BodyError, PayloadReader, ResponseBody, SearchResponse};
    use async_trait::async_trait;
    use chrono::DateTime;
    use futures::stream;
    use std::collections::{BTreeMap, HashSet};
    use std::fmt;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    const BASE_URL: &str = "http://localhost:9200";

    /// A request as seen by the mock transport.
    #[derive(Debug, Clone)]
    struct RecordedRequest {
        method: Method,
        uri: String,
        content_type: Option<String>,
        authorization: Option<String>,
        body: Option<Bytes>,
    }

    /// What the mock transport answers with.
    enum Reply {
        Status(u16, &'static [u8]),
        BrokenBody(u16),
        Fail,
    }

    /// Mock transport for testing
    struct MockTransport {
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
        calls: AtomicUsize,
        reply: Reply,
    }

    impl MockTransport {
        fn new(reply: Reply) -> Self {
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                calls: AtomicUsize::new(0),
                reply,
            }
        }

        fn ok() -> Self {
            Self::new(Reply::Status(200, br#"{"acknowledged":true}"#))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let header = |name: http::header::HeaderName| {
                request
                    .headers()
                    .get(name)
                    .map(|v: &HeaderValue| v.to_str().unwrap().to_string())
            };
            self.requests.lock().await.push(RecordedRequest {
                method: request.method().clone(),
                uri: request.uri().to_string(),
                content_type: header(CONTENT_TYPE),
                authorization: header(http::header::AUTHORIZATION),
                body: request.body().as_ref().map(|p| p.bytes().clone()),
            });

            let (status, body) = match &self.reply {
                Reply::Status(status, body) => (*status, ResponseBody::from_bytes(*body)),
                Reply::BrokenBody(status) => (
                    *status,
                    ResponseBody::from_stream(stream::iter(vec![
                        Ok(Bytes::from_static(b"{\"ack")),
                        Err::<Bytes, BodyError>("connection reset by peer".into()),
                    ])),
                ),
                Reply::Fail => return Err(TransportError::retries_exhausted(4, "connection refused")),
            };

            let mut response = http::Response::new(body);
            *response.status_mut() = http::StatusCode::from_u16(status).unwrap();
            Ok(response)
        }
    }

    /// Echoes the request body back, so each caller can check it got its own.
    struct EchoTransport {
        requests: Arc<Mutex<Vec<(String, Bytes)>>>,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, TransportError> {
            let body = request
                .body()
                .as_ref()
                .map(|p| p.bytes().clone())
                .unwrap_or_default();
            tokio::task::yield_now().await;
            self.requests
                .lock()
                .await
                .push((request.uri().path().to_string(), body.clone()));
            Ok(http::Response::new(ResponseBody::from_bytes(body)))
        }
    }

    struct FailingSigner;

    impl RequestSigner for FailingSigner {
        fn sign(
            &self,
            _request: &mut SearchRequest,
            _body: Option<PayloadReader>,
            _timestamp: DateTime<Utc>,
        ) -> Result<(), SigningError> {
            Err(SigningError::missing_credentials("no credentials in test"))
        }
    }

    /// Signs with a header derived from the body it was handed.
    struct BodyEchoSigner;

    impl RequestSigner for BodyEchoSigner {
        fn sign(
            &self,
            request: &mut SearchRequest,
            body: Option<PayloadReader>,
            _timestamp: DateTime<Utc>,
        ) -> Result<(), SigningError> {
            let mut seen = String::new();
            if let Some(mut reader) = body {
                reader.read_to_string(&mut seen).unwrap();
            }
            request.headers_mut().insert(
                http::header::AUTHORIZATION,
                HeaderValue::from_str(&format!("signed:{}", seen)).unwrap(),
            );
            Ok(())
        }
    }

    /// A captured diagnostic event.
    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: Level,
        fields: BTreeMap<String, String>,
    }

    #[derive(Default)]
    struct FieldVisitor(BTreeMap<String, String>);

    impl Visit for FieldVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{:?}", value));
        }
    }

    struct CaptureLayer {
        events: Arc<StdMutex<Vec<CapturedEvent>>>,
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields: visitor.0,
            });
        }
    }

    fn capturing_dispatch() -> (Dispatch, Arc<StdMutex<Vec<CapturedEvent>>>) {
        let events = Arc::new(StdMutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            events: events.clone(),
        });
        (Dispatch::new(subscriber), events)
    }

    fn client_with(transport: Arc<MockTransport>) -> SearchClient {
        SearchClient::with_transport(BASE_URL, false, transport, ["ons"])
    }

    #[tokio::test]
    async fn test_create_index_issues_single_put() {
        let transport = Arc::new(MockTransport::ok());
        let client = client_with(transport.clone());
        let settings = br#"{"settings":{"number_of_shards":1}}"#;

        let status = client.create_index("ons", settings.to_vec()).await.unwrap();

        assert_eq!(status, 200);
        let requests = transport.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].uri, "http://localhost:9200/ons");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(requests[0].body.as_deref(), Some(&settings[..]));
    }

    #[tokio::test]
    async fn test_delete_index_issues_single_delete_without_body() {
        let transport = Arc::new(MockTransport::ok());
        let client = client_with(transport.clone());

        let status = client.delete_index("ons").await.unwrap();

        assert_eq!(status, 200);
        let requests = transport.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(requests[0].uri, "http://localhost:9200/ons");
        assert!(requests[0].body.is_none());
        assert!(requests[0].content_type.is_none());
    }

    #[tokio::test]
    async fn test_add_document_issues_single_put() {
        let transport = Arc::new(MockTransport::new(Reply::Status(201, b"{\"result\":\"created\"}")));
        let client = client_with(transport.clone());
        let document = br#"{"title":"Consumer price inflation"}"#;

        let status = client
            .add_document("ons", "_doc", "cpi-2024", document.to_vec())
            .await
            .unwrap();

        assert_eq!(status, 201);
        let requests = transport.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].uri, "http://localhost:9200/ons/_doc/cpi-2024");
        assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(requests[0].body.as_deref(), Some(&document[..]));
    }

    #[tokio::test]
    async fn test_send_returns_body_on_success() {
        let transport = Arc::new(MockTransport::ok());
        let client = client_with(transport);

        let response = client
            .send("http://localhost:9200/ons", Method::PUT, Some(Payload::new(&b"{}"[..])))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], br#"{"acknowledged":true}"#);
    }

    #[tokio::test]
    async fn test_success_band_boundaries() {
        for (status, ok) in [(199, false), (200, true), (201, true), (299, true), (300, false)] {
            let transport = Arc::new(MockTransport::new(Reply::Status(status, b"{}")));
            let client = client_with(transport);

            let result = client.delete_index("ons").await;
            assert_eq!(result.is_ok(), ok, "status {}", status);
            match result {
                Ok(code) => assert_eq!(code, status),
                Err(e) => {
                    assert!(matches!(e, SearchIndexError::UnexpectedStatusCode(s) if s == status));
                    assert_eq!(e.status_code(), status);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_not_found_drops_body() {
        let transport = Arc::new(MockTransport::new(Reply::Status(
            404,
            br#"{"error":"index_not_found_exception"}"#,
        )));
        let client = client_with(transport.clone());

        let result = client.send("http://localhost:9200/missing", Method::DELETE, None).await;

        let err = result.unwrap_err();
        assert!(matches!(err, SearchIndexError::UnexpectedStatusCode(404)));
        assert_eq!(err.status_code(), 404);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let transport = Arc::new(MockTransport::new(Reply::Status(503, b"unavailable")));
        let client = client_with(transport);

        let err = client.create_index("ons", b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, SearchIndexError::UnexpectedStatusCode(503)));
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_transport() {
        for base in [
            "not a url",
            "http://local host:9200",
            "http://localhost:9200\n",
            "http://local\thost:9200",
            "http://localhost:9200/\x7f",
            "http://localhost:9200/\u{1}x",
        ] {
            let transport = Arc::new(MockTransport::ok());
            let client = SearchClient::with_transport(base, false, transport.clone(), ["ons"]);

            let err = client.create_index("ons", b"{}".to_vec()).await.unwrap_err();

            assert!(matches!(err, SearchIndexError::PathBuild(_)), "{:?}", base);
            assert_eq!(err.status_code(), 0);
            assert_eq!(transport.calls(), 0);
        }
    }

    #[test]
    fn test_parse_url_rejects_control_characters() {
        assert!(parse_url("http://localhost:9200/ons").is_ok());

        let err = parse_url("http://local\thost:9200").unwrap_err();
        assert!(err.contains("'\\t'"), "{}", err);
        assert!(parse_url("http://localhost:9200/ons\r\n").is_err());
        assert!(parse_url("http://localhost:9200/\u{7f}").is_err());
    }

    #[tokio::test]
    async fn test_signing_failure_never_reaches_transport() {
        let transport = Arc::new(MockTransport::ok());
        let client = SearchClient::with_transport(BASE_URL, true, transport.clone(), ["ons"])
            .with_signer(Arc::new(FailingSigner));

        let err = client.create_index("ons", b"{}".to_vec()).await.unwrap_err();

        assert!(matches!(err, SearchIndexError::Signing(SigningError::MissingCredentials(_))));
        assert_eq!(err.status_code(), 0);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_signer_reads_body_independently_of_transport() {
        let transport = Arc::new(MockTransport::ok());
        let client = SearchClient::with_transport(BASE_URL, true, transport.clone(), ["ons"])
            .with_signer(Arc::new(BodyEchoSigner));

        client
            .add_document("ons", "_doc", "1", br#"{"a":1}"#.to_vec())
            .await
            .unwrap();

        let requests = transport.requests.lock().await;
        assert_eq!(requests[0].authorization.as_deref(), Some(r#"signed:{"a":1}"#));
        assert_eq!(requests[0].body.as_deref(), Some(&br#"{"a":1}"#[..]));
    }

    #[tokio::test]
    async fn test_signer_not_used_when_signing_disabled() {
        let transport = Arc::new(MockTransport::ok());
        let client = SearchClient::with_transport(BASE_URL, false, transport.clone(), ["ons"])
            .with_signer(Arc::new(FailingSigner));

        assert_eq!(client.delete_index("ons").await.unwrap(), 200);
        assert!(transport.requests.lock().await[0].authorization.is_none());
    }

    #[tokio::test]
    async fn test_aws_signer_adds_authorization() {
        let transport = Arc::new(MockTransport::ok());
        let client = SearchClient::with_transport_and_signing(
            BASE_URL,
            "eu-west-2",
            "es",
            true,
            true,
            transport.clone(),
            ["ons"],
        )
        .with_signer(Arc::new(
            AwsSigner::from_config(&ClientConfig::new(BASE_URL).with_aws_scope("eu-west-2", "es"))
                .with_credentials(crate::signing::Credentials::new("AKID", "secret")),
        ));

        client.delete_index("ons").await.unwrap();

        let requests = transport.requests.lock().await;
        let auth = requests[0].authorization.as_deref().unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKID/"));
        assert!(auth.contains("/eu-west-2/es/aws4_request"));
    }

    #[tokio::test]
    async fn test_transport_failure_has_zero_status() {
        let transport = Arc::new(MockTransport::new(Reply::Fail));
        let client = client_with(transport.clone());

        let err = client.delete_index("ons").await.unwrap_err();

        assert!(matches!(
            err,
            SearchIndexError::Transport(TransportError::RetriesExhausted { attempts: 4, .. })
        ));
        assert_eq!(err.status_code(), 0);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_body_read_failure_keeps_status() {
        let transport = Arc::new(MockTransport::new(Reply::BrokenBody(200)));
        let client = client_with(transport);

        let err = client.delete_index("ons").await.unwrap_err();

        assert!(matches!(err, SearchIndexError::ResponseRead { status: 200, .. }));
        assert_eq!(err.status_code(), 200);
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_mix_payloads() {
        let transport = Arc::new(EchoTransport {
            requests: Arc::new(Mutex::new(Vec::new())),
        });
        let client = Arc::new(SearchClient::with_transport(
            BASE_URL,
            false,
            transport.clone(),
            Vec::<String>::new(),
        ));

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    let index = format!("index-{}", i);
                    let settings = format!(r#"{{"id":{}}}"#, i);
                    let response = client
                        .send(
                            &format!("{}/{}", BASE_URL, index),
                            Method::PUT,
                            Some(Payload::new(settings.clone())),
                        )
                        .await
                        .unwrap();
                    assert_eq!(response.body, Bytes::from(settings));
                    client.create_index(&index, format!(r#"{{"id":{}}}"#, i)).await.unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 200);
        }

        let recorded: HashSet<(String, Bytes)> =
            transport.requests.lock().await.iter().cloned().collect();
        let expected: HashSet<(String, Bytes)> = (0..64)
            .map(|i| (format!("/index-{}", i), Bytes::from(format!(r#"{{"id":{}}}"#, i))))
            .collect();
        assert_eq!(recorded, expected);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_logged_with_context() {
        let (dispatch, events) = capturing_dispatch();
        let transport = Arc::new(MockTransport::new(Reply::Status(
            404,
            br#"{"error":"index_not_found_exception"}"#,
        )));
        let client = client_with(transport).with_diagnostics(dispatch);

        client.create_index("missing", b"{\"settings\":{}}".to_vec()).await.unwrap_err();

        let events = events.lock().unwrap();
        let failure = events
            .iter()
            .find(|e| e.level == Level::ERROR)
            .expect("an error event");
        assert_eq!(failure.fields["url"], "http://localhost:9200/missing");
        assert_eq!(failure.fields["method"], "PUT");
        assert_eq!(failure.fields["status_code"], "404");
        assert_eq!(failure.fields["payload"], "{\"settings\":{}}");
        assert_eq!(
            failure.fields["json_body"],
            r#"{"error":"index_not_found_exception"}"#
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_logged() {
        let (dispatch, events) = capturing_dispatch();
        let transport = Arc::new(MockTransport::new(Reply::Fail));
        let client = client_with(transport).with_diagnostics(dispatch);

        client.delete_index("ons").await.unwrap_err();

        let events = events.lock().unwrap();
        let failure = events.iter().find(|e| e.level == Level::ERROR).unwrap();
        assert_eq!(failure.fields["message"], "Failed to call search service");
        assert!(failure.fields["error"].contains("connection refused"));
    }

    #[test]
    fn test_construction_is_logged_at_debug() {
        let (dispatch, events) = capturing_dispatch();

        tracing::dispatcher::with_default(&dispatch, || {
            client_with(Arc::new(MockTransport::ok()));
        });

        let events = events.lock().unwrap();
        let created = events
            .iter()
            .find(|e| e.fields.get("message").map(String::as_str) == Some("Created search client"))
            .expect("a construction event");
        assert_eq!(created.level, Level::DEBUG);
        assert_eq!(created.fields["url"], BASE_URL);
    }

    #[test]
    fn test_constructors_apply_defaults() {
        let client = SearchClient::new(BASE_URL, true, 5, ["a", "b"]);
        let config = client.config();

        assert!(config.sign_requests);
        assert!(!config.aws_sdk_signer);
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.aws_service, "es");
        assert_eq!(config.indexes, vec!["a".to_string(), "b".to_string()]);
        assert!(client.signer.is_some());
    }

    #[test]
    fn test_general_constructor() {
        let transport = Arc::new(MockTransport::ok());
        let client = SearchClient::with_transport_and_signing(
            BASE_URL,
            "us-east-1",
            "aoss",
            true,
            false,
            transport,
            Vec::<String>::new(),
        );

        assert_eq!(client.config().aws_region, "us-east-1");
        assert_eq!(client.config().aws_service, "aoss");
        assert!(client.config().aws_sdk_signer);
        assert!(client.signer.is_none());
    }
}
