//! Retrying HTTP transport.
//!
//! Each logical request is attempted up to `1 + max_retries` times. Failed
//! connections, timeouts and 5xx responses are retried with exponential
//! back-off and jitter; anything else is returned to the caller immediately.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use rand::Rng;
use tracing::{debug, warn};

use crate::errors::TransportError;
use crate::interfaces::Transport;
use crate::types::{BodyError, ResponseBody, SearchRequest, SearchResponse};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry. Doubled for each subsequent retry.
    pub initial_backoff: Duration,
    /// Upper bound for the delay between attempts, before jitter.
    pub max_backoff: Duration,
    /// Timeout applied to each individual attempt.
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HttpTransportConfig {
    /// Default configuration with a custom retry budget.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with its own connection pool.
    pub fn new(config: HttpTransportConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a transport on top of an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, config: HttpTransportConfig) -> Self {
        Self { client, config }
    }

    /// Create a transport with default settings and the given retry budget.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self::new(HttpTransportConfig::with_max_retries(max_retries))
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Delay before retry number `retry` (1-based).
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let delay = self
            .config
            .initial_backoff
            .saturating_mul(factor)
            .min(self.config.max_backoff);
        let jitter_ms = rand::thread_rng().gen_range(0..=delay.as_millis() as u64 / 4);
        delay + Duration::from_millis(jitter_ms)
    }

    async fn send_once(&self, request: &SearchRequest) -> Result<reqwest::Response, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.uri().to_string())
            .headers(request.headers().clone())
            .timeout(self.config.timeout);
        if let Some(payload) = request.body() {
            builder = builder.body(payload.bytes().clone());
        }
        builder.send().await
    }
}

/// Convert a reqwest response into a streaming `SearchResponse`.
fn into_search_response(response: reqwest::Response) -> SearchResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let body = ResponseBody::from_stream(
        response
            .bytes_stream()
            .map_err(|e| Box::new(e) as BodyError),
    );

    let mut search_response = http::Response::new(body);
    *search_response.status_mut() = status;
    *search_response.headers_mut() = headers;
    search_response
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: SearchRequest) -> Result<SearchResponse, TransportError> {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.send_once(&request).await {
                Ok(response) if response.status().is_server_error() && attempt < attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        url = %request.uri(),
                        method = %request.method(),
                        attempt = attempt,
                        status = response.status().as_u16(),
                        delay_ms = delay.as_millis() as u64,
                        "Server error, retrying"
                    );
                    drop(response);
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    debug!(
                        url = %request.uri(),
                        attempt = attempt,
                        status = response.status().as_u16(),
                        "Received response"
                    );
                    return Ok(into_search_response(response));
                }
                Err(e) => {
                    let err = TransportError::from(e);
                    if matches!(err, TransportError::InvalidRequest(_)) {
                        return Err(err);
                    }
                    if attempt >= attempts {
                        return Err(if attempts > 1 {
                            TransportError::retries_exhausted(attempts, err.to_string())
                        } else {
                            err
                        });
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        url = %request.uri(),
                        method = %request.method(),
                        attempt = attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
