//! AWS SigV4 implementation of `RequestSigner`.

use std::io::Read;

use chrono::{DateTime, Utc};
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, HOST};
use http::Uri;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::SigningError;
use crate::interfaces::RequestSigner;
use crate::signing::credentials::{Credentials, CredentialsSource};
use crate::signing::sigv4;
use crate::types::{PayloadReader, SearchRequest};

const X_AMZ_DATE: HeaderName = HeaderName::from_static("x-amz-date");
const X_AMZ_SECURITY_TOKEN: HeaderName = HeaderName::from_static("x-amz-security-token");
const X_AMZ_CONTENT_SHA256: HeaderName = HeaderName::from_static("x-amz-content-sha256");

const AWS_DOMAIN_SUFFIX: &str = ".amazonaws.com";

/// Flavour of SigV4 signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// Behaves like the AWS SDK signer: configured region and service,
    /// standard credential variables, signed `x-amz-content-sha256` header.
    Sdk,
    /// Infers region and service from `*.{region}.{service}.amazonaws.com`
    /// hosts and accepts legacy credential variable names.
    Compat,
}

impl SigningMode {
    /// Mode selected by the `aws_sdk_signer` configuration flag.
    pub fn from_flag(aws_sdk_signer: bool) -> Self {
        if aws_sdk_signer {
            Self::Sdk
        } else {
            Self::Compat
        }
    }
}

/// Signs requests with AWS Signature Version 4.
#[derive(Debug, Clone)]
pub struct AwsSigner {
    mode: SigningMode,
    region: String,
    service: String,
    credentials: CredentialsSource,
}

impl AwsSigner {
    /// Create a signer that reads credentials from the environment.
    pub fn new(mode: SigningMode, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            mode,
            region: region.into(),
            service: service.into(),
            credentials: CredentialsSource::Environment,
        }
    }

    /// Create the signer described by a client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            SigningMode::from_flag(config.aws_sdk_signer),
            &config.aws_region,
            &config.aws_service,
        )
    }

    /// Sign with fixed credentials instead of the environment.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = CredentialsSource::Static(credentials);
        self
    }

    pub fn mode(&self) -> SigningMode {
        self.mode
    }

    /// Region and service for the credential scope of a request to `host`.
    fn scope_for(&self, host: &str) -> (String, String) {
        if self.mode == SigningMode::Compat {
            if let Some(prefix) = host.strip_suffix(AWS_DOMAIN_SUFFIX) {
                let labels: Vec<&str> = prefix.split('.').collect();
                if labels.len() >= 3 {
                    let n = labels.len();
                    return (labels[n - 2].to_string(), labels[n - 1].to_string());
                }
            }
        }
        (self.region.clone(), self.service.clone())
    }
}

/// Value of the `host` header for a request URI.
fn host_header(uri: &Uri) -> Result<String, SigningError> {
    let host = uri
        .host()
        .ok_or_else(|| SigningError::invalid_header("request URI has no host"))?;
    Ok(match uri.port_u16() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn header_value(value: &str) -> Result<HeaderValue, SigningError> {
    HeaderValue::from_str(value).map_err(|e| SigningError::invalid_header(e.to_string()))
}

impl RequestSigner for AwsSigner {
    fn sign(
        &self,
        request: &mut SearchRequest,
        body: Option<PayloadReader>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SigningError> {
        let credentials = self.credentials.resolve(self.mode)?;

        let payload_hash = match body {
            Some(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .map_err(|e| SigningError::body_read(e.to_string()))?;
                sigv4::sha256_hex(&buf)
            }
            None => sigv4::sha256_hex(b""),
        };

        let host = host_header(request.uri())?;
        let (region, service) = self.scope_for(request.uri().host().unwrap_or_default());
        let amz_date = sigv4::amz_date(&timestamp);
        let date = sigv4::scope_date(&timestamp);

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        headers.insert(HOST, header_value(&host)?);
        headers.insert(X_AMZ_DATE, header_value(&amz_date)?);
        match &credentials.session_token {
            Some(token) => {
                headers.insert(X_AMZ_SECURITY_TOKEN, header_value(token)?);
            }
            None => {
                headers.remove(X_AMZ_SECURITY_TOKEN);
            }
        }
        if self.mode == SigningMode::Sdk {
            headers.insert(X_AMZ_CONTENT_SHA256, header_value(&payload_hash)?);
        }

        let (canonical_request, signed_headers) = sigv4::canonical_request(
            request.method(),
            request.uri(),
            request.headers(),
            &payload_hash,
        )?;

        let scope = format!("{}/{}/{}/aws4_request", date, region, service);
        let string_to_sign = sigv4::string_to_sign(&amz_date, &scope, &canonical_request);
        let key = sigv4::signing_key(&credentials.secret_access_key, &date, &region, &service)?;
        let signature = hex::encode(sigv4::hmac_sha256(&key, string_to_sign.as_bytes())?);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            sigv4::ALGORITHM,
            credentials.access_key_id,
            scope,
            signed_headers,
            signature
        );
        request
            .headers_mut()
            .insert(AUTHORIZATION, header_value(&authorization)?);

        debug!(
            region = %region,
            service = %service,
            signed_headers = %signed_headers,
            "Signed request"
        );

        Ok(())
    }
}
