//! Configuration types for the SearchClient.

/// Logical name of the backing service, attached to every diagnostic event.
pub const SERVICE_NAME: &str = "elasticsearch";

/// AWS region used for signing when none is given.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// AWS service identifier used for signing when none is given.
pub const DEFAULT_SERVICE: &str = "es";

/// Configuration for the SearchClient.
///
/// Fixed at construction; the client never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the search service (e.g., "http://localhost:9200").
    pub url: String,
    /// Whether every request is signed before it is sent.
    pub sign_requests: bool,
    /// AWS region used in the signing scope.
    pub aws_region: String,
    /// AWS service identifier used in the signing scope.
    pub aws_service: String,
    /// Use the SDK-native signing mode instead of the compatibility mode.
    pub aws_sdk_signer: bool,
    /// Service name reported in diagnostics.
    pub service_name: String,
    /// Index names this client is expected to work with. Informational only.
    pub indexes: Vec<String>,
}

impl ClientConfig {
    /// Create a config for the given base URL with signing disabled and
    /// default region and service.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sign_requests: false,
            aws_region: DEFAULT_REGION.to_string(),
            aws_service: DEFAULT_SERVICE.to_string(),
            aws_sdk_signer: false,
            service_name: SERVICE_NAME.to_string(),
            indexes: Vec::new(),
        }
    }

    /// Enable or disable request signing.
    pub fn with_sign_requests(mut self, sign_requests: bool) -> Self {
        self.sign_requests = sign_requests;
        self
    }

    /// Set the AWS region and service used for signing.
    pub fn with_aws_scope(mut self, region: impl Into<String>, service: impl Into<String>) -> Self {
        self.aws_region = region.into();
        self.aws_service = service.into();
        self
    }

    /// Choose the SDK-native signing mode.
    pub fn with_aws_sdk_signer(mut self, aws_sdk_signer: bool) -> Self {
        self.aws_sdk_signer = aws_sdk_signer;
        self
    }

    /// Record the indexes this client is expected to work with.
    pub fn with_indexes<I, S>(mut self, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes = indexes.into_iter().map(Into::into).collect();
        self
    }
}
