//! Dependency initialization and wiring for the CLI.

use std::sync::Arc;
use tracing::info;

use crate::config::ConnectionArgs;
use crate::CliError;
use search_index_client::{ClientConfig, HttpTransport, SearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured search client.
    pub client: SearchClient,
}

impl Dependencies {
    /// Build the search client from connection arguments.
    ///
    /// A trailing slash on the URL is dropped, since operation paths are
    /// appended to it.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(CliError)` - If the arguments are unusable
    pub fn new(args: &ConnectionArgs) -> Result<Self, CliError> {
        let config = Self::client_config(args)?;

        info!(
            url = %config.url,
            sign_requests = config.sign_requests,
            aws_region = %config.aws_region,
            aws_service = %config.aws_service,
            max_retries = args.max_retries,
            "Initializing dependencies"
        );

        let transport = Arc::new(HttpTransport::with_max_retries(args.max_retries));
        let client = SearchClient::from_config(config, transport);

        Ok(Self { client })
    }

    fn client_config(args: &ConnectionArgs) -> Result<ClientConfig, CliError> {
        let url = args.url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(CliError::config("search service URL is empty"));
        }

        Ok(ClientConfig::new(url)
            .with_sign_requests(args.sign_requests)
            .with_aws_scope(&args.aws_region, &args.aws_service)
            .with_aws_sdk_signer(args.aws_sdk_signer))
    }
}
