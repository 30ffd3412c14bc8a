//! AWS credentials and where to find them.

use std::env;
use std::fmt;

use crate::errors::SigningError;
use crate::signing::SigningMode;

const ACCESS_KEY_VARS: &[&str] = &["AWS_ACCESS_KEY_ID"];
const SECRET_KEY_VARS: &[&str] = &["AWS_SECRET_ACCESS_KEY"];
const SESSION_TOKEN_VARS: &[&str] = &["AWS_SESSION_TOKEN"];

// Compatibility mode also honours the older variable names.
const COMPAT_ACCESS_KEY_VARS: &[&str] = &["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"];
const COMPAT_SECRET_KEY_VARS: &[&str] = &["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"];
const COMPAT_SESSION_TOKEN_VARS: &[&str] = &["AWS_SESSION_TOKEN", "AWS_SECURITY_TOKEN"];

/// A set of AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials).
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

/// Where a signer obtains its credentials.
#[derive(Debug, Clone)]
pub enum CredentialsSource {
    /// Read from the process environment on every signature, so rotated
    /// credentials are picked up without rebuilding the client.
    Environment,
    /// Fixed credentials.
    Static(Credentials),
}

impl CredentialsSource {
    /// Resolve the credentials to sign with.
    pub fn resolve(&self, mode: SigningMode) -> Result<Credentials, SigningError> {
        match self {
            Self::Static(credentials) => Ok(credentials.clone()),
            Self::Environment => from_lookup(mode, |name| env::var(name).ok()),
        }
    }
}

/// Build credentials from a variable lookup, trying names in order.
pub(crate) fn from_lookup<F>(mode: SigningMode, lookup: F) -> Result<Credentials, SigningError>
where
    F: Fn(&str) -> Option<String>,
{
    let (access_vars, secret_vars, token_vars) = match mode {
        SigningMode::Sdk => (ACCESS_KEY_VARS, SECRET_KEY_VARS, SESSION_TOKEN_VARS),
        SigningMode::Compat => (
            COMPAT_ACCESS_KEY_VARS,
            COMPAT_SECRET_KEY_VARS,
            COMPAT_SESSION_TOKEN_VARS,
        ),
    };

    let first = |names: &[&str]| {
        names
            .iter()
            .filter_map(|name| lookup(*name))
            .find(|value| !value.is_empty())
    };

    let access_key_id = first(access_vars).ok_or_else(|| {
        SigningError::missing_credentials(format!("none of {:?} is set", access_vars))
    })?;
    let secret_access_key = first(secret_vars).ok_or_else(|| {
        SigningError::missing_credentials(format!("none of {:?} is set", secret_vars))
    })?;

    Ok(Credentials {
        access_key_id,
        secret_access_key,
        session_token: first(token_vars),
    })
}
