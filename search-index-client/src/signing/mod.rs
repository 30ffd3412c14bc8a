//! AWS Signature Version 4 request signing.
//!
//! Used when the search service sits behind AWS IAM authentication. The
//! signer is chosen once, when the client is built, from `ClientConfig`.

mod credentials;
mod signer;
mod sigv4;

pub use credentials::{Credentials, CredentialsSource};
pub use signer::{AwsSigner, SigningMode};
