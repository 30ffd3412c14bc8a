//! Interface definitions for the collaborators of the search client.
//!
//! The client depends only on these traits, so the network layer and the
//! signing scheme can be swapped (or mocked in tests) independently.

mod request_signer;
mod transport;

pub use request_signer::RequestSigner;
pub use transport::Transport;
