//! reqwest implementation of the `Transport` interface.

mod http_transport;

pub use http_transport::{HttpTransport, HttpTransportConfig};
