//! HTTP transport used by the provider prober.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};
