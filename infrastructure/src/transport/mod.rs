//! Model transport adapters

mod http;
mod utf8;

pub use http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_GATEWAY_URL, HttpGatewayTransport};
pub use utf8::Utf8ChunkDecoder;
