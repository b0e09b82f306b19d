//! Infrastructure layer for ai-roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the streaming gateway transport, configuration
//! file loading and the JSONL event log.

pub mod config;
pub mod logging;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDeliberationConfig, FileExecutionConfig, FileGatewayConfig,
    FileModelsConfig, FileOutputConfig, FileProviderConfig, FileProvidersConfig,
};
pub use logging::JsonlEventLog;
pub use transport::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_GATEWAY_URL, HttpGatewayTransport};
