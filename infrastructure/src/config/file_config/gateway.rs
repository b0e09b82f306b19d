//! Gateway configuration from TOML (`[gateway]` section)

use crate::transport::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_GATEWAY_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where model requests are sent
///
/// # Example
///
/// ```toml
/// [gateway]
/// url = "http://localhost:3000/api/chat"
/// connect_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub url: String,
    pub connect_timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl FileGatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
