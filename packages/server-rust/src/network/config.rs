//! Network configuration types for the GCM server.

use crate::endpoint::EndpointConfig;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8081;

/// Default cap on request body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Largest request body the transport will read before failing the decode.
    pub max_body_bytes: usize,
    /// Settings applied to every bound endpoint.
    pub endpoint: EndpointConfig,
}

impl NetworkConfig {
    /// `host:port` string used for binding and logging.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            endpoint: EndpointConfig::default(),
        }
    }
}
