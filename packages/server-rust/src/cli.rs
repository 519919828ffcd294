//! Command-line flags and process-wide logging setup.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::endpoint::EndpointConfig;
use crate::network::{NetworkConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable key=value lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// GCM stub server.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Simulate some delay (in milliseconds) before sending a response
    #[arg(long, default_value_t = 0)]
    pub delay: u64,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.bind.clone(),
            port: self.port,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            endpoint: EndpointConfig {
                delay: Duration::from_millis(self.delay),
            },
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`. Every line
/// carries a UTC timestamp and the emitting file and line.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))
}
