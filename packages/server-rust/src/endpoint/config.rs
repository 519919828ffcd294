use std::time::Duration;

/// Per-endpoint behaviour knobs.
#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    /// Artificial delay applied before the business call. Zero disables it.
    pub delay: Duration,
}
