use serde::Serialize;

/// Business-rule rejection returned by [`GcmService::send`](crate::GcmService::send).
///
/// Recoverable: the transport layer encodes it as a normal failure response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum SendError {
    /// The registration id was the empty string.
    #[error("empty registration id")]
    EmptyInput,
}

impl SendError {
    /// Stable machine-readable kind, used in wire error bodies.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
        }
    }
}
