//! Request, response, and error types shared by every endpoint.

use std::future::Future;
use std::pin::Pin;

use gcm_core::SendError;
use tokio_util::sync::CancellationToken;

/// Context carried with every endpoint invocation.
///
/// The cancellation token is a child of the server's root token and fires
/// when shutdown begins. No endpoint in this crate observes it mid-delay.
#[derive(Debug, Clone)]
pub struct EndpointContext {
    /// Value of the `x-request-id` header, when present.
    pub request_id: Option<String>,
    pub cancel: CancellationToken,
}

impl EndpointContext {
    #[must_use]
    pub fn new(request_id: Option<String>, cancel: CancellationToken) -> Self {
        Self { request_id, cancel }
    }

    /// A context with no request id and a token that nothing cancels.
    #[must_use]
    pub fn background() -> Self {
        Self::new(None, CancellationToken::new())
    }
}

/// Decoded input for the send endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    pub ctx: EndpointContext,
    pub registration_id: String,
}

impl EndpointRequest {
    #[must_use]
    pub fn new(ctx: EndpointContext, registration_id: impl Into<String>) -> Self {
        Self {
            ctx,
            registration_id: registration_id.into(),
        }
    }
}

/// Successful endpoint result, before wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointResponse {
    /// Written verbatim as the response body.
    Text(String),
    /// Serialized as JSON.
    Structured(serde_json::Value),
}

/// Errors returned by endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EndpointError {
    #[error(transparent)]
    Send(#[from] SendError),
    /// The task running the endpoint panicked or was aborted.
    #[error("endpoint task failed: {0}")]
    Task(String),
}

impl EndpointError {
    /// Stable machine-readable kind, used in wire error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Send(err) => err.kind(),
            Self::Task(_) => "task_failed",
        }
    }
}

/// Boxed future returned by endpoint services.
pub type EndpointFuture =
    Pin<Box<dyn Future<Output = Result<EndpointResponse, EndpointError>> + Send>>;

/// Type-erased endpoint pipeline, cheap to clone into each request.
pub type BoxEndpoint =
    tower::util::BoxCloneSyncService<EndpointRequest, EndpointResponse, EndpointError>;
