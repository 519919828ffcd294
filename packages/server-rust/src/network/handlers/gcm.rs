//! HTTP binding for the send endpoint.
//!
//! One inbound request maps to one endpoint invocation: decode the body into
//! a registration id, run the pipeline, encode the result.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

use super::AppState;
use crate::endpoint::{EndpointContext, EndpointError, EndpointRequest, EndpointResponse};
use crate::network::middleware::REQUEST_ID_HEADER;

/// Path the send endpoint is bound to.
pub const GCM_SEND_PATH: &str = "/gcm/send";

/// Failures surfaced by the transport binding.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request body could not be read or was not UTF-8.
    #[error("decode request: {0}")]
    Decode(String),
    /// The endpoint result could not be serialized.
    #[error("encode response: {0}")]
    Encode(String),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl TransportError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Endpoint(err) => err.kind(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Endpoint(EndpointError::Send(_)) => StatusCode::BAD_REQUEST,
            Self::Encode(_) | Self::Endpoint(EndpointError::Task(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (self.status(), body).into_response()
    }
}

/// Handles `POST /gcm/send`.
///
/// # Errors
///
/// Returns a [`TransportError`] for unreadable bodies and endpoint failures;
/// axum renders it through its `IntoResponse` impl.
pub async fn gcm_send_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, TransportError> {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let registration_id =
        decode_send_request(request.into_body(), state.config.max_body_bytes).await?;
    let ctx = EndpointContext::new(request_id, state.lifecycle.child_token());

    let response = state
        .send
        .oneshot(EndpointRequest::new(ctx, registration_id))
        .await?;
    encode_response(response)
}

/// Reads the whole body as the registration id.
///
/// An empty body decodes to the empty string; rejecting it is the business
/// operation's job.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] if the body cannot be read, exceeds
/// `limit` bytes, or is not valid UTF-8.
pub async fn decode_send_request(body: Body, limit: usize) -> Result<String, TransportError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Writes text results verbatim and anything else as JSON.
///
/// # Errors
///
/// Returns [`TransportError::Encode`] if a structured result fails to serialize.
pub fn encode_response(response: EndpointResponse) -> Result<Response, TransportError> {
    match response {
        EndpointResponse::Text(text) => {
            Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response())
        }
        EndpointResponse::Structured(value) => {
            let body =
                serde_json::to_vec(&value).map_err(|e| TransportError::Encode(e.to_string()))?;
            Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
        }
    }
}
