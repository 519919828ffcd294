//! Instrumentation middleware for endpoints.
//!
//! Wraps each call in a `tracing` span carrying the request id, records the
//! duration and outcome on completion, and bumps `metrics` counters. Without
//! an installed recorder the `metrics` macros are no-ops.

use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::endpoint::operation::{
    EndpointError, EndpointFuture, EndpointRequest, EndpointResponse,
};

// ---------------------------------------------------------------------------
// InstrumentLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments endpoint calls under a fixed endpoint name.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentLayer {
    endpoint: &'static str,
}

impl InstrumentLayer {
    #[must_use]
    pub fn new(endpoint: &'static str) -> Self {
        Self { endpoint }
    }
}

impl<S> Layer<S> for InstrumentLayer {
    type Service = InstrumentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentService {
            inner,
            endpoint: self.endpoint,
        }
    }
}

// ---------------------------------------------------------------------------
// InstrumentService
// ---------------------------------------------------------------------------

/// Service wrapper that records endpoint duration and outcome.
#[derive(Debug, Clone)]
pub struct InstrumentService<S> {
    inner: S,
    endpoint: &'static str,
}

impl<S> Service<EndpointRequest> for InstrumentService<S>
where
    S: Service<EndpointRequest, Response = EndpointResponse, Error = EndpointError> + Send,
    S::Future: Send + 'static,
{
    type Response = EndpointResponse;
    type Error = EndpointError;
    type Future = EndpointFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: EndpointRequest) -> Self::Future {
        let endpoint = self.endpoint;
        let span = info_span!(
            "endpoint",
            endpoint = endpoint,
            request_id = req.ctx.request_id.as_deref().unwrap_or("-"),
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let elapsed = start.elapsed();

                let outcome = match &result {
                    Ok(_) => "ok",
                    Err(err) => err.kind(),
                };

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                metrics::counter!(
                    "gcm_endpoint_requests_total",
                    "endpoint" => endpoint,
                    "outcome" => outcome
                )
                .increment(1);
                metrics::histogram!("gcm_endpoint_duration_seconds", "endpoint" => endpoint)
                    .record(elapsed.as_secs_f64());

                tracing::debug!(duration_ms, outcome, "endpoint complete");

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
