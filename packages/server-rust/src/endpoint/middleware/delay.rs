//! Artificial-latency middleware for endpoints.
//!
//! Sleeps for a fixed duration before invoking the inner endpoint. The sleep
//! and the inner call run on their own task: they ignore the request's
//! cancellation token, have no timeout, and finish even if the caller drops
//! the returned future.

use std::task::{Context, Poll};
use std::time::Duration;

use tower::{Layer, Service};

use crate::endpoint::operation::{
    EndpointError, EndpointFuture, EndpointRequest, EndpointResponse,
};

// ---------------------------------------------------------------------------
// DelayLayer
// ---------------------------------------------------------------------------

/// Tower layer that delays every call by a fixed duration.
///
/// `Duration::ZERO` disables the delay entirely (no timer is registered).
#[derive(Debug, Clone, Copy)]
pub struct DelayLayer {
    delay: Duration,
}

impl DelayLayer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl<S> Layer<S> for DelayLayer {
    type Service = DelayService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DelayService {
            inner,
            delay: self.delay,
        }
    }
}

// ---------------------------------------------------------------------------
// DelayService
// ---------------------------------------------------------------------------

/// Service wrapper that sleeps before handing the request to the inner endpoint.
#[derive(Debug, Clone)]
pub struct DelayService<S> {
    inner: S,
    delay: Duration,
}

impl<S> Service<EndpointRequest> for DelayService<S>
where
    S: Service<EndpointRequest, Response = EndpointResponse, Error = EndpointError>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = EndpointResponse;
    type Error = EndpointError;
    type Future = EndpointFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: EndpointRequest) -> Self::Future {
        // Take the instance that was driven to readiness; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            inner.call(req).await
        });

        Box::pin(async move {
            task.await
                .map_err(|err| EndpointError::Task(err.to_string()))?
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
