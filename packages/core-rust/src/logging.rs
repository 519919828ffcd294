//! Invocation-logging decorator for [`GcmService`].
//!
//! [`LoggingLayer`] is a `tower::Layer`, so decorators stack with
//! `tower::ServiceBuilder` the same way transport middleware does:
//!
//! ```
//! use std::sync::Arc;
//! use gcm_core::{GcmService, LoggingLayer, StubGcmService, TracingSink};
//! use tower::ServiceBuilder;
//!
//! let svc = ServiceBuilder::new()
//!     .layer(LoggingLayer::new(Arc::new(TracingSink)))
//!     .service(StubGcmService);
//! assert!(svc.send("abc123").is_ok());
//! ```

use std::sync::Arc;
use std::time::Instant;

use tower::Layer;

use crate::error::SendError;
use crate::record::InvocationRecord;
use crate::traits::{GcmService, InvocationSink};

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Layer that wraps a service with [`LoggingMiddleware`].
#[derive(Clone)]
pub struct LoggingLayer {
    sink: Arc<dyn InvocationSink>,
}

impl LoggingLayer {
    #[must_use]
    pub fn new(sink: Arc<dyn InvocationSink>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware {
            inner,
            sink: Arc::clone(&self.sink),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingMiddleware
// ---------------------------------------------------------------------------

/// Forwards every call to the wrapped service and emits exactly one
/// [`InvocationRecord`] per call, success or failure.
///
/// The wrapped result is returned untouched.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
    sink: Arc<dyn InvocationSink>,
}

impl<S> LoggingMiddleware<S> {
    #[must_use]
    pub fn new(inner: S, sink: Arc<dyn InvocationSink>) -> Self {
        Self { inner, sink }
    }
}

impl<S: GcmService> GcmService for LoggingMiddleware<S> {
    fn send(&self, registration_id: &str) -> Result<String, SendError> {
        let begin = Instant::now();
        let result = self.inner.send(registration_id);

        let (output, error) = match &result {
            Ok(ack) => (ack.clone(), None),
            Err(err) => (String::new(), Some(*err)),
        };
        self.sink.emit(&InvocationRecord {
            method: "send",
            input: registration_id.to_string(),
            output,
            error,
            took: begin.elapsed(),
        });

        result
    }
}

impl<S> std::fmt::Debug for LoggingMiddleware<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingMiddleware")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
