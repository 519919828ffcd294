//! GCM core: the `send` business operation, its failure type, and the
//! invocation-logging decorator that wraps it.
//!
//! Nothing in this crate knows about HTTP. The server crate adapts a
//! [`GcmService`] into a transport-agnostic endpoint and binds it to a route.

pub mod error;
pub mod logging;
pub mod record;
pub mod service;
pub mod traits;

pub use error::SendError;
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use record::{InvocationRecord, MemorySink, TracingSink};
pub use service::{StubGcmService, ACK_TOKEN};
pub use traits::{GcmService, InvocationSink};
