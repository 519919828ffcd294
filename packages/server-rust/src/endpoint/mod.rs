//! Transport-agnostic endpoints.
//!
//! An endpoint is a `tower::Service<EndpointRequest>`: it receives a decoded
//! request plus its context and returns a response or an [`EndpointError`].
//!
//! 1. **Types** (`operation`): context, request, response, error
//! 2. **Adapter** (`send`): wraps a `GcmService` as an endpoint
//! 3. **Middleware** (`middleware`): delay and instrumentation layers
//! 4. **Config** (`config`): per-endpoint settings

pub mod config;
pub mod middleware;
pub mod operation;
pub mod send;

pub use config::EndpointConfig;
pub use middleware::build_send_pipeline;
pub use operation::{
    BoxEndpoint, EndpointContext, EndpointError, EndpointFuture, EndpointRequest,
    EndpointResponse,
};
pub use send::SendEndpoint;
