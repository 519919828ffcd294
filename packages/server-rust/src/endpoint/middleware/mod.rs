//! Tower middleware layers for the endpoint pipeline.
//!
//! - [`delay`]: Fixed artificial latency before the endpoint runs
//! - [`instrument`]: Per-call `tracing` span and `metrics` counters
//! - [`pipeline`]: Composes the layers around an endpoint

pub mod delay;
pub mod instrument;
pub mod pipeline;

pub use delay::DelayLayer;
pub use instrument::InstrumentLayer;
pub use pipeline::build_send_pipeline;
