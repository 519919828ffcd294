//! HTTP handler definitions for the GCM server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod gcm;
pub mod health;

pub use gcm::{
    decode_send_request, encode_response, gcm_send_handler, TransportError, GCM_SEND_PATH,
};
pub use health::{health_handler, HEALTH_PATH};

use std::sync::Arc;
use std::time::Instant;

use super::{LifecycleController, NetworkConfig};
use crate::endpoint::BoxEndpoint;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references and a boxed endpoint so cloning is cheap. Binding a
/// new route means adding its endpoint here and a `.route(...)` in
/// `NetworkModule::build_router`.
#[derive(Clone)]
pub struct AppState {
    /// Composed send pipeline (instrumentation, delay, decorated service).
    pub send: BoxEndpoint,
    /// Lifecycle state and root cancellation token.
    pub lifecycle: Arc<LifecycleController>,
    /// Network configuration (bind address, body limit, endpoint settings).
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
