//! Pipeline composition: wraps the send endpoint with its middleware layers.

use std::sync::Arc;

use gcm_core::GcmService;
use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;

use super::delay::DelayLayer;
use super::instrument::InstrumentLayer;
use crate::endpoint::config::EndpointConfig;
use crate::endpoint::operation::BoxEndpoint;
use crate::endpoint::send::SendEndpoint;

/// Build the send pipeline around an already-decorated [`GcmService`].
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentLayer` -- span and metrics, so the recorded duration includes the delay
/// 2. `DelayLayer` -- artificial latency before the business call
/// 3. `SendEndpoint` -- invokes `GcmService::send`
#[must_use]
pub fn build_send_pipeline<S>(service: Arc<S>, config: &EndpointConfig) -> BoxEndpoint
where
    S: GcmService + ?Sized + 'static,
{
    let svc = ServiceBuilder::new()
        .layer(InstrumentLayer::new("send"))
        .layer(DelayLayer::new(config.delay))
        .service(SendEndpoint::new(service));
    BoxCloneSyncService::new(svc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
