//! Adapts a [`GcmService`] to the endpoint contract.

use std::sync::Arc;
use std::task::{Context, Poll};

use gcm_core::GcmService;
use tower::Service;

use super::operation::{EndpointError, EndpointFuture, EndpointRequest, EndpointResponse};

/// Endpoint that forwards the decoded registration id to a [`GcmService`].
///
/// The business call runs when the returned future is first polled, not
/// inside `call`, so outer layers can delay it.
pub struct SendEndpoint<S: ?Sized> {
    service: Arc<S>,
}

impl<S: ?Sized> SendEndpoint<S> {
    #[must_use]
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S: ?Sized> Clone for SendEndpoint<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S> Service<EndpointRequest> for SendEndpoint<S>
where
    S: GcmService + ?Sized + 'static,
{
    type Response = EndpointResponse;
    type Error = EndpointError;
    type Future = EndpointFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: EndpointRequest) -> Self::Future {
        let service = Arc::clone(&self.service);
        Box::pin(async move {
            let ack = service.send(&req.registration_id)?;
            Ok(EndpointResponse::Text(ack))
        })
    }
}
