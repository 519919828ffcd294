use std::sync::Arc;

use crate::error::SendError;
use crate::record::InvocationRecord;

/// The single business capability: deliver a message to a registration id.
///
/// The stub core operation and every decorator implement this trait, so a
/// decorated service is substitutable anywhere the bare one is expected.
pub trait GcmService: Send + Sync {
    /// Send to `registration_id`, returning an acknowledgement token.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::EmptyInput`] when `registration_id` is empty.
    fn send(&self, registration_id: &str) -> Result<String, SendError>;
}

impl<S: GcmService + ?Sized> GcmService for Arc<S> {
    fn send(&self, registration_id: &str) -> Result<String, SendError> {
        (**self).send(registration_id)
    }
}

impl<S: GcmService + ?Sized> GcmService for Box<S> {
    fn send(&self, registration_id: &str) -> Result<String, SendError> {
        (**self).send(registration_id)
    }
}

/// Destination for invocation records produced by the logging decorator.
///
/// Must tolerate concurrent `emit` calls; ordering between interleaved
/// records from concurrent invocations is unspecified.
pub trait InvocationSink: Send + Sync {
    /// Emit one finished record.
    fn emit(&self, record: &InvocationRecord);
}

impl<T: InvocationSink + ?Sized> InvocationSink for Arc<T> {
    fn emit(&self, record: &InvocationRecord) {
        (**self).emit(record);
    }
}
