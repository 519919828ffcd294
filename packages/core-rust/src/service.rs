//! The stub send operation.

use crate::error::SendError;
use crate::traits::GcmService;

/// Acknowledgement token returned for every successful send.
pub const ACK_TOKEN: &str = "id=0:1370674827295849";

/// Stateless stand-in for real push delivery.
///
/// Rejects the empty id and acknowledges everything else with [`ACK_TOKEN`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGcmService;

impl GcmService for StubGcmService {
    fn send(&self, registration_id: &str) -> Result<String, SendError> {
        if registration_id.is_empty() {
            return Err(SendError::EmptyInput);
        }
        Ok(ACK_TOKEN.to_string())
    }
}
