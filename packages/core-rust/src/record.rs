//! Invocation records and the sinks that receive them.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Serialize, Serializer};

use crate::error::SendError;
use crate::traits::InvocationSink;

/// Metadata for a single decorated call.
///
/// Built when the call finishes, emitted once, then dropped. Records have no
/// identity beyond the call that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationRecord {
    /// Name of the decorated method (always `"send"` today).
    pub method: &'static str,
    /// Input passed to the wrapped call.
    pub input: String,
    /// Output of the wrapped call; empty when it failed.
    pub output: String,
    /// Failure returned by the wrapped call, if any.
    #[serde(rename = "err")]
    pub error: Option<SendError>,
    /// Wall-clock time spent inside the wrapped call.
    #[serde(rename = "took_us", serialize_with = "serialize_micros")]
    pub took: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_micros<S: Serializer>(took: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    #[allow(clippy::cast_possible_truncation)]
    serializer.serialize_u64(took.as_micros() as u64)
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Production sink: one `tracing` event per record under the `gcm::invocation` target.
///
/// Successful calls log at INFO, failed calls at WARN. Concurrency safety is
/// delegated to the installed subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl InvocationSink for TracingSink {
    fn emit(&self, record: &InvocationRecord) {
        match record.error {
            None => tracing::info!(
                target: "gcm::invocation",
                method = record.method,
                input = %record.input,
                output = %record.output,
                took = ?record.took,
                "invocation"
            ),
            Some(err) => tracing::warn!(
                target: "gcm::invocation",
                method = record.method,
                input = %record.input,
                output = %record.output,
                err = %err,
                took = ?record.took,
                "invocation"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Sink that keeps every record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<InvocationRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records emitted so far.
    #[must_use]
    pub fn records(&self) -> Vec<InvocationRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl InvocationSink for MemorySink {
    fn emit(&self, record: &InvocationRecord) {
        self.records.lock().push(record.clone());
    }
}
