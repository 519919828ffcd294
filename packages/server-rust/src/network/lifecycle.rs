//! Server lifecycle state and the root cancellation token.
//!
//! Uses `ArcSwap` for lock-free state transitions. Entering `ShuttingDown`
//! cancels the root token, and with it every per-request child token.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio_util::sync::CancellationToken;

/// Server lifecycle state.
///
/// State machine: Starting -> Running -> ShuttingDown -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Listener not yet serving.
    Starting,
    /// Listener is accepting requests.
    Running,
    /// A fatal trigger arrived; supervised tasks are being torn down.
    ShuttingDown,
    /// Terminal.
    Stopped,
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::ShuttingDown => "shutting_down",
            Self::Stopped => "stopped",
        }
    }
}

/// Shared lifecycle handle for the network module, handlers, and supervisor.
#[derive(Debug)]
pub struct LifecycleController {
    state: ArcSwap<LifecycleState>,
    root: CancellationToken,
}

impl LifecycleController {
    /// Creates a controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(LifecycleState::Starting),
            root: CancellationToken::new(),
        }
    }

    pub fn set_running(&self) {
        self.state.store(Arc::new(LifecycleState::Running));
    }

    /// Moves to `ShuttingDown` and cancels the root token.
    pub fn begin_shutdown(&self) {
        self.state.store(Arc::new(LifecycleState::ShuttingDown));
        self.root.cancel();
    }

    pub fn set_stopped(&self) {
        self.state.store(Arc::new(LifecycleState::Stopped));
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        **self.state.load()
    }

    /// Token for one request; cancelled when shutdown begins.
    #[must_use]
    pub fn child_token(&self) -> CancellationToken {
        self.root.child_token()
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}
