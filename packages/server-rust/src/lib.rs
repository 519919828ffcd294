//! GCM stub server: an HTTP front for the `gcm-core` send operation with
//! artificial latency, invocation logging, and signal-driven shutdown.

pub mod cli;
pub mod endpoint;
pub mod network;
pub mod supervisor;

pub use cli::{init_tracing, Cli, LogFormat};
pub use network::{NetworkConfig, NetworkModule};
pub use supervisor::{wait_for_termination, FatalTrigger, Supervisor, TerminationSignal};
