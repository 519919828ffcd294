//! HTTP transport: configuration, handlers, middleware, lifecycle state, and
//! the network module that binds and serves them.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod module;

pub use config::*;
pub use handlers::AppState;
pub use lifecycle::*;
pub use module::NetworkModule;
