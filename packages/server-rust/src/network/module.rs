//! Network module with deferred startup lifecycle.
//!
//! `new()` creates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the listener fails. Splitting bind
//! from serve lets callers learn the OS-assigned port before serving.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use axum::routing::{get, post};
use axum::Router;
use gcm_core::GcmService;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{gcm_send_handler, health_handler, AppState, GCM_SEND_PATH, HEALTH_PATH};
use super::lifecycle::LifecycleController;
use super::middleware::build_http_layers;
use crate::endpoint::build_send_pipeline;

/// Owns the HTTP server: configuration, the business service it exposes,
/// the bound listener, and the shared lifecycle controller.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- allocates shared state
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the listener fails
pub struct NetworkModule {
    config: NetworkConfig,
    service: Arc<dyn GcmService>,
    listener: Option<TcpListener>,
    lifecycle: Arc<LifecycleController>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    ///
    /// `service` is the fully decorated business service; the endpoint
    /// pipeline is built around it per router.
    #[must_use]
    pub fn new(config: NetworkConfig, service: Arc<dyn GcmService>) -> Self {
        Self {
            config,
            service,
            listener: None,
            lifecycle: Arc::new(LifecycleController::new()),
        }
    }

    /// Returns a shared reference to the lifecycle controller.
    #[must_use]
    pub fn lifecycle(&self) -> Arc<LifecycleController> {
        Arc::clone(&self.lifecycle)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST /gcm/send` -- send endpoint
    /// - `GET /health` -- lifecycle state and uptime
    pub fn build_router(&self) -> Router {
        let state = AppState {
            send: build_send_pipeline(Arc::clone(&self.service), &self.config.endpoint),
            lifecycle: Arc::clone(&self.lifecycle),
            config: Arc::new(self.config.clone()),
            start_time: Instant::now(),
        };

        Router::new()
            .route(GCM_SEND_PATH, post(gcm_send_handler))
            .route(HEALTH_PATH, get(health_handler))
            .layer(build_http_layers())
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        let port = listener.local_addr()?.port();

        info!(addr = %format!("{}:{}", self.config.host, port), "listening");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the listener fails.
    ///
    /// There is no graceful shutdown: the future only completes on a
    /// transport fault, and the supervisor aborts it on any other trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called, if the server hits a
    /// fatal I/O error, or if it stops without one.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;
        let router = self.build_router();

        self.lifecycle.set_running();

        axum::serve(listener, router).await.context("serve")?;
        anyhow::bail!("listener stopped accepting connections")
    }
}
