//! Health endpoint handler.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::AppState;

/// Path the health endpoint is bound to.
pub const HEALTH_PATH: &str = "/health";

/// Returns lifecycle state and uptime as JSON.
///
/// Always 200; the `state` field says whether the server is actually serving.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "state": state.lifecycle.state().as_str(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}
