use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Plain liveness banner
pub async fn root() -> &'static str {
    "SQL Playground Backend is running"
}

/// Health check endpoint
///
/// Reports whether the history store answers, for load balancers and monitoring.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let history_status = match state.history.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("History store health check failed: {:?}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": if history_status == "connected" { "healthy" } else { "unhealthy" },
        "historyStore": history_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
