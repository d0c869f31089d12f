// handlers/root.rs - Service banner and health probe

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Liveness banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the landing API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health - Store connectivity check, 503 when the store is unreachable
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.repos.backend_name();

    match state.repos.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": backend
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": backend,
                    "error": "database unavailable"
                })),
            )
        }
    }
}
