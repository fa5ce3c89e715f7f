//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health -- liveness plus dependency status.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db_pool.reader).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "database": database,
        "provider": if state.engine.provider_configured() { "configured" } else { "fallback-only" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
