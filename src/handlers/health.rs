use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check handler: status, timestamp, configured products and
/// environment tag. Pure read, no side effects.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "products": state.catalog.slugs(),
        "environment": state.config.server.environment,
    }))
}

/// List available products (slug + display name pairs)
pub async fn list_products(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "products": state.catalog.list(),
    }))
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
        })),
    )
}
