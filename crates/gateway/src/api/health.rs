use axum::response::{IntoResponse, Json};

/// `GET /api/health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
