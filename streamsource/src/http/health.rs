//! Health check and service banner

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::http::AppState;

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}

/// Basic health check (always returns OK if server is running)
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Service name, version and the endpoints it serves
pub async fn banner() -> impl IntoResponse {
    Json(json!({
        "name": "streamsource",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/sources", "/vidsrc", "/health"],
    }))
}
