// HTTP API
//
// axum router over the stream service: banner, health and source lookup.

pub mod error;
pub mod health;
pub mod sources;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use streamsource_core::{config::ServerConfig, service::StreamService};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub stream_service: Arc<StreamService>,
}

/// Create the HTTP router
pub fn create_router(stream_service: Arc<StreamService>, server: &ServerConfig) -> Router {
    let state = AppState { stream_service };

    let router = Router::new()
        .merge(health::create_health_router())
        .route("/sources", get(sources::get_sources))
        .route("/vidsrc", get(sources::get_sources));

    // Apply layers before state
    let router = router
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
