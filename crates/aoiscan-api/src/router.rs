use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Widget configuration
        .route("/api/v1/config", get(handlers::resolve_config))
        .route("/api/v1/embed", get(handlers::embed_code))

        // Analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/results", get(handlers::list_results))
        .route("/api/v1/export/{format}", get(handlers::handle_export))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
