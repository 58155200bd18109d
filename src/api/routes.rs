//! API Routes
//!
//! Configures the Axum router with all inspection endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_tier_handler, delete_handler, exists_handler, get_handler,
    health_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache/:tier` - Store a value through an access pattern
/// - `GET /cache/:tier/:key` - Read a value
/// - `GET /cache/:tier/:key/exists` - Check for a live value
/// - `DELETE /cache/:tier/:key` - Delete a key
/// - `DELETE /cache/:tier` - Clear one access pattern
/// - `DELETE /cache` - Clear every tier
/// - `GET /stats` - Aggregate statistics
/// - `GET /health` - Health check endpoint
///
/// `:tier` is one of `memory`, `session`, `persistent`, `smart`; anything else
/// is rejected with 400.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", delete(clear_all_handler))
        .route("/cache/:tier", put(set_handler).delete(clear_tier_handler))
        .route("/cache/:tier/:key", get(get_handler).delete(delete_handler))
        .route("/cache/:tier/:key/exists", get(exists_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
