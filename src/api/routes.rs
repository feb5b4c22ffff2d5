//! API Routes
//!
//! Configures the Axum router for the example server.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, exists_handler, expiration_handler, get_handler, health_handler, set_handler,
    size_handler, stats_handler, AppState,
};

/// Creates the router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair, optionally with an absolute deadline
/// - `GET /get/:key` - Retrieve a value by key
/// - `GET /exists/:key` - Check whether a live entry exists
/// - `DELETE /del/:key` - Delete a key
/// - `GET /size` - Number of stored entries
/// - `GET /expiration/:key` - Deadline of a key
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/exists/:key", get(exists_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/size", get(size_handler))
        .route("/expiration/:key", get(expiration_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
