//! API module for the KME server

pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Largest request body accepted by the router
///
/// The logging middleware buffers up to the same size, so it never refuses a
/// body the handlers would accept.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub kme_id: String,
    pub store: String,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: true,
        kme_id: state.config.kme_id.clone(),
        store: state.kme.store().backend().to_string(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // ETSI GS QKD 014 key delivery
        .route(
            "/api/v1/keys/{sae_id}/{method}",
            get(handlers::get_keys).post(handlers::post_keys),
        )
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(from_fn_with_state(state.clone(), middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
