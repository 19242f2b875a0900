//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check: database connectivity
//! - `/api/*`       - REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Per-request deadline; the handler is dropped when it fires
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{timeout, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `request_timeout_seconds` bounds how long any single request may run.
pub fn app_router(state: AppState, request_timeout_seconds: u64) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(timeout::layer(request_timeout_seconds))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
