//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`        - Short link redirect with click recording
//! - `GET  /health`        - Storage health check
//! - `POST /links`         - Link creation
//! - `GET  /stats[/{code}]` - Earnings reports
//!
//! Literal routes take precedence over `/{code}`, and generated codes never
//! equal `links`, `stats` or `health`.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with state applied, without outer middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::api_routes())
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = router(state).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
