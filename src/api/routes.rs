//! API route configuration.

use crate::api::handlers::{create_link_handler, stats_handler, stats_list_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management and reporting routes.
///
/// # Endpoints
///
/// - `POST /links`         - Create a seller's short link
/// - `GET  /stats`         - Earnings of all links (paginated)
/// - `GET  /stats/{code}`  - Earnings of a single link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/stats", get(stats_list_handler))
        .route("/stats/{code}", get(stats_handler))
}
