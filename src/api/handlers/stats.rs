//! Handlers for earnings statistics endpoints.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::stats::LinkStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links with their click and earnings totals.
///
/// # Endpoint
///
/// `GET /stats?page=1&per_page=10`
///
/// # Response
///
/// ```json
/// [
///   {
///     "short_code": "abc123",
///     "url": "https://example.com",
///     "total_clicks": 2,
///     "valid_clicks": 1,
///     "total_earnings": 0.05,
///     "monthly_breakdown": [
///       { "month": "05/2026", "clicks": 2, "valid_clicks": 1, "earnings": 0.05 }
///     ]
///   }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `page` or `per_page` is out of range or not a number.
pub async fn stats_list_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<LinkStatsResponse>>, AppError> {
    let Query(params) = params?;
    let (page, per_page) = params.resolve()?;

    let earnings = state.stats_service.list_earnings(page, per_page).await?;

    Ok(Json(
        earnings.into_iter().map(LinkStatsResponse::from).collect(),
    ))
}

/// Earnings of a single link.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let earnings = state.stats_service.earnings_for_code(&code).await?;

    Ok(Json(earnings.into()))
}
