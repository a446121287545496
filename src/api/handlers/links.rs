//! Handler for link creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a seller's target URL.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "target_url": "https://example.com/product", "seller_id": "s1" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: A new link was created
/// - **200 OK**: The seller already had a link for this URL; it is returned unchanged
/// - **400 Bad Request**: A field is missing or invalid, or the body is not valid JSON
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let target_url = payload.target_url.unwrap_or_default();
    let seller_id = payload.seller_id.unwrap_or_default();

    let created = state
        .link_service
        .create_link(&target_url, &seller_id)
        .await?;

    let status = if created.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(LinkResponse::from_link(created.link, &state.base_url)),
    ))
}
