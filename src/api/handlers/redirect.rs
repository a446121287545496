//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::application::services::RedirectOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code
/// 2. Record the click, validate it and update the monthly aggregate
/// 3. Return 302 Found with `Location` set to the target
///
/// The redirect is only sent after the click is committed. Recording runs in
/// its own task, so a client that disconnects early does not abort it.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the click could not be recorded.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.redirect_service.clone();
    let lookup = code.clone();

    let outcome = tokio::spawn(async move { service.handle_redirect(&lookup).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, code = %code, "Redirect task failed");
            AppError::persistence("Click recording was interrupted", json!({ "code": code }))
        })??;

    match outcome {
        RedirectOutcome::Found { target_url, .. } => {
            Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]))
        }
        RedirectOutcome::NotFound => Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        )),
    }
}
