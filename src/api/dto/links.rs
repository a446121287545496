//! DTOs for link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::LinkService;
use crate::domain::entities::Link;

/// Request to create a seller's short link.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation error rather than a JSON rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(
        required(message = "target_url is required"),
        url(message = "Invalid URL format")
    )]
    pub target_url: Option<String>,

    #[validate(
        required(message = "seller_id is required"),
        length(min = 1, max = 50)
    )]
    pub seller_id: Option<String>,
}

/// Created (or already existing) link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub seller_id: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: LinkService::short_url(base_url, &link.short_code),
            short_code: link.short_code,
            original_url: link.original_url,
            seller_id: link.seller_id,
            created_at: link.created_at,
        }
    }
}
