//! Link creation and retrieval service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, is_reserved};
use crate::utils::url_check::check_target_url;

/// Longest accepted seller identifier.
pub const MAX_SELLER_ID_LENGTH: usize = 50;

/// Result of a create request: the link and whether it was newly inserted.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub created: bool,
}

/// Service for creating and resolving short links.
///
/// # Deduplication
///
/// A second request for the same `(original_url, seller_id)` returns the
/// existing link. The check is a lookup before insert, so two concurrent
/// identical requests may still create two links.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    code_length: usize,
}

impl LinkService {
    const MAX_ATTEMPTS: usize = 10;

    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self::with_code_length(link_repository, DEFAULT_CODE_LENGTH)
    }

    pub fn with_code_length(link_repository: Arc<dyn LinkRepository>, code_length: usize) -> Self {
        Self {
            link_repository,
            code_length,
        }
    }

    /// Creates a short link for a seller, or returns the one they already have.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if either field is missing or empty,
    /// the URL is not an absolute HTTP(S) URL, or the seller id is too long.
    /// Returns [`AppError::GenerationExhausted`] if no free code was found.
    pub async fn create_link(
        &self,
        target_url: &str,
        seller_id: &str,
    ) -> Result<CreatedLink, AppError> {
        let target_url = target_url.trim();
        let seller_id = seller_id.trim();

        if target_url.is_empty() {
            return Err(AppError::bad_request(
                "target_url is required",
                json!({ "field": "target_url" }),
            ));
        }

        if seller_id.is_empty() {
            return Err(AppError::bad_request(
                "seller_id is required",
                json!({ "field": "seller_id" }),
            ));
        }

        if seller_id.chars().count() > MAX_SELLER_ID_LENGTH {
            return Err(AppError::bad_request(
                "seller_id is too long",
                json!({ "field": "seller_id", "max_length": MAX_SELLER_ID_LENGTH }),
            ));
        }

        check_target_url(target_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self
            .link_repository
            .find_by_url_and_seller(target_url, seller_id)
            .await?
        {
            tracing::debug!(code = %existing.short_code, "Returning existing link");
            return Ok(CreatedLink {
                link: existing,
                created: false,
            });
        }

        let link = self.insert_with_unique_code(target_url, seller_id).await?;
        tracing::info!(code = %link.short_code, seller_id, "Link created");

        Ok(CreatedLink {
            link,
            created: true,
        })
    }

    /// Resolves a short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Builds the public short URL for a code under `base_url`.
    pub fn short_url(base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Inserts a link under a freshly generated code.
    ///
    /// A code that is reserved, already present, or taken between the lookup
    /// and the insert counts as a collision. Gives up after `MAX_ATTEMPTS`.
    async fn insert_with_unique_code(
        &self,
        target_url: &str,
        seller_id: &str,
    ) -> Result<Link, AppError> {
        for _ in 0..Self::MAX_ATTEMPTS {
            let code = generate_code(self.code_length);

            if is_reserved(&code) || self.link_repository.find_by_code(&code).await?.is_some() {
                continue;
            }

            let new_link = NewLink {
                original_url: target_url.to_string(),
                short_code: code,
                seller_id: seller_id.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::generation_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": Self::MAX_ATTEMPTS }),
        ))
    }
}
