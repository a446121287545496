//! Repository trait for the link registry.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds the link a seller already created for a target URL.
    async fn find_by_url_and_seller(
        &self,
        original_url: &str,
        seller_id: &str,
    ) -> Result<Option<Link>, AppError>;

    /// Lists links newest first.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Counts all links.
    async fn count(&self) -> Result<i64, AppError>;
}
