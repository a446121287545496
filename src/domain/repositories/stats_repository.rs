//! Repository trait for reading click analytics.

use crate::domain::entities::{Click, MonthlyStat, YearMonth};
use crate::error::AppError;
use async_trait::async_trait;

/// Read-side access to clicks and monthly aggregates.
///
/// Writes go through [`crate::domain::repositories::ClickStore`]; this trait
/// only reports what was committed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Monthly rows for the given links, ordered by link and then month.
    async fn monthly_stats_for_links(&self, link_ids: &[i64])
    -> Result<Vec<MonthlyStat>, AppError>;

    /// The aggregate row for one link and month, if any click was recorded.
    async fn find_monthly_stat(
        &self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError>;

    /// All clicks of a link, oldest first.
    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError>;

    /// Total number of committed clicks across all links.
    async fn count_clicks(&self) -> Result<i64, AppError>;
}
