//! Monthly aggregate ledger.

use serde_json::json;

use crate::domain::entities::{MonthlyStat, YearMonth};
use crate::domain::repositories::ClickTransaction;
use crate::error::AppError;

/// Applies clicks to the per-link, per-month aggregate.
///
/// # Concurrency
///
/// The row is read under a lock held until the surrounding transaction ends,
/// so concurrent clicks on the same link and month serialize here. When the
/// row does not exist yet, two transactions may race to insert it; the loser
/// gets no row back and retries the locked read, which then finds the
/// winner's row. The retry is bounded by `max_attempts`.
#[derive(Debug, Clone)]
pub struct MonthlyLedger {
    max_attempts: usize,
}

impl MonthlyLedger {
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

    /// `max_attempts` is raised to at least 1.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Records one click in the aggregate for `(link_id, year_month)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the row could not be created or
    /// locked within the attempt budget, or on any storage error.
    pub async fn apply_click(
        &self,
        tx: &mut dyn ClickTransaction,
        link_id: i64,
        year_month: YearMonth,
        is_valid: bool,
    ) -> Result<MonthlyStat, AppError> {
        for attempt in 1..=self.max_attempts {
            if let Some(existing) = tx.lock_monthly_stat(link_id, year_month).await? {
                return tx.increment_monthly_stat(existing.id, is_valid).await;
            }

            if let Some(created) = tx
                .insert_monthly_stat(link_id, year_month, is_valid)
                .await?
            {
                return Ok(created);
            }

            tracing::warn!(
                link_id,
                year_month = %year_month,
                attempt,
                "Monthly stat created concurrently, retrying"
            );
        }

        Err(AppError::persistence(
            "Failed to update monthly statistics",
            json!({
                "link_id": link_id,
                "year_month": year_month.key(),
                "attempts": self.max_attempts,
            }),
        ))
    }
}

impl Default for MonthlyLedger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}
