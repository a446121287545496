//! Unit-of-work interface for recording clicks and monthly aggregates.
//!
//! Everything a single redirect writes (the click row, its validation outcome
//! and the monthly aggregate update) goes through one [`ClickTransaction`].
//! Dropping a transaction without calling [`ClickTransaction::commit`] rolls
//! all of it back.

use crate::domain::entities::{Click, ClickOutcome, MonthlyStat, YearMonth};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Opens click-recording transactions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - In-process implementation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickStore: Send + Sync {
    /// Starts a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if no connection could be acquired.
    async fn begin(&self) -> Result<Box<dyn ClickTransaction>, AppError>;
}

/// Writes performed on behalf of one click, committed or discarded together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickTransaction: Send {
    /// Inserts a click in the `Created` state (`is_valid = rewarded = false`).
    async fn insert_click(
        &mut self,
        link_id: i64,
        clicked_at: DateTime<Utc>,
    ) -> Result<Click, AppError>;

    /// Writes the validation outcome of a `Created` click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the click was already validated.
    /// Returns [`AppError::NotFound`] if the click does not exist.
    async fn mark_validated(
        &mut self,
        click_id: i64,
        outcome: ClickOutcome,
        validated_at: DateTime<Utc>,
    ) -> Result<Click, AppError>;

    /// Reads the monthly row and locks it until the transaction ends.
    async fn lock_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError>;

    /// Inserts the first row of a month.
    ///
    /// Returns `Ok(None)` when another transaction created the row first;
    /// the caller is expected to lock and increment it instead.
    async fn insert_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
        is_valid: bool,
    ) -> Result<Option<MonthlyStat>, AppError>;

    /// Adds one click to a row previously returned by [`Self::lock_monthly_stat`].
    async fn increment_monthly_stat(
        &mut self,
        stat_id: i64,
        is_valid: bool,
    ) -> Result<MonthlyStat, AppError>;

    /// Commits every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the commit fails or the
    /// transaction was already finished. Nothing is committed in that case.
    async fn commit(&mut self) -> Result<(), AppError>;
}
