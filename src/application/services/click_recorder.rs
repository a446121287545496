//! Click recording service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::services::ledger::MonthlyLedger;
use crate::domain::entities::{Click, ClickOutcome, MonthlyStat, YearMonth};
use crate::domain::repositories::ClickStore;
use crate::domain::validation::ClickValidator;
use crate::error::AppError;

/// A committed click together with the aggregate row it updated.
#[derive(Debug, Clone)]
pub struct RecordedClick {
    pub click: Click,
    pub monthly: MonthlyStat,
}

/// Records clicks, validates them once and feeds the monthly ledger.
pub struct ClickRecorder {
    store: Arc<dyn ClickStore>,
    validator: Arc<dyn ClickValidator>,
    ledger: MonthlyLedger,
}

impl ClickRecorder {
    pub fn new(
        store: Arc<dyn ClickStore>,
        validator: Arc<dyn ClickValidator>,
        ledger: MonthlyLedger,
    ) -> Self {
        Self {
            store,
            validator,
            ledger,
        }
    }

    /// Records one click on `link_id` that happened at `now`.
    ///
    /// Inserts the click unvalidated, asks the validator exactly once, writes
    /// the outcome and applies it to the month of `now` (UTC). All writes share
    /// one transaction: if any step fails nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on any storage failure.
    pub async fn record_click(
        &self,
        link_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RecordedClick, AppError> {
        let mut tx = self.store.begin().await?;

        let pending = tx.insert_click(link_id, now).await?;

        let outcome = ClickOutcome::from_validity(self.validator.validate().await);

        let click = tx.mark_validated(pending.id, outcome, Utc::now()).await?;

        let monthly = self
            .ledger
            .apply_click(
                tx.as_mut(),
                link_id,
                YearMonth::from_datetime(&now),
                click.is_valid,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            link_id,
            click_id = click.id,
            is_valid = click.is_valid,
            year_month = %monthly.year_month,
            month_clicks = monthly.clicks,
            "Click recorded"
        );

        Ok(RecordedClick { click, monthly })
    }
}
