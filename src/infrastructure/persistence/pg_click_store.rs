//! PostgreSQL implementation of the click unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use super::rows::{CLICK_COLUMNS, ClickRow, MONTHLY_STAT_COLUMNS, MonthlyStatRow};
use crate::domain::entities::{
    Click, ClickOutcome, MonthlyStat, REWARD_PER_VALID_CLICK, YearMonth, rewards_for,
};
use crate::domain::repositories::{ClickStore, ClickTransaction};
use crate::error::AppError;

/// Opens database transactions for click recording.
pub struct PgClickStore {
    pool: Arc<PgPool>,
}

impl PgClickStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickStore for PgClickStore {
    async fn begin(&self) -> Result<Box<dyn ClickTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgClickTransaction { tx: Some(tx) }))
    }
}

/// A live database transaction.
///
/// `sqlx` rolls the transaction back when it is dropped uncommitted.
pub struct PgClickTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgClickTransaction {
    fn conn(&mut self) -> Result<&mut Transaction<'static, Postgres>, AppError> {
        self.tx
            .as_mut()
            .ok_or_else(|| AppError::persistence("Transaction already finished", json!({})))
    }
}

#[async_trait]
impl ClickTransaction for PgClickTransaction {
    async fn insert_click(
        &mut self,
        link_id: i64,
        clicked_at: DateTime<Utc>,
    ) -> Result<Click, AppError> {
        let tx = self.conn()?;

        let row = sqlx::query_as::<_, ClickRow>(&format!(
            r#"
            INSERT INTO clicks (link_id, clicked_at, is_valid, rewarded)
            VALUES ($1, $2, FALSE, FALSE)
            RETURNING {CLICK_COLUMNS}
            "#
        ))
        .bind(link_id)
        .bind(clicked_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    async fn mark_validated(
        &mut self,
        click_id: i64,
        outcome: ClickOutcome,
        validated_at: DateTime<Utc>,
    ) -> Result<Click, AppError> {
        let tx = self.conn()?;

        let row = sqlx::query_as::<_, ClickRow>(&format!(
            r#"
            UPDATE clicks
            SET is_valid = $2, rewarded = $3, validated_at = $4
            WHERE id = $1 AND validated_at IS NULL
            RETURNING {CLICK_COLUMNS}
            "#
        ))
        .bind(click_id)
        .bind(outcome.is_valid())
        .bind(outcome.rewarded())
        .bind(validated_at)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM clicks WHERE id = $1)")
            .bind(click_id)
            .fetch_one(&mut **tx)
            .await?;

        if exists {
            Err(AppError::conflict(
                "Click already validated",
                json!({ "click_id": click_id }),
            ))
        } else {
            Err(AppError::not_found(
                "Click not found",
                json!({ "click_id": click_id }),
            ))
        }
    }

    async fn lock_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError> {
        let tx = self.conn()?;

        let row = sqlx::query_as::<_, MonthlyStatRow>(&format!(
            r#"
            SELECT {MONTHLY_STAT_COLUMNS}
            FROM monthly_stats
            WHERE link_id = $1 AND year_month = $2
            FOR UPDATE
            "#
        ))
        .bind(link_id)
        .bind(year_month.key())
        .fetch_optional(&mut **tx)
        .await?;

        row.map(MonthlyStat::try_from).transpose()
    }

    async fn insert_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
        is_valid: bool,
    ) -> Result<Option<MonthlyStat>, AppError> {
        let tx = self.conn()?;
        let valid_clicks = i64::from(is_valid);

        // DO NOTHING keeps the transaction usable when another one won the race.
        let row = sqlx::query_as::<_, MonthlyStatRow>(&format!(
            r#"
            INSERT INTO monthly_stats (link_id, year_month, clicks, valid_clicks, rewards_earned)
            VALUES ($1, $2, 1, $3, $4)
            ON CONFLICT (link_id, year_month) DO NOTHING
            RETURNING {MONTHLY_STAT_COLUMNS}
            "#
        ))
        .bind(link_id)
        .bind(year_month.key())
        .bind(valid_clicks)
        .bind(rewards_for(valid_clicks))
        .fetch_optional(&mut **tx)
        .await?;

        row.map(MonthlyStat::try_from).transpose()
    }

    async fn increment_monthly_stat(
        &mut self,
        stat_id: i64,
        is_valid: bool,
    ) -> Result<MonthlyStat, AppError> {
        let tx = self.conn()?;

        // Rewards are recomputed from the count rather than accumulated.
        let row = sqlx::query_as::<_, MonthlyStatRow>(&format!(
            r#"
            UPDATE monthly_stats
            SET clicks = clicks + 1,
                valid_clicks = valid_clicks + $2,
                rewards_earned = (valid_clicks + $2)::float8 * $3::float8
            WHERE id = $1
            RETURNING {MONTHLY_STAT_COLUMNS}
            "#
        ))
        .bind(stat_id)
        .bind(i64::from(is_valid))
        .bind(REWARD_PER_VALID_CLICK)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(MonthlyStat::try_from).transpose()?.ok_or_else(|| {
            AppError::persistence(
                "Monthly statistics row disappeared",
                json!({ "stat_id": stat_id }),
            )
        })
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::persistence("Transaction already finished", json!({})))?;

        tx.commit().await?;
        Ok(())
    }
}
