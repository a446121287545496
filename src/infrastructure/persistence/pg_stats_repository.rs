//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{CLICK_COLUMNS, ClickRow, MONTHLY_STAT_COLUMNS, MonthlyStatRow};
use crate::domain::entities::{Click, MonthlyStat, YearMonth};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for reading committed clicks and monthly aggregates.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn monthly_stats_for_links(
        &self,
        link_ids: &[i64],
    ) -> Result<Vec<MonthlyStat>, AppError> {
        // `YYYY-MM` keys sort chronologically as text.
        let rows = sqlx::query_as::<_, MonthlyStatRow>(&format!(
            r#"
            SELECT {MONTHLY_STAT_COLUMNS}
            FROM monthly_stats
            WHERE link_id = ANY($1)
            ORDER BY link_id, year_month
            "#
        ))
        .bind(link_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(MonthlyStat::try_from).collect()
    }

    async fn find_monthly_stat(
        &self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError> {
        let row = sqlx::query_as::<_, MonthlyStatRow>(&format!(
            r#"
            SELECT {MONTHLY_STAT_COLUMNS}
            FROM monthly_stats
            WHERE link_id = $1 AND year_month = $2
            "#
        ))
        .bind(link_id)
        .bind(year_month.key())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(MonthlyStat::try_from).transpose()
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(&format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM clicks
            WHERE link_id = $1
            ORDER BY clicked_at, id
            "#
        ))
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
