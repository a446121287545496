//! Row types shared by the PostgreSQL repositories.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{Click, MonthlyStat, YearMonth};
use crate::error::AppError;

pub(crate) const CLICK_COLUMNS: &str = "id, link_id, clicked_at, is_valid, rewarded, validated_at";

pub(crate) const MONTHLY_STAT_COLUMNS: &str =
    "id, link_id, year_month, clicks, valid_clicks, rewards_earned";

#[derive(sqlx::FromRow)]
pub(crate) struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    is_valid: bool,
    rewarded: bool,
    validated_at: Option<DateTime<Utc>>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            clicked_at: r.clicked_at,
            is_valid: r.is_valid,
            rewarded: r.rewarded,
            validated_at: r.validated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct MonthlyStatRow {
    id: i64,
    link_id: i64,
    year_month: String,
    clicks: i64,
    valid_clicks: i64,
    rewards_earned: f64,
}

impl TryFrom<MonthlyStatRow> for MonthlyStat {
    type Error = AppError;

    fn try_from(r: MonthlyStatRow) -> Result<Self, Self::Error> {
        let year_month: YearMonth = r.year_month.parse().map_err(|_| {
            tracing::error!(stat_id = r.id, year_month = %r.year_month, "Corrupt monthly stat key");
            AppError::persistence(
                "Corrupt monthly statistics row",
                json!({ "id": r.id, "year_month": r.year_month }),
            )
        })?;

        Ok(MonthlyStat {
            id: r.id,
            link_id: r.link_id,
            year_month,
            clicks: r.clicks,
            valid_clicks: r.valid_clicks,
            rewards_earned: r.rewards_earned,
        })
    }
}
