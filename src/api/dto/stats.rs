//! DTOs for earnings statistics.

use serde::Serialize;

use crate::application::services::LinkEarnings;
use crate::domain::entities::MonthlyStat;

/// Rounds a currency amount to cents.
fn to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Earnings of one link across its lifetime.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub short_code: String,
    pub url: String,
    pub total_clicks: i64,
    pub valid_clicks: i64,
    pub total_earnings: f64,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
}

/// One calendar month of a link.
#[derive(Debug, Serialize)]
pub struct MonthlyBreakdown {
    /// `MM/YYYY`
    pub month: String,
    pub clicks: i64,
    pub valid_clicks: i64,
    pub earnings: f64,
}

impl From<&MonthlyStat> for MonthlyBreakdown {
    fn from(stat: &MonthlyStat) -> Self {
        Self {
            month: stat.year_month.label(),
            clicks: stat.clicks,
            valid_clicks: stat.valid_clicks,
            earnings: to_cents(stat.rewards_earned),
        }
    }
}

impl From<LinkEarnings> for LinkStatsResponse {
    fn from(earnings: LinkEarnings) -> Self {
        Self {
            monthly_breakdown: earnings.months.iter().map(MonthlyBreakdown::from).collect(),
            short_code: earnings.link.short_code,
            url: earnings.link.original_url,
            total_clicks: earnings.total_clicks,
            valid_clicks: earnings.total_valid_clicks,
            total_earnings: to_cents(earnings.total_earnings),
        }
    }
}
