//! Earnings reporting over the monthly ledger.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Link, MonthlyStat};
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::error::AppError;

/// Lifetime totals of one link plus its per-month rows.
#[derive(Debug, Clone)]
pub struct LinkEarnings {
    pub link: Link,
    pub total_clicks: i64,
    pub total_valid_clicks: i64,
    pub total_earnings: f64,
    /// Chronological, oldest month first.
    pub months: Vec<MonthlyStat>,
}

impl LinkEarnings {
    /// Sums the monthly rows of `link`. Rows for other links are ignored.
    pub fn from_monthly(link: Link, monthly: &[MonthlyStat]) -> Self {
        let mut months: Vec<MonthlyStat> = monthly
            .iter()
            .filter(|m| m.link_id == link.id)
            .cloned()
            .collect();
        months.sort_by_key(|m| m.year_month);

        let total_clicks = months.iter().map(|m| m.clicks).sum();
        let total_valid_clicks = months.iter().map(|m| m.valid_clicks).sum();
        let total_earnings = months.iter().map(|m| m.rewards_earned).sum();

        Self {
            link,
            total_clicks,
            total_valid_clicks,
            total_earnings,
            months,
        }
    }
}

/// Service for reporting clicks and rewards per link.
pub struct StatsService {
    link_repository: Arc<dyn LinkRepository>,
    stats_repository: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        stats_repository: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            link_repository,
            stats_repository,
        }
    }

    /// Lists one page of links, newest first, each with its earnings.
    ///
    /// `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` or `per_page` is below 1.
    pub async fn list_earnings(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<LinkEarnings>, AppError> {
        if page == 0 || per_page == 0 {
            return Err(AppError::bad_request(
                "page and per_page must be at least 1",
                json!({ "page": page, "per_page": per_page }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(per_page);
        let links = self
            .link_repository
            .list(offset, i64::from(per_page))
            .await?;

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        let monthly = self.stats_repository.monthly_stats_for_links(&ids).await?;

        Ok(links
            .into_iter()
            .map(|link| LinkEarnings::from_monthly(link, &monthly))
            .collect())
    }

    /// Earnings of the link behind `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn earnings_for_code(&self, code: &str) -> Result<LinkEarnings, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "code": code })))?;

        let monthly = self
            .stats_repository
            .monthly_stats_for_links(&[link.id])
            .await?;

        Ok(LinkEarnings::from_monthly(link, &monthly))
    }

    /// Counts links and committed clicks. Used as a storage liveness probe.
    pub async fn totals(&self) -> Result<(i64, i64), AppError> {
        let links = self.link_repository.count().await?;
        let clicks = self.stats_repository.count_clicks().await?;
        Ok((links, clicks))
    }
}
