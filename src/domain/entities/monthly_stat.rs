//! Monthly aggregate of clicks and rewards for a single link.

use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Reward credited for each valid click.
pub const REWARD_PER_VALID_CLICK: f64 = 0.05;

/// Reward total for a number of valid clicks.
///
/// Always computed from the count so that a row never drifts from
/// `valid_clicks * REWARD_PER_VALID_CLICK`.
pub fn rewards_for(valid_clicks: i64) -> f64 {
    valid_clicks as f64 * REWARD_PER_VALID_CLICK
}

/// Calendar month in UTC, keyed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_datetime(at: &DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Storage key, e.g. `2026-03`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Reporting label, e.g. `03/2026`.
    pub fn label(&self) -> String {
        format!("{:02}/{:04}", self.month, self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year-month key: {0}")]
pub struct ParseYearMonthError(String);

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }

        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;

        YearMonth::new(year, month).ok_or_else(err)
    }
}

/// Running aggregate for one `(link_id, year_month)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStat {
    pub id: i64,
    pub link_id: i64,
    pub year_month: YearMonth,
    pub clicks: i64,
    pub valid_clicks: i64,
    pub rewards_earned: f64,
}

impl MonthlyStat {
    /// Row contents for the first click of a month.
    pub fn first_click(id: i64, link_id: i64, year_month: YearMonth, is_valid: bool) -> Self {
        let valid_clicks = i64::from(is_valid);
        Self {
            id,
            link_id,
            year_month,
            clicks: 1,
            valid_clicks,
            rewards_earned: rewards_for(valid_clicks),
        }
    }

    /// Applies one more click to the aggregate.
    pub fn record(&mut self, is_valid: bool) {
        self.clicks += 1;
        if is_valid {
            self.valid_clicks += 1;
        }
        self.rewards_earned = rewards_for(self.valid_clicks);
    }

    pub fn is_consistent(&self) -> bool {
        self.rewards_earned == rewards_for(self.valid_clicks) && self.valid_clicks <= self.clicks
    }
}
