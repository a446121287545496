//! Core domain entities.
//!
//! - [`Link`] - A shortened URL owned by a seller
//! - [`Click`] - One visit to a short link, carrying its validation outcome
//! - [`MonthlyStat`] - Per-link, per-calendar-month click and reward aggregate
//!
//! Creation inputs use separate structs (`NewLink`); clicks and monthly rows
//! are created by the click store itself.

pub mod click;
pub mod link;
pub mod monthly_stat;

pub use click::{Click, ClickOutcome, ClickState};
pub use link::{Link, NewLink};
pub use monthly_stat::{MonthlyStat, REWARD_PER_VALID_CLICK, YearMonth, rewards_for};
