//! Business logic services for the application layer.

pub mod click_recorder;
pub mod ledger;
pub mod link_service;
pub mod redirect_service;
pub mod stats_service;

pub use click_recorder::{ClickRecorder, RecordedClick};
pub use ledger::MonthlyLedger;
pub use link_service::{CreatedLink, LinkService};
pub use redirect_service::{RedirectOutcome, RedirectService};
pub use stats_service::{LinkEarnings, StatsService};
