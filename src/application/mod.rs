//! Application layer services implementing business logic.
//!
//! Services receive repository traits and the click validator through their
//! constructors and expose the operations HTTP handlers and the admin tool call.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and retrieval
//! - [`services::redirect_service::RedirectService`] - Code resolution with click recording
//! - [`services::click_recorder::ClickRecorder`] - Transactional click recording
//! - [`services::ledger::MonthlyLedger`] - Monthly aggregate upsert
//! - [`services::stats_service::StatsService`] - Earnings reporting

pub mod services;
