//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link registry (create and lookups)
//! - [`ClickStore`] / [`ClickTransaction`] - Transactional click recording and monthly aggregates
//! - [`StatsRepository`] - Read-side analytics

pub mod click_store;
pub mod link_repository;
pub mod stats_repository;

pub use click_store::{ClickStore, ClickTransaction};
pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use click_store::{MockClickStore, MockClickTransaction};
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
