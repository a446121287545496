//! Storage implementations of the domain repository traits.
//!
//! # Backends
//!
//! - [`PgLinkRepository`], [`PgClickStore`], [`PgStatsRepository`] - PostgreSQL via SQLx
//! - [`MemoryStore`] - Everything in process memory, for local runs and tests

pub mod memory;
pub mod pg_click_store;
pub mod pg_link_repository;
pub mod pg_stats_repository;
mod rows;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{ClickStore, LinkRepository, StatsRepository};

pub use memory::MemoryStore;
pub use pg_click_store::PgClickStore;
pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;

/// One set of repositories over a single backend.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickStore>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickStore::new(pool.clone())),
            stats: Arc::new(PgStatsRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Wraps an existing store so callers can keep a handle to it.
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            links: Arc::new(store.clone()),
            clicks: Arc::new(store.clone()),
            stats: Arc::new(store),
        }
    }
}
