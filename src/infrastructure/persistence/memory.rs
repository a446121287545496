//! In-process storage backend.
//!
//! Implements every repository trait over shared maps so the service can run
//! without PostgreSQL. Monthly rows are guarded by one async mutex each, held
//! from the locked read until the owning transaction commits or is dropped,
//! which gives the same same-row serialization as `SELECT ... FOR UPDATE`.
//! Click and aggregate writes are staged per transaction and only become
//! visible on commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::entities::{Click, ClickOutcome, Link, MonthlyStat, NewLink, YearMonth};
use crate::domain::repositories::{ClickStore, ClickTransaction, LinkRepository, StatsRepository};
use crate::error::AppError;

type RowKey = (i64, YearMonth);

#[derive(Default)]
struct Tables {
    links: Vec<Link>,
    clicks: BTreeMap<i64, Click>,
    monthly: BTreeMap<RowKey, MonthlyStat>,
}

#[derive(Default)]
struct Shared {
    tables: Mutex<Tables>,
    row_locks: Mutex<HashMap<RowKey, Arc<AsyncMutex<()>>>>,
    link_ids: AtomicI64,
    click_ids: AtomicI64,
    stat_ids: AtomicI64,
}

impl Shared {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_lock(&self, key: RowKey) -> Arc<AsyncMutex<()>> {
        let mut locks = self.row_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }

    fn next_id(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Storage backend that keeps everything in process memory.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.shared.tables();

        if tables
            .links
            .iter()
            .any(|l| l.short_code == new_link.short_code)
        {
            return Err(AppError::conflict(
                "Resource already exists",
                json!({ "constraint": "links_short_code_key" }),
            ));
        }

        let link = Link::new(
            Shared::next_id(&self.shared.link_ids),
            new_link.original_url,
            new_link.short_code,
            new_link.seller_id,
            Utc::now(),
        );
        tables.links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .shared
            .tables()
            .links
            .iter()
            .find(|l| l.short_code == code)
            .cloned())
    }

    async fn find_by_url_and_seller(
        &self,
        original_url: &str,
        seller_id: &str,
    ) -> Result<Option<Link>, AppError> {
        Ok(self
            .shared
            .tables()
            .links
            .iter()
            .find(|l| l.original_url == original_url && l.seller_id == seller_id)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        let mut links = self.shared.tables().links.clone();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.shared.tables().links.len() as i64)
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn monthly_stats_for_links(
        &self,
        link_ids: &[i64],
    ) -> Result<Vec<MonthlyStat>, AppError> {
        Ok(self
            .shared
            .tables()
            .monthly
            .values()
            .filter(|m| link_ids.contains(&m.link_id))
            .cloned()
            .collect())
    }

    async fn find_monthly_stat(
        &self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError> {
        Ok(self
            .shared
            .tables()
            .monthly
            .get(&(link_id, year_month))
            .cloned())
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let mut clicks: Vec<Click> = self
            .shared
            .tables()
            .clicks
            .values()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| a.clicked_at.cmp(&b.clicked_at).then(a.id.cmp(&b.id)));

        Ok(clicks)
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        Ok(self.shared.tables().clicks.len() as i64)
    }
}

#[async_trait]
impl ClickStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn ClickTransaction>, AppError> {
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            clicks: BTreeMap::new(),
            monthly: HashMap::new(),
            locks: HashMap::new(),
            finished: false,
        }))
    }
}

/// Staged writes plus the row locks taken so far.
pub struct MemoryTransaction {
    shared: Arc<Shared>,
    clicks: BTreeMap<i64, Click>,
    monthly: HashMap<RowKey, MonthlyStat>,
    locks: HashMap<RowKey, OwnedMutexGuard<()>>,
    finished: bool,
}

impl MemoryTransaction {
    fn ensure_open(&self) -> Result<(), AppError> {
        if self.finished {
            Err(AppError::persistence(
                "Transaction already finished",
                json!({}),
            ))
        } else {
            Ok(())
        }
    }

    async fn acquire(&mut self, key: RowKey) {
        if self.locks.contains_key(&key) {
            return;
        }
        let slot = self.shared.row_lock(key);
        let guard = slot.lock_owned().await;
        self.locks.insert(key, guard);
    }

    /// The row as this transaction sees it: its own staged version first.
    fn visible_stat(&self, key: RowKey) -> Option<MonthlyStat> {
        self.monthly
            .get(&key)
            .cloned()
            .or_else(|| self.shared.tables().monthly.get(&key).cloned())
    }
}

#[async_trait]
impl ClickTransaction for MemoryTransaction {
    async fn insert_click(
        &mut self,
        link_id: i64,
        clicked_at: DateTime<Utc>,
    ) -> Result<Click, AppError> {
        self.ensure_open()?;

        let link_exists = self.shared.tables().links.iter().any(|l| l.id == link_id);
        if !link_exists {
            return Err(AppError::persistence(
                "Link does not exist",
                json!({ "link_id": link_id }),
            ));
        }

        let click = Click::pending(
            Shared::next_id(&self.shared.click_ids),
            link_id,
            clicked_at,
        );
        self.clicks.insert(click.id, click.clone());

        Ok(click)
    }

    async fn mark_validated(
        &mut self,
        click_id: i64,
        outcome: ClickOutcome,
        validated_at: DateTime<Utc>,
    ) -> Result<Click, AppError> {
        self.ensure_open()?;

        let current = self
            .clicks
            .get(&click_id)
            .cloned()
            .or_else(|| self.shared.tables().clicks.get(&click_id).cloned())
            .ok_or_else(|| AppError::not_found("Click not found", json!({ "click_id": click_id })))?;

        if current.is_validated() {
            return Err(AppError::conflict(
                "Click already validated",
                json!({ "click_id": click_id }),
            ));
        }

        let click = current.validated(outcome, validated_at);
        self.clicks.insert(click_id, click.clone());

        Ok(click)
    }

    async fn lock_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
    ) -> Result<Option<MonthlyStat>, AppError> {
        self.ensure_open()?;

        let key = (link_id, year_month);
        self.acquire(key).await;

        Ok(self.visible_stat(key))
    }

    async fn insert_monthly_stat(
        &mut self,
        link_id: i64,
        year_month: YearMonth,
        is_valid: bool,
    ) -> Result<Option<MonthlyStat>, AppError> {
        self.ensure_open()?;

        // Waiting on the row lock stands in for waiting on a concurrent insert.
        let key = (link_id, year_month);
        self.acquire(key).await;

        if self.visible_stat(key).is_some() {
            return Ok(None);
        }

        let stat = MonthlyStat::first_click(
            Shared::next_id(&self.shared.stat_ids),
            link_id,
            year_month,
            is_valid,
        );
        self.monthly.insert(key, stat.clone());

        Ok(Some(stat))
    }

    async fn increment_monthly_stat(
        &mut self,
        stat_id: i64,
        is_valid: bool,
    ) -> Result<MonthlyStat, AppError> {
        self.ensure_open()?;

        let key = self
            .locks
            .keys()
            .copied()
            .find(|key| self.visible_stat(*key).is_some_and(|s| s.id == stat_id))
            .ok_or_else(|| {
                AppError::persistence(
                    "Monthly statistics row is not locked by this transaction",
                    json!({ "stat_id": stat_id }),
                )
            })?;

        let mut stat = self.visible_stat(key).ok_or_else(|| {
            AppError::persistence(
                "Monthly statistics row disappeared",
                json!({ "stat_id": stat_id }),
            )
        })?;
        stat.record(is_valid);
        self.monthly.insert(key, stat.clone());

        Ok(stat)
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        self.ensure_open()?;

        {
            let mut tables = self.shared.tables();
            tables.clicks.append(&mut self.clicks);
            tables.monthly.extend(self.monthly.drain());
        }

        self.finished = true;
        self.locks.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn store_with_link() -> (MemoryStore, Link) {
        let store = MemoryStore::new();
        let link = store
            .create(NewLink {
                original_url: "https://example.com".to_string(),
                short_code: "abc123".to_string(),
                seller_id: "s1".to_string(),
            })
            .await
            .unwrap();
        (store, link)
    }

    fn may() -> YearMonth {
        YearMonth::new(2026, 5).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_short_code_is_conflict() {
        let (store, _) = store_with_link().await;

        let result = store
            .create(NewLink {
                original_url: "https://other.com".to_string(),
                short_code: "abc123".to_string(),
                seller_id: "s2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let (store, link) = store_with_link().await;

        let mut tx = store.begin().await.unwrap();
        let click = tx.insert_click(link.id, Utc::now()).await.unwrap();
        tx.mark_validated(click.id, ClickOutcome::Valid, Utc::now())
            .await
            .unwrap();
        tx.insert_monthly_stat(link.id, may(), true).await.unwrap();

        assert_eq!(store.count_clicks().await.unwrap(), 0);

        tx.commit().await.unwrap();

        let clicks = store.clicks_for_link(link.id).await.unwrap();
        assert_eq!(clicks.len(), 1);
        assert!(clicks[0].is_valid && clicks[0].rewarded);

        let stat = store.find_monthly_stat(link.id, may()).await.unwrap().unwrap();
        assert_eq!(stat.clicks, 1);
        assert_eq!(stat.rewards_earned, 0.05);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let (store, link) = store_with_link().await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_click(link.id, Utc::now()).await.unwrap();
            tx.insert_monthly_stat(link.id, may(), true).await.unwrap();
        }

        assert_eq!(store.count_clicks().await.unwrap(), 0);
        assert!(store.find_monthly_stat(link.id, may()).await.unwrap().is_none());

        // The row lock was released with the transaction.
        let mut tx = store.begin().await.unwrap();
        let locked = tokio::time::timeout(
            Duration::from_secs(1),
            tx.lock_monthly_stat(link.id, may()),
        )
        .await;
        assert!(matches!(locked, Ok(Ok(None))));
    }

    #[tokio::test]
    async fn test_validation_is_set_once() {
        let (store, link) = store_with_link().await;

        let mut tx = store.begin().await.unwrap();
        let click = tx.insert_click(link.id, Utc::now()).await.unwrap();
        tx.mark_validated(click.id, ClickOutcome::Invalid, Utc::now())
            .await
            .unwrap();

        let second = tx
            .mark_validated(click.id, ClickOutcome::Valid, Utc::now())
            .await;
        assert!(matches!(second, Err(AppError::Conflict { .. })));

        let missing = tx
            .mark_validated(9999, ClickOutcome::Valid, Utc::now())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_insert_click_requires_existing_link() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let result = tx.insert_click(42, Utc::now()).await;
        assert!(matches!(result, Err(AppError::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_row_lock_blocks_second_transaction_until_commit() {
        let (store, link) = store_with_link().await;

        let mut first = store.begin().await.unwrap();
        first.insert_monthly_stat(link.id, may(), true).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            second.lock_monthly_stat(link.id, may()),
        )
        .await;
        assert!(blocked.is_err());

        first.commit().await.unwrap();

        let stat = second
            .lock_monthly_stat(link.id, may())
            .await
            .unwrap()
            .unwrap();
        let updated = second.increment_monthly_stat(stat.id, false).await.unwrap();
        second.commit().await.unwrap();

        assert_eq!(updated.clicks, 2);
        assert_eq!(updated.valid_clicks, 1);
        assert!(updated.is_consistent());
    }

    #[tokio::test]
    async fn test_commit_twice_fails() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.commit().await.unwrap();
        assert!(matches!(
            tx.commit().await,
            Err(AppError::Persistence { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        for code in ["aaaaaa", "bbbbbb", "cccccc"] {
            store
                .create(NewLink {
                    original_url: format!("https://example.com/{code}"),
                    short_code: code.to_string(),
                    seller_id: "s1".to_string(),
                })
                .await
                .unwrap();
        }

        let page = store.list(0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].short_code, "cccccc");
        assert_eq!(page[1].short_code, "bbbbbb");

        let rest = store.list(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].short_code, "aaaaaa");
    }
}
