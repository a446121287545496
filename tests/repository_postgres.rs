//! PostgreSQL repository tests.
//!
//! Run with `DATABASE_URL` pointing at a server where the test user may
//! create databases, then `cargo test -- --ignored`.

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use seller_links::application::services::{ClickRecorder, MonthlyLedger};
use seller_links::domain::entities::{ClickOutcome, NewLink, YearMonth, rewards_for};
use seller_links::domain::repositories::{ClickStore, LinkRepository, StatsRepository};
use seller_links::domain::validation::FixedValidator;
use seller_links::error::AppError;
use seller_links::infrastructure::persistence::{
    PgClickStore, PgLinkRepository, PgStatsRepository,
};

fn new_link(code: &str, url: &str, seller: &str) -> NewLink {
    NewLink {
        original_url: url.to_string(),
        short_code: code.to_string(),
        seller_id: seller.to_string(),
    }
}

fn may() -> YearMonth {
    YearMonth::new(2026, 5).unwrap()
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_create_and_find_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .create(new_link("abc123", "https://example.com", "s1"))
        .await
        .unwrap();
    assert_eq!(link.short_code, "abc123");

    let by_code = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(by_code.id, link.id);

    let by_pair = repo
        .find_by_url_and_seller("https://example.com", "s1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_pair.id, link.id);

    assert!(
        repo.find_by_url_and_seller("https://example.com", "s2")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link("dup123", "https://a.com", "s1"))
        .await
        .unwrap();
    let result = repo.create(new_link("dup123", "https://b.com", "s2")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_click_transaction_commit(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let store = PgClickStore::new(pool.clone());
    let stats = PgStatsRepository::new(pool);

    let link = links
        .create(new_link("clk123", "https://example.com", "s1"))
        .await
        .unwrap();
    let at = Utc.with_ymd_and_hms(2026, 5, 14, 12, 0, 0).unwrap();

    let mut tx = store.begin().await.unwrap();
    let click = tx.insert_click(link.id, at).await.unwrap();
    assert!(!click.is_validated());

    tx.mark_validated(click.id, ClickOutcome::Valid, Utc::now())
        .await
        .unwrap();
    assert!(matches!(
        tx.mark_validated(click.id, ClickOutcome::Invalid, Utc::now())
            .await,
        Err(AppError::Conflict { .. })
    ));

    drop(tx);

    let mut tx = store.begin().await.unwrap();
    let click = tx.insert_click(link.id, at).await.unwrap();
    tx.mark_validated(click.id, ClickOutcome::Valid, Utc::now())
        .await
        .unwrap();
    assert!(tx.lock_monthly_stat(link.id, may()).await.unwrap().is_none());
    let created = tx
        .insert_monthly_stat(link.id, may(), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.rewards_earned, 0.05);
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let locked = tx.lock_monthly_stat(link.id, may()).await.unwrap().unwrap();
    assert!(
        tx.insert_monthly_stat(link.id, may(), true)
            .await
            .unwrap()
            .is_none()
    );
    let updated = tx.increment_monthly_stat(locked.id, true).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.clicks, 2);
    assert_eq!(updated.valid_clicks, 2);
    assert_eq!(updated.rewards_earned, rewards_for(2));

    let stored = stats.find_monthly_stat(link.id, may()).await.unwrap().unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stats.clicks_for_link(link.id).await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_click_transaction_rollback_on_drop(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let store = PgClickStore::new(pool.clone());
    let stats = PgStatsRepository::new(pool);

    let link = links
        .create(new_link("rbk123", "https://example.com", "s1"))
        .await
        .unwrap();

    {
        let mut tx = store.begin().await.unwrap();
        tx.insert_click(link.id, Utc::now()).await.unwrap();
        tx.insert_monthly_stat(link.id, may(), true).await.unwrap();
    }

    assert_eq!(stats.count_clicks().await.unwrap(), 0);
    assert!(stats.find_monthly_stat(link.id, may()).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_monthly_stats_for_links_ordering(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let store = PgClickStore::new(pool.clone());
    let stats = PgStatsRepository::new(pool);

    let link = links
        .create(new_link("ord123", "https://example.com", "s1"))
        .await
        .unwrap();

    let months = [
        YearMonth::new(2026, 2).unwrap(),
        YearMonth::new(2025, 12).unwrap(),
    ];
    for ym in months {
        let mut tx = store.begin().await.unwrap();
        tx.insert_monthly_stat(link.id, ym, false).await.unwrap();
        tx.commit().await.unwrap();
    }

    let rows = stats.monthly_stats_for_links(&[link.id]).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].year_month.key(), "2025-12");
    assert_eq!(rows[1].year_month.key(), "2026-02");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_concurrent_clicks_single_row(pool: PgPool) {
    const CLICKS: usize = 20;

    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let stats = PgStatsRepository::new(pool.clone());
    let recorder = Arc::new(ClickRecorder::new(
        Arc::new(PgClickStore::new(pool)),
        Arc::new(FixedValidator::AlwaysAccept),
        MonthlyLedger::default(),
    ));

    let link = links
        .create(new_link("race12", "https://example.com", "s1"))
        .await
        .unwrap();
    let at = Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap();
    assert!(stats.find_monthly_stat(link.id, may()).await.unwrap().is_none());

    let handles: Vec<_> = (0..CLICKS)
        .map(|_| {
            let recorder = Arc::clone(&recorder);
            tokio::spawn(async move { recorder.record_click(link.id, at).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rows = stats.monthly_stats_for_links(&[link.id]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].year_month, may());
    assert_eq!(rows[0].clicks, CLICKS as i64);
    assert_eq!(rows[0].valid_clicks, CLICKS as i64);
    assert_eq!(rows[0].rewards_earned, rewards_for(CLICKS as i64));
    assert_eq!(stats.count_clicks().await.unwrap(), CLICKS as i64);
}
