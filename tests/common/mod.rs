#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use seller_links::domain::entities::{Link, MonthlyStat};
use seller_links::domain::repositories::{LinkRepository, StatsRepository};
use seller_links::domain::validation::ClickValidator;
use seller_links::infrastructure::persistence::{MemoryStore, Repositories};
use seller_links::routes::router;
use seller_links::state::AppState;

pub const BASE_URL: &str = "http://s.test.com/";

/// State over a fresh in-memory store, plus a handle to inspect that store.
pub fn create_test_state(validator: impl ClickValidator + 'static) -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(
        Repositories::from_memory(store.clone()),
        Arc::new(validator),
        BASE_URL,
        6,
    );

    (state, store)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

/// Creates a link through the API and returns its short code.
pub async fn create_test_link(server: &TestServer, url: &str, seller: &str) -> String {
    let response = server
        .post("/links")
        .json(&json!({ "target_url": url, "seller_id": seller }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn find_link(store: &MemoryStore, code: &str) -> Link {
    store.find_by_code(code).await.unwrap().unwrap()
}

/// Every monthly row of the link behind `code`.
pub async fn monthly_rows(store: &MemoryStore, code: &str) -> Vec<MonthlyStat> {
    let link = find_link(store, code).await;
    store.monthly_stats_for_links(&[link.id]).await.unwrap()
}
