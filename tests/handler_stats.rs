mod common;

use chrono::Utc;
use seller_links::domain::entities::YearMonth;
use seller_links::domain::validation::FixedValidator;

#[tokio::test]
async fn test_stats_by_code() {
    let (state, _store) = common::create_test_state(FixedValidator::sequence([true, false, true]));
    let server = common::create_test_server(state);

    let code = common::create_test_link(&server, "https://example.com", "s1").await;
    for _ in 0..3 {
        assert_eq!(server.get(&format!("/{code}")).await.status_code(), 302);
    }

    let response = server.get(&format!("/stats/{code}")).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], code.as_str());
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["total_clicks"], 3);
    assert_eq!(json["valid_clicks"], 2);
    assert_eq!(json["total_earnings"], 0.1);

    let months = json["monthly_breakdown"].as_array().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0]["month"], YearMonth::from_datetime(&Utc::now()).label());
    assert_eq!(months[0]["clicks"], 3);
    assert_eq!(months[0]["valid_clicks"], 2);
    assert_eq!(months[0]["earnings"], 0.1);
}

#[tokio::test]
async fn test_stats_by_code_not_found() {
    let (state, _store) = common::create_test_state(FixedValidator::AlwaysAccept);
    let server = common::create_test_server(state);

    let response = server.get("/stats/notfound").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_stats_link_without_clicks() {
    let (state, _store) = common::create_test_state(FixedValidator::AlwaysAccept);
    let server = common::create_test_server(state);

    let code = common::create_test_link(&server, "https://example.com", "s1").await;

    let json = server
        .get(&format!("/stats/{code}"))
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["total_clicks"], 0);
    assert_eq!(json["total_earnings"], 0.0);
    assert!(json["monthly_breakdown"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_list_with_pagination() {
    let (state, _store) = common::create_test_state(FixedValidator::AlwaysAccept);
    let server = common::create_test_server(state);

    let first = common::create_test_link(&server, "https://example.com/1", "s1").await;
    let second = common::create_test_link(&server, "https://example.com/2", "s1").await;
    server.get(&format!("/{first}")).await;

    let page1 = server
        .get("/stats")
        .add_query_param("page", 1)
        .add_query_param("per_page", 1)
        .await;

    page1.assert_status_ok();
    let items = page1.json::<Vec<serde_json::Value>>();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["short_code"], second.as_str());
    assert_eq!(items[0]["total_clicks"], 0);

    let page2 = server
        .get("/stats")
        .add_query_param("page", 2)
        .add_query_param("per_page", 1)
        .await
        .json::<Vec<serde_json::Value>>();

    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0]["short_code"], first.as_str());
    assert_eq!(page2[0]["total_clicks"], 1);
    assert_eq!(page2[0]["total_earnings"], 0.05);

    let all = server.get("/stats").await.json::<Vec<serde_json::Value>>();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_stats_list_invalid_pagination() {
    let (state, _store) = common::create_test_state(FixedValidator::AlwaysAccept);
    let server = common::create_test_server(state);

    let response = server.get("/stats").add_query_param("page", 0).await;
    response.assert_status_bad_request();

    let response = server.get("/stats").add_query_param("per_page", 101).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_stats_list_non_numeric_page_uses_error_envelope() {
    let (state, _store) = common::create_test_state(FixedValidator::AlwaysAccept);
    let server = common::create_test_server(state);

    let response = server.get("/stats").add_query_param("page", "abc").await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}
