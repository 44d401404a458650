//! Historical API client against a local mock server.

mod support;

use std::time::Duration;

use support::http::{serve, Reply};
use waybill::adapter::outbound::history::HistoricalApiClient;
use waybill::infrastructure::config::cutover::HistoryApiConfig;
use waybill::port::outbound::history::HistoricalSource;
use waybill::testkit::domain::date;

const TWO_MOVEMENTS: &str = r#"[
  {"destination":"2352","sourceLocation":"960","destinationLocation":"2352","servicingNodes":["960"],"status":"PLANNED","timestamp":"2024-03-05T08:00:00Z"},
  {"destination":"960","sourceLocation":"2352","destinationLocation":"960","servicingNodes":["960","1001"],"status":"PLANNED","timestamp":"2024-03-05T09:30:00Z"}
]"#;

#[tokio::test]
async fn fetches_movements_for_one_date_with_bearer_token() {
    let server = serve(Reply::ok(TWO_MOVEMENTS)).await;
    let client = HistoricalApiClient::new(format!("{}/api/", server.base_url)).with_token("t0ken");

    let movements = client.fetch(date(2024, 3, 5)).await.unwrap();

    assert_eq!(movements.len(), 2);
    assert_eq!(movements[1].source_location, "2352");
    assert_eq!(movements[1].servicing_nodes, vec!["960", "1001"]);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /api/movements/by-date/2024-03-05 HTTP/1.1"));
    assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer t0ken"));
}

#[tokio::test]
async fn null_body_is_an_empty_day() {
    let server = serve(Reply::ok("null")).await;
    let client = HistoricalApiClient::new(&server.base_url);

    let movements = client.fetch(date(2024, 3, 5)).await.unwrap();

    assert!(movements.is_empty());
}

#[tokio::test]
async fn server_error_fails_only_that_date() {
    let server = serve(Reply::status(500)).await;
    let client = HistoricalApiClient::new(&server.base_url);

    let err = client.fetch(date(2024, 3, 6)).await.unwrap_err();

    assert_eq!(err.date, date(2024, 3, 6));
    assert!(err.to_string().contains("2024-03-06"));
}

#[tokio::test]
async fn malformed_body_is_a_fetch_error() {
    let server = serve(Reply::ok(r#"{"unexpected":"object"}"#)).await;
    let client = HistoricalApiClient::new(&server.base_url);

    assert!(client.fetch(date(2024, 3, 7)).await.is_err());
}

#[tokio::test]
async fn timeouts_are_retried_up_to_the_limit() {
    let server = serve(Reply::ok("[]").delayed(Duration::from_millis(500))).await;
    let config = HistoryApiConfig {
        base_url: server.base_url.clone(),
        timeout_ms: 50,
        connect_timeout_ms: 50,
        retry_max_attempts: 3,
        retry_backoff_ms: 0,
        token: None,
    };
    let client = HistoricalApiClient::from_config(&config);

    let result = client.fetch(date(2024, 3, 8)).await;

    assert!(result.is_err());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.requests().len(), 3);
}
