//! Application assembly against a mock Sheets API.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum_test::TestServer;
use serde_json::{Value, json};
use slot_booking_server::{Config, build_app};
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> Config {
    let vars: HashMap<String, String> = [
        ("GOOGLE_SPREADSHEET_ID", "sheet-123".to_string()),
        ("GOOGLE_ACCESS_TOKEN", "ya29.token".to_string()),
        ("SHEETS_API_URL", format!("{}/v4", server.uri())),
        ("ADMIN_PASSWORD", "s3cret".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    Config::from_map(&vars).unwrap()
}

fn empty_range(range: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "range": range, "majorDimension": "ROWS" }))
}

#[tokio::test]
async fn test_empty_sheets_get_headers_written() {
    let sheets = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A1:C1"))
        .respond_with(empty_range("Slots!A1:C1"))
        .mount(&sheets)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Reservations!A1:M1"))
        .respond_with(empty_range("Reservations!A1:M1"))
        .mount(&sheets)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A1:C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sheets)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-123/values/Reservations!A1:M1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sheets)
        .await;

    let app = build_app(&config(&sheets)).await.unwrap();

    let server = TestServer::new(app).unwrap();
    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_unreachable_sheets_fail_startup() {
    let sheets = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&sheets)
        .await;

    let result = build_app(&config(&sheets)).await;

    assert!(result.is_err());
}
