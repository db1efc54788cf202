//! `SheetsClient` against a mock Sheets API.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use serde_json::json;
use slot_booking_core::store::{RowStore, SheetId, StoreError, Table};
use slot_booking_sheets::{Credentials, SheetsClient};
use std::time::Duration;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer, credentials: Credentials) -> SheetsClient {
    SheetsClient::new("sheet-123", credentials, Duration::from_secs(5))
        .unwrap()
        .with_api_url(&format!("{}/v4", server.uri()))
        .unwrap()
}

fn slots() -> Table {
    Table::new("Slots", 3)
}

#[tokio::test]
async fn test_read_range_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A:C"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Slots!A1:C3",
            "majorDimension": "ROWS",
            "values": [["ID", "Name", "TotalSeats"], ["1700000000000", "Acme Corp", 2], ["1700000000001", "Globex"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;
    let rows = client.read_range(slots().full_range()).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["1700000000000", "Acme Corp", "2"]);
    assert_eq!(rows[2], vec!["1700000000001", "Globex"]);
}

#[tokio::test]
async fn test_read_empty_range_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Reservations!C:C"))
        .and(query_param("key", "AIzaSyExample"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Reservations!C1:C1000",
            "majorDimension": "ROWS"
        })))
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("AIzaSyExample")).await;
    let rows = client
        .read_range(Table::new("Reservations", 13).column(2))
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_append_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A:C:append"))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(body_json(json!({
            "majorDimension": "ROWS",
            "values": [["1700000000000", "Acme Corp", "1"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "sheet-123",
            "updates": {"updatedRows": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;
    assert_ok!(
        client
            .append_rows(
                slots().full_range(),
                vec![vec!["1700000000000".into(), "Acme Corp".into(), "1".into()]],
            )
            .await
    );
}

#[tokio::test]
async fn test_overwrite_header_range() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A1:C1"))
        .and(query_param("valueInputOption", "RAW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updatedCells": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;
    assert_ok!(
        client
            .overwrite_range(
                slots().header_range(),
                vec![vec!["ID".into(), "Name".into(), "TotalSeats".into()]],
            )
            .await
    );
}

#[tokio::test]
async fn test_resolve_sheet_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123"))
        .and(query_param("fields", "sheets.properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Slots", "index": 0}},
                {"properties": {"sheetId": 918_273, "title": "Reservations", "index": 1}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;

    assert_eq!(
        client.resolve_sheet_id("Reservations".into()).await,
        Ok(SheetId(918_273))
    );
    assert_eq!(
        client.resolve_sheet_id("Archive".into()).await,
        Err(StoreError::SheetNotFound("Archive".into()))
    );
}

#[tokio::test]
async fn test_delete_rows_sends_delete_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-123:batchUpdate"))
        .and(body_json(json!({
            "requests": [{
                "deleteDimension": {
                    "range": {"sheetId": 7, "dimension": "ROWS", "startIndex": 3, "endIndex": 4}
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"replies": [{}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;
    assert_ok!(client.delete_rows(SheetId(7), 3, 4).await);
}

#[tokio::test]
async fn test_error_statuses_map_to_store_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A:C"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A1:C1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-123/values/Slots!A:A"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client(&server, Credentials::detect("ya29.token")).await;

    assert_eq!(
        client.read_range(slots().full_range()).await,
        Err(StoreError::Status {
            status: 500,
            message: "backend error".into()
        })
    );
    assert!(matches!(
        client.read_range(slots().header_range()).await,
        Err(StoreError::Status { status: 401, .. })
    ));
    assert!(matches!(
        client.read_range(slots().column(0)).await,
        Err(StoreError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let client = SheetsClient::new("sheet-123", Credentials::detect("t"), Duration::from_secs(2))
        .unwrap()
        .with_api_url(&uri)
        .unwrap();

    assert!(matches!(
        client.read_range(slots().full_range()).await,
        Err(StoreError::Request(_))
    ));
}
