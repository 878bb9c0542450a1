//! REST schedule backend against a local data service
//!
//! A small axum server stands in for the PostgREST endpoint so the real
//! reqwest client path runs: headers, status mapping and row decoding.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;

use onair_common::backend::{RestScheduleBackend, ScheduleBackend};
use onair_common::config::BackendConfig;
use onair_common::Error;

const API_KEY: &str = "anon-read-key";

/// Rows are only served when the key arrives both as `apikey` and as the bearer token
async fn schedule_rows(headers: HeaderMap) -> Response {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    if apikey != Some(API_KEY) || bearer != Some(format!("Bearer {}", API_KEY).as_str()) {
        return (StatusCode::UNAUTHORIZED, "missing credentials").into_response();
    }

    Json(json!([
        {"day_of_week": 1, "start_time": "06:00:00", "end_time": "07:00:00",
         "program_name_sinhala": "භාවනා", "program_name_english": "Meditation",
         "program_id": null}
    ]))
    .into_response()
}

async fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response()
}

async fn not_json() -> &'static str {
    "<html>gateway</html>"
}

/// Test helper: start the stand-in service and return its base URL
async fn start_server() -> String {
    let app = Router::new()
        .route("/rest/v1/program_schedule", get(schedule_rows))
        .route("/rest/v1/offline", get(unavailable))
        .route("/rest/v1/html", get(not_json));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Should bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn backend(url: &str, table: &str, api_key: Option<&str>) -> RestScheduleBackend {
    RestScheduleBackend::new(&BackendConfig {
        url: Some(url.to_string()),
        api_key: api_key.map(str::to_string),
        table: table.to_string(),
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_sends_apikey_and_bearer_headers() {
    let url = start_server().await;
    let rows = backend(&url, "program_schedule", Some(API_KEY))
        .fetch_rows()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].day_of_week, 1);
    assert_eq!(rows[0].program_name_english.as_deref(), Some("Meditation"));
}

#[tokio::test]
async fn test_fetch_without_key_is_rejected_as_backend_error() {
    let url = start_server().await;
    let err = backend(&url, "program_schedule", None)
        .fetch_rows()
        .await
        .unwrap_err();

    match err {
        Error::Backend(msg) => assert!(msg.starts_with("401"), "unexpected message: {}", msg),
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_service_unavailable_maps_to_backend_error() {
    let url = start_server().await;
    let err = backend(&url, "offline", Some(API_KEY))
        .fetch_rows()
        .await
        .unwrap_err();

    match err {
        Error::Backend(msg) => {
            assert!(msg.starts_with("503"), "unexpected message: {}", msg);
            assert!(msg.contains("maintenance"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_maps_to_parse_error() {
    let url = start_server().await;
    let err = backend(&url, "html", Some(API_KEY))
        .fetch_rows()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
}
