//! Integration Tests for API Endpoints
//!
//! Full request/response cycles against a router backed by a file arena.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use arena_cache::config::BackendKind;
use arena_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        backend: BackendKind::Shm,
        cache_dir: dir.path().to_path_buf(),
        arena_capacity: 256 * 1024,
        ..Config::default()
    };
    let state = AppState::from_config(&config).unwrap();
    (create_router(state), dir)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"test_key","value":"test_value"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_endpoint_rejects_empty_key() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(&app, "PUT", "/set", Some(r#"{"key":"","value":1}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_set_endpoint_malformed_json() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_roundtrips_structured_values() {
    let (app, _dir) = create_test_app();

    send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"user:1","value":{"name":"ada","roles":["admin"]},"ttl":600}"#),
    )
    .await;

    let (status, json) = send(&app, "GET", "/get/user:1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"]["name"], "ada");
    assert_eq!(json["value"]["roles"][0], "admin");
    assert_eq!(json["partition"], "default");
}

#[tokio::test]
async fn test_get_missing_key_is_404() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(&app, "GET", "/get/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nope"));
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_removes_key() {
    let (app, _dir) = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"k","value":1}"#)).await;
    let (status, _) = send(&app, "DELETE", "/del/k", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Partition Tests ==

#[tokio::test]
async fn test_partitions_are_isolated_and_clearable() {
    let (app, _dir) = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"k","value":"a","partition":"a"}"#)).await;
    send(&app, "PUT", "/set", Some(r#"{"key":"k","value":"b","partition":"b"}"#)).await;

    let (_, json) = send(&app, "GET", "/get/k?partition=a", None).await;
    assert_eq!(json["value"], "a");

    let (status, json) = send(&app, "POST", "/clear?partition=a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["generation"], 2);

    let (status, _) = send(&app, "GET", "/get/k?partition=a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(&app, "GET", "/get/k?partition=b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "b");
}

// == Meta Endpoint Tests ==

#[tokio::test]
async fn test_meta_reports_expiry() {
    let (app, _dir) = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"k","value":1,"ttl":120}"#)).await;

    let (status, json) = send(&app, "GET", "/meta/k", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["kind"], "value");
    assert!(json["ttl_remaining_ms"].as_u64().unwrap() <= 120_000);

    let (status, _) = send(&app, "GET", "/meta/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Stats & Health ==

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let (app, _dir) = create_test_app();

    send(&app, "PUT", "/set", Some(r#"{"key":"k","value":1}"#)).await;
    send(&app, "GET", "/get/k", None).await;
    send(&app, "GET", "/get/missing", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backend"], "shm");
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["writes"], 1);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
