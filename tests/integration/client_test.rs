//! ControlClient tests against the in-process mock control API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use craftops_bot::services::control::{ApiResult, ControlClient, CreateServerRequest};
use craftops_bot::ServerStatus;

use crate::support::{serve, server_json, spawn_control_api};

#[tokio::test]
async fn test_list_returns_parsed_servers() {
    let api = spawn_control_api(vec![
        server_json("ATM10", "stopped", Some("all-the-mods-10")),
        server_json("lobby", "running", None),
    ])
    .await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    let servers = client.list().await.into_result().unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].name, "ATM10");
    assert_eq!(servers[0].status, ServerStatus::Stopped);
    assert_eq!(servers[0].modpack.as_deref(), Some("all-the-mods-10"));
    assert_eq!(servers[1].status, ServerStatus::Running);
    assert_eq!(servers[1].modpack, None);
}

#[tokio::test]
async fn test_get_missing_server_is_http_404() {
    let api = spawn_control_api(vec![]).await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    let result = client.get("missing").await;
    assert_eq!(result, ApiResult::Failure("HTTP 404".to_string()));
}

#[tokio::test]
async fn test_non_2xx_body_passes_through() {
    let app = Router::new().route(
        "/api/game-servers",
        get(|| async { (axum::http::StatusCode::CONFLICT, "Server already exists") }),
    );
    let base_url = serve(app).await;
    let client = ControlClient::new(base_url, None).unwrap();

    let result = client.list().await;
    assert_eq!(
        result,
        ApiResult::Failure("Server already exists".to_string())
    );
}

#[tokio::test]
async fn test_reserved_characters_round_trip_through_path() {
    for name in ["foo/bar", "a b", "ümlaut"] {
        let api = spawn_control_api(vec![]).await;
        let client = ControlClient::new(api.base_url.clone(), None).unwrap();

        // 404 is expected; the interesting part is what the server decoded.
        let result = client.get(name).await;
        assert!(result.is_failure());
        assert_eq!(api.fetched.lock().unwrap().as_slice(), [name]);
    }
}

#[tokio::test]
async fn test_create_sends_camel_case_body() {
    let api = spawn_control_api(vec![]).await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    let request = CreateServerRequest {
        name: "atm10".to_string(),
        modpack: "all-the-mods-10".to_string(),
        created_by: "111222333".to_string(),
    };
    let created = client.create(&request).await.into_result().unwrap();
    assert_eq!(created.name, "atm10");
    assert_eq!(created.status, ServerStatus::Creating);

    let bodies = api.created.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["name"], "atm10");
    assert_eq!(bodies[0]["modpack"], "all-the-mods-10");
    assert_eq!(bodies[0]["createdBy"], "111222333");
}

#[tokio::test]
async fn test_start_hits_action_endpoint() {
    let api = spawn_control_api(vec![]).await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    let result = client.start("ATM10").await;
    assert!(result.is_success());
    assert_eq!(api.started.lock().unwrap().as_slice(), ["ATM10"]);
}

#[tokio::test]
async fn test_delete_ignores_empty_body() {
    let api = spawn_control_api(vec![]).await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    assert_eq!(client.delete("atm10").await, ApiResult::Success(()));
}

#[tokio::test]
async fn test_health_endpoint() {
    let api = spawn_control_api(vec![]).await;
    let client = ControlClient::new(api.base_url.clone(), None).unwrap();

    let health = client.health().await.into_result().unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_bearer_credential_attached_when_configured() {
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let capture = captured.clone();
    let app = Router::new().route(
        "/api/game-servers",
        get(move |headers: HeaderMap| {
            let capture = capture.clone();
            async move {
                *capture.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(String::from);
                Json(Vec::<Value>::new())
            }
        }),
    );
    let base_url = serve(app).await;

    let client = ControlClient::new(base_url, Some("secret-key".to_string())).unwrap();
    assert!(client.list().await.is_success());
    assert_eq!(
        captured.lock().unwrap().as_deref(),
        Some("Bearer secret-key")
    );
}

#[tokio::test]
async fn test_no_credential_means_no_header() {
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let capture = captured.clone();
    let app = Router::new().route(
        "/api/game-servers",
        get(move |headers: HeaderMap| {
            let capture = capture.clone();
            async move {
                *capture.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(String::from);
                Json(Vec::<Value>::new())
            }
        }),
    );
    let base_url = serve(app).await;

    let client = ControlClient::new(base_url, None).unwrap();
    assert!(client.list().await.is_success());
    assert_eq!(*captured.lock().unwrap(), None);
}

#[tokio::test]
async fn test_transport_failure_is_failure_envelope() {
    let client =
        ControlClient::with_timeout("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
    let result = client.health().await;
    assert!(result.is_failure());
}

#[tokio::test]
async fn test_malformed_success_body_is_failure() {
    let app = Router::new().route("/api/game-servers", get(|| async { "not json" }));
    let base_url = serve(app).await;
    let client = ControlClient::new(base_url, None).unwrap();

    match client.list().await {
        ApiResult::Failure(error) => assert!(error.contains("invalid response body")),
        other => panic!("expected failure, got {:?}", other),
    }
}
