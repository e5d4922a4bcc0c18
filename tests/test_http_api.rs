//! End-to-end HTTP contract tests
//!
//! Drives the warp filters through `warp::test` without binding a socket.
//! Covers the success path, the itemized 400 validation contract, the
//! empty/malformed body shapes, the /api alias, and the opaque 500.

use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use suggestd::matcher::{MatcherService, RetryExecutor, RuleTable, TaskSuggester};
use suggestd::server::ApiServer;
use suggestd::testing::mocks::{MockSuggester, ScriptedInjector};

fn real_server() -> Arc<ApiServer> {
    let suggester = Arc::new(MatcherService::new(
        Arc::new(RuleTable::standard()),
        RetryExecutor::new(3, Duration::from_millis(1)),
        Arc::new(ScriptedInjector::never()),
    ));
    server_with(suggester)
}

fn server_with(suggester: Arc<dyn TaskSuggester>) -> Arc<ApiServer> {
    Arc::new(ApiServer::new(
        "test-suggestd".to_string(),
        "127.0.0.1".to_string(),
        0,
        suggester,
    ))
}

fn valid_body(utterance: &str) -> Value {
    json!({
        "utterance": utterance,
        "userId": "user-1",
        "sessionId": "session-1",
        "timestamp": Utc::now().to_rfc3339(),
    })
}

async fn post_suggest(server: &Arc<ApiServer>, path: &str, body: &Value) -> (u16, Value) {
    let routes = server.routes();
    let response = warp::test::request()
        .method("POST")
        .path(path)
        .body(body.to_string())
        .reply(&routes)
        .await;

    let status = response.status().as_u16();
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    (status, parsed)
}

#[tokio::test]
async fn test_forgot_password_suggests_reset_task() {
    let server = real_server();
    let (status, body) = post_suggest(&server, "/suggestTask", &valid_body("forgot password")).await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], "ResetPasswordTask");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_track_order_suggests_order_status_task() {
    let server = real_server();
    let (status, body) = post_suggest(&server, "/suggestTask", &valid_body("track order")).await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], "CheckOrderStatusTask");
}

#[tokio::test]
async fn test_unrelated_utterance_suggests_nothing() {
    let server = real_server();
    let (status, body) =
        post_suggest(&server, "/suggestTask", &valid_body("xyz unrelated text")).await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], "NoTaskFound");
}

#[tokio::test]
async fn test_api_alias_path_behaves_identically() {
    let server = real_server();
    let (status, body) =
        post_suggest(&server, "/api/suggestTask", &valid_body("forgot password")).await;

    assert_eq!(status, 200);
    assert_eq!(body["task"], "ResetPasswordTask");
}

#[tokio::test]
async fn test_missing_user_id_is_a_400_with_itemized_error() {
    let server = real_server();
    let body = json!({
        "utterance": "forgot password",
        "sessionId": "session-1",
        "timestamp": Utc::now().to_rfc3339(),
    });

    let (status, parsed) = post_suggest(&server, "/suggestTask", &body).await;

    assert_eq!(status, 400);
    assert_eq!(parsed["message"], "Validation failed");
    let errors = parsed["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("UserId is required")));
}

#[tokio::test]
async fn test_empty_utterance_is_a_400_at_the_boundary() {
    let server = real_server();
    let (status, parsed) = post_suggest(&server, "/suggestTask", &valid_body("   ")).await;

    assert_eq!(status, 400);
    let errors = parsed["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("Utterance is required")));
}

#[tokio::test]
async fn test_far_future_timestamp_rejected() {
    let server = real_server();
    let body = json!({
        "utterance": "forgot password",
        "userId": "user-1",
        "sessionId": "session-1",
        "timestamp": (Utc::now() + chrono::Duration::minutes(10)).to_rfc3339(),
    });

    let (status, parsed) = post_suggest(&server, "/suggestTask", &body).await;

    assert_eq!(status, 400);
    let errors = parsed["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("Timestamp must be a valid")));
}

#[tokio::test]
async fn test_empty_body_gets_its_own_message() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("POST")
        .path("/suggestTask")
        .body("")
        .reply(&routes)
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(parsed["message"], "Request body is required");
}

#[tokio::test]
async fn test_malformed_body_is_a_400() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("POST")
        .path("/suggestTask")
        .body("{not valid json")
        .reply(&routes)
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(parsed["message"], "Validation failed");
}

#[tokio::test]
async fn test_retry_exhaustion_surfaces_as_opaque_500() {
    let server = server_with(Arc::new(MockSuggester::with_failure()));
    let (status, parsed) =
        post_suggest(&server, "/suggestTask", &valid_body("forgot password")).await;

    assert_eq!(status, 500);
    assert_eq!(
        parsed["message"],
        "An error occurred while processing your request"
    );
    assert_eq!(parsed["errors"], json!(["Internal server error"]));
}

#[tokio::test]
async fn test_validation_runs_before_the_core() {
    // Even with an always-failing core, a bad request stays a 400
    let suggester = Arc::new(MockSuggester::with_failure());
    let server = server_with(suggester.clone());

    let body = json!({ "utterance": "forgot password" });
    let (status, _) = post_suggest(&server, "/suggestTask", &body).await;

    assert_eq!(status, 400);
    assert_eq!(suggester.calls(), 0);
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(parsed["status"], "healthy");
    assert_eq!(parsed["service_id"], "test-suggestd");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("GET")
        .path("/live")
        .reply(&routes)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(parsed["alive"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_exports_snapshot() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("GET")
        .path("/metrics")
        .reply(&routes)
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let parsed: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(parsed["requests"].is_object());
    assert!(parsed["matching"].is_object());
}

#[tokio::test]
async fn test_get_on_suggest_path_is_rejected() {
    let server = real_server();
    let routes = server.routes();

    let response = warp::test::request()
        .method("GET")
        .path("/suggestTask")
        .reply(&routes)
        .await;

    assert_ne!(response.status().as_u16(), 200);
}
