//! Integration tests for the backend REST client.

mod common;

use common::*;
use rpcwatch::client::{ApiClient, ClientError, HealthStatus};
use rpcwatch::config::ApiConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_providers_decodes_backend_shape() {
    let server = MockServer::start().await;
    mount_providers(
        &server,
        vec![
            provider_json(1, "alpha", "online", Some(42.5)),
            unprobed_provider_json(2, "beta"),
        ],
    )
    .await;

    let providers = make_client(&server).list_providers().await.unwrap();
    assert_eq!(providers.len(), 2);

    let health = providers[0].latest_health.as_ref().unwrap();
    assert_eq!(health.status, HealthStatus::Online);
    assert_eq!(health.response_time_ms, Some(42.5));
    assert!(providers[1].latest_health.is_none());
    assert_eq!(providers[1].uptime, 100.0);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiConfig {
        token: Some("s3cret".to_string()),
        ..api_config(&server)
    };
    let client = ApiClient::new(&config).unwrap();
    assert!(client.list_providers().await.unwrap().is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let server = MockServer::start().await;
    mount_providers(&server, vec![]).await;

    make_client(&server).list_providers().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_token_file_is_read_per_request() {
    let server = MockServer::start().await;
    mount_providers(&server, vec![]).await;

    let temp = tempfile::tempdir().unwrap();
    let token_path = temp.path().join("token");
    let config = ApiConfig {
        token_file: Some(token_path.clone()),
        ..api_config(&server)
    };
    let client = ApiClient::new(&config).unwrap();

    // No file yet: unauthenticated
    client.list_providers().await.unwrap();
    std::fs::write(&token_path, "rotated\n").unwrap();
    client.list_providers().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer rotated"
    );
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    mount_providers(&server, vec![]).await;

    let config = ApiConfig {
        base_url: format!("{}/", server.uri()),
        ..ApiConfig::default()
    };
    ApiClient::new(&config).unwrap().list_providers().await.unwrap();

    assert_eq!(request_log(&server).await, vec!["GET /api/providers"]);
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Not authenticated" })),
        )
        .mount(&server)
        .await;

    let err = make_client(&server).list_providers().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Not authenticated");
}

#[tokio::test]
async fn test_error_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{ "loc": ["query"], "msg": "field required" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = make_client(&server);
    let err = client.list_alerts().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 422");

    let err = client.list_providers().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed (HTTP 502)");
}

#[tokio::test]
async fn test_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = make_client(&server).list_providers().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig {
        timeout_seconds: Some(1),
        ..api_config(&server)
    };
    let err = ApiClient::new(&config)
        .unwrap()
        .list_providers()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout(1)));
}

#[tokio::test]
async fn test_trigger_check_posts_and_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/providers/12/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "offline",
            "response_time_ms": null,
            "error_message": "Connection failed",
            "checked_at": "2025-01-02T10:31:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    make_client(&server).trigger_check(12).await.unwrap();
    server.verify().await;
}

#[tokio::test]
async fn test_alerts_and_metrics_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 9,
            "provider_name": "alpha",
            "provider_url": "https://alpha.rpc.example",
            "severity": "warning",
            "alert_type": "slow",
            "message": "Provider alpha is slow: 1200ms",
            "created_at": "2025-01-02T10:30:00",
            "resolved": false
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/metrics/uptime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Mon", "uptime": 99.5, "date": "2025-01-06" },
            { "name": "Tue", "uptime": 100.0, "date": "2025-01-07" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/metrics/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "date": "2025-01-06", "requests": 2880, "provider": "alpha" }
        ])))
        .mount(&server)
        .await;

    let client = make_client(&server);

    let alerts = client.list_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type.as_deref(), Some("slow"));
    assert!(!alerts[0].resolved);

    let uptime = client.uptime_series().await.unwrap();
    assert_eq!(uptime.len(), 2);
    assert_eq!(uptime[0].name, "Mon");

    let usage = client.usage_series().await.unwrap();
    assert_eq!(usage[0].requests, 2880);
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "eyJ.issued",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = make_client(&server)
        .login("ops@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(token.access_token, "eyJ.issued");
    server.verify().await;
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Incorrect email or password" })),
        )
        .mount(&server)
        .await;

    let err = make_client(&server)
        .login("ops@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Incorrect email or password");
}

#[tokio::test]
async fn test_register_posts_to_register() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "access_token": "eyJ.new" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = make_client(&server)
        .register("new@example.com", "pw")
        .await
        .unwrap();
    assert_eq!(token.access_token, "eyJ.new");
    assert_eq!(token.token_type, "bearer");
    server.verify().await;
}

#[tokio::test]
async fn test_current_user_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer eyJ.issued"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 4, "email": "ops@example.com" })),
        )
        .mount(&server)
        .await;

    let config = ApiConfig {
        token: Some("eyJ.issued".to_string()),
        ..api_config(&server)
    };
    let user = ApiClient::new(&config).unwrap().current_user().await.unwrap();
    assert_eq!(user.id, 4);
    assert_eq!(user.email, "ops@example.com");
}

#[tokio::test]
async fn test_api_key_lifecycle_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": "ci",
            "key": "rpc_existing",
            "created_at": "2025-01-01T00:00:00",
            "last_used": null,
            "is_active": true
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/keys"))
        .and(body_json(json!({ "name": "deploy" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "name": "deploy",
            "key": "rpc_fresh",
            "created_at": "2025-01-02T00:00:00",
            "last_used": null,
            "is_active": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/keys/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = make_client(&server);

    let keys = client.list_api_keys().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "ci");

    let created = client.create_api_key("deploy").await.unwrap();
    assert_eq!(created.key, "rpc_fresh");

    client.delete_api_key(1).await.unwrap();
    server.verify().await;
}

#[tokio::test]
async fn test_delete_missing_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/keys/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "API key not found" })),
        )
        .mount(&server)
        .await;

    let err = make_client(&server).delete_api_key(99).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "API key not found");
}
