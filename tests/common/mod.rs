//! Shared test utilities for rpcwatch integration tests.
//!
//! Provides builders for backend JSON payloads and helpers for wiring a
//! poller or client to a wiremock server.

#![allow(dead_code)]

use rpcwatch::client::ApiClient;
use rpcwatch::config::ApiConfig;
use rpcwatch::health::{HealthPoller, PollerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Payload Builders
// =============================================================================

/// Provider JSON as returned by `GET /api/providers`, with a latest probe.
pub fn provider_json(id: i64, name: &str, status: &str, response_time_ms: Option<f64>) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://{}.rpc.example", name),
        "description": null,
        "created_at": "2025-01-01T00:00:00",
        "latest_health": {
            "status": status,
            "response_time_ms": response_time_ms,
            "checked_at": "2025-01-02T10:30:00.250000"
        },
        "uptime": 99.0
    })
}

/// Provider JSON that has never been probed.
pub fn unprobed_provider_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://{}.rpc.example", name),
        "description": "fresh",
        "created_at": "2025-01-01T00:00:00",
        "latest_health": null,
        "uptime": 100.0
    })
}

// =============================================================================
// Mock Helpers
// =============================================================================

/// Serve `providers` from `GET /api/providers` until reset.
pub async fn mount_providers(server: &MockServer, providers: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(providers)))
        .mount(server)
        .await;
}

/// API config pointing at a mock server.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    }
}

pub fn make_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&api_config(server)).unwrap()
}

pub fn make_poller(server: &MockServer, interval_seconds: u64) -> Arc<HealthPoller> {
    Arc::new(HealthPoller::new(
        make_client(server),
        PollerConfig { interval_seconds },
    ))
}

/// Paths of every request the mock server has seen, in arrival order.
pub async fn request_log(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}
