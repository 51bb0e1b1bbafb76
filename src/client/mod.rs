//! REST client for the provider monitoring backend.
//!
//! Wraps a pooled `reqwest::Client`, attaches the bearer token on every
//! request and maps failed responses onto [`ClientError`].

mod error;
mod types;

pub use error::*;
pub use types::*;

use crate::config::ApiConfig;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where the bearer token comes from.
///
/// A file-backed token is read again for every request, so a token written
/// by another tool (or removed on logout) takes effect without restarting.
#[derive(Clone, Default)]
pub enum TokenSource {
    #[default]
    None,
    Static(String),
    File(PathBuf),
}

impl TokenSource {
    /// Static token wins over the token file.
    pub fn from_config(config: &ApiConfig) -> Self {
        match (&config.token, &config.token_file) {
            (Some(token), _) if !token.trim().is_empty() => {
                TokenSource::Static(token.trim().to_string())
            }
            (_, Some(path)) => TokenSource::File(path.clone()),
            _ => TokenSource::None,
        }
    }

    /// Current token, if any. Unreadable or empty files count as no token.
    pub fn current(&self) -> Option<String> {
        match self {
            TokenSource::None => None,
            TokenSource::Static(token) => Some(token.clone()),
            TokenSource::File(path) => match std::fs::read_to_string(path) {
                Ok(content) => {
                    let token = content.trim();
                    (!token.is_empty()).then(|| token.to_string())
                }
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "Token file not readable, sending request unauthenticated"
                    );
                    None
                }
            },
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::None => f.write_str("None"),
            TokenSource::Static(_) => f.write_str("Static(***)"),
            TokenSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Client for the monitoring backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client with connection pooling
    client: reqwest::Client,
    base_url: String,
    token: TokenSource,
    timeout_seconds: Option<u64>,
}

impl ApiClient {
    /// Create a client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(config: &ApiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: TokenSource::from_config(config),
            timeout_seconds: config.timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/providers`: all providers with latest health and uptime.
    pub async fn list_providers(&self) -> Result<Vec<Provider>, ClientError> {
        self.get_json("/api/providers").await
    }

    /// `POST /api/providers/{id}/check`: ask the backend to probe one provider now.
    ///
    /// The probe result in the response body is not interpreted.
    pub async fn trigger_check(&self, provider_id: i64) -> Result<(), ClientError> {
        let path = format!("/api/providers/{}/check", provider_id);
        self.send(Method::POST, &path, None).await?;
        Ok(())
    }

    /// `GET /api/alerts`: recent alerts, newest first.
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        self.get_json("/api/alerts").await
    }

    /// `GET /api/metrics/uptime`: averaged uptime for the last seven days.
    pub async fn uptime_series(&self) -> Result<Vec<UptimePoint>, ClientError> {
        self.get_json("/api/metrics/uptime").await
    }

    /// `GET /api/metrics/usage`: daily probe counts per provider.
    pub async fn usage_series(&self) -> Result<Vec<UsagePoint>, ClientError> {
        self.get_json("/api/metrics/usage").await
    }

    /// `POST /api/auth/login`: exchange credentials for an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ClientError> {
        let body = json!({ "email": email, "password": password });
        self.post_json("/api/auth/login", &body).await
    }

    /// `POST /api/auth/register`: create an account and sign in.
    pub async fn register(&self, email: &str, password: &str) -> Result<AccessToken, ClientError> {
        let body = json!({ "email": email, "password": password });
        self.post_json("/api/auth/register", &body).await
    }

    /// `GET /api/auth/me`: the account the current token belongs to.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.get_json("/api/auth/me").await
    }

    /// `GET /api/keys`: the account's active API keys.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ClientError> {
        self.get_json("/api/keys").await
    }

    /// `POST /api/keys`: issue a new key. The response carries the full key.
    pub async fn create_api_key(&self, name: &str) -> Result<ApiKey, ClientError> {
        self.post_json("/api/keys", &json!({ "name": name })).await
    }

    /// `DELETE /api/keys/{id}`: deactivate a key.
    pub async fn delete_api_key(&self, key_id: i64) -> Result<(), ClientError> {
        let path = format!("/api/keys/{}", key_id);
        self.send(Method::DELETE, &path, None).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None).await?;
        self.decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let body = response.text().await.map_err(|e| self.classify_error(e))?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send a request and turn non-2xx responses into errors.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "Sending backend request");

        let mut request = self.authorize(self.client.request(method, &url));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ClientError::from_response_body(status.as_u16(), &body);
        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            error = %error,
            "Backend returned error status"
        );
        Err(error)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.current() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Classify reqwest error into ClientError.
    fn classify_error(&self, e: reqwest::Error) -> ClientError {
        match self.timeout_seconds {
            Some(secs) if e.is_timeout() => ClientError::Timeout(secs),
            _ if e.is_decode() => ClientError::Decode(e.to_string()),
            _ => ClientError::Transport(e.to_string()),
        }
    }
}
