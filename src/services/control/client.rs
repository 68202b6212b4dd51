//! Control API Client
//!
//! HTTP client for the homelab control API. One method per lifecycle
//! operation, each returning the `ApiResult` envelope: `Success` when the
//! transport call completes and the remote answers with a 2xx status,
//! `Failure` otherwise. No retries, no caching; errors never escape as
//! `Err` from the public methods.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::types::{ApiResult, ControlError, CreateServerRequest, GameServer, HealthStatus};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the control API's game-server endpoints.
///
/// Holds an immutable base URL and optional bearer credential, both resolved
/// once at startup. When the credential is absent, calls go out
/// unauthenticated.
pub struct ControlClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ControlClient {
    /// Creates a client with the default request timeout.
    ///
    /// `base_url` is expected to be validated already (see
    /// `AppConfig::from_env`) and carries no trailing slash.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ControlError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ControlError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// The configured base URL, as shown in the health report.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all game servers.
    pub async fn list(&self) -> ApiResult<Vec<GameServer>> {
        self.fetch(self.http.get(self.endpoint("/api/game-servers")))
            .await
    }

    /// Fetch a single server by name.
    pub async fn get(&self, name: &str) -> ApiResult<GameServer> {
        self.fetch(self.http.get(self.endpoint(&server_path(name, None))))
            .await
    }

    /// Create a new server.
    pub async fn create(&self, request: &CreateServerRequest) -> ApiResult<GameServer> {
        self.fetch(
            self.http
                .post(self.endpoint("/api/game-servers"))
                .json(request),
        )
        .await
    }

    /// Start a server by name.
    pub async fn start(&self, name: &str) -> ApiResult<GameServer> {
        self.fetch(
            self.http
                .post(self.endpoint(&server_path(name, Some("start")))),
        )
        .await
    }

    /// Stop a server by name.
    pub async fn stop(&self, name: &str) -> ApiResult<GameServer> {
        self.fetch(
            self.http
                .post(self.endpoint(&server_path(name, Some("stop")))),
        )
        .await
    }

    /// Delete a server by name. Any response body is ignored.
    pub async fn delete(&self, name: &str) -> ApiResult<()> {
        self.dispatch(self.http.delete(self.endpoint(&server_path(name, None))))
            .await
            .map(|_| ())
            .into()
    }

    /// Check control API health.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.fetch(self.http.get(self.endpoint("/health"))).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Sends the request and maps transport and HTTP failures into
    /// `ControlError`. A 2xx response passes through untouched.
    async fn dispatch(&self, request: RequestBuilder) -> Result<reqwest::Response, ControlError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ControlError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Runs the request and normalizes every failure path into the envelope.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let result = async {
            let response = self.dispatch(request).await?;
            response
                .json::<T>()
                .await
                .map_err(|e| ControlError::InvalidBody(e.to_string()))
        }
        .await;
        result.into()
    }
}

/// Builds a `/api/game-servers/{name}[/{action}]` path with the name
/// percent-encoded, so reserved characters never corrupt the request path.
fn server_path(name: &str, action: Option<&str>) -> String {
    let encoded = urlencoding::encode(name);
    match action {
        Some(action) => format!("/api/game-servers/{}/{}", encoded, action),
        None => format!("/api/game-servers/{}", encoded),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
