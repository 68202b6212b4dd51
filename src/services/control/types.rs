//! Control API Types
//!
//! Wire types for the homelab control API, the uniform success/failure
//! envelope returned by every client call, and the internal error taxonomy
//! that gets normalized into that envelope at the client boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Wire Types
// ---------------------------------------------------------------------------

/// Lifecycle state of a managed game server.
///
/// `Unknown` absorbs any status value the API starts reporting that this
/// bot does not recognize yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Creating,
    Starting,
    Running,
    Stopping,
    Stopped,
    Error,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServerStatus::Creating => "creating",
            ServerStatus::Starting => "starting",
            ServerStatus::Running => "running",
            ServerStatus::Stopping => "stopping",
            ServerStatus::Stopped => "stopped",
            ServerStatus::Error => "error",
            ServerStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A managed game server as reported by the control API.
///
/// Instances are fetched fresh for every command and never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameServer {
    pub name: String,
    pub status: ServerStatus,
    #[serde(default)]
    pub modpack: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub created_by: String,
}

/// Request body for creating a new server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateServerRequest {
    pub name: String,
    pub modpack: String,
    pub created_by: String,
}

/// Response body of the control API health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Result Envelope
// ---------------------------------------------------------------------------

/// Uniform outcome of a control API call.
///
/// Exactly one variant is populated by construction. Every `ControlClient`
/// operation returns this envelope and never a bare `Err`; handlers consume
/// it immediately and render exactly one response from it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ApiResult<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        ApiResult::Failure(error.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ApiResult::Failure(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ApiResult::Success(data) => Ok(data),
            ApiResult::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, ControlError>> for ApiResult<T> {
    fn from(result: Result<T, ControlError>) -> Self {
        match result {
            Ok(data) => ApiResult::Success(data),
            Err(error) => ApiResult::Failure(error.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

/// Control API call failures, internal to the client.
///
/// Nothing above the client boundary sees these: they are flattened into
/// `ApiResult::Failure` messages before returning.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Connection, DNS, or timeout failure below the HTTP layer.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. The message is the response body, or
    /// `HTTP <status>` when the body is empty.
    #[error("{}", http_failure_message(.status, .body))]
    Http { status: u16, body: String },

    /// The remote answered 2xx but the body did not match the expected shape.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

fn http_failure_message(status: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
