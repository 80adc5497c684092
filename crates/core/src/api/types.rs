//! Types for testRigor API calls.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors that can occur when calling the testRigor API.
///
/// Every variant carries the operation message ("Failed to trigger retest",
/// ...) so the rendered error names what was being attempted.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status the operation does not accept.
    #[error("{message}: {status} {status_text}")]
    Server {
        message: String,
        status: u16,
        status_text: String,
        body: Value,
    },

    /// The request was sent but no response arrived.
    #[error("{message}: No response received from server")]
    NoResponse { message: String, reason: String },

    /// The request could not be built.
    #[error("{message}: {reason}")]
    Request { message: String, reason: String },
}

impl ApiError {
    /// HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::NoResponse { .. } | ApiError::Request { .. } => None,
        }
    }

    /// Whether the server reported a 5xx.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status >= 500)
    }

    /// Structured detail for logs.
    pub fn detail(&self) -> Value {
        match self {
            ApiError::Server {
                message,
                status,
                status_text,
                body,
            } => json!({
                "message": message,
                "status": status,
                "statusText": status_text,
                "data": body,
            }),
            ApiError::NoResponse { message, reason } | ApiError::Request { message, reason } => {
                json!({
                    "message": message,
                    "originalError": reason,
                })
            }
        }
    }
}

/// How an error status answer should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 5xx: the server may recover.
    Transient,
    /// 4xx: the request itself was rejected.
    Fatal,
}

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResult {
    /// HTTP status code; carries the run state.
    pub code: u16,
    /// Response body (JSON when parseable).
    pub body: Value,
    /// Set for 4xx/5xx answers.
    pub failure: Option<FailureKind>,
}

impl StatusResult {
    pub fn new(code: u16, body: Value) -> Self {
        let failure = match code {
            500.. => Some(FailureKind::Transient),
            400..=499 => Some(FailureKind::Fatal),
            _ => None,
        };
        Self {
            code,
            body,
            failure,
        }
    }

    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }
}

/// Counters reported while a run is in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OverallResults {
    #[serde(rename = "Passed", default)]
    pub passed: u64,
    #[serde(rename = "Failed", default)]
    pub failed: u64,
    #[serde(rename = "In progress", default)]
    pub in_progress: u64,
    #[serde(rename = "In queue", default)]
    pub in_queue: u64,
    #[serde(rename = "Total", default)]
    pub total: u64,
}

impl OverallResults {
    /// Extract counters from a status body, if present.
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("overallResults")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Link to the run report, if the body has one.
pub fn details_url(body: &Value) -> Option<&str> {
    body.get("detailsUrl").and_then(Value::as_str)
}
