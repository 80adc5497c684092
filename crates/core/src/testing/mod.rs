//! Testing utilities and mock implementations.
//!
//! This module provides a mock `TestRigorApi` and a recording `Host`, so the
//! runner can be exercised without a network or a build system.
//!
//! # Example
//!
//! ```rust,ignore
//! use rigor_core::testing::{fixtures, MockTestRigorApi, RecordingHost};
//!
//! let api = MockTestRigorApi::new();
//! let host = RecordingHost::new();
//!
//! // Configure status answers
//! api.push_status(fixtures::status(228)).await;
//! api.push_status(fixtures::status(230)).await;
//!
//! let outcome = run_test_suite(&fixtures::run_config(), &api, &host).await;
//! assert_eq!(host.only_failure().as_deref(), Some("TestRigor tests failed"));
//! ```

mod mock_api;
mod mock_host;

pub use mock_api::{ApiCall, MockTestRigorApi, RecordedCall, ScriptedStatus};
pub use mock_host::RecordingHost;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::Value;

    use crate::api::{ApiError, StatusResult};
    use crate::config::RunConfig;

    /// Minimal valid run configuration that waits for results.
    pub fn run_config() -> RunConfig {
        RunConfig {
            authentication_token: Some("test-token".to_string()),
            test_suite_id: Some("test-suite-123".to_string()),
            ..Default::default()
        }
    }

    /// Status answer with an empty body.
    pub fn status(code: u16) -> StatusResult {
        StatusResult::new(code, Value::Null)
    }

    /// Status answer with a body.
    pub fn status_with_body(code: u16, body: Value) -> StatusResult {
        StatusResult::new(code, body)
    }

    /// Error raised by a status call that got an HTTP error back.
    pub fn server_error(status: u16) -> ApiError {
        ApiError::Server {
            message: "Failed to get test status".to_string(),
            status,
            status_text: String::new(),
            body: Value::Null,
        }
    }

    /// Error raised when the server never answered.
    pub fn no_response() -> ApiError {
        ApiError::NoResponse {
            message: "Failed to get test status".to_string(),
            reason: "connection refused".to_string(),
        }
    }
}
