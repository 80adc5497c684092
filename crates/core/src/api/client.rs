//! reqwest-backed testRigor client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::payload::{StatusQuery, TriggerRequest};

use super::{ApiError, StatusResult, TestRigorApi};

const AUTH_HEADER: &str = "auth-token";

const TRIGGER_FAILED: &str = "Failed to trigger retest";
const STATUS_FAILED: &str = "Failed to get test status";
const CANCEL_FAILED: &str = "Failed to cancel test run";
const TEST_CASES_FAILED: &str = "Failed to get test cases";

/// Client bound to one suite and one auth token.
pub struct TestRigorClient {
    client: Client,
    base_url: String,
    cancel_base_url: String,
    auth_token: String,
    suite_id: String,
}

impl TestRigorClient {
    /// Create a new client. No request timeout is set beyond reqwest's default.
    pub fn new(
        config: &ApiConfig,
        auth_token: impl Into<String>,
        suite_id: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(|e| ApiError::Request {
            message: "Failed to create HTTP client".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cancel_base_url: config.cancel_base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
            suite_id: suite_id.into(),
        })
    }

    fn suite_url(&self, base: &str, endpoint: &str) -> String {
        format!(
            "{}/apps/{}/{}",
            base,
            urlencoding::encode(&self.suite_id),
            endpoint
        )
    }

    fn retest_url(&self) -> String {
        self.suite_url(&self.base_url, "retest")
    }

    fn status_url(&self) -> String {
        self.suite_url(&self.base_url, "status")
    }

    fn cancel_url(&self, run_id: &str) -> String {
        self.suite_url(
            &self.cancel_base_url,
            &format!("runs/{}/cancel", urlencoding::encode(run_id)),
        )
    }

    fn test_cases_url(&self) -> String {
        self.suite_url(&self.cancel_base_url, "test_cases")
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_HEADER, &self.auth_token)
    }

    /// Send a request and return the body of a 2xx answer.
    async fn send_expecting_success(
        &self,
        request: RequestBuilder,
        message: &str,
    ) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(message, e))?;

        let status = response.status();
        let body = read_body(response, message).await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(server_error(message, status, body))
        }
    }
}

#[async_trait]
impl TestRigorApi for TestRigorClient {
    async fn trigger(&self, request: &TriggerRequest) -> Result<Value, ApiError> {
        let url = self.retest_url();
        debug!(url = %url, "Triggering retest");

        let builder = self.authed(self.client.post(&url)).json(request);
        self.send_expecting_success(builder, TRIGGER_FAILED).await
    }

    async fn status(&self, query: &StatusQuery) -> Result<StatusResult, ApiError> {
        let url = self.status_url();
        debug!(url = %url, ?query, "Checking run status");

        let mut builder = self
            .authed(self.client.get(&url))
            .header(reqwest::header::ACCEPT, "application/json");

        let pairs = query.pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_send_error(STATUS_FAILED, e))?;

        let status = response.status();
        let body = read_body(response, STATUS_FAILED).await?;

        if status.is_success() || status.as_u16() >= 400 {
            Ok(StatusResult::new(status.as_u16(), body))
        } else {
            Err(server_error(STATUS_FAILED, status, body))
        }
    }

    async fn cancel(&self, run_id: &str) -> Result<Value, ApiError> {
        let url = self.cancel_url(run_id);
        debug!(url = %url, "Cancelling run");

        let builder = self.authed(self.client.put(&url)).json(&json!({}));
        self.send_expecting_success(builder, CANCEL_FAILED).await
    }

    async fn list_test_cases(&self, page: u32, size: u32) -> Result<Value, ApiError> {
        let url = self.test_cases_url();
        debug!(url = %url, page, size, "Listing test cases");

        let builder = self
            .authed(self.client.get(&url))
            .query(&[("page", page), ("size", size)]);
        self.send_expecting_success(builder, TEST_CASES_FAILED).await
    }
}

/// Split reqwest failures into "never built" and "no answer".
fn classify_send_error(message: &str, error: reqwest::Error) -> ApiError {
    if error.is_builder() {
        ApiError::Request {
            message: message.to_string(),
            reason: error.to_string(),
        }
    } else {
        ApiError::NoResponse {
            message: message.to_string(),
            reason: error.to_string(),
        }
    }
}

fn server_error(message: &str, status: StatusCode, body: Value) -> ApiError {
    ApiError::Server {
        message: message.to_string(),
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

/// Read the body as JSON, falling back to the raw text.
///
/// A body cut short after the headers arrived counts as no response.
async fn read_body(response: Response, message: &str) -> Result<Value, ApiError> {
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to read response body");
            return Err(ApiError::NoResponse {
                message: message.to_string(),
                reason: e.to_string(),
            });
        }
    };
    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
