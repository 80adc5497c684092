//! Mock testRigor API for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiError, StatusResult, TestRigorApi};
use crate::payload::{StatusQuery, TriggerRequest};

/// A call made against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Trigger(TriggerRequest),
    Status(StatusQuery),
    Cancel(String),
    ListTestCases { page: u32, size: u32 },
}

/// A recorded call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// What was called.
    pub call: ApiCall,
    /// When the call was made.
    pub timestamp: DateTime<Utc>,
}

/// One scripted answer from the status endpoint.
#[derive(Debug)]
pub enum ScriptedStatus {
    Respond(StatusResult),
    Fail(ApiError),
}

/// Mock implementation of the TestRigorApi trait.
///
/// Provides controllable behavior for testing:
/// - Script a sequence of status answers (codes or errors)
/// - Make the trigger call fail
/// - Track every call for assertions
///
/// # Example
///
/// ```rust,ignore
/// use rigor_core::testing::{fixtures, MockTestRigorApi};
///
/// let api = MockTestRigorApi::new();
/// api.push_status(fixtures::status(228)).await;
/// api.push_status(fixtures::status(200)).await;
///
/// let outcome = run_test_suite(&config, &api, &host).await;
/// assert_eq!(api.status_call_count().await, 2);
/// ```
#[derive(Debug)]
pub struct MockTestRigorApi {
    /// Body returned by a successful trigger.
    trigger_response: Arc<RwLock<Value>>,
    /// If set, the next trigger call fails with this error.
    next_trigger_error: Arc<RwLock<Option<ApiError>>>,
    /// Status answers, consumed front to back.
    status_script: Arc<RwLock<VecDeque<ScriptedStatus>>>,
    /// Answer used once the script is exhausted.
    fallback_status: Arc<RwLock<Option<StatusResult>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl Default for MockTestRigorApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTestRigorApi {
    /// Create a mock that accepts triggers and has no scripted statuses.
    pub fn new() -> Self {
        Self {
            trigger_response: Arc::new(RwLock::new(json!({ "taskId": "mock-run-1" }))),
            next_trigger_error: Arc::new(RwLock::new(None)),
            status_script: Arc::new(RwLock::new(VecDeque::new())),
            fallback_status: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the body returned by trigger.
    pub async fn set_trigger_response(&self, body: Value) {
        *self.trigger_response.write().await = body;
    }

    /// Configure the next trigger call to fail with the given error.
    pub async fn set_trigger_error(&self, error: ApiError) {
        *self.next_trigger_error.write().await = Some(error);
    }

    /// Append a status answer to the script.
    pub async fn push_status(&self, result: StatusResult) {
        self.status_script
            .write()
            .await
            .push_back(ScriptedStatus::Respond(result));
    }

    /// Append a status-call failure to the script.
    pub async fn push_status_error(&self, error: ApiError) {
        self.status_script
            .write()
            .await
            .push_back(ScriptedStatus::Fail(error));
    }

    /// Answer every status call past the script with `result`.
    pub async fn set_fallback_status(&self, result: StatusResult) {
        *self.fallback_status.write().await = Some(result);
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Number of trigger calls made.
    pub async fn trigger_call_count(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::Trigger(_))).await
    }

    /// Number of status calls made.
    pub async fn status_call_count(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::Status(_))).await
    }

    /// Requests passed to trigger, in order.
    pub async fn trigger_requests(&self) -> Vec<TriggerRequest> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|recorded| match &recorded.call {
                ApiCall::Trigger(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Queries passed to status, in order.
    pub async fn status_queries(&self) -> Vec<StatusQuery> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|recorded| match &recorded.call {
                ApiCall::Status(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    async fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|recorded| predicate(&recorded.call))
            .count()
    }

    async fn record(&self, call: ApiCall) {
        self.calls.write().await.push(RecordedCall {
            call,
            timestamp: Utc::now(),
        });
    }
}

#[async_trait]
impl TestRigorApi for MockTestRigorApi {
    async fn trigger(&self, request: &TriggerRequest) -> Result<Value, ApiError> {
        self.record(ApiCall::Trigger(request.clone())).await;

        if let Some(error) = self.next_trigger_error.write().await.take() {
            return Err(error);
        }
        Ok(self.trigger_response.read().await.clone())
    }

    async fn status(&self, query: &StatusQuery) -> Result<StatusResult, ApiError> {
        self.record(ApiCall::Status(query.clone())).await;

        if let Some(scripted) = self.status_script.write().await.pop_front() {
            return match scripted {
                ScriptedStatus::Respond(result) => Ok(result),
                ScriptedStatus::Fail(error) => Err(error),
            };
        }

        match self.fallback_status.read().await.clone() {
            Some(result) => Ok(result),
            None => Err(ApiError::NoResponse {
                message: "Failed to get test status".to_string(),
                reason: "mock has no scripted status".to_string(),
            }),
        }
    }

    async fn cancel(&self, run_id: &str) -> Result<Value, ApiError> {
        self.record(ApiCall::Cancel(run_id.to_string())).await;
        Ok(json!({ "canceled": run_id }))
    }

    async fn list_test_cases(&self, page: u32, size: u32) -> Result<Value, ApiError> {
        self.record(ApiCall::ListTestCases { page, size }).await;
        Ok(json!({ "page": page, "size": size, "data": [] }))
    }
}
