//! testRigor API access.
//!
//! This module provides a `TestRigorApi` trait for the operations the runner
//! needs (trigger, status, cancel, test case listing) and a reqwest-backed
//! implementation.

mod client;
mod types;

pub use client::TestRigorClient;
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::payload::{StatusQuery, TriggerRequest};

/// Operations against a single test suite.
#[async_trait]
pub trait TestRigorApi: Send + Sync {
    /// Start a run. Returns the response body.
    async fn trigger(&self, request: &TriggerRequest) -> Result<Value, ApiError>;

    /// Check the suite's current run.
    ///
    /// 4xx/5xx responses come back as a `StatusResult`, not an error; only
    /// transport failures and unexpected non-2xx codes are errors.
    async fn status(&self, query: &StatusQuery) -> Result<StatusResult, ApiError>;

    /// Cancel a run by id.
    async fn cancel(&self, run_id: &str) -> Result<Value, ApiError>;

    /// List the suite's test cases, one page at a time.
    async fn list_test_cases(&self, page: u32, size: u32) -> Result<Value, ApiError>;
}
