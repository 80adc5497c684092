//! Types for the trigger/poll runner.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiError, StatusResult};
use crate::config::ValidationError;
use crate::payload::PayloadError;

/// Upper bound on status checks per run (one hour at the default interval).
pub const MAX_POLL_ATTEMPTS: u32 = 360;

/// Errors that end a run before polling starts or outside the decision table.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body could not be built.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl RunError {
    /// Message handed to the host.
    pub fn failure_message(&self) -> String {
        match self {
            RunError::Validation(e) => e.to_string(),
            other => format!("TestRigor plugin error: {}", other),
        }
    }
}

/// Meaning of a status endpoint response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// 200
    Passed,
    /// 227 (new) or 228 (running)
    Running,
    /// 229
    Canceled,
    /// 230
    Failed,
    /// 400-499
    ClientError,
    /// 500-599
    ServerError,
    /// Anything else
    Unrecognized,
}

impl StatusCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => StatusCategory::Passed,
            227 | 228 => StatusCategory::Running,
            229 => StatusCategory::Canceled,
            230 => StatusCategory::Failed,
            400..=499 => StatusCategory::ClientError,
            500..=599 => StatusCategory::ServerError,
            _ => StatusCategory::Unrecognized,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusCategory::Running)
    }
}

/// Human label for a status code, used in logs.
pub fn status_label(code: u16) -> &'static str {
    match code {
        200 => "SUCCESS",
        227 => "NEW",
        228 => "IN PROGRESS",
        229 => "CANCELED",
        230 => "FAILED",
        _ => "UNKNOWN",
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Triggered without waiting for results.
    Triggered { response: Value },
    Passed { body: Value },
    Failed { body: Value },
    Canceled { body: Value },
    Errored { message: String },
    /// Attempt budget exhausted.
    TimedOut { waited: Duration },
}

impl RunOutcome {
    /// Whether the host should treat the run as successful.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Triggered { .. } | RunOutcome::Passed { .. })
    }

    /// Message reported to the host for failed outcomes.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            RunOutcome::Triggered { .. } | RunOutcome::Passed { .. } => None,
            RunOutcome::Failed { .. } => Some("TestRigor tests failed".to_string()),
            RunOutcome::Canceled { .. } => Some("TestRigor tests were canceled".to_string()),
            RunOutcome::Errored { message } => Some(message.clone()),
            RunOutcome::TimedOut { waited } => Some(format!(
                "TestRigor tests did not complete within the timeout period ({}s)",
                waited.as_secs()
            )),
        }
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Triggered { .. } => "triggered",
            RunOutcome::Passed { .. } => "passed",
            RunOutcome::Failed { .. } => "failed",
            RunOutcome::Canceled { .. } => "canceled",
            RunOutcome::Errored { .. } => "errored",
            RunOutcome::TimedOut { .. } => "timed_out",
        }
    }
}

/// What the poll loop does with one status result.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Still running; check again after the interval.
    KeepPolling,
    Finish(RunOutcome),
}

/// Apply the decision table to a status result.
pub fn decide(result: StatusResult) -> Decision {
    let StatusResult { code, body, .. } = result;
    match StatusCategory::from_code(code) {
        StatusCategory::Running => Decision::KeepPolling,
        StatusCategory::Passed => Decision::Finish(RunOutcome::Passed { body }),
        StatusCategory::Canceled => Decision::Finish(RunOutcome::Canceled { body }),
        StatusCategory::Failed => Decision::Finish(RunOutcome::Failed { body }),
        StatusCategory::ClientError | StatusCategory::ServerError => {
            Decision::Finish(RunOutcome::Errored {
                message: format!("TestRigor API returned error: {}", code),
            })
        }
        StatusCategory::Unrecognized => Decision::Finish(RunOutcome::Errored {
            message: format!("Unexpected status code from TestRigor: {}", code),
        }),
    }
}

/// Loop bookkeeping, owned by the poll loop for one run.
#[derive(Debug, Clone)]
pub struct PollState {
    pub attempt: u32,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollState {
    pub fn new(interval: Duration) -> Self {
        Self {
            attempt: 0,
            interval,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    pub fn has_budget(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Only the first check runs without waiting.
    pub fn should_wait(&self) -> bool {
        self.attempt > 0
    }

    /// Upper bound on time spent waiting, used in the timeout message.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
