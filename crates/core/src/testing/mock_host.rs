//! Recording host for testing.

use std::sync::{Mutex, MutexGuard};

use crate::host::{Host, StatusReport};

/// Host that records every report for assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    failures: Mutex<Vec<String>>,
    statuses: Mutex<Vec<StatusReport>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failure messages, in order.
    pub fn failures(&self) -> Vec<String> {
        lock(&self.failures).clone()
    }

    /// Status reports, in order.
    pub fn statuses(&self) -> Vec<StatusReport> {
        lock(&self.statuses).clone()
    }

    /// The single failure message, if exactly one was reported.
    pub fn only_failure(&self) -> Option<String> {
        let failures = lock(&self.failures);
        match failures.as_slice() {
            [message] => Some(message.clone()),
            _ => None,
        }
    }
}

impl Host for RecordingHost {
    fn report_failure(&self, message: &str) {
        lock(&self.failures).push(message.to_string());
    }

    fn report_status(&self, report: &StatusReport) {
        lock(&self.statuses).push(report.clone());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
