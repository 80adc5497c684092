//! Host that surfaces run reports on the console.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};

use rigor_core::{Host, StatusReport};

/// Logs reports and remembers whether the run failed.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    failed: AtomicBool,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Host for ConsoleHost {
    fn report_failure(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        error!("{}", message);
    }

    fn report_status(&self, report: &StatusReport) {
        info!(summary = %report.summary, "{}: {}", report.title, report.text);
    }
}
