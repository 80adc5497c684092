//! Surface the runner reports into.
//!
//! A build system, CI job or command line embeds the runner by implementing
//! `Host`. Failure reports are authoritative; status reports are best-effort.

use serde::{Deserialize, Serialize};

/// Summary shown to the user when a run is triggered or passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub title: String,
    pub summary: String,
    pub text: String,
}

impl StatusReport {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            text: text.into(),
        }
    }
}

/// Environment capabilities used by the runner.
pub trait Host: Send + Sync {
    /// Signal a failed terminal outcome.
    fn report_failure(&self, message: &str);

    /// Surface progress or a result. Implementations must not fail the run.
    fn report_status(&self, report: &StatusReport);
}
