//! Trigger-then-poll runner.
//!
//! Drives one run through `Triggered -> Polling -> terminal`:
//! - **Trigger**: one retest call; any failure is fatal
//! - **Polling**: sequential status checks under a fixed attempt budget,
//!   retrying only when the status call raises a 5xx
//! - **Terminal**: outcome handed to the `Host`

mod poll;
mod types;

pub use poll::{run, run_test_suite};
pub use types::{
    decide, status_label, Decision, PollState, RunError, RunOutcome, StatusCategory,
    MAX_POLL_ATTEMPTS,
};
