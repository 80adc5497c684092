//! Trigger a run, then poll until it reaches a terminal state.
//!
//! One run is strictly sequential: a single trigger, then wait/check
//! iterations. The only suspension point is the sleep between checks.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::api::{details_url, ApiError, OverallResults, TestRigorApi, TestRigorClient};
use crate::config::{validate_run_config, Config, RunConfig};
use crate::host::{Host, StatusReport};
use crate::payload::{build_status_query, build_trigger_request, StatusQuery};

use super::types::{
    decide, status_label, Decision, PollState, RunError, RunOutcome, StatusCategory,
};

/// Validate the configuration, build a client for it, and run the suite.
pub async fn run(config: &Config, host: &dyn Host) -> RunOutcome {
    if let Err(e) = validate_run_config(&config.run) {
        let message = RunError::from(e).failure_message();
        return finish(RunOutcome::Errored { message }, host);
    }

    let client = match TestRigorClient::new(
        &config.api,
        config.run.token().unwrap_or_default(),
        config.run.suite_id().unwrap_or_default(),
    ) {
        Ok(client) => client,
        Err(e) => {
            let message = RunError::from(e).failure_message();
            return finish(RunOutcome::Errored { message }, host);
        }
    };

    run_test_suite(&config.run, &client, host).await
}

/// Run one suite against `api`, reporting the outcome to `host`.
pub async fn run_test_suite(
    config: &RunConfig,
    api: &dyn TestRigorApi,
    host: &dyn Host,
) -> RunOutcome {
    info!("TestRigor integration starting");
    let started_at = Utc::now();

    let outcome = match execute(config, api).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Run failed: {}", e);
            if let RunError::Api(api_error) = &e {
                error!(detail = %api_error.detail(), "API error details");
            }
            RunOutcome::Errored {
                message: e.failure_message(),
            }
        }
    };

    info!(
        outcome = outcome.as_str(),
        elapsed_secs = (Utc::now() - started_at).num_seconds(),
        "TestRigor run finished"
    );

    finish(outcome, host)
}

/// Hand the outcome to the host.
fn finish(outcome: RunOutcome, host: &dyn Host) -> RunOutcome {
    match &outcome {
        RunOutcome::Triggered { .. } => host.report_status(&StatusReport::new(
            "TestRigor Tests Triggered",
            "Test execution started successfully",
            "Tests are running in the background. Check TestRigor dashboard for results.",
        )),
        RunOutcome::Passed { body } => {
            let text = details_url(body)
                .map(|url| format!("View details: {}", url))
                .unwrap_or_else(|| "Tests passed".to_string());
            host.report_status(&StatusReport::new(
                "TestRigor Tests Passed",
                "All tests completed successfully",
                text,
            ));
        }
        _ => {
            if let Some(message) = outcome.failure_message() {
                host.report_failure(&message);
            }
        }
    }
    outcome
}

async fn execute(config: &RunConfig, api: &dyn TestRigorApi) -> Result<RunOutcome, RunError> {
    validate_run_config(config)?;
    log_config(config);

    debug!("Building test configuration");
    let request = build_trigger_request(config)?;

    info!("Triggering TestRigor test execution");
    let response = api.trigger(&request).await?;
    info!("Test execution triggered successfully");
    if !response.is_null() {
        info!(response = %response, "Trigger response");
    }

    if !config.wait_for_results {
        info!("Not waiting for test results (waitForResults=false)");
        return Ok(RunOutcome::Triggered { response });
    }

    let query = build_status_query(config);
    let state = PollState::new(config.polling_interval());
    info!(
        "Monitoring test execution, checking status every {}s",
        state.interval.as_secs()
    );

    poll_until_done(api, &query, state).await
}

/// Poll the status endpoint until a terminal code or the attempt budget runs out.
pub(crate) async fn poll_until_done(
    api: &dyn TestRigorApi,
    query: &StatusQuery,
    mut state: PollState,
) -> Result<RunOutcome, RunError> {
    while state.has_budget() {
        if state.should_wait() {
            tokio::time::sleep(state.interval).await;
        }
        state.attempt += 1;
        debug!(
            attempt = state.attempt,
            interval_secs = state.interval.as_secs(),
            "Polling status"
        );

        let result = match api.status(query).await {
            Ok(result) => result,
            Err(e) if e.is_server_error() => {
                log_retry(&e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        info!("Status: {} ({})", status_label(result.code), result.code);
        if let Some(kind) = result.failure {
            warn!(?kind, body = %result.body, "API error: {}", result.code);
        }

        if !StatusCategory::from_code(result.code).is_terminal() {
            log_progress(&result.body);
        }

        match decide(result) {
            Decision::KeepPolling => {}
            Decision::Finish(outcome) => {
                log_terminal(&outcome);
                return Ok(outcome);
            }
        }
    }

    error!("Test execution timed out");
    Ok(RunOutcome::TimedOut {
        waited: state.budget(),
    })
}

fn log_retry(e: &ApiError) {
    warn!("Error checking test status: {}", e);
    warn!("Server error, will retry...");
}

fn log_progress(body: &Value) {
    if let Some(results) = OverallResults::from_body(body) {
        info!(
            "Tests are still running: {} passed, {} failed, {} running, {} queued ({} total)",
            results.passed, results.failed, results.in_progress, results.in_queue, results.total
        );
    } else if let Some(progress) = body.get("progress") {
        info!("Tests are still running, progress: {}", progress);
    } else {
        info!("Tests are still running...");
    }
}

fn log_terminal(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Passed { body } => {
            info!("Tests completed successfully");
            if !body.is_null() {
                info!(results = %body, "Final results");
            }
        }
        RunOutcome::Failed { body } => {
            error!("Tests failed");
            if !body.is_null() {
                error!(details = %body, "Failure details");
            }
            if let Some(url) = details_url(body) {
                info!("View full report: {}", url);
            }
        }
        RunOutcome::Canceled { body } => {
            error!("Test execution was canceled");
            if !body.is_null() {
                error!(details = %body, "Cancel details");
            }
        }
        RunOutcome::Errored { message } => warn!("{}", message),
        RunOutcome::Triggered { .. } | RunOutcome::TimedOut { .. } => {}
    }
}

fn log_config(config: &RunConfig) {
    info!(
        suite_id = config.suite_id().unwrap_or_default(),
        wait_for_results = config.wait_for_results,
        polling_interval_secs = config.polling_interval,
        "Configuration"
    );
    if let Some(branch) = config.branch_name() {
        info!("Branch: {}", branch);
    }
    if let Some(commit) = config.commit_hash() {
        info!("Commit: {}", commit);
    }
    if let Some(labels) = config.labels() {
        info!("Labels: {}", labels);
    }
    if let Some(name) = config.custom_name() {
        info!("Custom name: {}", name);
    }
}
