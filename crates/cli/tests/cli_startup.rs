use std::io::Write;
use std::path::Path;
use std::process::Output;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write a temp config file
fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Config pointing both API hosts at the mock server
fn server_config(server: &MockServer, run_section: &str) -> String {
    format!(
        r#"
[api]
base_url = "{uri}/api/v1"
cancel_base_url = "{uri}/api2/v1"

[run]
{run_section}
"#,
        uri = server.uri(),
        run_section = run_section
    )
}

/// Run the binary to completion
async fn run_cli(config_path: &Path, args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_rigor-trigger"))
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .env_remove("RIGOR_CONFIG")
        .kill_on_drop(true)
        .output()
        .await
        .expect("Failed to run rigor-trigger")
}

#[tokio::test]
async fn test_missing_config_file_fails() {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_rigor-trigger"))
        .args(["--config", "/nonexistent/rigor.toml"])
        .env("RUST_LOG", "error")
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_missing_token_fails_without_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = write_config(&server_config(&server, r#"testSuiteId = "suite-1""#));
    let output = run_cli(config.path(), &["run"]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("authenticationToken is required"));
}

#[tokio::test]
async fn test_run_without_waiting_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/suite-1/retest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "run-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = write_config(&server_config(
        &server,
        r#"
authenticationToken = "token"
testSuiteId = "suite-1"
waitForResults = false
"#,
    ));
    // No subcommand means `run`
    let output = run_cli(config.path(), &[]).await;

    assert_eq!(output.status.code(), Some(0));
}

#[tokio::test]
async fn test_failed_suite_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/suite-1/retest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/apps/suite-1/status"))
        .respond_with(ResponseTemplate::new(230))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&server_config(
        &server,
        r#"
authenticationToken = "token"
testSuiteId = "suite-1"
"#,
    ));
    let output = run_cli(config.path(), &["run"]).await;

    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_cancel_prints_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api2/v1/apps/suite-1/runs/run-7/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "canceled" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&server_config(
        &server,
        r#"
authenticationToken = "token"
testSuiteId = "suite-1"
"#,
    ));
    let output = run_cli(config.path(), &["cancel", "run-7"]).await;

    assert_eq!(output.status.code(), Some(0));
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({ "status": "canceled" }));
}

#[tokio::test]
async fn test_test_cases_passes_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/v1/apps/suite-1/test_cases"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&server_config(
        &server,
        r#"
authenticationToken = "token"
testSuiteId = "suite-1"
"#,
    ));
    let output = run_cli(config.path(), &["test-cases", "--page", "1", "--size", "5"]).await;

    assert_eq!(output.status.code(), Some(0));
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({ "data": [] }));
}

#[tokio::test]
async fn test_cancel_requires_token() {
    let config = write_config(
        r#"
[run]
testSuiteId = "suite-1"
"#,
    );
    let output = run_cli(config.path(), &["cancel", "run-7"]).await;

    assert_eq!(output.status.code(), Some(1));
}
