mod cli;
mod host;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rigor_core::{load_config, run, Config, TestRigorApi, TestRigorClient, ValidationError};

use cli::{Cli, Command};
use host::ConsoleHost;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command. `Ok(false)` means the command ran but failed.
async fn execute(cli: &Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    match cli.command() {
        Command::Run => {
            let host = ConsoleHost::new();
            let outcome = run(&config, &host).await;
            Ok(outcome.is_success() && !host.failed())
        }
        Command::Cancel { run_id } => {
            let client = client_for(&config)?;
            let response = client
                .cancel(&run_id)
                .await
                .with_context(|| format!("Failed to cancel run {}", run_id))?;
            print_json(&response)?;
            Ok(true)
        }
        Command::TestCases { page, size } => {
            let client = client_for(&config)?;
            let response = client
                .list_test_cases(page, size)
                .await
                .context("Failed to list test cases")?;
            print_json(&response)?;
            Ok(true)
        }
    }
}

/// Client for the configured suite; token and suite id are required.
fn client_for(config: &Config) -> Result<TestRigorClient> {
    let token = config.run.token().ok_or(ValidationError::MissingToken)?;
    let suite_id = config.run.suite_id().ok_or(ValidationError::MissingSuiteId)?;
    Ok(TestRigorClient::new(&config.api, token, suite_id)?)
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render response")?;
    println!("{}", rendered);
    Ok(())
}
