use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Config file used when neither `--config` nor `RIGOR_CONFIG` is set.
const DEFAULT_CONFIG_FILE: &str = "rigor.toml";

#[derive(Debug, Parser)]
#[command(
    name = "rigor-trigger",
    version,
    about = "Trigger testRigor test runs and wait for their outcome"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Trigger the suite and, unless disabled, wait for the result
    Run,
    /// Cancel a run in progress
    Cancel {
        /// Identifier of the run to cancel
        run_id: String,
    },
    /// List the suite's test cases
    TestCases {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
}

impl Cli {
    /// `--config`, then `RIGOR_CONFIG`, then `rigor.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var("RIGOR_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
