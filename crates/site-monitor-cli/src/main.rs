//! site-monitor CLI - notice when a web page changes
//!
//! Intended to be run from cron. Each invocation fetches one URL, compares it
//! with the newest stored version and sends alerts when it changed. The exit
//! code tells the caller what kind of failure occurred, if any.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use cli::Cli;
use error::{CliError, ErrorCategory};
use utils::initialize_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = initialize_logging(&cli) {
        eprintln!("Error: {e:#}");
        return ErrorCategory::Internal.as_exit_code();
    }

    match execute(&cli).await {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            err.as_exit_code()
        },
    }
}

async fn execute(cli: &Cli) -> Result<String, CliError> {
    let report = commands::run_monitor(cli).await?;
    output::render(&report, cli.format).map_err(CliError::internal)
}
