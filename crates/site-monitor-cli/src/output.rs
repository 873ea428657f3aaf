//! Run report rendering.
//!
//! Text output is for people reading cron mail; JSON output is a single pretty
//! printed object for scripts. Only the report goes to stdout; diagnostics go
//! through `tracing` to stderr.

use anyhow::{Context, Result};
use colored::Colorize;
use site_monitor_core::{Outcome, RunReport};
use std::fmt::Write as _;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Text,
    /// Single JSON object
    Json,
}

impl OutputFormat {
    /// Whether this format is meant for programs rather than people
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a run report in the requested format
///
/// # Errors
///
/// Returns an error if the report cannot be serialized to JSON.
pub fn render(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => report
            .to_json_pretty()
            .context("Failed to serialize run report"),
    }
}

fn render_text(report: &RunReport) -> String {
    let label = match report.outcome {
        Outcome::New => "new".green().bold(),
        Outcome::Changed => "changed".yellow().bold(),
        Outcome::Unchanged => "no change".dimmed(),
    };

    let mut out = format!("{label}: {} (version {})", report.url, report.version);
    if let Some(path) = &report.snapshot_path {
        let _ = write!(out, "\n  saved {}", path.display());
    }

    for record in &report.notifications {
        let status = if record.delivered {
            "sent".green()
        } else {
            "failed".red()
        };
        let _ = write!(
            out,
            "\n  {} alert to {}: {status}",
            record.channel, record.destination
        );
        if let Some(error) = &record.error {
            let _ = write!(out, " ({error})");
        }
    }

    out
}
