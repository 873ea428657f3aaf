//! # CLI Structure and Argument Parsing
//!
//! `site-monitor` is meant to be run from cron: one invocation checks one URL
//! and exits. The interface is flat, with no subcommands.
//!
//! ```bash
//! site-monitor --url https://example.com/status
//! site-monitor --url https://example.com --dir /var/lib/site-monitor --phone 5551234567
//! site-monitor --url https://example.com --email ops@example.com --format json
//! ```
//!
//! Exit codes are documented in [`crate::error`].

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Default snapshot directory
pub const DEFAULT_HISTORY_DIR: &str = "./history";

/// Command-line interface for `site-monitor`
#[derive(Parser, Clone, Debug)]
#[command(name = "site-monitor")]
#[command(version)]
#[command(
    about = "Check a web page for changes since the last run and send an alert when it changed",
    long_about = None
)]
pub struct Cli {
    /// Page to watch for changes
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// Folder that stores page versions
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HISTORY_DIR)]
    pub dir: PathBuf,

    /// Phone number for text alerts (10-digit numbers get a +1 prefix)
    #[arg(long, value_name = "NUMBER")]
    pub phone: Option<String>,

    /// Email address for email alerts
    #[arg(long, value_name = "ADDRESS")]
    pub email: Option<String>,

    /// Path to the credentials file (overrides autodiscovery). Also via `SITE_MONITOR_CONFIG`.
    #[arg(long, value_name = "FILE", env = "SITE_MONITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for the run report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Show debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress warnings (only show errors)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color")]
    pub no_color: bool,
}
