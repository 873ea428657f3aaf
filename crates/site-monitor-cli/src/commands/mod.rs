//! Command implementations for the site-monitor CLI

mod run;

pub use run::execute as run_monitor;
