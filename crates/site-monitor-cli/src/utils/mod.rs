//! Shared helpers for the CLI binary.

mod logging;

pub use logging::initialize_logging;
