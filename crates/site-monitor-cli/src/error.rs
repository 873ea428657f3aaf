//! CLI error handling with semantic exit codes.
//!
//! Each failure class maps to its own exit code so cron wrappers and scripts
//! can tell a broken network from a broken disk.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | New, changed or unchanged (alert failures included) |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Missing or invalid arguments |
//! | 3 | `Storage` | Snapshot directory or file could not be used |
//! | 4 | `Network` | The page could not be fetched |
//! | 5 | `Config` | Unreadable config or missing provider credentials |
//!
//! ```bash
//! site-monitor --url https://example.com
//! case $? in
//!     0) ;;
//!     4) echo "site unreachable" ;;
//!     *) echo "monitor broken" ;;
//! esac
//! ```

use site_monitor_core::Error as CoreError;
use std::fmt;
use std::process::ExitCode;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments (exit code 2).
    ///
    /// Matches the exit code clap uses for its own parse failures, such as a
    /// missing `--url`.
    Usage = 2,

    /// Snapshot storage failure (exit code 3).
    Storage = 3,

    /// Fetch failure (exit code 4).
    Network = 4,

    /// Configuration or credentials problem (exit code 5).
    Config = 5,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Create an `ExitCode` from this category.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::Storage => "storage error",
            Self::Network => "network error",
            Self::Config => "configuration error",
        }
    }

    /// Category for a core library error, decided by variant.
    #[must_use]
    pub const fn from_core(err: &CoreError) -> Self {
        match err {
            CoreError::InvalidUrl(_) => Self::Usage,
            CoreError::Io(_) | CoreError::Storage(_) => Self::Storage,
            CoreError::Network(_) | CoreError::NotFound(_) | CoreError::UnexpectedStatus(_) => {
                Self::Network
            },
            CoreError::Config(_) => Self::Config,
            CoreError::Notify(_) | CoreError::Serialization(_) => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so context added along the way is preserved.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Internal, source)
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Create an `ExitCode` from this error.
    #[must_use]
    pub fn as_exit_code(&self) -> ExitCode {
        self.category.as_exit_code()
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
