use colored::Colorize;
use std::fmt;
use std::process;

use fluree_graph_split::SplitError;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the split library.
    Split(SplitError),
    /// A fragment failed while running a whole file.
    Fragment { index: usize, source: SplitError },
    /// Configuration file issues.
    Config(String),
    /// Bad file path or unreadable input.
    Input(String),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Split(SplitError::PrefixScan { .. } | SplitError::Malformed { .. }) => write!(
                f,
                "{} {}\n  {} the file's prefix declarations could not be read; every fragment depends on them",
                "error:".red().bold(),
                self.inner(),
                "help:".cyan().bold(),
            ),
            CliError::Split(SplitError::BoundaryNotFound { .. }) => write!(
                f,
                "{} {}\n  {} raise max_boundary_scan_bytes in the config if the file has very large statements",
                "error:".red().bold(),
                self.inner(),
                "help:".cyan().bold(),
            ),
            CliError::Split(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Fragment { index, source } => {
                write!(f, "{} fragment {index}: {source}", "error:".red().bold())
            }
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl CliError {
    fn inner(&self) -> String {
        match self {
            CliError::Split(e) => e.to_string(),
            CliError::Fragment { source, .. } => source.to_string(),
            CliError::Config(msg) | CliError::Input(msg) | CliError::Usage(msg) => msg.clone(),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<SplitError> for CliError {
    fn from(e: SplitError) -> Self {
        match e {
            SplitError::Config(msg) => CliError::Config(msg),
            SplitError::UnsupportedRecord { .. } | SplitError::InvalidRange { .. } => {
                CliError::Usage(e.to_string())
            }
            other => CliError::Split(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON encode error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
