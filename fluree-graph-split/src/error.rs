//! Error types for fragment splitting and record reading.

use std::io;
use std::ops::Range;
use std::path::PathBuf;

use fluree_graph_turtle::TurtleError;

use crate::format::{FormatKind, RecordKind};

/// Outcome of a boundary scan that did not produce an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// No accepted boundary in the scanned direction.
    #[error("no statement boundary found")]
    NotFound,

    /// The buffer ended before a candidate could be decided. `at` is the
    /// buffer position where more input was needed.
    #[error("buffer exhausted at position {at} before a boundary was decided")]
    NeedMore { at: usize },
}

/// Errors raised while planning, assembling or reading fragments.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "no statement boundary found in {path} within {window} bytes of offset {offset}; \
         possible unterminated statement or oversized graph block"
    )]
    BoundaryNotFound {
        path: PathBuf,
        offset: u64,
        window: u64,
    },

    /// Structurally broken input detected outside the parser.
    #[error("malformed input in {path} at byte offset {offset}: {message}")]
    Malformed {
        path: PathBuf,
        offset: u64,
        message: String,
    },

    #[error("prefix scan of {path} failed: {source}")]
    PrefixScan {
        path: PathBuf,
        #[source]
        source: TurtleError,
    },

    #[error("{path} bytes {}..{} are not valid UTF-8", range.start, range.end)]
    InvalidUtf8 { path: PathBuf, range: Range<u64> },

    #[error("syntax error in {path} (fragment bytes {}..{}): {source}", range.start, range.end)]
    Syntax {
        path: PathBuf,
        range: Range<u64>,
        #[source]
        source: TurtleError,
    },

    #[error("{format} does not produce {record} records")]
    UnsupportedRecord {
        format: FormatKind,
        record: RecordKind,
    },

    #[error("invalid byte range {}..{}: {reason}", range.start, range.end)]
    InvalidRange { range: Range<u64>, reason: String },

    #[error("reader is {state}; cannot {operation}")]
    ReaderState {
        state: &'static str,
        operation: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;

impl SplitError {
    pub(crate) fn invalid_range(range: Range<u64>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            range,
            reason: reason.into(),
        }
    }

    /// True for errors that only affect one fragment.
    pub fn is_fragment_error(&self) -> bool {
        matches!(
            self,
            Self::BoundaryNotFound { .. } | Self::Syntax { .. } | Self::InvalidUtf8 { .. }
        )
    }
}
