use crate::cli::RecordArg;
use crate::error::{CliError, CliResult};
use fluree_graph_split::{FormatKind, RecordKind};
use std::path::Path;

/// Detect the data format of `path`.
///
/// Priority: explicit `--format` flag > file extension.
pub fn detect_format(path: &Path, explicit: Option<FormatKind>) -> CliResult<FormatKind> {
    if let Some(format) = explicit {
        return Ok(format);
    }

    path.extension()
        .and_then(|e| e.to_str())
        .and_then(FormatKind::from_extension)
        .ok_or_else(|| {
            CliError::Usage(format!(
                "could not detect the format of '{}'\n  {} use --format turtle or --format trig",
                path.display(),
                colored::Colorize::bold(colored::Colorize::cyan("help:"))
            ))
        })
}

/// The record kind to read: the explicit flag, or the format's first kind.
pub fn record_kind(format: FormatKind, explicit: Option<RecordArg>) -> CliResult<RecordKind> {
    let record = match explicit {
        Some(arg) => RecordKind::from(arg),
        None => format.rules().records[0],
    };
    if !format.rules().supports(record) {
        let supported = format
            .rules()
            .records
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::Usage(format!(
            "{format} files do not produce {record} records\n  {} supported: {supported}",
            colored::Colorize::bold(colored::Colorize::cyan("help:"))
        )));
    }
    Ok(record)
}
