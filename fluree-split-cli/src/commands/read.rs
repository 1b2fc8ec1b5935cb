use crate::cli::RecordOutput;
use crate::context::InputContext;
use crate::error::CliResult;
use crate::output;
use fluree_graph_split::RecordKind;
use std::io::Write;

pub fn run(
    ctx: &InputContext,
    start: u64,
    end: Option<u64>,
    record: RecordKind,
    format: RecordOutput,
) -> CliResult<()> {
    let end = match end {
        Some(end) => end,
        None => std::fs::metadata(&ctx.path)?.len(),
    };

    let mut reader = ctx.job.reader(&ctx.path, ctx.format, record)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut more = reader.initialize(start..end)?;
    while more {
        if let Some((key, rec)) = reader.current() {
            match format {
                RecordOutput::Nquads => writeln!(out, "{rec}")?,
                RecordOutput::Json => writeln!(out, "{}", output::record_json(key, rec)?)?,
            }
        }
        more = reader.advance()?;
    }

    tracing::info!(
        path = %ctx.path.display(),
        requested = ?(start..end),
        adjusted = ?reader.adjusted_range(),
        records = reader.records_read(),
        "range read"
    );
    reader.close();
    Ok(())
}
