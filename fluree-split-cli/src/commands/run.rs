use crate::cli::RunOutput;
use crate::context::InputContext;
use crate::error::{CliError, CliResult};
use crate::output::{self, FragmentSummary};
use fluree_graph_split::{plan_ranges, FormatKind, RecordKind, SplitError, SplitJob};
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

struct FragmentOutput {
    summary: FragmentSummary,
    lines: Vec<String>,
}

/// Read one requested range to the end with its own reader.
fn read_fragment(
    job: &SplitJob,
    path: &Path,
    format: FormatKind,
    record: RecordKind,
    index: usize,
    range: Range<u64>,
    keep_statements: bool,
) -> Result<FragmentOutput, SplitError> {
    let mut reader = job.reader(path, format, record)?;
    let mut summary = FragmentSummary {
        index,
        requested: range.clone(),
        adjusted: None,
        records: 0,
        statements: 0,
    };
    let mut lines = Vec::new();

    let mut more = reader.initialize(range)?;
    summary.adjusted = reader.adjusted_range();
    while more {
        if let Some((_, rec)) = reader.current() {
            summary.statements += rec.statements().len() as u64;
            if keep_statements {
                lines.extend(rec.statements().iter().map(|s| s.to_string()));
            }
        }
        more = reader.advance()?;
    }
    summary.records = reader.records_read();
    reader.close();

    Ok(FragmentOutput { summary, lines })
}

/// Split the file into `fragments` ranges and read them on `threads` workers.
pub fn run(
    ctx: &InputContext,
    fragments: usize,
    threads: Option<usize>,
    record: RecordKind,
    format: RunOutput,
) -> CliResult<()> {
    if fragments == 0 {
        return Err(CliError::Usage("--fragments must be at least 1".into()));
    }
    if threads == Some(0) {
        return Err(CliError::Usage("--threads must be at least 1".into()));
    }

    let started = Instant::now();
    let len = std::fs::metadata(&ctx.path)?.len();
    let ranges = plan_ranges(len, fragments);
    let threads = threads
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .min(ranges.len())
        .max(1);
    let keep_statements = format == RunOutput::Nquads;

    tracing::info!(
        path = %ctx.path.display(),
        file_size = len,
        fragments = ranges.len(),
        threads,
        %record,
        "starting parallel read"
    );

    // Workers claim ranges in order from a shared counter.
    let next = AtomicUsize::new(0);
    let mut results: Vec<(usize, Result<FragmentOutput, SplitError>)> =
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(range) = ranges.get(index) else {
                                break;
                            };
                            let result = read_fragment(
                                &ctx.job,
                                &ctx.path,
                                ctx.format,
                                record,
                                index,
                                range.clone(),
                                keep_statements,
                            );
                            if let Err(e) = &result {
                                tracing::error!(fragment = index, error = %e, "fragment failed");
                            }
                            done.push((index, result));
                        }
                        done
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });
    results.sort_by_key(|(index, _)| *index);

    let mut outputs = Vec::with_capacity(results.len());
    for (index, result) in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(source) => return Err(CliError::Fragment { index, source }),
        }
    }

    let summaries: Vec<FragmentSummary> = outputs.iter().map(|o| o.summary.clone()).collect();
    tracing::info!(
        path = %ctx.path.display(),
        statements = summaries.iter().map(|s| s.statements).sum::<u64>(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "parallel read complete"
    );

    match format {
        RunOutput::Summary => println!("{}", output::run_summary(&summaries)),
        RunOutput::Nquads => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in outputs.iter().flat_map(|o| &o.lines) {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
