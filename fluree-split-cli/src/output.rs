use crate::error::CliResult;
use comfy_table::{ContentArrangement, Table};
use fluree_graph_ir::PositionKey;
use fluree_graph_split::{Binding, FragmentPlan, PrefixTable, Record};
use serde::Serialize;
use std::ops::Range;

fn range_cell(range: &Range<u64>) -> String {
    format!("{}..{}", range.start, range.end)
}

pub fn prefix_table(table: &PrefixTable) -> String {
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["prefix", "namespace"]);
    if let Some(base) = table.base() {
        out.add_row(vec!["@base".to_string(), format!("<{base}>")]);
    }
    for (label, iri) in table.iter() {
        out.add_row(vec![format!("{label}:"), format!("<{iri}>")]);
    }
    for later in table.later() {
        let (name, iri) = match &later.binding {
            Binding::Prefix { label, iri } => (format!("{label}:"), iri),
            Binding::Base { iri } => ("@base".to_string(), iri),
        };
        out.add_row(vec![
            format!("{name} (from byte {})", later.offset),
            format!("<{iri}>"),
        ]);
    }

    let mut text = out.to_string();
    text.push_str(&format!("\ndata starts at byte {}", table.data_start()));
    if table.is_truncated() {
        text.push_str(&format!(
            "\nwarning: scan window of {} bytes ended inside the declarations",
            table.scanned_bytes()
        ));
    }
    text
}

pub fn plan(plan: &FragmentPlan) -> String {
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["#", "requested", "adjusted", "bytes"]);
    for f in &plan.fragments {
        out.add_row(vec![
            f.index.to_string(),
            range_cell(&f.requested),
            if f.is_empty() {
                "(empty)".to_string()
            } else {
                range_cell(&f.adjusted)
            },
            f.len().to_string(),
        ]);
    }
    format!(
        "{}\n{} bytes, data starts at byte {}",
        out,
        plan.len,
        plan.data_start
    )
}

/// One fragment's outcome in `run`.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentSummary {
    pub index: usize,
    pub requested: Range<u64>,
    pub adjusted: Option<Range<u64>>,
    pub records: u64,
    pub statements: u64,
}

pub fn run_summary(summaries: &[FragmentSummary]) -> String {
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["#", "requested", "adjusted", "records", "statements"]);
    for s in summaries {
        out.add_row(vec![
            s.index.to_string(),
            range_cell(&s.requested),
            match &s.adjusted {
                Some(r) if !r.is_empty() => range_cell(r),
                _ => "(empty)".to_string(),
            },
            s.records.to_string(),
            s.statements.to_string(),
        ]);
    }
    let records: u64 = summaries.iter().map(|s| s.records).sum();
    let statements: u64 = summaries.iter().map(|s| s.statements).sum();
    format!("{out}\ntotal: {records} records, {statements} statements")
}

#[derive(Serialize)]
struct RecordJson<'a> {
    offset: u64,
    index: u32,
    kind: &'a str,
    statements: Vec<String>,
}

/// One JSON object for one record.
pub fn record_json(key: PositionKey, record: &Record) -> CliResult<String> {
    let value = RecordJson {
        offset: key.offset,
        index: key.index,
        kind: record.kind().as_str(),
        statements: record.statements().iter().map(|s| s.to_string()).collect(),
    };
    Ok(serde_json::to_string(&value)?)
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
