//! Many readers of one file on worker threads, sharing one job.

use std::io::Write;
use std::sync::Arc;

use fluree_graph_ir::Statement;
use fluree_graph_split::{plan_ranges, FormatKind, RecordKind, SplitJob};
use fluree_graph_turtle::{parse_statements, Syntax};
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn doc() -> String {
    let mut s = String::from(
        "@prefix ex: <http://ex.org/> .\n@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\n",
    );
    for i in 0..2000 {
        s.push_str(&format!(
            "ex:p{i} a foaf:Person ;\n    foaf:name \"Person. {i}\" ;\n    foaf:knows [ foaf:name \"Friend {i}\" ] .\n"
        ));
    }
    s
}

#[test]
fn workers_share_one_table() {
    let text = doc();
    let f = write_temp(&text);
    let job = SplitJob::default();
    let ranges = plan_ranges(text.len() as u64, 16);

    let mut parts: Vec<(usize, Vec<Statement>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| {
                let job = job.clone();
                let path = f.path().to_path_buf();
                scope.spawn(move || {
                    let mut reader = job
                        .reader(&path, FormatKind::Turtle, RecordKind::Triple)
                        .unwrap();
                    let mut out = Vec::new();
                    let mut more = reader.initialize(range).unwrap();
                    while more {
                        let (_, record) = reader.current().unwrap();
                        out.extend(record.statements().iter().cloned());
                        more = reader.advance().unwrap();
                    }
                    (i, out)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(job.cache().len(), 1);
    let table = job.cache().get(f.path()).unwrap();
    assert_eq!(table.len(), 2);

    parts.sort_by_key(|(i, _)| *i);
    let got: Vec<_> = parts.into_iter().flat_map(|(_, s)| s).collect();
    let whole: Vec<_> = parse_statements(&text, Syntax::Turtle)
        .unwrap()
        .into_iter()
        .map(|s| s.value)
        .collect();
    assert_eq!(got.len(), 8000);
    assert_eq!(got, whole);
}

#[test]
fn concurrent_builds_return_the_same_table() {
    let text = doc();
    let f = write_temp(&text);
    let job = SplitJob::default();

    let tables: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let job = &job;
                let path = f.path();
                scope.spawn(move || job.prefix_table(path, FormatKind::Turtle).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(job.cache().len(), 1);
}
