//! Record reader: one per requested range.
//!
//! ```text
//! Uninitialized --initialize--> Positioned --advance--> ... --> Exhausted
//!        \                          |
//!         `---------------------> Error (any failure)
//! ```
//!
//! `initialize` builds (or fetches) the file's prefix table, assembles the
//! fragment and positions on its first record. `advance` moves to the next
//! record. A reader only reads its own fragment and the shared cache.

use std::fmt;
use std::iter::Peekable;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fluree_graph_ir::{Dataset, PositionKey, Statement};
use fluree_graph_turtle::TurtleError;

use crate::assemble::FragmentAssembler;
use crate::cache::PrefixTableCache;
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::format::{FormatKind, RecordKind};
use crate::parser::{StatementParser, StatementStream, TurtleStatementParser};
use crate::source::{ByteSource, FileSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    Uninitialized,
    Positioned,
    Exhausted,
    Error,
}

impl ReaderState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReaderState::Uninitialized => "uninitialized",
            ReaderState::Positioned => "positioned",
            ReaderState::Exhausted => "exhausted",
            ReaderState::Error => "failed",
        }
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value handed out by a reader.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Triple(Statement),
    Quad(Statement),
    /// Every quad of one top-level statement
    Dataset(Dataset),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Triple(_) => RecordKind::Triple,
            Record::Quad(_) => RecordKind::Quad,
            Record::Dataset(_) => RecordKind::Dataset,
        }
    }

    pub fn statements(&self) -> &[Statement] {
        match self {
            Record::Triple(s) | Record::Quad(s) => std::slice::from_ref(s),
            Record::Dataset(d) => d.statements(),
        }
    }

    pub fn into_statements(self) -> Vec<Statement> {
        match self {
            Record::Triple(s) | Record::Quad(s) => vec![s],
            Record::Dataset(d) => d.into_statements(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// Reads the records of one range of one file.
pub struct RecordReader {
    path: PathBuf,
    format: FormatKind,
    record: RecordKind,
    config: Arc<SplitConfig>,
    cache: Arc<PrefixTableCache>,
    parser: Arc<dyn StatementParser>,
    source: Option<Box<dyn ByteSource>>,
    state: ReaderState,
    adjusted: Option<Range<u64>>,
    stream: Option<Peekable<StatementStream>>,
    current: Option<(PositionKey, Record)>,
    records: u64,
}

impl RecordReader {
    /// A reader for `path` producing `record`s of `format`.
    pub fn new(
        path: impl Into<PathBuf>,
        format: FormatKind,
        record: RecordKind,
        config: Arc<SplitConfig>,
        cache: Arc<PrefixTableCache>,
    ) -> Result<Self> {
        let rules = format.rules();
        if !rules.supports(record) {
            return Err(SplitError::UnsupportedRecord { format, record });
        }
        Ok(Self {
            path: path.into(),
            format,
            record,
            config,
            cache,
            parser: Arc::new(TurtleStatementParser::new(rules.syntax())),
            source: None,
            state: ReaderState::Uninitialized,
            adjusted: None,
            stream: None,
            current: None,
            records: 0,
        })
    }

    /// Replace the parser.
    pub fn with_parser(mut self, parser: Arc<dyn StatementParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Read from `source` instead of opening the path.
    pub fn with_source(mut self, source: Box<dyn ByteSource>) -> Self {
        self.path = source.path().to_path_buf();
        self.source = Some(source);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn record_kind(&self) -> RecordKind {
        self.record
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The fragment's file range, once initialized.
    pub fn adjusted_range(&self) -> Option<Range<u64>> {
        self.adjusted.clone()
    }

    /// Records handed out so far.
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Assemble the fragment for `range` and position on its first record.
    ///
    /// Returns `false` if the fragment holds no records.
    pub fn initialize(&mut self, range: Range<u64>) -> Result<bool> {
        if self.state != ReaderState::Uninitialized {
            return Err(self.state_error("initialize"));
        }
        let result = self.open(range);
        self.settle(result)
    }

    fn open(&mut self, range: Range<u64>) -> Result<bool> {
        let rules = self.format.rules();
        let mut source = match self.source.take() {
            Some(source) => source,
            None => Box::new(FileSource::open(&self.path)?),
        };

        let table = self.cache.get_or_build(&mut *source, rules, &self.config)?;
        let fragment =
            FragmentAssembler::new(&mut *source, rules, &self.config).assemble(range, &table)?;
        self.adjusted = Some(fragment.adjusted());

        tracing::debug!(
            path = %self.path.display(),
            requested = ?fragment.requested(),
            adjusted = ?fragment.adjusted(),
            header_len = fragment.header_len(),
            "fragment assembled"
        );

        if fragment.is_empty() {
            tracing::info!(
                path = %self.path.display(),
                requested = ?fragment.requested(),
                "range holds no statements"
            );
            return Ok(false);
        }

        self.stream = Some(self.parser.parse(&fragment).peekable());
        self.pull()
    }

    /// Move to the next record. Returns `false` once the fragment is done.
    pub fn advance(&mut self) -> Result<bool> {
        match self.state {
            ReaderState::Positioned => {}
            ReaderState::Exhausted => return Ok(false),
            ReaderState::Uninitialized | ReaderState::Error => {
                return Err(self.state_error("advance"));
            }
        }
        let result = self.pull();
        self.settle(result)
    }

    /// The current record. `None` unless the reader is positioned.
    pub fn current(&self) -> Option<(PositionKey, &Record)> {
        match self.state {
            ReaderState::Positioned => self.current.as_ref().map(|(key, rec)| (*key, rec)),
            _ => None,
        }
    }

    /// Fraction of the fragment consumed, by file offset.
    pub fn progress(&self) -> f32 {
        match (self.state, &self.adjusted, &self.current) {
            (ReaderState::Exhausted, _, _) => 1.0,
            (ReaderState::Positioned, Some(range), Some((key, _))) if !range.is_empty() => {
                let done = key.offset.saturating_sub(range.start) as f64;
                (done / (range.end - range.start) as f64).min(1.0) as f32
            }
            _ => 0.0,
        }
    }

    /// Release the fragment. The reader reports exhaustion afterwards.
    pub fn close(&mut self) {
        self.stream = None;
        self.source = None;
        self.current = None;
        if self.state != ReaderState::Error {
            self.state = ReaderState::Exhausted;
        }
    }

    fn pull(&mut self) -> Result<bool> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(false);
        };
        let first = match stream.next() {
            None => return Ok(false),
            Some(Err(e)) => return Err(self.syntax_error(e)),
            Some(Ok(first)) => first,
        };

        let key = first.key;
        let record = match self.record {
            RecordKind::Triple => Record::Triple(first.value.into_triple()),
            RecordKind::Quad => Record::Quad(first.value),
            RecordKind::Dataset => {
                let mut dataset = Dataset::new();
                dataset.add(first.value);
                loop {
                    match stream.peek() {
                        Some(Ok(next)) if next.key.offset == key.offset => {}
                        _ => break,
                    }
                    if let Some(Ok(next)) = stream.next() {
                        dataset.add(next.value);
                    }
                }
                Record::Dataset(dataset)
            }
        };

        self.current = Some((key, record));
        self.records += 1;
        Ok(true)
    }

    fn settle(&mut self, result: Result<bool>) -> Result<bool> {
        match result {
            Ok(true) => {
                self.state = ReaderState::Positioned;
                Ok(true)
            }
            Ok(false) => {
                self.state = ReaderState::Exhausted;
                self.current = None;
                self.stream = None;
                Ok(false)
            }
            Err(e) => {
                self.state = ReaderState::Error;
                self.current = None;
                self.stream = None;
                Err(e)
            }
        }
    }

    fn syntax_error(&self, source: TurtleError) -> SplitError {
        let range = self.adjusted.clone().unwrap_or(0..0);
        tracing::error!(
            path = %self.path.display(),
            range = ?range,
            error = %source,
            "syntax error in fragment"
        );
        SplitError::Syntax {
            path: self.path.clone(),
            range,
            source,
        }
    }

    fn state_error(&self, operation: &'static str) -> SplitError {
        SplitError::ReaderState {
            state: self.state.as_str(),
            operation,
        }
    }
}

impl fmt::Debug for RecordReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordReader")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("record", &self.record)
            .field("state", &self.state)
            .field("adjusted", &self.adjusted)
            .field("records", &self.records)
            .finish()
    }
}
