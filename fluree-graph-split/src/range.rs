//! Range planning and boundary alignment.
//!
//! A requested range `[start, end)` is an arbitrary byte range handed out by
//! the framework. Both of its edges are moved onto statement boundaries with
//! the same function, [`BoundaryResolver::align`]:
//!
//! - an offset at or before the data start aligns to the data start,
//! - an offset at or past the end of the file aligns to the end,
//! - anything else aligns to the first accepted boundary at or after it,
//!   or to the end of the file if there is none.
//!
//! Since `align` is monotone and deterministic, adjacent requested ranges
//! become adjacent adjusted ranges, and every data byte lands in exactly one.

use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::SplitConfig;
use crate::error::{Result, ScanError, SplitError};
use crate::format::FormatRules;
use crate::prefix::PrefixTable;
use crate::scan::{BoundaryScanner, Direction, LINE_LOOKBEHIND};
use crate::source::ByteSource;

/// Split `[0, len)` into `n` contiguous ranges of near-equal size.
///
/// Fewer ranges are returned when the file has fewer than `n` bytes; an
/// empty file yields none.
pub fn plan_ranges(len: u64, n: usize) -> Vec<Range<u64>> {
    if len == 0 || n == 0 {
        return Vec::new();
    }
    let n = (n as u64).min(len);
    let base = len / n;
    let extra = len % n;
    let mut ranges = Vec::with_capacity(n as usize);
    let mut start = 0;
    for i in 0..n {
        let size = base + u64::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Moves offsets of one file onto statement boundaries.
pub struct BoundaryResolver<'a> {
    source: &'a mut dyn ByteSource,
    scanner: BoundaryScanner,
    data_start: u64,
    step: u64,
    max_scan: u64,
}

impl<'a> BoundaryResolver<'a> {
    pub fn new(
        source: &'a mut dyn ByteSource,
        rules: &'static FormatRules,
        data_start: u64,
        config: &SplitConfig,
    ) -> Self {
        // The probe has to fit in the window behind the candidate.
        let lookahead = config
            .probe_lookahead_bytes
            .min(config.max_boundary_scan_bytes as usize / 2);
        Self {
            source,
            scanner: BoundaryScanner::new(rules)
                .with_probe_statements(config.probe_statements)
                .with_lookahead(lookahead),
            data_start,
            step: config.read_buffer_bytes.max(1) as u64,
            max_scan: config.max_boundary_scan_bytes,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.source.path().to_path_buf()
    }

    /// The first statement boundary at or after `offset`.
    pub fn align(&mut self, offset: u64) -> Result<u64> {
        let len = self.source.len();
        if offset <= self.data_start {
            return Ok(self.data_start.min(len));
        }
        if offset >= len {
            return Ok(len);
        }

        // Room behind the offset for the candidate's neighbours and line.
        let window_start = offset.saturating_sub(LINE_LOOKBEHIND as u64 + 1);
        let from = (offset - window_start) as usize;
        let mut span = self.step.min(self.max_scan);
        let mut buf = Vec::new();
        let mut read_to = window_start;
        loop {
            let window_end = (offset + span).min(len);
            let at_eof = window_end == len;
            buf.extend(self.source.read_range(read_to..window_end)?);
            read_to = window_end;

            match self
                .scanner
                .find_boundary(&buf, from, Direction::Forward, at_eof)
            {
                Ok(pos) => {
                    let resolved = window_start + pos as u64;
                    tracing::debug!(
                        path = %self.source.path().display(),
                        requested = offset,
                        resolved,
                        window = span,
                        "aligned range edge"
                    );
                    return Ok(resolved);
                }
                Err(ScanError::NotFound) => {
                    tracing::debug!(
                        path = %self.source.path().display(),
                        requested = offset,
                        "no boundary before end of file"
                    );
                    return Ok(len);
                }
                Err(ScanError::NeedMore { .. }) => {
                    if span >= self.max_scan {
                        return Err(SplitError::BoundaryNotFound {
                            path: self.path(),
                            offset,
                            window: self.max_scan,
                        });
                    }
                    span = (span * 2).min(self.max_scan);
                }
            }
        }
    }

    /// Align both edges of a requested range.
    pub fn adjust(&mut self, range: Range<u64>) -> Result<Range<u64>> {
        if range.start >= range.end {
            return Err(SplitError::invalid_range(range, "start must be before end"));
        }
        let start = self.align(range.start)?;
        let end = self.align(range.end)?;
        Ok(start..end.max(start))
    }
}

/// One entry of a [`FragmentPlan`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedFragment {
    pub index: usize,
    pub requested: Range<u64>,
    pub adjusted: Range<u64>,
}

impl PlannedFragment {
    pub fn is_empty(&self) -> bool {
        self.adjusted.is_empty()
    }

    pub fn len(&self) -> u64 {
        self.adjusted.end - self.adjusted.start
    }
}

/// Requested and adjusted ranges of every fragment of a file.
#[derive(Clone, Debug, Serialize)]
pub struct FragmentPlan {
    pub path: PathBuf,
    pub len: u64,
    pub data_start: u64,
    pub fragments: Vec<PlannedFragment>,
}

impl FragmentPlan {
    /// Plan `n` fragments of `source`.
    pub fn compute(
        source: &mut dyn ByteSource,
        rules: &'static FormatRules,
        table: &PrefixTable,
        n: usize,
        config: &SplitConfig,
    ) -> Result<Self> {
        let len = source.len();
        let path = source.path().to_path_buf();
        let requested = plan_ranges(len, n);

        let mut resolver = BoundaryResolver::new(source, rules, table.data_start(), config);
        // Each interior edge is shared by two neighbours; align it once.
        let mut edges = Vec::with_capacity(requested.len() + 1);
        for range in &requested {
            edges.push(resolver.align(range.start)?);
        }
        edges.push(len);

        let fragments = requested
            .into_iter()
            .enumerate()
            .map(|(index, requested)| PlannedFragment {
                index,
                requested,
                adjusted: edges[index]..edges[index + 1].max(edges[index]),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            path = %path.display(),
            fragments = fragments.len(),
            empty = fragments.iter().filter(|f| f.is_empty()).count(),
            "fragment plan computed"
        );

        Ok(Self {
            path,
            len,
            data_start: table.data_start(),
            fragments,
        })
    }

    /// Adjusted ranges of the non-empty fragments.
    pub fn ranges(&self) -> Vec<Range<u64>> {
        self.fragments
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| f.adjusted.clone())
            .collect()
    }
}
