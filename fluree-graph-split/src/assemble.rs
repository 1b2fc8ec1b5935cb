//! Fragment assembly.
//!
//! A fragment is the serialized prefix table (the bindings in force at the
//! start of the adjusted range) followed by the raw bytes of that range. It parses on its own, and positions inside it map
//! back to file offsets through its [`PositionOrigin`].

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fluree_graph_turtle::PositionOrigin;

use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::format::FormatRules;
use crate::prefix::PrefixTable;
use crate::range::BoundaryResolver;
use crate::source::ByteSource;

/// A self-contained buffer for one range of a file.
#[derive(Clone, Debug)]
pub struct Fragment {
    path: PathBuf,
    requested: Range<u64>,
    adjusted: Range<u64>,
    header_len: usize,
    /// Header followed by the body
    text: Arc<str>,
}

impl Fragment {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn requested(&self) -> Range<u64> {
        self.requested.clone()
    }

    /// File bytes covered by the body.
    pub fn adjusted(&self) -> Range<u64> {
        self.adjusted.clone()
    }

    /// No file bytes; nothing to parse.
    pub fn is_empty(&self) -> bool {
        self.adjusted.is_empty()
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn header(&self) -> &str {
        &self.text[..self.header_len]
    }

    pub fn body(&self) -> &str {
        &self.text[self.header_len..]
    }

    /// The whole buffer handed to the parser.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Maps buffer positions to file offsets.
    pub fn origin(&self) -> PositionOrigin {
        PositionOrigin::new(self.header_len, self.adjusted.start)
    }
}

/// Turns requested ranges of one file into fragments.
pub struct FragmentAssembler<'a> {
    source: &'a mut dyn ByteSource,
    rules: &'static FormatRules,
    config: &'a SplitConfig,
}

impl<'a> FragmentAssembler<'a> {
    pub fn new(
        source: &'a mut dyn ByteSource,
        rules: &'static FormatRules,
        config: &'a SplitConfig,
    ) -> Self {
        Self {
            source,
            rules,
            config,
        }
    }

    /// Assemble the fragment for `range`.
    ///
    /// The result depends only on the file, the range and the table.
    pub fn assemble(&mut self, range: Range<u64>, table: &PrefixTable) -> Result<Fragment> {
        let path = self.source.path().to_path_buf();
        let adjusted =
            BoundaryResolver::new(&mut *self.source, self.rules, table.data_start(), self.config)
                .adjust(range.clone())?;

        let header = table.header_at(adjusted.start);
        if adjusted.is_empty() {
            return Ok(Fragment {
                path,
                requested: range,
                adjusted,
                header_len: header.len(),
                text: Arc::from(&*header),
            });
        }

        let bytes = self.source.read_range(adjusted.clone())?;
        let body = std::str::from_utf8(&bytes).map_err(|e| SplitError::InvalidUtf8 {
            path: path.clone(),
            range: adjusted.start + e.valid_up_to() as u64..adjusted.end,
        })?;

        let mut text = String::with_capacity(header.len() + body.len());
        text.push_str(&header);
        text.push_str(body);

        Ok(Fragment {
            path,
            requested: range,
            adjusted,
            header_len: header.len(),
            text: Arc::from(text),
        })
    }
}

/// Assemble one fragment of `source`.
pub fn assemble(
    source: &mut dyn ByteSource,
    range: Range<u64>,
    table: &PrefixTable,
    rules: &'static FormatRules,
    config: &SplitConfig,
) -> Result<Fragment> {
    FragmentAssembler::new(source, rules, config).assemble(range, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefixScanMode;
    use crate::format::TURTLE;
    use crate::source::MemorySource;

    const DOC: &str = "\
@prefix ex: <http://ex.org/> .

ex:a ex:p \"one. two\" .
ex:b ex:p [ ex:q ex:r ] .
ex:c ex:p ex:d .
";

    fn setup() -> (MemorySource, PrefixTable) {
        let mut source = MemorySource::from_text("doc.ttl", DOC);
        let table =
            PrefixTable::build(&mut source, &TURTLE, 1 << 20, PrefixScanMode::Leading).unwrap();
        (source, table)
    }

    #[test]
    fn test_header_prepended() {
        let (mut source, table) = setup();
        let config = SplitConfig::default();
        let frag = assemble(&mut source, 0..DOC.len() as u64, &table, &TURTLE, &config).unwrap();
        assert_eq!(frag.header(), "@prefix ex: <http://ex.org/> .\n");
        assert!(frag.body().starts_with("ex:a"));
        assert!(frag.text().starts_with("@prefix ex: <http://ex.org/> .\nex:a"));
        assert_eq!(frag.adjusted(), table.data_start()..DOC.len() as u64);
        assert_eq!(frag.origin().to_file(frag.header_len()), table.data_start());
    }

    #[test]
    fn test_edges_move_to_boundaries() {
        let (mut source, table) = setup();
        let config = SplitConfig::default();
        let inside_string = DOC.find("one.").unwrap() as u64 + 4;
        let inside_block = DOC.find("ex:q").unwrap() as u64;

        let frag = assemble(&mut source, inside_string..inside_block, &table, &TURTLE, &config)
            .unwrap();
        assert_eq!(frag.body().trim(), "ex:b ex:p [ ex:q ex:r ] .");
    }

    #[test]
    fn test_empty_fragment() {
        let (mut source, table) = setup();
        let config = SplitConfig::default();
        let frag = assemble(&mut source, 0..5, &table, &TURTLE, &config).unwrap();
        assert!(frag.is_empty());
        assert_eq!(frag.body(), "");
    }

    #[test]
    fn test_deterministic() {
        let (mut source, table) = setup();
        let config = SplitConfig::default();
        let a = assemble(&mut source, 40..70, &table, &TURTLE, &config).unwrap();
        let b = assemble(&mut source, 40..70, &table, &TURTLE, &config).unwrap();
        assert_eq!(a.text(), b.text());
        assert_eq!(a.adjusted(), b.adjusted());
    }

    #[test]
    fn test_header_follows_redeclaration() {
        let doc = "\
@prefix ex: <http://one.org/> .
ex:a ex:p ex:b .
@prefix ex: <http://two.org/> .
ex:c ex:p ex:d .
";
        let mut source = MemorySource::from_text("redecl.ttl", doc);
        let table =
            PrefixTable::build(&mut source, &TURTLE, 1 << 20, PrefixScanMode::FullFile).unwrap();
        let config = SplitConfig::default();
        // Right after the redeclaration's terminator.
        let cut = doc.find("ex:c").unwrap() as u64 - 1;

        let first = assemble(&mut source, 0..cut, &table, &TURTLE, &config).unwrap();
        assert_eq!(first.header(), "@prefix ex: <http://one.org/> .\n");
        let second =
            assemble(&mut source, cut..doc.len() as u64, &table, &TURTLE, &config).unwrap();
        assert_eq!(second.header(), "@prefix ex: <http://two.org/> .\n");
        assert_eq!(second.body(), "\nex:c ex:p ex:d .\n");
    }

    #[test]
    fn test_invalid_utf8_reported() {
        let mut bytes = b"ex:a ex:p \"".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\" .\n");
        let mut source = MemorySource::new("bad.ttl", bytes);
        let config = SplitConfig::default();
        let err = assemble(&mut source, 0..4, &PrefixTable::empty(), &TURTLE, &config).unwrap_err();
        assert!(matches!(err, SplitError::InvalidUtf8 { .. }), "{err}");
    }
}
