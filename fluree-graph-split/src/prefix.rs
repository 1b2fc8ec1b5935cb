//! Prefix table extraction.
//!
//! Prefix and base declarations are global: a fragment that starts mid-file
//! can only expand `ex:foo` if the declarations from the file header travel
//! with it. The builder tokenizes a bounded leading window of the file with
//! the Turtle lexer, collects every `@prefix` / `@base` / `PREFIX` / `BASE`
//! directive until the first data token, and records where data begins.
//!
//! Prefix IRIs are stored resolved against the base in force at their
//! declaration, so the table never depends on declaration order.
//!
//! In full-file mode, declarations after the data start are kept with the
//! offset they take effect at. A fragment's header holds the bindings in
//! force where the fragment starts, so a label redeclared mid-file expands
//! the same way in a fragment as in a whole-file parse.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use fluree_graph_turtle::{resolve_iri, Lexer, Token, TokenKind};

use crate::config::PrefixScanMode;
use crate::error::{Result, SplitError};
use crate::format::FormatRules;
use crate::scan::{BoundaryScanner, Direction};
use crate::source::{ByteSource, FileSource};

/// Prefix and base declarations of one file.
///
/// Immutable once built and shared read-only between readers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrefixTable {
    /// label -> absolute namespace IRI, in declaration order
    prefixes: IndexMap<String, String>,
    base: Option<String>,
    /// File offset where data begins (after the leading declarations)
    data_start: u64,
    /// Bytes examined
    scanned: u64,
    /// The scan window ran out while still inside the declaration block
    truncated: bool,
    /// Declarations after the data start, in file order
    later: Vec<LaterDeclaration>,
    /// Leading declarations serialized as statements
    #[serde(skip)]
    header: String,
}

/// A declaration found after data begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LaterDeclaration {
    /// File offset right after the declaration; it is in force from here on
    pub offset: u64,
    pub binding: Binding,
}

/// A resolved prefix or base declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    Prefix { label: String, iri: String },
    Base { iri: String },
}

/// Directive being collected from the token stream.
enum Directive {
    Prefix { sparql: bool, label: Option<String>, iri: Option<String> },
    Base { sparql: bool, iri: Option<String> },
}

impl Directive {
    fn sparql(&self) -> bool {
        match self {
            Directive::Prefix { sparql, .. } | Directive::Base { sparql, .. } => *sparql,
        }
    }

    /// All parts present; only the terminator (if any) is missing.
    fn is_complete(&self) -> bool {
        match self {
            Directive::Prefix { label, iri, .. } => label.is_some() && iri.is_some(),
            Directive::Base { iri, .. } => iri.is_some(),
        }
    }
}

#[derive(Default)]
struct TableBuilder {
    prefixes: IndexMap<String, String>,
    base: Option<String>,
    /// Base in force at the scan position, for resolving later declarations
    current_base: Option<String>,
    later: Vec<LaterDeclaration>,
}

impl TableBuilder {
    /// Record a complete directive. `later` is the offset it ends at when it
    /// comes after the data start.
    fn finish(&mut self, directive: Directive, path: &Path, later: Option<usize>) -> Result<()> {
        let resolve = |iri: &str, base: Option<&str>| {
            resolve_iri(base, iri).map_err(|source| SplitError::PrefixScan {
                path: path.to_path_buf(),
                source,
            })
        };
        let binding = match directive {
            Directive::Prefix {
                label: Some(label),
                iri: Some(iri),
                ..
            } => Binding::Prefix {
                label,
                iri: resolve(&iri, self.current_base.as_deref())?,
            },
            Directive::Base { iri: Some(iri), .. } => {
                let iri = resolve(&iri, self.current_base.as_deref())?;
                self.current_base = Some(iri.clone());
                Binding::Base { iri }
            }
            _ => return Ok(()),
        };
        match later {
            Some(offset) => self.later.push(LaterDeclaration {
                offset: offset as u64,
                binding,
            }),
            None => apply(&mut self.prefixes, &mut self.base, binding),
        }
        Ok(())
    }
}

fn apply(prefixes: &mut IndexMap<String, String>, base: &mut Option<String>, binding: Binding) {
    match binding {
        Binding::Prefix { label, iri } => {
            prefixes.insert(label, iri);
        }
        Binding::Base { iri } => *base = Some(iri),
    }
}

impl PrefixTable {
    /// A table with no declarations; data starts at offset 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `source` for declarations.
    ///
    /// In [`PrefixScanMode::Leading`] only the first `max_scan` bytes are
    /// read and scanning stops at the first data token. If the window runs
    /// out first, the partial table is returned with
    /// [`is_truncated`](Self::is_truncated) set. In
    /// [`PrefixScanMode::FullFile`] the whole file is tokenized and every
    /// declaration is collected.
    pub fn build(
        source: &mut dyn ByteSource,
        rules: &'static FormatRules,
        max_scan: u64,
        mode: PrefixScanMode,
    ) -> Result<Self> {
        let path = source.path().to_path_buf();
        let len = source.len();
        let scan_len = match mode {
            PrefixScanMode::Leading => max_scan.min(len),
            PrefixScanMode::FullFile => len,
        };
        let bytes = source.read_range(0..scan_len)?;

        let valid = match std::str::from_utf8(&bytes) {
            Ok(_) => bytes.len(),
            Err(e) => e.valid_up_to(),
        };
        let windowed = (valid as u64) < len;
        let text_len = if windowed {
            safe_cut(&bytes[..valid], rules)
        } else {
            valid
        };
        let text = std::str::from_utf8(&bytes[..text_len]).unwrap_or_default();

        let mut builder = TableBuilder::default();
        let mut lexer = Lexer::new(text);
        let mut pending: Option<Directive> = None;
        let mut last_end: Option<usize> = None;
        let mut prev_end = 0usize;
        let mut in_header = true;

        loop {
            let token = match lexer.next_token() {
                Ok(token) => token,
                Err(source) => {
                    if pending.is_some() || (mode == PrefixScanMode::FullFile && !windowed) {
                        return Err(SplitError::PrefixScan { path, source });
                    }
                    // Data starts with something the lexer rejects; the
                    // fragment parse reports it.
                    in_header = false;
                    break;
                }
            };
            if token.is_eof() {
                break;
            }

            if let Some(directive) = pending.take() {
                match step_directive(directive, &token, &path)? {
                    Step::Continue(directive) => {
                        pending = Some(directive);
                        prev_end = token.end;
                        continue;
                    }
                    Step::Terminated(directive) => {
                        builder.finish(directive, &path, (!in_header).then_some(token.end))?;
                        if in_header {
                            last_end = Some(token.end);
                        }
                        prev_end = token.end;
                        continue;
                    }
                    Step::Ended(directive) => {
                        // SPARQL-style: `token` already belongs to what follows.
                        builder.finish(directive, &path, (!in_header).then_some(prev_end))?;
                        if in_header {
                            last_end = Some(prev_end);
                        }
                    }
                }
            }

            if !start_directive(&token, &mut pending) {
                in_header = false;
                if mode == PrefixScanMode::Leading {
                    break;
                }
            }
            prev_end = token.end;
        }

        let mut unfinished = false;
        if let Some(directive) = pending {
            if directive.sparql() && directive.is_complete() {
                builder.finish(directive, &path, (!in_header).then_some(prev_end))?;
                if in_header {
                    last_end = Some(prev_end);
                }
            } else if !windowed {
                return Err(SplitError::Malformed {
                    path,
                    offset: prev_end as u64,
                    message: "end of input inside a declaration".to_string(),
                });
            } else {
                unfinished = true;
            }
        }

        let truncated = in_header
            && windowed
            && (unfinished || declarations_may_follow(&bytes[text_len..valid]));
        let data_start = match last_end {
            Some(end) => {
                let skipped = text.as_bytes()[end..]
                    .iter()
                    .take_while(|b| b.is_ascii_whitespace())
                    .count();
                (end + skipped) as u64
            }
            None => 0,
        };

        let mut table = Self {
            prefixes: builder.prefixes,
            base: builder.base,
            data_start,
            scanned: text_len as u64,
            truncated,
            later: builder.later,
            header: String::new(),
        };
        table.header = serialize_header(table.base.as_deref(), &table.prefixes);

        if truncated {
            tracing::warn!(
                path = %path.display(),
                max_scan,
                prefixes = table.prefixes.len(),
                "prefix scan window exhausted inside the declaration block; \
                 later declarations will be missing from other fragments"
            );
        }
        tracing::info!(
            path = %path.display(),
            prefixes = table.prefixes.len(),
            base = table.base.as_deref().unwrap_or(""),
            later = table.later.len(),
            data_start,
            truncated,
            "prefix table built"
        );

        Ok(table)
    }

    /// Look up the namespace IRI of a leading prefix label (`""` is the
    /// default prefix).
    pub fn get(&self, label: &str) -> Option<&str> {
        self.prefixes.get(label).map(String::as_str)
    }

    /// Declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.base.is_none()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn data_start(&self) -> u64 {
        self.data_start
    }

    pub fn scanned_bytes(&self) -> u64 {
        self.scanned
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Declarations after the data start (full-file mode only).
    pub fn later(&self) -> &[LaterDeclaration] {
        &self.later
    }

    /// The leading declarations as Turtle statements, one per line.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The declarations in force at `offset`, as Turtle statements.
    pub fn header_at(&self, offset: u64) -> Cow<'_, str> {
        let in_force = self.later.partition_point(|d| d.offset <= offset);
        if in_force == 0 {
            return Cow::Borrowed(self.header.as_str());
        }
        let mut prefixes = self.prefixes.clone();
        let mut base = self.base.clone();
        for declaration in &self.later[..in_force] {
            apply(&mut prefixes, &mut base, declaration.binding.clone());
        }
        Cow::Owned(serialize_header(base.as_deref(), &prefixes))
    }
}

fn serialize_header(base: Option<&str>, prefixes: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    if let Some(base) = base {
        let _ = writeln!(out, "@base <{}> .", escape_iri(base));
    }
    for (label, iri) in prefixes {
        let _ = writeln!(out, "@prefix {label}: <{}> .", escape_iri(iri));
    }
    out
}

/// Build the table of the file at `path`, scanning its leading window.
pub fn build_prefix_table(
    path: &Path,
    rules: &'static FormatRules,
    max_scan: u64,
) -> Result<PrefixTable> {
    let mut source = FileSource::open(path)?;
    PrefixTable::build(&mut source, rules, max_scan, PrefixScanMode::Leading)
}

enum Step {
    Continue(Directive),
    /// `token` was the directive's terminator
    Terminated(Directive),
    /// Directive complete without a terminator; `token` is not part of it
    Ended(Directive),
}

/// Begin a directive if `token` is a directive keyword.
fn start_directive(token: &Token, pending: &mut Option<Directive>) -> bool {
    *pending = match token.kind {
        TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => Some(Directive::Prefix {
            sparql: token.kind == TokenKind::KwSparqlPrefix,
            label: None,
            iri: None,
        }),
        TokenKind::KwBase | TokenKind::KwSparqlBase => Some(Directive::Base {
            sparql: token.kind == TokenKind::KwSparqlBase,
            iri: None,
        }),
        _ => return false,
    };
    true
}

fn step_directive(directive: Directive, token: &Token, path: &Path) -> Result<Step> {
    let malformed = |message: String| SplitError::Malformed {
        path: path.to_path_buf(),
        offset: token.start as u64,
        message,
    };

    if directive.is_complete() {
        return match token.kind {
            TokenKind::Dot => Ok(Step::Terminated(directive)),
            _ if directive.sparql() => Ok(Step::Ended(directive)),
            ref other => Err(malformed(format!(
                "expected '.' after declaration, found {other}"
            ))),
        };
    }

    match (directive, &token.kind) {
        (
            Directive::Prefix {
                sparql,
                label: None,
                ..
            },
            TokenKind::PrefixedNameNs(label),
        ) => Ok(Step::Continue(Directive::Prefix {
            sparql,
            label: Some(label.to_string()),
            iri: None,
        })),
        (
            Directive::Prefix {
                sparql,
                label: Some(label),
                ..
            },
            TokenKind::Iri(iri),
        ) => Ok(Step::Continue(Directive::Prefix {
            sparql,
            label: Some(label),
            iri: Some(iri.to_string()),
        })),
        (Directive::Base { sparql, .. }, TokenKind::Iri(iri)) => {
            Ok(Step::Continue(Directive::Base {
                sparql,
                iri: Some(iri.to_string()),
            }))
        }
        (_, other) => Err(malformed(format!("unexpected {other} in declaration"))),
    }
}

/// Length of the part of a windowed header that is safe to tokenize.
///
/// The window may end mid-token. Cut at the later of the last statement
/// boundary and the last newline, whichever the window has.
fn safe_cut(bytes: &[u8], rules: &'static FormatRules) -> usize {
    let boundary = BoundaryScanner::new(rules)
        .find_boundary(bytes, bytes.len(), Direction::Backward, false)
        .ok();
    let newline = bytes.iter().rposition(|&b| b == b'\n').map(|pos| pos + 1);
    match boundary.max(newline) {
        Some(cut) => cut,
        None => bytes.len(),
    }
}

/// Could the bytes after the tokenized part of the window still be
/// declarations? Comments and whitespace are skipped; a keyword cut short by
/// the window counts.
fn declarations_may_follow(rest: &[u8]) -> bool {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'#' => {
                while i < rest.len() && rest[i] != b'\n' {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    let rest = &rest[i..];
    if rest.is_empty() {
        return true;
    }
    ["@prefix", "@base", "prefix", "base"].iter().any(|kw| {
        let n = rest.len().min(kw.len());
        rest[..n].eq_ignore_ascii_case(&kw.as_bytes()[..n])
    })
}

/// Escape characters that may not appear raw inside `<...>`.
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\u{0}'..='\u{20}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{TRIG, TURTLE};
    use crate::source::MemorySource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn after(doc: &str, needle: &str) -> u64 {
        (doc.find(needle).unwrap() + needle.len()) as u64
    }

    fn table(doc: &str, max_scan: u64) -> PrefixTable {
        let mut source = MemorySource::from_text("test.ttl", doc);
        PrefixTable::build(&mut source, &TURTLE, max_scan, PrefixScanMode::Leading).unwrap()
    }

    #[test]
    fn test_prefix_extraction_basic() {
        let ttl = "\
@prefix ex: <http://example.org/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

ex:alice foaf:name \"Alice\" .
";
        let f = write_temp(ttl);
        let t = build_prefix_table(f.path(), &TURTLE, 1024 * 1024).unwrap();
        assert_eq!(t.get("ex"), Some("http://example.org/"));
        assert_eq!(t.get("foaf"), Some("http://xmlns.com/foaf/0.1/"));
        assert_eq!(&ttl[t.data_start() as usize..][..8], "ex:alice");
        assert!(!t.is_truncated());
        assert_eq!(
            t.header(),
            "@prefix ex: <http://example.org/> .\n@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n"
        );
    }

    #[test]
    fn test_sparql_style_and_base() {
        let ttl = "\
BASE <http://example.org/>
PREFIX ex: <ns/>
@prefix : <http://default.org/> .
ex:alice ex:name \"Alice\" .
";
        let t = table(ttl, 1 << 20);
        assert_eq!(t.base(), Some("http://example.org/"));
        assert_eq!(t.get("ex"), Some("http://example.org/ns/"));
        assert_eq!(t.get(""), Some("http://default.org/"));
        assert_eq!(&ttl[t.data_start() as usize..][..8], "ex:alice");
        assert_eq!(
            t.header(),
            "@base <http://example.org/> .\n\
             @prefix ex: <http://example.org/ns/> .\n\
             @prefix : <http://default.org/> .\n"
        );
    }

    #[test]
    fn test_relative_base_chain() {
        let ttl = "\
@base <http://example.org/a/> .
@base <b/> .
@prefix ex: <c#> .
ex:x ex:y ex:z .
";
        let t = table(ttl, 1 << 20);
        assert_eq!(t.base(), Some("http://example.org/a/b/"));
        assert_eq!(t.get("ex"), Some("http://example.org/a/b/c#"));
    }

    #[test]
    fn test_comments_and_order() {
        let ttl = "\
# header comment
@prefix z: <http://z.org/> .
# another
@prefix a: <http://a.org/> .
@prefix z: <http://z2.org/> .
z:s a:p z:o .
";
        let t = table(ttl, 1 << 20);
        let labels: Vec<_> = t.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["z", "a"]);
        assert_eq!(t.get("z"), Some("http://z2.org/"));
    }

    #[test]
    fn test_no_prefixes() {
        let ttl = "<http://example.org/alice> <http://example.org/name> \"Alice\" .\n";
        let t = table(ttl, 1 << 20);
        assert!(t.is_empty());
        assert_eq!(t.data_start(), 0);
        assert_eq!(t.header(), "");
    }

    #[test]
    fn test_window_truncation_is_soft() {
        let ttl = "\
@prefix ex: <http://ex.org/> .
@prefix ex2: <http://ex2.org/> .
ex:a ex2:p ex:b .
";
        let cut = ttl.find("ex2:").unwrap() as u64 + 2;
        let t = table(ttl, cut);
        assert!(t.is_truncated());
        assert_eq!(t.get("ex"), Some("http://ex.org/"));
        assert_eq!(t.get("ex2"), None);
        assert_eq!(&ttl[t.data_start() as usize..][..12], "@prefix ex2:");
    }

    #[test]
    fn test_window_covering_all_directives_is_not_truncated() {
        let ttl = "@prefix ex: <http://ex.org/> .\nex:a ex:p \"a long literal value\" .\n";
        let t = table(ttl, 40);
        assert!(!t.is_truncated());
        assert_eq!(t.get("ex"), Some("http://ex.org/"));
    }

    #[test]
    fn test_full_file_mode_finds_late_declarations() {
        let ttl = "\
@prefix ex: <http://ex.org/> .
ex:a ex:p ex:b .
@prefix late: <http://late.org/> .
late:a ex:p ex:b .
";
        let mut source = MemorySource::from_text("test.ttl", ttl);
        let t = PrefixTable::build(&mut source, &TURTLE, 16, PrefixScanMode::FullFile).unwrap();
        assert_eq!(&ttl[t.data_start() as usize..][..4], "ex:a");
        assert_eq!(t.later().len(), 1);
        assert_eq!(t.later()[0].offset, after(ttl, "<http://late.org/> ."));

        // Not in force before the declaration, in force after it.
        assert!(!t.header_at(t.data_start()).contains("late:"));
        let late_use = ttl.find("late:a").unwrap() as u64;
        assert!(t
            .header_at(late_use)
            .contains("@prefix late: <http://late.org/> ."));

        let leading = table(ttl, 1 << 20);
        assert_eq!(leading.get("late"), None);
    }

    #[test]
    fn test_redeclared_prefix_follows_position() {
        let ttl = "\
@base <http://ex.org/> .
@prefix ex: <one/> .
ex:a ex:p ex:b .
@base <http://other.org/> .
@prefix ex: <two/> .
ex:c ex:p ex:d .
";
        let mut source = MemorySource::from_text("test.ttl", ttl);
        let t = PrefixTable::build(&mut source, &TURTLE, 1 << 20, PrefixScanMode::FullFile).unwrap();
        assert_eq!(t.get("ex"), Some("http://ex.org/one/"));
        assert_eq!(t.header_at(t.data_start()), t.header());

        let second = ttl.find("ex:c").unwrap() as u64;
        assert_eq!(
            t.header_at(second),
            "@base <http://other.org/> .\n@prefix ex: <http://other.org/two/> .\n"
        );
        // Between the two redeclarations only the base has changed.
        let between = after(ttl, "<http://other.org/> .");
        assert_eq!(
            t.header_at(between),
            "@base <http://other.org/> .\n@prefix ex: <http://ex.org/one/> .\n"
        );
    }

    #[test]
    fn test_trig_header() {
        let trig = "PREFIX ex: <http://ex.org/>\nex:g { ex:a ex:p ex:b }\n";
        let mut source = MemorySource::from_text("test.trig", trig);
        let t = PrefixTable::build(&mut source, &TRIG, 1 << 20, PrefixScanMode::Leading).unwrap();
        assert_eq!(t.get("ex"), Some("http://ex.org/"));
        assert_eq!(&trig[t.data_start() as usize..][..4], "ex:g");
    }

    #[test]
    fn test_malformed_declaration() {
        let ttl = "@prefix <http://ex.org/> .\n";
        let mut source = MemorySource::from_text("bad.ttl", ttl);
        let err =
            PrefixTable::build(&mut source, &TURTLE, 1 << 20, PrefixScanMode::Leading).unwrap_err();
        assert!(matches!(err, SplitError::Malformed { .. }), "{err}");
    }

    #[test]
    fn test_escape_iri() {
        assert_eq!(escape_iri("http://ex.org/a b"), "http://ex.org/a\\u0020b");
        assert_eq!(escape_iri("http://ex.org/é"), "http://ex.org/é");
    }
}
