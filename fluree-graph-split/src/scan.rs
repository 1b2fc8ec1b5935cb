//! Byte-level statement boundary scanner.
//!
//! A scan may start anywhere in a file, including inside a string literal,
//! an IRI, a comment or a nested block, so the scanner cannot trust a single
//! pass from its start offset. Instead it looks for *candidates* (a
//! terminator byte that looks like it ends a statement) and accepts the first
//! candidate that passes two checks:
//!
//! 1. **Line context**: lexing from the start of the candidate's line (at most
//!    [`LINE_LOOKBEHIND`] bytes back) must not leave the terminator inside a
//!    comment, a single-line string or an IRI.
//! 2. **Probe**: lexing forward from the candidate with a fresh state, the
//!    next statements must start like statements and stay balanced: no
//!    closing bracket without an opener, no newline inside a single-line
//!    string. After [`probe_statements`](BoundaryScanner::with_probe_statements)
//!    clean statements the probe still needs evidence for what the line
//!    context cannot see:
//!    - a long-quote run that opens a literal, since the first run after a
//!      candidate inside a long literal is that literal's closer, followed by
//!      `.`, `;`, `,`, a closing bracket, `^^` or a language tag;
//!    - for syntaxes with graph blocks and a `.` candidate, the next block
//!      opening at top level, since a `.` inside a block runs into the
//!      block's `}` first.
//!
//!    End of input counts as evidence for both. Without it the candidate is
//!    accepted once the probe has lexed [`lookahead`](BoundaryScanner::with_lookahead)
//!    bytes cleanly. A long literal or graph block that continues for more
//!    than that past the candidate can therefore be cut; the fragments on
//!    both sides then fail to parse.
//!
//! Acceptance depends only on the file bytes around the candidate, never on
//! where the scan started, so two scans asking about the same region agree.

use fluree_graph_turtle::lex::chars::{is_pn_byte, is_ws_byte};

use crate::config::{DEFAULT_PROBE_LOOKAHEAD_BYTES, DEFAULT_PROBE_STATEMENTS};
use crate::error::ScanError;
use crate::format::FormatRules;

/// How far back from a candidate the line-context check may start.
///
/// On a line longer than this the check starts mid-line and may start inside
/// a single-line string; the candidate is then decided by the probe alone.
pub const LINE_LOOKBEHIND: usize = 4 * 1024;

/// Scan direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// First boundary at or after the start offset
    Forward,
    /// Last boundary at or before the start offset
    Backward,
}

/// Lexical context of a scan position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Inside a single-line string opened by the given quote
    ShortString(u8),
    /// Inside a long string (`"""` / `'''`)
    LongString(u8),
    Iri,
    Comment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stop {
    NeedMore,
    Violation,
}

/// Transient lexer state: quote/comment mode, pending escape, open brackets.
#[derive(Clone, Debug)]
pub struct LexState {
    mode: Mode,
    escape: bool,
    /// Expected closers of the open brackets, innermost last
    stack: Vec<u8>,
    /// Report unbalanced closers and broken strings as violations
    strict: bool,
}

impl LexState {
    /// State for probing: structural problems are violations.
    pub fn strict() -> Self {
        Self {
            mode: Mode::Normal,
            escape: false,
            stack: Vec::new(),
            strict: true,
        }
    }

    /// State for lexing a line that may start inside brackets.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::strict()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn escape_pending(&self) -> bool {
        self.escape
    }

    /// Outside every quote, comment, IRI and bracket.
    pub fn is_top_level(&self) -> bool {
        self.mode == Mode::Normal && !self.escape && self.stack.is_empty()
    }

    /// Consume the lexical unit at `buf[i]` and return the index after it.
    fn advance(
        &mut self,
        buf: &[u8],
        i: usize,
        rules: &FormatRules,
        at_eof: bool,
    ) -> Result<usize, Stop> {
        let b = buf[i];
        if self.escape {
            self.escape = false;
            return Ok(i + 1);
        }
        match self.mode {
            Mode::Normal => {
                if rules.is_quote(b) {
                    match quote_run(buf, i, b, rules.long_quote_len, at_eof)? {
                        true => {
                            self.mode = Mode::LongString(b);
                            return Ok(i + rules.long_quote_len);
                        }
                        false => self.mode = Mode::ShortString(b),
                    }
                } else if b == rules.iri.0 {
                    self.mode = Mode::Iri;
                } else if b == rules.comment {
                    self.mode = Mode::Comment;
                } else if let Some(close) = rules.opener(b) {
                    self.stack.push(close);
                } else if rules.is_closer(b) {
                    match self.stack.last() {
                        Some(&expected) if expected == b => {
                            self.stack.pop();
                        }
                        _ if self.strict => return Err(Stop::Violation),
                        _ => {
                            self.stack.pop();
                        }
                    }
                }
            }
            Mode::ShortString(q) => {
                if b == rules.escape {
                    self.escape = true;
                } else if b == q {
                    self.mode = Mode::Normal;
                } else if b == b'\n' || b == b'\r' {
                    if self.strict {
                        return Err(Stop::Violation);
                    }
                    self.mode = Mode::Normal;
                }
            }
            Mode::LongString(q) => {
                if b == rules.escape {
                    self.escape = true;
                } else if b == q && quote_run(buf, i, q, rules.long_quote_len, at_eof)? {
                    self.mode = Mode::Normal;
                    return Ok(i + rules.long_quote_len);
                }
            }
            Mode::Iri => {
                if b == rules.iri.1 {
                    self.mode = Mode::Normal;
                } else if is_ws_byte(b) && self.strict {
                    return Err(Stop::Violation);
                }
            }
            Mode::Comment => {
                if b == b'\n' || b == b'\r' {
                    self.mode = Mode::Normal;
                }
            }
        }
        Ok(i + 1)
    }
}

/// Is `buf[i..]` a full long-quote run of `q`?
fn quote_run(buf: &[u8], i: usize, q: u8, len: usize, at_eof: bool) -> Result<bool, Stop> {
    for k in 1..len {
        match buf.get(i + k) {
            Some(&b) if b == q => {}
            Some(_) => return Ok(false),
            None if at_eof => return Ok(false),
            None => return Err(Stop::NeedMore),
        }
    }
    Ok(true)
}

/// Does the terminator at `buf[i]` end a statement, judging by its neighbours?
///
/// `None` when the next byte is past the buffer and the buffer is not the
/// end of input.
fn terminates(buf: &[u8], i: usize, at_eof: bool) -> Option<bool> {
    let Some(&next) = buf.get(i + 1) else {
        return at_eof.then_some(true);
    };
    if is_ws_byte(next) || next == b'#' {
        return Some(true);
    }
    let prev_is_name = i > 0 && is_pn_byte(buf[i - 1]);
    if prev_is_name {
        // `ex:foo.bar`
        Some(!is_pn_byte(next) && next != b':')
    } else {
        // `.5` is a decimal
        Some(!next.is_ascii_digit())
    }
}

/// Mode at `buf[end]` when lexing from `start` in a fresh lenient state.
fn mode_at(buf: &[u8], start: usize, end: usize, rules: &FormatRules) -> Mode {
    let mut state = LexState::lenient();
    let mut i = start;
    while i < end {
        match state.advance(&buf[..end], i, rules, true) {
            Ok(next) => i = next,
            Err(_) => break,
        }
    }
    state.mode
}

/// Start of the line containing `i`, no further back than the lookbehind.
fn line_start(buf: &[u8], i: usize) -> usize {
    let floor = i.saturating_sub(LINE_LOOKBEHIND);
    buf[floor..i]
        .iter()
        .rposition(|&b| b == b'\n' || b == b'\r')
        .map_or(floor, |pos| floor + pos + 1)
}

/// Does the long-quote run ending at `buf[end]` close a literal?
///
/// A closing run is followed (after whitespace and comments) by whatever
/// may follow an object; an opening run is followed by literal text.
fn closes_literal(buf: &[u8], end: usize, rules: &FormatRules, at_eof: bool) -> Option<bool> {
    let mut i = end;
    loop {
        let Some(&b) = buf.get(i) else {
            return at_eof.then_some(true);
        };
        if is_ws_byte(b) {
            i += 1;
        } else if b == rules.comment {
            match buf[i..].iter().position(|&c| c == b'\n' || c == b'\r') {
                Some(n) => i += n,
                None => return at_eof.then_some(true),
            }
        } else {
            return Some(
                b == rules.terminator
                    || matches!(b, b';' | b',' | b'^' | b'@')
                    || rules.is_closer(b),
            );
        }
    }
}

enum Start {
    Statement { directive: bool },
    Invalid,
    NeedMore,
}

/// Can a top-level statement start at `buf[i]`?
fn statement_start(buf: &[u8], i: usize, rules: &FormatRules, at_eof: bool) -> Start {
    let b = buf[i];
    if b == rules.iri.0 || b == b'[' || b == b'(' || b == b':' || rules.is_block_open(b) {
        return Start::Statement { directive: false };
    }
    if b == b'_' {
        return match buf.get(i + 1) {
            Some(b':') => Start::Statement { directive: false },
            Some(_) => Start::Invalid,
            None if at_eof => Start::Invalid,
            None => Start::NeedMore,
        };
    }
    if b == b'@' {
        let rest = &buf[i + 1..];
        for kw in [&b"prefix"[..], &b"base"[..]] {
            if rest.len() < kw.len() && kw.starts_with(rest) && !at_eof {
                return Start::NeedMore;
            }
            if rest.starts_with(kw) {
                return Start::Statement { directive: false };
            }
        }
        return Start::Invalid;
    }
    if !is_pn_byte(b) {
        return Start::Invalid;
    }

    let mut j = i;
    while j < buf.len() && (is_pn_byte(buf[j]) || buf[j] == b'.') {
        j += 1;
    }
    let Some(&next) = buf.get(j) else {
        return if at_eof { Start::Invalid } else { Start::NeedMore };
    };
    if next == b':' {
        return Start::Statement { directive: false };
    }
    let word = std::str::from_utf8(&buf[i..j]).unwrap_or("");
    let keyword = rules
        .keywords
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(word));
    if keyword && (is_ws_byte(next) || next == rules.iri.0) {
        Start::Statement {
            directive: rules.is_directive_keyword(word),
        }
    } else {
        Start::Invalid
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    Accept,
    Reject,
    NeedMore(usize),
}

/// Boundary scanner for one syntax.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryScanner {
    rules: &'static FormatRules,
    probe_statements: usize,
    lookahead: usize,
}

impl BoundaryScanner {
    pub fn new(rules: &'static FormatRules) -> Self {
        Self {
            rules,
            probe_statements: DEFAULT_PROBE_STATEMENTS,
            lookahead: DEFAULT_PROBE_LOOKAHEAD_BYTES,
        }
    }

    pub fn with_probe_statements(mut self, statements: usize) -> Self {
        self.probe_statements = statements.max(1);
        self
    }

    /// Bytes a probe lexes before accepting without literal or block evidence.
    pub fn with_lookahead(mut self, bytes: usize) -> Self {
        self.lookahead = bytes;
        self
    }

    pub fn rules(&self) -> &'static FormatRules {
        self.rules
    }

    /// Find a statement boundary in `buf`, starting at `from`.
    ///
    /// Boundaries are positions right after a terminator. Forward returns the
    /// first accepted boundary `>= from`; backward returns the last one
    /// `<= from`. `at_eof` says whether `buf` ends where the input ends; if
    /// not, a forward scan that runs off the end asks for more input.
    pub fn find_boundary(
        &self,
        buf: &[u8],
        from: usize,
        direction: Direction,
        at_eof: bool,
    ) -> Result<usize, ScanError> {
        match direction {
            Direction::Forward => self.forward(buf, from, at_eof),
            Direction::Backward => self.backward(buf, from, at_eof),
        }
    }

    fn is_candidate_byte(&self, b: u8) -> bool {
        b == self.rules.terminator || self.rules.is_block_close(b)
    }

    fn forward(&self, buf: &[u8], from: usize, at_eof: bool) -> Result<usize, ScanError> {
        let mut i = from.saturating_sub(1);
        while i < buf.len() {
            if self.is_candidate_byte(buf[i]) {
                match self.check(buf, i, at_eof) {
                    Probe::Accept => return Ok(i + 1),
                    Probe::Reject => {}
                    Probe::NeedMore(at) => return Err(ScanError::NeedMore { at }),
                }
            }
            i += 1;
        }
        if at_eof {
            Err(ScanError::NotFound)
        } else {
            Err(ScanError::NeedMore { at: buf.len() })
        }
    }

    fn backward(&self, buf: &[u8], from: usize, at_eof: bool) -> Result<usize, ScanError> {
        let end = from.min(buf.len());
        let window = &buf[..end];
        let window_eof = at_eof && end == buf.len();
        for i in (0..end).rev() {
            if !self.is_candidate_byte(window[i]) {
                continue;
            }
            // Anything the probe cannot see lies past the window.
            match self.check(window, i, window_eof) {
                Probe::Accept | Probe::NeedMore(_) => {
                    if window[i] == self.rules.terminator
                        && terminates(window, i, window_eof).is_none()
                    {
                        continue;
                    }
                    return Ok(i + 1);
                }
                Probe::Reject => {}
            }
        }
        Err(ScanError::NotFound)
    }

    /// Decide the candidate terminator at `buf[i]`.
    fn check(&self, buf: &[u8], i: usize, at_eof: bool) -> Probe {
        let rules = self.rules;
        let dot = buf[i] == rules.terminator;
        if dot {
            match terminates(buf, i, at_eof) {
                Some(true) => {}
                Some(false) => return Probe::Reject,
                None => return Probe::NeedMore(i + 1),
            }
        }

        match mode_at(buf, line_start(buf, i), i, rules) {
            Mode::Comment | Mode::ShortString(_) | Mode::Iri => return Probe::Reject,
            Mode::Normal | Mode::LongString(_) => {}
        }

        let until_block = dot && rules.has_graph_blocks();
        self.probe(buf, i + 1, at_eof, until_block)
    }

    /// Lex forward from a candidate boundary.
    fn probe(&self, buf: &[u8], start: usize, at_eof: bool, until_block: bool) -> Probe {
        let rules = self.rules;
        let mut state = LexState::strict();
        let mut i = start;
        let mut completed = 0usize;
        let mut at_start = true;
        let mut directive = false;
        let mut outside_literal = false;
        let mut outside_block = !until_block;

        loop {
            let Some(&b) = buf.get(i) else {
                if !at_eof {
                    return Probe::NeedMore(i);
                }
                let clean = at_start
                    && !state.escape
                    && state.stack.is_empty()
                    && matches!(state.mode, Mode::Normal | Mode::Comment);
                return if clean { Probe::Accept } else { Probe::Reject };
            };

            if state.is_top_level() {
                if at_start {
                    if is_ws_byte(b) {
                        i += 1;
                        continue;
                    }
                    if b != rules.comment {
                        match statement_start(buf, i, rules, at_eof) {
                            Start::Statement { directive: d } => {
                                at_start = false;
                                directive = d;
                            }
                            Start::Invalid => return Probe::Reject,
                            Start::NeedMore => return Probe::NeedMore(i),
                        }
                    }
                } else if b == rules.terminator {
                    match terminates(buf, i, at_eof) {
                        Some(true) => {
                            completed += 1;
                            if self.confirmed(completed, i - start, outside_literal, outside_block)
                            {
                                return Probe::Accept;
                            }
                            at_start = true;
                            directive = false;
                            i += 1;
                            continue;
                        }
                        Some(false) => {}
                        None => return Probe::NeedMore(i + 1),
                    }
                }
            }

            if state.mode == Mode::Normal && !state.escape && rules.is_quote(b) {
                match quote_run(buf, i, b, rules.long_quote_len, at_eof) {
                    Ok(true) => {
                        match closes_literal(buf, i + rules.long_quote_len, rules, at_eof) {
                            // The candidate sits inside the literal this run closes.
                            Some(true) => return Probe::Reject,
                            Some(false) => outside_literal = true,
                            None => return Probe::NeedMore(i),
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return Probe::NeedMore(i),
                }
            }

            let depth = state.stack.len();
            let mode = state.mode;
            match state.advance(buf, i, rules, at_eof) {
                Ok(next) => {
                    if mode == Mode::Normal && depth == 0 && rules.is_block_open(b) {
                        outside_block = true;
                        if until_block && (outside_literal || i - start >= self.lookahead) {
                            return Probe::Accept;
                        }
                    }
                    let block_closed =
                        mode == Mode::Normal && depth == 1 && rules.is_block_close(b);
                    let directive_done = directive && mode == Mode::Iri && state.is_top_level();
                    if block_closed || directive_done {
                        completed += 1;
                        if self.confirmed(completed, i - start, outside_literal, outside_block) {
                            return Probe::Accept;
                        }
                        at_start = true;
                        directive = false;
                    }
                    i = next;
                }
                Err(Stop::NeedMore) => return Probe::NeedMore(i),
                Err(Stop::Violation) => return Probe::Reject,
            }
        }
    }

    /// Enough clean statements, and evidence or distance for the rest.
    fn confirmed(
        &self,
        completed: usize,
        scanned: usize,
        outside_literal: bool,
        outside_block: bool,
    ) -> bool {
        let far = scanned >= self.lookahead;
        completed >= self.probe_statements && (outside_literal || far) && (outside_block || far)
    }
}

/// Find a statement boundary with the default probe depth.
///
/// See [`BoundaryScanner::find_boundary`].
pub fn find_boundary(
    buf: &[u8],
    from: usize,
    direction: Direction,
    rules: &'static FormatRules,
    at_eof: bool,
) -> Result<usize, ScanError> {
    BoundaryScanner::new(rules).find_boundary(buf, from, direction, at_eof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{TRIG, TURTLE};

    fn forward(doc: &str, from: usize) -> Result<usize, ScanError> {
        find_boundary(doc.as_bytes(), from, Direction::Forward, &TURTLE, true)
    }

    fn after(doc: &str, needle: &str) -> usize {
        doc.find(needle).unwrap() + needle.len()
    }

    #[test]
    fn test_simple_forward() {
        let doc = "ex:a ex:p ex:b .\nex:c ex:p ex:d .\n";
        assert_eq!(forward(doc, 3).unwrap(), after(doc, "ex:b ."));
        assert_eq!(forward(doc, 0).unwrap(), after(doc, "ex:b ."));
        // A boundary exactly at `from` is returned as is.
        let first = after(doc, "ex:b .");
        assert_eq!(forward(doc, first).unwrap(), first);
    }

    #[test]
    fn test_dot_in_short_string() {
        let doc = "_:b1 ex:p \"a. b\" .\n_:b2 ex:p \"c\" .\n";
        let from = after(doc, "\"a.");
        assert_eq!(forward(doc, from).unwrap(), after(doc, "\"a. b\" ."));
    }

    #[test]
    fn test_dot_in_nested_block() {
        let doc = "ex:s ex:p [ ex:q ex:r . ] .\nex:t ex:p ex:u .\n";
        let from = doc.find("ex:q").unwrap();
        assert_eq!(forward(doc, from).unwrap(), after(doc, "] ."));
    }

    #[test]
    fn test_dot_in_comment() {
        let doc = "ex:a ex:p ex:b . # one. two. three\nex:c ex:p ex:d .\n";
        let from = after(doc, "# one");
        assert_eq!(forward(doc, from).unwrap(), after(doc, "ex:d ."));
    }

    #[test]
    fn test_dot_in_iri_and_names() {
        let doc = "<http://ex.org/a.> ex:foo.bar 1.5 .\nex:c ex:p ex:d .\n";
        assert_eq!(forward(doc, 1).unwrap(), after(doc, "1.5 ."));
    }

    #[test]
    fn test_dot_in_long_string() {
        let doc = "ex:a ex:p \"\"\"first line.\nsecond. line\n\"\"\" .\nex:b ex:p ex:c .\n";
        let from = doc.find("first").unwrap();
        assert_eq!(forward(doc, from).unwrap(), after(doc, "\"\"\" ."));
    }

    #[test]
    fn test_escaped_quote() {
        let doc = "ex:a ex:p \"say \\\"hi. there\\\" .\" .\nex:b ex:p ex:c .\n";
        let from = doc.find("hi").unwrap();
        assert_eq!(forward(doc, from).unwrap(), after(doc, "\\\" .\" ."));
    }

    #[test]
    fn test_sparql_directive_after_candidate() {
        let doc = "ex:a ex:p ex:b .\nPREFIX ex2: <http://ex.org/2/>\nex2:c ex:p ex:d .\n";
        assert_eq!(forward(doc, 2).unwrap(), after(doc, "ex:b ."));
    }

    #[test]
    fn test_need_more_and_not_found() {
        let doc = "ex:a ex:p \"unterminated . string";
        assert_eq!(forward(doc, 0), Err(ScanError::NotFound));
        let err = find_boundary(doc.as_bytes(), 0, Direction::Forward, &TURTLE, false).unwrap_err();
        assert!(matches!(err, ScanError::NeedMore { .. }));
    }

    #[test]
    fn test_candidate_needs_probe_room() {
        let doc = "ex:a ex:p ex:b .\nex:c ex:p";
        let err = find_boundary(doc.as_bytes(), 0, Direction::Forward, &TURTLE, false).unwrap_err();
        assert!(matches!(err, ScanError::NeedMore { .. }));
        // At end of input the same candidate is decided.
        assert!(matches!(forward(doc, 0), Err(ScanError::NotFound)));
    }

    #[test]
    fn test_trig_dot_inside_block_rejected() {
        let doc = "<g1> { ex:a ex:p ex:b . ex:c ex:p ex:d . ex:e ex:p ex:f }\n<g2> { ex:x ex:p ex:y }\n";
        let from = doc.find("ex:a").unwrap();
        let found = find_boundary(doc.as_bytes(), from, Direction::Forward, &TRIG, true).unwrap();
        assert_eq!(found, after(doc, "ex:f }"));
    }

    #[test]
    fn test_trig_top_level_triple() {
        let doc = "ex:a ex:p ex:b .\n{ ex:c ex:p ex:d }\n";
        let found = find_boundary(doc.as_bytes(), 1, Direction::Forward, &TRIG, true).unwrap();
        assert_eq!(found, after(doc, "ex:b ."));
    }

    #[test]
    fn test_turtle_inside_long_literal() {
        let doc = "\
ex:s0 ex:comment \"\"\"Example:
ex:a ex:b ex:c .
ex:d ex:e ex:f .
ex:g ex:h ex:i .
\"\"\" .
ex:s1 ex:comment \"\"\"More:
ex:j ex:k ex:l .
\"\"\" .
";
        let from = doc.find("ex:a").unwrap();
        assert_eq!(forward(doc, from).unwrap(), after(doc, "ex:i .\n\"\"\" ."));
    }

    #[test]
    fn test_literal_closer_with_datatype_rejects() {
        let doc = "ex:s ex:p '''text.\nex:a ex:b ex:c .\nex:d ex:e ex:f .\nex:g ex:h '''^^ex:dt .\n";
        let from = doc.find("ex:a").unwrap();
        assert_eq!(forward(doc, from).unwrap(), after(doc, "^^ex:dt ."));
    }

    #[test]
    fn test_opening_run_is_evidence() {
        let doc = "ex:a ex:p ex:b .\nex:c ex:p ex:d .\nex:e ex:p \"\"\"x\"\"\" .\nex:f ex:p";
        let found = BoundaryScanner::new(&TURTLE)
            .find_boundary(doc.as_bytes(), 1, Direction::Forward, false)
            .unwrap();
        assert_eq!(found, after(doc, "ex:b ."));
    }

    #[test]
    fn test_trig_top_level_triples_within_lookahead() {
        let mut doc = String::new();
        for i in 0..100 {
            doc.push_str(&format!("ex:s{i} ex:p ex:o{i} .\n"));
        }
        // No block and no end of input in sight: the probe settles on distance.
        let found = BoundaryScanner::new(&TRIG)
            .with_lookahead(256)
            .find_boundary(doc.as_bytes(), 30, Direction::Forward, false)
            .unwrap();
        assert_eq!(found, after(&doc, "ex:o1 ."));

        let unbounded = BoundaryScanner::new(&TRIG).with_lookahead(1 << 20);
        assert!(matches!(
            unbounded.find_boundary(doc.as_bytes(), 30, Direction::Forward, false),
            Err(ScanError::NeedMore { .. })
        ));
    }

    #[test]
    fn test_backward() {
        let doc = "ex:a ex:p ex:b .\nex:c ex:p \"x. y";
        let found =
            find_boundary(doc.as_bytes(), doc.len(), Direction::Backward, &TURTLE, false).unwrap();
        assert_eq!(found, after(doc, "ex:b ."));
        assert_eq!(
            find_boundary(b"ex:a ex:p", 9, Direction::Backward, &TURTLE, false),
            Err(ScanError::NotFound)
        );
    }

    #[test]
    fn test_lex_state_tracks_nesting() {
        let doc = b"[ ( \"]\" ) ";
        let mut state = LexState::strict();
        let mut i = 0;
        while i < doc.len() {
            i = state.advance(doc, i, &TURTLE, true).unwrap();
        }
        assert_eq!(state.depth(), 1);
        assert_eq!(state.mode(), Mode::Normal);
        assert!(!state.is_top_level());
    }
}
