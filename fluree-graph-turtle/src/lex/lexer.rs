//! Turtle/TriG lexer implementation using winnow.
//!
//! The lexer owns its input and produces one token per call, so a parser can
//! pull tokens lazily and stop early. Fails fast on the first lexical error
//! with a clear, actionable message.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, not, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{Token, TokenKind};
use crate::error::{Result, TurtleError};
use crate::position::PositionOrigin;

/// Input type for the token parsers - tracks position for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Lexer for Turtle and TriG documents.
///
/// Token spans are buffer offsets; error positions are mapped through the
/// lexer's `PositionOrigin` to file offsets.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Arc<str>,
    pos: usize,
    origin: PositionOrigin,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: impl Into<Arc<str>>) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            origin: PositionOrigin::IDENTITY,
        }
    }

    /// Report error positions relative to `origin`.
    pub fn with_origin(mut self, origin: PositionOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Buffer offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn source(&self) -> &str {
        &self.input
    }

    pub fn origin(&self) -> PositionOrigin {
        self.origin
    }

    /// Lex the next token. Returns `Eof` (repeatedly) once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        let mut input = LocatingSlice::new(&self.input[self.pos..]);
        skip_ws_and_comments(&mut input);

        let start = self.pos + input.current_token_start();
        if input.is_empty() {
            self.pos = start;
            return Ok(Token::new(TokenKind::Eof, start, start));
        }

        match next_token(&mut input) {
            Ok(kind) => {
                let end = self.pos + input.current_token_start();
                self.pos = end;
                Ok(Token::new(kind, start, end))
            }
            Err(_) => Err(self.make_error(start)),
        }
    }

    /// Tokenize the remaining input, including the final `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                return Ok(tokens);
            }
        }
    }

    /// Create a descriptive error message for an invalid token.
    fn make_error(&self, position: usize) -> TurtleError {
        let bad_char = self.input[position..].chars().next().unwrap_or('?');
        let file_pos = self.origin.to_file(position);

        let what = match bad_char {
            '"' | '\'' => "unterminated string literal".to_string(),
            '<' => "invalid or unterminated IRI".to_string(),
            c if !c.is_ascii() && !is_pn_chars_base(c) => format!(
                "unexpected character '{}' (U+{:04X})",
                c.escape_unicode(),
                c as u32
            ),
            c => format!("unexpected character '{}'", c),
        };

        // Line/column only mean something when the buffer is the file.
        let message = if self.origin.is_identity() {
            let (line, col) = self.line_col(position);
            let pointer = " ".repeat(col.saturating_sub(1));
            format!(
                "{} at line {}, column {}\n  |\n{} | {}\n  | {}^",
                what,
                line,
                col,
                line,
                self.get_line(line),
                pointer
            )
        } else {
            format!("{} at byte offset {}", what, file_pos)
        };

        TurtleError::lexer(file_pos, message)
    }

    /// Convert a byte position to (line, column), 1-indexed.
    fn line_col(&self, position: usize) -> (usize, usize) {
        let before = &self.input[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }

    /// Get the content of a specific line (1-indexed).
    fn get_line(&self, line_num: usize) -> &str {
        self.input
            .lines()
            .nth(line_num.saturating_sub(1))
            .unwrap_or("")
    }
}

/// Skip whitespace and comments.
fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if !input.starts_with('#') {
            break;
        }
        let _: ModalResult<&str, ContextError> =
            take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
    }
}

/// Parse the next token.
fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".value(TokenKind::DoubleCaret),
        parse_iri_ref,
        // Blank nodes before prefixed names: `_:` would otherwise look like one
        parse_blank_node_label,
        parse_anon,
        parse_nil,
        parse_at_word,
        parse_default_prefix,
        parse_prefixed_name_or_keyword,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

// =============================================================================
// IRIs
// =============================================================================

/// Parse an IRI reference: `<...>`
fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(|s: String| TokenKind::Iri(Arc::from(s)))
        .parse_next(input)
}

/// IRI body: unescaped IRI characters and `\u`/`\U` escapes. May be empty.
fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();
    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if !input.starts_with('\\') {
            return Ok(result);
        }
        '\\'.parse_next(input)?;
        match one_of(['u', 'U']).parse_next(input)? {
            'u' => result.push(hex_char(input, 4)?),
            _ => result.push(hex_char(input, 8)?),
        }
    }
}

/// Exactly `digits` hex digits naming a Unicode scalar value.
fn hex_char(input: &mut Input<'_>, digits: usize) -> ModalResult<char> {
    let hex: &str = take_while(digits..=digits, AsChar::is_hex_digit).parse_next(input)?;
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => Ok(c),
        None => backtrack(),
    }
}

// =============================================================================
// `@` words: directives and language tags
// =============================================================================

fn parse_at_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let word: &str = preceded(
        '@',
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
    .parse_next(input)?;

    Ok(if word.eq_ignore_ascii_case("prefix") {
        TokenKind::KwPrefix
    } else if word.eq_ignore_ascii_case("base") {
        TokenKind::KwBase
    } else {
        TokenKind::LangTag(Arc::from(word))
    })
}

// =============================================================================
// Prefixed names and keywords
// =============================================================================

/// Input is at a `.` followed by a character matching `pred`.
fn dot_then(input: &Input<'_>, pred: impl Fn(char) -> bool) -> bool {
    input.starts_with('.') && input.as_ref()[1..].chars().next().is_some_and(pred)
}

/// `:local` or bare `:` (the default prefix).
fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    Ok(prefixed(String::new(), opt(parse_pn_local).parse_next(input)?))
}

fn prefixed(prefix: String, local: Option<String>) -> TokenKind {
    match local {
        Some(local) => TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local: Arc::from(local),
        },
        None => TokenKind::PrefixedNameNs(Arc::from(prefix)),
    }
}

/// A name: `prefix:local`, `prefix:`, or one of the bare keywords
/// (`a`, `true`, `false`, and case-insensitive `PREFIX`, `BASE`, `GRAPH`).
fn parse_prefixed_name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();

    let first: char = any.parse_next(input)?;
    if !is_pn_chars_u(first) && !first.is_ascii_digit() {
        input.reset(&start);
        return backtrack();
    }
    let mut word = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        // An inner dot belongs to the name only when a name char follows it.
        if !dot_then(input, is_pn_chars) {
            break;
        }
        '.'.parse_next(input)?;
        word.push('.');
    }

    if input.starts_with(':') {
        if !is_pn_prefix_start(first) {
            input.reset(&start);
            return backtrack();
        }
        ':'.parse_next(input)?;
        let local = opt(parse_pn_local).parse_next(input)?;
        return Ok(prefixed(word, local));
    }

    match word.as_str() {
        "a" => Ok(TokenKind::KwA),
        "true" => Ok(TokenKind::KwTrue),
        "false" => Ok(TokenKind::KwFalse),
        w if w.eq_ignore_ascii_case("PREFIX") => Ok(TokenKind::KwSparqlPrefix),
        w if w.eq_ignore_ascii_case("BASE") => Ok(TokenKind::KwSparqlBase),
        w if w.eq_ignore_ascii_case("GRAPH") => Ok(TokenKind::KwGraph),
        _ => {
            input.reset(&start);
            backtrack()
        }
    }
}

/// Local name after the colon of a prefixed name (PN_LOCAL, with PLX).
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first = match input.chars().next() {
        Some(c) => c,
        None => return backtrack(),
    };
    if !is_pn_local_start(first) && first != '%' && first != '\\' {
        return backtrack();
    }

    let mut result = String::new();
    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('.') {
            if !dot_then(input, |c| is_pn_chars(c) || matches!(c, ':' | '%' | '\\')) {
                break;
            }
            '.'.parse_next(input)?;
            result.push('.');
        } else if input.starts_with('%') {
            let pct: &str = ('%', take_while(2..=2, AsChar::is_hex_digit))
                .take()
                .parse_next(input)?;
            result.push_str(pct);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = one_of(|c: char| "_~.-!$&'()*+,;=/?#@%".contains(c))
                .parse_next(input)?;
            result.push(escaped);
        } else {
            break;
        }
    }

    if result.is_empty() {
        return backtrack();
    }
    Ok(result)
}

// =============================================================================
// Blank nodes
// =============================================================================

/// Parse a blank node label: `_:name`
fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "_:".parse_next(input)?;
    let first: char =
        one_of(|c: char| is_pn_chars_u(c) || c.is_ascii_digit()).parse_next(input)?;
    let mut name = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        name.push_str(chunk);
        // A trailing dot is the statement terminator, not part of the label.
        if !dot_then(input, is_pn_chars) {
            break;
        }
        '.'.parse_next(input)?;
        name.push('.');
    }

    Ok(TokenKind::BlankNodeLabel(Arc::from(name)))
}

/// Parse anonymous blank node: `[]` (whitespace allowed inside)
fn parse_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .value(TokenKind::Anon)
        .parse_next(input)
}

/// Parse NIL (empty list): `()`
fn parse_nil(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('(', take_while(0.., is_ws), ')')
        .value(TokenKind::Nil)
        .parse_next(input)
}

// =============================================================================
// String literals
// =============================================================================

/// Short (`"..."`, `'...'`) or long (`"""..."""`, `'''...'''`) string.
fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let quote: char = peek(one_of(['"', '\''])).parse_next(input)?;
    let long_delim = if quote == '"' { "\"\"\"" } else { "'''" };

    let body = if input.starts_with(long_delim) {
        delimited(
            long_delim,
            |i: &mut Input<'_>| long_string_body(i, quote, long_delim),
            long_delim,
        )
        .parse_next(input)?
    } else {
        delimited(
            quote,
            |i: &mut Input<'_>| short_string_body(i, quote),
            quote,
        )
        .parse_next(input)?
    };
    Ok(TokenKind::String(Arc::from(body)))
}

/// Body of a single-line string; stops before the closing quote or a newline.
fn short_string_body(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let mut result = String::new();
    loop {
        let chunk: &str = take_while(0.., |c| c != quote && c != '\\' && c != '\n' && c != '\r')
            .parse_next(input)?;
        result.push_str(chunk);

        if !input.starts_with('\\') {
            return Ok(result);
        }
        '\\'.parse_next(input)?;
        result.push(parse_escape_char(input)?);
    }
}

/// Body of a long string; lone quotes and newlines are content.
fn long_string_body(input: &mut Input<'_>, quote: char, delim: &str) -> ModalResult<String> {
    let mut result = String::new();
    loop {
        let chunk: &str = take_while(0.., |c| c != quote && c != '\\').parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with(delim) {
            return Ok(result);
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            result.push(parse_escape_char(input)?);
        } else {
            let c: char = any.parse_next(input)?;
            result.push(c);
        }
    }
}

/// ECHAR or UCHAR after a backslash.
fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    match any.parse_next(input)? {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        'u' => hex_char(input, 4),
        'U' => hex_char(input, 8),
        _ => backtrack(),
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn sign(input: &mut Input<'_>) -> ModalResult<Option<char>> {
    opt(one_of(['+', '-'])).parse_next(input)
}

/// `[+-]? (digits '.' digits? | '.' digits | digits) [eE] [+-]? digits`
fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    (
        sign,
        alt((
            (digit1, '.', opt(digit1)).void(),
            ('.', digit1).void(),
            digit1.void(),
        )),
        one_of(['e', 'E']),
        sign,
        digit1,
    )
        .take()
        .map(|text: &str| TokenKind::Double(text.parse::<f64>().unwrap_or(f64::NAN)))
        .parse_next(input)
}

/// `[+-]? digits? '.' digits`, kept as text to preserve precision.
fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text: &str = (
        sign,
        alt(((digit1, '.', digit1).void(), ('.', digit1).void())),
    )
        .take()
        .parse_next(input)?;
    not(one_of(['e', 'E'])).parse_next(input)?;
    Ok(TokenKind::Decimal(Arc::from(text)))
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let text: &str = (sign, digit1).take().parse_next(input)?;
    not(one_of(['e', 'E'])).parse_next(input)?;

    // `1.5` is a decimal; only a dot not followed by a digit ends an integer.
    if dot_then(input, |c| c.is_ascii_digit()) {
        return backtrack();
    }

    Ok(match text.parse::<i64>() {
        Ok(n) => TokenKind::Integer(n),
        Err(_) => TokenKind::BigInteger(Arc::from(text)),
    })
}

// =============================================================================
// Punctuation
// =============================================================================

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        _ => None,
    })
    .parse_next(input)
}

/// Tokenize a Turtle/TriG document string, including the final `Eof` token.
///
/// Returns an error immediately on the first invalid token, with a clear
/// error message including line/column information and source context.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Eof))
            .collect()
    }

    fn pname(prefix: &str, local: &str) -> TokenKind {
        TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local: Arc::from(local),
        }
    }

    #[test]
    fn test_iri() {
        assert_eq!(
            tok("<http://example.org/>"),
            vec![TokenKind::Iri(Arc::from("http://example.org/"))]
        );
        assert_eq!(tok("<>"), vec![TokenKind::Iri(Arc::from(""))]);
        assert_eq!(
            tok("<http://ex.org/\\u00E9>"),
            vec![TokenKind::Iri(Arc::from("http://ex.org/é"))]
        );
    }

    #[test]
    fn test_prefixed_names() {
        assert_eq!(tok("ex:name"), vec![pname("ex", "name")]);
        assert_eq!(tok("ex:"), vec![TokenKind::PrefixedNameNs(Arc::from("ex"))]);
        assert_eq!(tok(":name"), vec![pname("", "name")]);
        assert_eq!(tok(":"), vec![TokenKind::PrefixedNameNs(Arc::from(""))]);
        // trailing dot terminates the statement
        assert_eq!(tok("ex:a.b."), vec![pname("ex", "a.b"), TokenKind::Dot]);
        assert_eq!(tok("ex:a%20b"), vec![pname("ex", "a%20b")]);
    }

    #[test]
    fn test_blank_nodes() {
        assert_eq!(
            tok("_:b1"),
            vec![TokenKind::BlankNodeLabel(Arc::from("b1"))]
        );
        assert_eq!(tok("[]"), vec![TokenKind::Anon]);
        assert_eq!(tok("[ ]"), vec![TokenKind::Anon]);
        assert_eq!(tok("()"), vec![TokenKind::Nil]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(tok("a"), vec![TokenKind::KwA]);
        assert_eq!(tok("true false"), vec![TokenKind::KwTrue, TokenKind::KwFalse]);
        assert_eq!(tok("@prefix"), vec![TokenKind::KwPrefix]);
        assert_eq!(tok("@base"), vec![TokenKind::KwBase]);
        assert_eq!(tok("PREFIX"), vec![TokenKind::KwSparqlPrefix]);
        assert_eq!(tok("prefix"), vec![TokenKind::KwSparqlPrefix]);
        assert_eq!(tok("Base"), vec![TokenKind::KwSparqlBase]);
        assert_eq!(tok("GRAPH graph"), vec![TokenKind::KwGraph, TokenKind::KwGraph]);
        // a prefix named like a keyword is still a prefix
        assert_eq!(tok("graph:x"), vec![pname("graph", "x")]);
    }

    #[test]
    fn test_lang_tag() {
        assert_eq!(tok("@en"), vec![TokenKind::LangTag(Arc::from("en"))]);
        assert_eq!(tok("@en-US"), vec![TokenKind::LangTag(Arc::from("en-US"))]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(tok("\"hello\""), vec![TokenKind::String(Arc::from("hello"))]);
        assert_eq!(tok("'hello'"), vec![TokenKind::String(Arc::from("hello"))]);
        assert_eq!(
            tok("\"hello\\nworld\""),
            vec![TokenKind::String(Arc::from("hello\nworld"))]
        );
        assert_eq!(
            tok("\"a. b\" ."),
            vec![TokenKind::String(Arc::from("a. b")), TokenKind::Dot]
        );
        assert_eq!(tok("\"\""), vec![TokenKind::String(Arc::from(""))]);
    }

    #[test]
    fn test_long_strings() {
        assert_eq!(
            tok("\"\"\"hello\nworld\"\"\""),
            vec![TokenKind::String(Arc::from("hello\nworld"))]
        );
        assert_eq!(
            tok("'''it's \"x\" . '''"),
            vec![TokenKind::String(Arc::from("it's \"x\" . "))]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tok("42"), vec![TokenKind::Integer(42)]);
        assert_eq!(tok("-42"), vec![TokenKind::Integer(-42)]);
        assert_eq!(
            tok("123456789012345678901234567890"),
            vec![TokenKind::BigInteger(Arc::from("123456789012345678901234567890"))]
        );
        assert_eq!(tok("3.14"), vec![TokenKind::Decimal(Arc::from("3.14"))]);
        assert_eq!(tok("-.5"), vec![TokenKind::Decimal(Arc::from("-.5"))]);
        assert_eq!(tok("1e10"), vec![TokenKind::Double(1e10)]);
        assert_eq!(tok("1.5E-3"), vec![TokenKind::Double(1.5e-3)]);
        assert_eq!(tok("30."), vec![TokenKind::Integer(30), TokenKind::Dot]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tok(".;,{}"),
            vec![
                TokenKind::Dot,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]
        );
        assert_eq!(tok("^^"), vec![TokenKind::DoubleCaret]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tok("ex:name # this is a comment . \"x\nex:value"),
            vec![pname("ex", "name"), pname("ex", "value")]
        );
    }

    #[test]
    fn test_spans_and_lazy_pull() {
        let mut lexer = Lexer::new("ex:a  ex:b .");
        let a = lexer.next_token().unwrap();
        assert_eq!((a.start, a.end), (0, 4));
        assert_eq!(lexer.position(), 4);
        let b = lexer.next_token().unwrap();
        assert_eq!((b.start, b.end), (6, 10));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Dot);
        assert!(lexer.next_token().unwrap().is_eof());
        assert!(lexer.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_lazy_lexer_stops_before_bad_input() {
        let mut lexer = Lexer::new("ex:a $");
        assert!(lexer.next_token().is_ok());
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_error_unexpected_char() {
        let msg = tokenize("ex:name $ ex:value").unwrap_err().to_string();
        assert!(msg.contains("unexpected character"));
        assert!(msg.contains('$'));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_error_unterminated_string() {
        let msg = tokenize("ex:name \"unterminated").unwrap_err().to_string();
        assert!(msg.contains("unterminated string literal"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_error_with_line_info() {
        let msg = tokenize("ex:name \"ok\" .\nex:other $ .")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains('$'));
    }

    #[test]
    fn test_error_position_uses_origin() {
        let mut lexer = Lexer::new("HEADER\nex:a $").with_origin(PositionOrigin::new(7, 100));
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.position(), Some(105));
        assert!(err.to_string().contains("byte offset 105"));
    }
}
