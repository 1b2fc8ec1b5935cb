//! Turtle/TriG parser that emits to a StatementSink.
//!
//! Tokens are pulled lazily from the lexer, one top-level statement at a
//! time. Every emitted statement carries a `PositionKey` built from the file
//! offset of the top-level statement's first token, and anonymous blank nodes
//! are labeled from the file offset of the token that created them. Parsing a
//! slice of a file (with the right `PositionOrigin` and prefixes) therefore
//! yields exactly the statements a whole-file parse yields for that slice.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use fluree_graph_ir::vocab::rdf;
use fluree_graph_ir::{
    BlankId, Datatype, LiteralValue, PositionKey, Positioned, Statement, StatementSink, Term,
    TermId, TermTable,
};

use crate::error::{Result, TurtleError};
use crate::iri::resolve_iri;
use crate::lex::{Lexer, Token, TokenKind};
use crate::position::PositionOrigin;

/// Concrete syntax accepted by the parser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Syntax {
    #[default]
    Turtle,
    /// Turtle plus `{ ... }` graph blocks
    TriG,
}

/// Turtle/TriG parser state.
pub struct Parser<S> {
    lexer: Lexer,
    /// One token of lookahead, filled on demand
    current: Option<Token>,
    sink: S,
    syntax: Syntax,
    origin: PositionOrigin,
    /// Prefix mappings (prefix -> namespace IRI)
    prefixes: HashMap<String, String>,
    /// Base IRI for relative IRI resolution
    base: Option<String>,
    /// Graph of the enclosing TriG block
    graph: Option<TermId>,
    /// Key for the next emitted statement
    next_key: PositionKey,
}

impl<S: StatementSink> Parser<S> {
    /// Create a Turtle parser over `input`.
    pub fn new(input: impl Into<Arc<str>>, sink: S) -> Self {
        Self {
            lexer: Lexer::new(input),
            current: None,
            sink,
            syntax: Syntax::Turtle,
            origin: PositionOrigin::IDENTITY,
            prefixes: HashMap::new(),
            base: None,
            graph: None,
            next_key: PositionKey::default(),
        }
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Map buffer positions to file positions through `origin`.
    pub fn with_origin(mut self, origin: PositionOrigin) -> Self {
        self.lexer = self.lexer.with_origin(origin);
        self.origin = origin;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Parse the entire document and hand back the sink.
    pub fn parse(mut self) -> Result<S> {
        while self.parse_next_statement()? {}
        Ok(self.sink)
    }

    /// Parse one top-level statement (a directive, a triples statement, or a
    /// TriG graph block). Returns `false` at end of input.
    pub fn parse_next_statement(&mut self) -> Result<bool> {
        let (start, kind) = {
            let token = self.peek()?;
            (token.start, token.kind.clone())
        };
        self.next_key = PositionKey::new(self.origin.to_file(start), 0);
        self.graph = None;

        match kind {
            TokenKind::Eof => return Ok(false),
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix_directive()?,
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base_directive()?,
            _ if self.syntax == Syntax::TriG => self.parse_block()?,
            TokenKind::LBrace | TokenKind::KwGraph => {
                return Err(TurtleError::parse(
                    self.origin.to_file(start),
                    "graph blocks are not allowed in Turtle",
                ))
            }
            _ => self.parse_triples()?,
        }

        self.sink.on_statement_end();
        Ok(true)
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn peek(&mut self) -> Result<&Token> {
        let token = match self.current.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(&*self.current.insert(token))
    }

    fn peek_kind(&mut self) -> Result<TokenKind> {
        Ok(self.peek()?.kind.clone())
    }

    /// Consume the current token.
    fn bump(&mut self) -> Result<Token> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(kind))
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token> {
        if self.check(kind)? {
            self.bump()
        } else {
            Err(self.unexpected(what))
        }
    }

    /// "expected X, found Y" at the current token.
    fn unexpected(&mut self, what: &str) -> TurtleError {
        let origin = self.origin;
        match self.peek() {
            Ok(token) => TurtleError::parse(
                origin.to_file(token.start),
                format!("expected {}, found {}", what, token.kind),
            ),
            Err(e) => e,
        }
    }

    // =========================================================================
    // Directives
    // =========================================================================

    /// `@prefix p: <iri> .` or `PREFIX p: <iri>`
    fn parse_prefix_directive(&mut self) -> Result<()> {
        let keyword = self.bump()?;

        let prefix = match self.peek_kind()? {
            TokenKind::PrefixedNameNs(p) => p.to_string(),
            _ => return Err(self.unexpected("prefix namespace")),
        };
        self.bump()?;

        let namespace = match self.peek_kind()? {
            TokenKind::Iri(iri) => resolve_iri(self.base.as_deref(), &iri)?,
            _ => return Err(self.unexpected("IRI for prefix namespace")),
        };
        self.bump()?;

        self.sink.on_prefix(&prefix, &namespace);
        self.prefixes.insert(prefix, namespace);

        if keyword.kind == TokenKind::KwPrefix {
            self.expect(&TokenKind::Dot, "'.' after @prefix")?;
        }
        Ok(())
    }

    /// `@base <iri> .` or `BASE <iri>`; a relative base resolves against the
    /// base in force.
    fn parse_base_directive(&mut self) -> Result<()> {
        let keyword = self.bump()?;

        let base = match self.peek_kind()? {
            TokenKind::Iri(iri) if self.base.is_some() => {
                resolve_iri(self.base.as_deref(), &iri)?
            }
            TokenKind::Iri(iri) => iri.to_string(),
            _ => return Err(self.unexpected("IRI for base")),
        };
        self.bump()?;

        self.sink.on_base(&base);
        self.base = Some(base);

        if keyword.kind == TokenKind::KwBase {
            self.expect(&TokenKind::Dot, "'.' after @base")?;
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `triples '.'`
    fn parse_triples(&mut self) -> Result<()> {
        self.parse_triples_body()?;
        self.expect(&TokenKind::Dot, "'.'")?;
        Ok(())
    }

    /// Subject and predicate-object list. A `[ ... ]` subject may stand alone.
    fn parse_triples_body(&mut self) -> Result<()> {
        let property_list = self.check(&TokenKind::LBracket)?;
        let subject = self.parse_subject()?;
        if property_list
            && matches!(
                self.peek_kind()?,
                TokenKind::Dot | TokenKind::RBrace | TokenKind::Eof
            )
        {
            return Ok(());
        }
        self.parse_predicate_object_list(subject)
    }

    /// A TriG block: directive-free top-level statement.
    fn parse_block(&mut self) -> Result<()> {
        match self.peek_kind()? {
            TokenKind::KwGraph => {
                self.bump()?;
                let label = self.parse_graph_label()?;
                self.parse_wrapped_graph(Some(label))
            }
            TokenKind::LBrace => self.parse_wrapped_graph(None),
            TokenKind::Iri(_)
            | TokenKind::PrefixedName { .. }
            | TokenKind::PrefixedNameNs(_)
            | TokenKind::BlankNodeLabel(_)
            | TokenKind::Anon => {
                // Graph label or triples subject, decided by the next token
                let term = self.parse_subject()?;
                if self.check(&TokenKind::LBrace)? {
                    self.parse_wrapped_graph(Some(term))
                } else {
                    self.parse_predicate_object_list(term)?;
                    self.expect(&TokenKind::Dot, "'.'")?;
                    Ok(())
                }
            }
            _ => self.parse_triples(),
        }
    }

    fn parse_graph_label(&mut self) -> Result<TermId> {
        match self.peek_kind()? {
            TokenKind::Iri(_)
            | TokenKind::PrefixedName { .. }
            | TokenKind::PrefixedNameNs(_)
            | TokenKind::BlankNodeLabel(_)
            | TokenKind::Anon => self.parse_subject(),
            _ => Err(self.unexpected("graph name")),
        }
    }

    /// `{ triples ('.' triples)* '.'? }`
    fn parse_wrapped_graph(&mut self, graph: Option<TermId>) -> Result<()> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        self.graph = graph;

        while !self.check(&TokenKind::RBrace)? {
            self.parse_triples_body()?;
            if !self.check(&TokenKind::Dot)? {
                break;
            }
            self.bump()?;
        }

        self.expect(&TokenKind::RBrace, "'}'")?;
        self.graph = None;
        Ok(())
    }

    fn parse_predicate_object_list(&mut self, subject: TermId) -> Result<()> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, predicate)?;

            if !self.check(&TokenKind::Semicolon)? {
                return Ok(());
            }
            while self.check(&TokenKind::Semicolon)? {
                self.bump()?;
            }
            if matches!(
                self.peek_kind()?,
                TokenKind::Dot | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Eof
            ) {
                return Ok(());
            }
        }
    }

    fn parse_object_list(&mut self, subject: TermId, predicate: TermId) -> Result<()> {
        loop {
            let object = self.parse_object()?;
            self.emit(subject, predicate, object);

            if !self.check(&TokenKind::Comma)? {
                return Ok(());
            }
            self.bump()?;
        }
    }

    fn emit(&mut self, subject: TermId, predicate: TermId, object: TermId) {
        let key = self.next_key;
        self.next_key.index += 1;
        self.sink.emit(subject, predicate, object, self.graph, key);
    }

    // =========================================================================
    // Terms
    // =========================================================================

    fn parse_subject(&mut self) -> Result<TermId> {
        let token = self.peek()?.clone();
        match token.kind {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } | TokenKind::PrefixedNameNs(_) => {
                let iri = self.parse_iri_value("subject")?;
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.bump()?;
                Ok(self.sink.term_blank(BlankId::new(&*label)))
            }
            TokenKind::Anon => {
                self.bump()?;
                Ok(self.anonymous_blank("anon", &token))
            }
            TokenKind::LBracket => self.parse_blank_node_property_list(),
            TokenKind::LParen => self.parse_collection(),
            TokenKind::Nil => {
                self.bump()?;
                Ok(self.sink.term_iri(rdf::NIL))
            }
            _ => Err(self.unexpected("subject")),
        }
    }

    fn parse_predicate(&mut self) -> Result<TermId> {
        if self.check(&TokenKind::KwA)? {
            self.bump()?;
            return Ok(self.sink.term_iri(rdf::TYPE));
        }
        let iri = self.parse_iri_value("predicate")?;
        Ok(self.sink.term_iri(&iri))
    }

    fn parse_object(&mut self) -> Result<TermId> {
        match self.peek_kind()? {
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::BigInteger(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse => self.parse_literal(),
            _ => self
                .parse_subject()
                .map_err(|e| self.relabel(e, "subject", "object")),
        }
    }

    /// Rewrite an "expected subject" error raised while parsing an object.
    fn relabel(&self, err: TurtleError, from: &str, to: &str) -> TurtleError {
        match err {
            TurtleError::Parse { position, message } if message.starts_with("expected ") => {
                TurtleError::Parse {
                    position,
                    message: message.replacen(from, to, 1),
                }
            }
            other => other,
        }
    }

    /// An IRI, prefixed name, or bare namespace, fully expanded.
    fn parse_iri_value(&mut self, what: &str) -> Result<String> {
        let token = self.peek()?.clone();
        let iri = match &token.kind {
            TokenKind::Iri(iri) => resolve_iri(self.base.as_deref(), iri)?,
            TokenKind::PrefixedName { prefix, local } => self.expand(prefix, local, &token)?,
            TokenKind::PrefixedNameNs(prefix) => self.expand(prefix, "", &token)?,
            _ => return Err(self.unexpected(what)),
        };
        self.bump()?;
        Ok(iri)
    }

    fn expand(&self, prefix: &str, local: &str, token: &Token) -> Result<String> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(format!("{}{}", namespace, local)),
            None => Err(TurtleError::UndefinedPrefix {
                prefix: prefix.to_string(),
                position: self.origin.to_file(token.start),
            }),
        }
    }

    fn anonymous_blank(&mut self, kind: &str, token: &Token) -> TermId {
        let id = BlankId::anonymous(kind, self.origin.to_file(token.start));
        self.sink.term_blank(id)
    }

    /// A literal, with optional language tag or datatype.
    fn parse_literal(&mut self) -> Result<TermId> {
        let token = self.bump()?;
        let id = match token.kind {
            TokenKind::String(value) => match self.peek_kind()? {
                TokenKind::LangTag(lang) => {
                    self.bump()?;
                    self.sink
                        .term_literal(&value, Datatype::rdf_lang_string(), Some(&*lang))
                }
                TokenKind::DoubleCaret => {
                    self.bump()?;
                    let datatype = self.parse_iri_value("datatype IRI")?;
                    self.sink
                        .term_literal(&value, Datatype::from_iri(datatype), None)
                }
                _ => self.sink.term_literal(&value, Datatype::xsd_string(), None),
            },
            TokenKind::Integer(n) => self
                .sink
                .term_literal_value(LiteralValue::Integer(n), Datatype::xsd_integer()),
            TokenKind::BigInteger(s) => self.sink.term_literal(&s, Datatype::xsd_integer(), None),
            TokenKind::Decimal(s) => self.sink.term_literal(&s, Datatype::xsd_decimal(), None),
            TokenKind::Double(n) => self
                .sink
                .term_literal_value(LiteralValue::Double(n), Datatype::xsd_double()),
            TokenKind::KwTrue | TokenKind::KwFalse => self.sink.term_literal_value(
                LiteralValue::Boolean(token.kind == TokenKind::KwTrue),
                Datatype::xsd_boolean(),
            ),
            other => {
                return Err(TurtleError::parse(
                    self.origin.to_file(token.start),
                    format!("expected literal, found {}", other),
                ))
            }
        };
        Ok(id)
    }

    /// `[ predicate object ; ... ]`
    fn parse_blank_node_property_list(&mut self) -> Result<TermId> {
        let open = self.expect(&TokenKind::LBracket, "'['")?;
        let bnode = self.anonymous_blank("anon", &open);

        if !self.check(&TokenKind::RBracket)? {
            self.parse_predicate_object_list(bnode)?;
        }
        self.expect(&TokenKind::RBracket, "']'")?;
        Ok(bnode)
    }

    /// `( item1 item2 ... )` as an rdf:first/rdf:rest chain.
    ///
    /// The first cell is labeled from the `(` token, every later cell from
    /// the first token of its item.
    fn parse_collection(&mut self) -> Result<TermId> {
        let open = self.expect(&TokenKind::LParen, "'('")?;

        if self.check(&TokenKind::RParen)? {
            self.bump()?;
            return Ok(self.sink.term_iri(rdf::NIL));
        }

        let rdf_first = self.sink.term_iri(rdf::FIRST);
        let rdf_rest = self.sink.term_iri(rdf::REST);
        let rdf_nil = self.sink.term_iri(rdf::NIL);

        let head = self.anonymous_blank("list", &open);
        let mut cell = head;
        loop {
            let item = self.parse_object()?;
            self.emit(cell, rdf_first, item);

            let next = self.peek()?.clone();
            if next.kind == TokenKind::RParen {
                self.emit(cell, rdf_rest, rdf_nil);
                break;
            }
            let next_cell = self.anonymous_blank("list", &next);
            self.emit(cell, rdf_rest, next_cell);
            cell = next_cell;
        }

        self.expect(&TokenKind::RParen, "')'")?;
        Ok(head)
    }
}

// =============================================================================
// Pull-based statement stream
// =============================================================================

/// Sink that buffers the statements of one top-level statement.
#[derive(Debug, Default)]
struct QueueSink {
    terms: TermTable,
    queue: VecDeque<Positioned<Statement>>,
}

impl StatementSink for QueueSink {
    fn term_iri(&mut self, iri: &str) -> TermId {
        self.terms.push(Term::iri(iri))
    }

    fn term_blank(&mut self, id: BlankId) -> TermId {
        self.terms.blank(id)
    }

    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId {
        self.terms.literal(value, datatype, language)
    }

    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId {
        self.terms.push(Term::Literal {
            value,
            datatype,
            language: None,
        })
    }

    fn emit(
        &mut self,
        subject: TermId,
        predicate: TermId,
        object: TermId,
        graph: Option<TermId>,
        key: PositionKey,
    ) {
        let stmt = self.terms.statement(subject, predicate, object, graph);
        self.queue.push_back(Positioned::new(key, stmt));
    }

    fn on_statement_end(&mut self) {
        self.terms.clear();
    }
}

/// Lazy iterator over the positioned statements of a buffer.
///
/// Statements are parsed one top-level statement at a time. After the first
/// error the iterator is fused; statements of the failing top-level statement
/// are discarded, earlier ones have already been yielded.
pub struct StatementIter {
    parser: Parser<QueueSink>,
    done: bool,
}

impl StatementIter {
    pub fn new(input: impl Into<Arc<str>>, syntax: Syntax, origin: PositionOrigin) -> Self {
        Self {
            parser: Parser::new(input, QueueSink::default())
                .with_syntax(syntax)
                .with_origin(origin),
            done: false,
        }
    }
}

impl Iterator for StatementIter {
    type Item = Result<Positioned<Statement>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(stmt) = self.parser.sink.queue.pop_front() {
                return Some(Ok(stmt));
            }
            if self.done {
                return None;
            }
            match self.parser.parse_next_statement() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(e) => {
                    self.done = true;
                    self.parser.sink.queue.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for StatementIter {}

/// Parse a Turtle document into StatementSink events.
pub fn parse<S: StatementSink>(input: &str, sink: S) -> Result<()> {
    Parser::new(input, sink).parse().map(|_| ())
}

/// Parse a TriG document into StatementSink events.
pub fn parse_trig<S: StatementSink>(input: &str, sink: S) -> Result<()> {
    Parser::new(input, sink)
        .with_syntax(Syntax::TriG)
        .parse()
        .map(|_| ())
}

/// Parse a whole document into positioned statements.
pub fn parse_statements(input: &str, syntax: Syntax) -> Result<Vec<Positioned<Statement>>> {
    StatementIter::new(input, syntax, PositionOrigin::IDENTITY).collect()
}
