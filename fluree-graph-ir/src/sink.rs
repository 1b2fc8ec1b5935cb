//! StatementSink trait for event-driven statement construction
//!
//! Parsers call methods like `term_iri()` and `emit()` on a sink without
//! knowing the concrete sink type. The sink can be:
//! - `StatementCollector`: collects positioned statements into a `Vec`
//! - a queue sink inside a pull parser, drained one top-level statement at a time

use crate::{BlankId, Datatype, LiteralValue, PositionKey, Positioned, Statement, Term};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Opaque term identifier for efficient statement emission
///
/// A `TermId` is only valid until the next `on_statement_end()` call on the
/// sink that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermId(pub(crate) u32);

impl TermId {
    /// Create a new TermId from a raw index.
    ///
    /// For `StatementSink` implementations outside this crate.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index value.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Event-driven interface for RDF statement construction
///
/// # Example
///
/// ```
/// use fluree_graph_ir::{BlankId, Datatype, PositionKey, StatementCollector, StatementSink};
///
/// let mut sink = StatementCollector::new();
/// sink.on_prefix("foaf", "http://xmlns.com/foaf/0.1/");
///
/// let alice = sink.term_iri("http://example.org/alice");
/// let name = sink.term_iri("http://xmlns.com/foaf/0.1/name");
/// let alice_name = sink.term_literal("Alice", Datatype::xsd_string(), None);
/// sink.emit(alice, name, alice_name, None, PositionKey::new(0, 0));
/// sink.on_statement_end();
///
/// let statements = sink.finish();
/// assert_eq!(statements.len(), 1);
/// ```
pub trait StatementSink {
    /// Called when a base IRI is declared (already resolved)
    fn on_base(&mut self, _base_iri: &str) {}

    /// Called when a prefix is declared (namespace already resolved)
    fn on_prefix(&mut self, _prefix: &str, _namespace_iri: &str) {}

    /// Create an IRI term from an expanded IRI
    fn term_iri(&mut self, iri: &str) -> TermId;

    /// Create a blank node term
    fn term_blank(&mut self, id: BlankId) -> TermId;

    /// Create a literal term from its lexical form
    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId;

    /// Create a literal term from a native value
    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId;

    /// Emit a statement; `graph == None` means the default graph
    fn emit(
        &mut self,
        subject: TermId,
        predicate: TermId,
        object: TermId,
        graph: Option<TermId>,
        key: PositionKey,
    );

    /// Called after every top-level statement (including directives)
    fn on_statement_end(&mut self) {}
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    fn on_base(&mut self, base_iri: &str) {
        (**self).on_base(base_iri)
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        (**self).on_prefix(prefix, namespace_iri)
    }

    fn term_iri(&mut self, iri: &str) -> TermId {
        (**self).term_iri(iri)
    }

    fn term_blank(&mut self, id: BlankId) -> TermId {
        (**self).term_blank(id)
    }

    fn term_literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId {
        (**self).term_literal(value, datatype, language)
    }

    fn term_literal_value(&mut self, value: LiteralValue, datatype: Datatype) -> TermId {
        (**self).term_literal_value(value, datatype)
    }

    fn emit(
        &mut self,
        subject: TermId,
        predicate: TermId,
        object: TermId,
        graph: Option<TermId>,
        key: PositionKey,
    ) {
        (**self).emit(subject, predicate, object, graph, key)
    }

    fn on_statement_end(&mut self) {
        (**self).on_statement_end()
    }
}

/// Term table shared by the sinks in this crate.
///
/// Blank nodes with the same label map to the same `TermId`.
#[derive(Debug, Default)]
pub struct TermTable {
    terms: Vec<Term>,
    blanks: FxHashMap<BlankId, TermId>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a term by its ID
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id.0 as usize]
    }

    /// Add a term and return its ID
    pub fn push(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }

    pub fn blank(&mut self, id: BlankId) -> TermId {
        if let Some(&tid) = self.blanks.get(&id) {
            return tid;
        }
        let tid = self.push(Term::BlankNode(id.clone()));
        self.blanks.insert(id, tid);
        tid
    }

    pub fn literal(&mut self, value: &str, datatype: Datatype, language: Option<&str>) -> TermId {
        let term = match language {
            Some(lang) => Term::lang_string(value, lang),
            None if datatype.is_xsd_string() => Term::string(value),
            None => Term::typed(value, datatype),
        };
        self.push(term)
    }

    /// Materialize a statement from term IDs
    pub fn statement(
        &self,
        subject: TermId,
        predicate: TermId,
        object: TermId,
        graph: Option<TermId>,
    ) -> Statement {
        Statement::quad(
            self.get(subject).clone(),
            self.get(predicate).clone(),
            self.get(object).clone(),
            graph.map(|g| self.get(g).clone()),
        )
    }

    pub fn clear(&mut self) {
        self.terms.clear();
        self.blanks.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A sink that collects positioned statements
#[derive(Debug, Default)]
pub struct StatementCollector {
    statements: Vec<Positioned<Statement>>,
    terms: TermTable,
    /// Last base IRI seen
    pub base: Option<String>,
    /// Prefix mappings seen (last declaration wins)
    pub prefixes: BTreeMap<String, String>,
}

impl StatementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected statements in emission order
    pub fn statements(&self) -> &[Positioned<Statement>] {
        &self.statements
    }

    /// Consume the sink, returning the collected statements
    pub fn finish(self) -> Vec<Positioned<Statement>> {
        self.statements
    }
}

impl StatementSink for StatementCollector {
    fn on_base(&mut self, base_iri: &str) {
        self.base = Some(base_iri.to_string());
    }

    fn on_prefix(&mut self, prefix: &str, namespace_iri: &str) {
        self.prefixes
            .insert(prefix.to_string(), namespace_iri.to_string());
    }

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
        self.statements.push(Positioned::new(key, stmt));
    }

    fn on_statement_end(&mut self) {
        self.terms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_basic() {
        let mut sink = StatementCollector::new();

        let s = sink.term_iri("http://example.org/alice");
        let p = sink.term_iri("http://xmlns.com/foaf/0.1/name");
        let o = sink.term_literal("Alice", Datatype::xsd_string(), None);
        sink.emit(s, p, o, None, PositionKey::new(7, 0));
        sink.on_statement_end();

        let stmts = sink.finish();
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].key, PositionKey::new(7, 0));
        assert_eq!(stmts[0].value.s.as_iri(), Some("http://example.org/alice"));
        assert!(stmts[0].value.is_default_graph());
    }

    #[test]
    fn test_blank_labels_share_ids() {
        let mut sink = StatementCollector::new();

        let b1 = sink.term_blank(BlankId::new("b0"));
        let b2 = sink.term_blank(BlankId::new("b0"));
        assert_eq!(b1, b2);

        let b3 = sink.term_blank(BlankId::new("b1"));
        assert_ne!(b1, b3);
    }

    #[test]
    fn test_statement_end_resets_term_table() {
        let mut sink = StatementCollector::new();
        let first = sink.term_iri("http://example.org/a");
        sink.on_statement_end();
        let second = sink.term_iri("http://example.org/b");
        assert_eq!(first, second);
    }

    #[test]
    fn test_quad_emission() {
        let mut sink = StatementCollector::new();
        let s = sink.term_iri("http://example.org/s");
        let p = sink.term_iri("http://example.org/p");
        let o = sink.term_literal_value(LiteralValue::Integer(3), Datatype::xsd_integer());
        let g = sink.term_iri("http://example.org/g");
        sink.emit(s, p, o, Some(g), PositionKey::new(0, 0));

        let stmts = sink.finish();
        assert_eq!(
            stmts[0].value.g.as_ref().and_then(Term::as_iri),
            Some("http://example.org/g")
        );
    }

    #[test]
    fn test_directives_recorded() {
        let mut sink = StatementCollector::new();
        sink.on_base("http://example.org/");
        sink.on_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        assert_eq!(sink.base.as_deref(), Some("http://example.org/"));
        assert_eq!(
            sink.prefixes.get("foaf").map(String::as_str),
            Some("http://xmlns.com/foaf/0.1/")
        );
    }

    #[test]
    fn test_blanket_mut_impl() {
        fn drive<S: StatementSink>(mut sink: S) {
            let s = sink.term_iri("http://example.org/s");
            sink.emit(s, s, s, None, PositionKey::default());
        }
        let mut sink = StatementCollector::new();
        drive(&mut sink);
        assert_eq!(sink.statements().len(), 1);
    }
}
