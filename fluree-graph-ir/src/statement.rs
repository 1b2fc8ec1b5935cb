//! Statements (triples and quads) and their source positions.

use crate::Term;
use serde::{Deserialize, Serialize};

/// A triple, or a quad when `g` names a graph.
///
/// `g == None` means the default graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub s: Term,
    pub p: Term,
    pub o: Term,
    pub g: Option<Term>,
}

impl Statement {
    /// A triple in the default graph
    pub fn triple(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o, g: None }
    }

    /// A quad in graph `g` (`None` for the default graph)
    pub fn quad(s: Term, p: Term, o: Term, g: Option<Term>) -> Self {
        Self { s, p, o, g }
    }

    pub fn is_default_graph(&self) -> bool {
        self.g.is_none()
    }

    /// Drop the graph component.
    pub fn into_triple(self) -> Self {
        Self { g: None, ..self }
    }
}

/// N-Quads line (without the trailing newline).
impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.g {
            Some(g) => write!(f, "{} {} {} {} .", self.s, self.p, self.o, g),
            None => write!(f, "{} {} {} .", self.s, self.p, self.o),
        }
    }
}

/// Where a statement came from in the original file.
///
/// `offset` is the byte offset of the first token of the top-level statement
/// that produced it; `index` is the 0-based ordinal of the statement among
/// those produced by that top-level statement. Ordering is lexicographic, so
/// keys increase monotonically in file order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PositionKey {
    pub offset: u64,
    pub index: u32,
}

impl PositionKey {
    pub fn new(offset: u64, index: u32) -> Self {
        Self { offset, index }
    }
}

impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.offset, self.index)
    }
}

/// A value tagged with its source position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Positioned<T> {
    pub key: PositionKey,
    pub value: T,
}

impl<T> Positioned<T> {
    pub fn new(key: PositionKey, value: T) -> Self {
        Self { key, value }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Positioned<U> {
        Positioned {
            key: self.key,
            value: f(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nquads_display() {
        let t = Statement::triple(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        assert_eq!(
            t.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" ."
        );

        let q = Statement::quad(
            Term::blank("b1"),
            Term::iri("http://example.org/p"),
            Term::integer(1),
            Some(Term::iri("http://example.org/g")),
        );
        assert_eq!(
            q.to_string(),
            "_:b1 <http://example.org/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> <http://example.org/g> ."
        );
        assert!(!q.is_default_graph());
        assert!(q.into_triple().is_default_graph());
    }

    #[test]
    fn test_position_key_ordering() {
        let a = PositionKey::new(10, 0);
        let b = PositionKey::new(10, 1);
        let c = PositionKey::new(11, 0);
        assert!(a < b && b < c);
        assert_eq!(b.to_string(), "10#1");
    }
}
