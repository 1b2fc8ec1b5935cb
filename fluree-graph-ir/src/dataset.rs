//! RDF dataset - statements spread across a default graph and named graphs
//!
//! The `Dataset` type uses `Vec<Statement>` to preserve source order and
//! duplicates. Call `sort()` before formatting for deterministic output.

use crate::{Statement, Term};

/// A collection of statements, each in the default graph or a named graph
///
/// # Example
///
/// ```
/// use fluree_graph_ir::{Dataset, Statement, Term};
///
/// let mut ds = Dataset::new();
/// ds.add(Statement::quad(
///     Term::iri("http://example.org/alice"),
///     Term::iri("http://xmlns.com/foaf/0.1/name"),
///     Term::string("Alice"),
///     Some(Term::iri("http://example.org/g")),
/// ));
/// assert_eq!(ds.graph_names().len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    statements: Vec<Statement>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Statements in the default graph
    pub fn default_graph(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(|s| s.g.is_none())
    }

    /// Statements in the named graph `name`
    pub fn named_graph<'a>(&'a self, name: &'a Term) -> impl Iterator<Item = &'a Statement> {
        self.statements
            .iter()
            .filter(move |s| s.g.as_ref() == Some(name))
    }

    /// Distinct graph names, in first-seen order
    pub fn graph_names(&self) -> Vec<&Term> {
        let mut names: Vec<&Term> = Vec::new();
        for g in self.statements.iter().filter_map(|s| s.g.as_ref()) {
            if !names.contains(&g) {
                names.push(g);
            }
        }
        names
    }

    /// Sort statements (GSPO with the default graph first) for deterministic output
    pub fn sort(&mut self) {
        self.statements.sort_by(|a, b| {
            (&a.g, &a.s, &a.p, &a.o).cmp(&(&b.g, &b.s, &b.p, &b.o))
        });
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }
}

impl IntoIterator for Dataset {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl FromIterator<Statement> for Dataset {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Dataset {
            statements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Statement> for Dataset {
    fn extend<T: IntoIterator<Item = Statement>>(&mut self, iter: T) {
        self.statements.extend(iter);
    }
}
