//! Format-agnostic RDF statement intermediate representation
//!
//! This crate provides canonical types for representing RDF statements that
//! are produced by parsers and consumed by readers, regardless of the
//! serialization format (Turtle, TriG, N-Quads, etc.).
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form.
//!
//! 2. **Explicit datatypes** - Literals always have an explicit datatype, never
//!    optional. Plain strings use `xsd:string`, language-tagged strings use
//!    `rdf:langString`.
//!
//! 3. **Positions travel with statements** - Parsers emit every statement with
//!    a `PositionKey` derived from its byte offset in the source file.
//!
//! # Example
//!
//! ```
//! use fluree_graph_ir::{PositionKey, Positioned, Statement, Term};
//!
//! let stmt = Positioned::new(
//!     PositionKey::new(0, 0),
//!     Statement::triple(
//!         Term::iri("http://example.org/alice"),
//!         Term::iri("http://xmlns.com/foaf/0.1/name"),
//!         Term::string("Alice"),
//!     ),
//! );
//! assert_eq!(
//!     stmt.value.to_string(),
//!     "<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> \"Alice\" ."
//! );
//! ```

pub mod datatype;
mod dataset;
mod sink;
mod statement;
mod term;
pub mod vocab;

pub use datatype::Datatype;
pub use dataset::Dataset;
pub use sink::{StatementCollector, StatementSink, TermId, TermTable};
pub use statement::{PositionKey, Positioned, Statement};
pub use term::{BlankId, LiteralValue, Term};
