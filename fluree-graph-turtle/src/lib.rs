//! Turtle and TriG parser.
//!
//! This crate provides a pull-based Turtle/TriG parser that emits to
//! `fluree_graph_ir::StatementSink`, with every statement tagged by its byte
//! position in the source file.
//!
//! # Example
//!
//! ```
//! use fluree_graph_turtle::{parse, parse_statements, Syntax};
//! use fluree_graph_ir::StatementCollector;
//!
//! let turtle = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice ex:name "Alice" ;
//!              ex:age 30 .
//! "#;
//!
//! // Option 1: Parse to a StatementSink
//! let mut sink = StatementCollector::new();
//! parse(turtle, &mut sink).unwrap();
//! assert_eq!(sink.statements().len(), 2);
//!
//! // Option 2: Collect positioned statements
//! let stmts = parse_statements(turtle, Syntax::Turtle).unwrap();
//! assert!(stmts[0].key < stmts[1].key);
//! ```

pub mod error;
pub mod iri;
pub mod lex;
pub mod parser;
pub mod position;

pub use error::{Result, TurtleError};
pub use iri::resolve_iri;
pub use lex::{tokenize, Lexer, Token, TokenKind};
pub use parser::{parse, parse_statements, parse_trig, Parser, StatementIter, Syntax};
pub use position::PositionOrigin;

#[cfg(test)]
mod tests {
    use super::*;
    use fluree_graph_ir::Term;

    const DOC: &str = r#"@prefix ex: <http://example.org/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

ex:alice a foaf:Person ;
         foaf:name "Alice" ;
         foaf:knows [ foaf:name "Bob" ] .

ex:bob foaf:name "Bob. Jr" ;
       ex:colors ( "red" "green" ) .
"#;

    #[test]
    fn test_statement_count() {
        let stmts = parse_statements(DOC, Syntax::Turtle).unwrap();
        // alice: 3 + inner 1; bob: 1 + 1 + list 4
        assert_eq!(stmts.len(), 10);
    }

    #[test]
    fn test_keys_are_monotonic() {
        let stmts = parse_statements(DOC, Syntax::Turtle).unwrap();
        assert!(stmts.windows(2).all(|w| w[0].key < w[1].key));
    }

    #[test]
    fn test_suffix_parse_matches_whole_parse() {
        let whole = parse_statements(DOC, Syntax::Turtle).unwrap();

        // Re-parse the `ex:bob` statement alone, prefixed by the directives.
        let cut = DOC.find("ex:bob foaf").unwrap();
        let header = "@prefix ex: <http://example.org/> .\n@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n";
        let buffer = format!("{}{}", header, &DOC[cut..]);
        let origin = PositionOrigin::new(header.len(), cut as u64);
        let part: Vec<_> = StatementIter::new(buffer, Syntax::Turtle, origin)
            .collect::<Result<_>>()
            .unwrap();

        let tail: Vec<_> = whole
            .into_iter()
            .filter(|s| s.key.offset >= cut as u64)
            .collect();
        assert_eq!(part, tail);
        assert_eq!(part[0].value.s, Term::iri("http://example.org/bob"));
    }

    #[test]
    fn test_oversized_integer_keeps_lexical_form() {
        let stmts = parse_statements(
            "<http://ex.org/s> <http://ex.org/p> 123456789012345678901234567890 .",
            Syntax::Turtle,
        )
        .unwrap();
        assert_eq!(
            stmts[0].value.o,
            Term::typed(
                "123456789012345678901234567890",
                fluree_graph_ir::Datatype::xsd_integer()
            )
        );
    }

    #[test]
    fn test_trig_entry_point() {
        let mut sink = fluree_graph_ir::StatementCollector::new();
        parse_trig(
            "<http://ex.org/g> { <http://ex.org/s> <http://ex.org/p> 1 }",
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            sink.statements()[0].value.g,
            Some(Term::iri("http://ex.org/g"))
        );
    }
}
