//! The parser seam.
//!
//! Readers do not parse; they hand assembled fragments to a
//! [`StatementParser`] and pull statements from the stream it returns.

use fluree_graph_ir::{Positioned, Statement};
use fluree_graph_turtle::{StatementIter, Syntax, TurtleError};

use crate::assemble::Fragment;

/// Lazy statement stream of one fragment. Ends after the first error.
pub type StatementStream =
    Box<dyn Iterator<Item = Result<Positioned<Statement>, TurtleError>> + Send>;

/// Parses fragment buffers into positioned statements.
pub trait StatementParser: Send + Sync {
    fn parse(&self, fragment: &Fragment) -> StatementStream;
}

/// The Turtle/TriG parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurtleStatementParser {
    syntax: Syntax,
}

impl TurtleStatementParser {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }
}

impl StatementParser for TurtleStatementParser {
    fn parse(&self, fragment: &Fragment) -> StatementStream {
        Box::new(StatementIter::new(
            fragment.shared_text(),
            self.syntax,
            fragment.origin(),
        ))
    }
}
