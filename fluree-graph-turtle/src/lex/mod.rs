//! Turtle/TriG lexer module.
//!
//! Tokenizes input lazily using winnow.

pub mod chars;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
