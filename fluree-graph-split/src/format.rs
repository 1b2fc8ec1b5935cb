//! Per-syntax lexical rules.
//!
//! A `FormatRules` table is everything the boundary scanner needs to know
//! about a syntax. Tables are static and selected once per reader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use fluree_graph_turtle::Syntax;

/// Supported input syntaxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Turtle,
    Trig,
}

/// Shape of the records a reader hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// One triple per record (graph dropped)
    Triple,
    /// One quad per record
    Quad,
    /// All quads of one top-level statement
    Dataset,
}

impl FormatKind {
    pub fn rules(self) -> &'static FormatRules {
        match self {
            FormatKind::Turtle => &TURTLE,
            FormatKind::Trig => &TRIG,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Turtle => "turtle",
            FormatKind::Trig => "trig",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(FormatKind::Turtle),
            "trig" => Some(FormatKind::Trig),
            _ => None,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(FormatKind::Turtle),
            "trig" => Ok(FormatKind::Trig),
            other => Err(format!("unknown format '{other}' (expected turtle or trig)")),
        }
    }
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Triple => "triple",
            RecordKind::Quad => "quad",
            RecordKind::Dataset => "dataset",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triple" => Ok(RecordKind::Triple),
            "quad" => Ok(RecordKind::Quad),
            "dataset" => Ok(RecordKind::Dataset),
            other => Err(format!(
                "unknown record kind '{other}' (expected triple, quad or dataset)"
            )),
        }
    }
}

/// Lexical rules of one syntax.
#[derive(Debug)]
pub struct FormatRules {
    pub kind: FormatKind,
    /// Statement terminator
    pub terminator: u8,
    /// Nesting pairs, `(open, close)`
    pub brackets: &'static [(u8, u8)],
    /// Quote characters; each also has a long form
    pub quotes: &'static [u8],
    /// Length of the long-form quote run (`"""`)
    pub long_quote_len: usize,
    /// IRI reference delimiters
    pub iri: (u8, u8),
    pub comment: u8,
    pub escape: u8,
    /// Closing this bracket at depth 0 also ends a statement (TriG graph blocks)
    pub block: Option<(u8, u8)>,
    /// Keywords that may open a statement, matched case-insensitively
    pub keywords: &'static [&'static str],
    /// Records this syntax can produce
    pub records: &'static [RecordKind],
}

pub static TURTLE: FormatRules = FormatRules {
    kind: FormatKind::Turtle,
    terminator: b'.',
    brackets: &[(b'[', b']'), (b'(', b')')],
    quotes: &[b'"', b'\''],
    long_quote_len: 3,
    iri: (b'<', b'>'),
    comment: b'#',
    escape: b'\\',
    block: None,
    keywords: &["PREFIX", "BASE"],
    records: &[RecordKind::Triple],
};

pub static TRIG: FormatRules = FormatRules {
    kind: FormatKind::Trig,
    terminator: b'.',
    brackets: &[(b'[', b']'), (b'(', b')'), (b'{', b'}')],
    quotes: &[b'"', b'\''],
    long_quote_len: 3,
    iri: (b'<', b'>'),
    comment: b'#',
    escape: b'\\',
    block: Some((b'{', b'}')),
    keywords: &["PREFIX", "BASE", "GRAPH"],
    records: &[RecordKind::Quad, RecordKind::Dataset],
};

impl FormatRules {
    pub fn syntax(&self) -> Syntax {
        match self.kind {
            FormatKind::Turtle => Syntax::Turtle,
            FormatKind::Trig => Syntax::TriG,
        }
    }

    pub fn has_graph_blocks(&self) -> bool {
        self.block.is_some()
    }

    pub fn supports(&self, record: RecordKind) -> bool {
        self.records.contains(&record)
    }

    pub fn is_quote(&self, b: u8) -> bool {
        self.quotes.contains(&b)
    }

    pub fn opener(&self, b: u8) -> Option<u8> {
        self.brackets
            .iter()
            .find(|(open, _)| *open == b)
            .map(|(_, close)| *close)
    }

    pub fn is_closer(&self, b: u8) -> bool {
        self.brackets.iter().any(|(_, close)| *close == b)
    }

    pub fn is_block_close(&self, b: u8) -> bool {
        self.block.is_some_and(|(_, close)| close == b)
    }

    pub fn is_block_open(&self, b: u8) -> bool {
        self.block.is_some_and(|(open, _)| open == b)
    }

    /// SPARQL-style directive keywords end without a terminator.
    pub fn is_directive_keyword(&self, word: &str) -> bool {
        word.eq_ignore_ascii_case("PREFIX") || word.eq_ignore_ascii_case("BASE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(TURTLE.opener(b'['), Some(b']'));
        assert_eq!(TURTLE.opener(b'{'), None);
        assert_eq!(TRIG.opener(b'{'), Some(b'}'));
        assert!(TRIG.is_block_close(b'}'));
        assert!(!TURTLE.is_block_close(b'}'));
        assert!(TURTLE.is_closer(b')'));
    }

    #[test]
    fn test_records() {
        assert!(TURTLE.supports(RecordKind::Triple));
        assert!(!TURTLE.supports(RecordKind::Dataset));
        assert!(TRIG.supports(RecordKind::Dataset));
        assert!(TRIG.supports(RecordKind::Quad));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("TTL".parse::<FormatKind>(), Ok(FormatKind::Turtle));
        assert_eq!("trig".parse::<FormatKind>(), Ok(FormatKind::Trig));
        assert!("nquads".parse::<FormatKind>().is_err());
        assert_eq!("Dataset".parse::<RecordKind>(), Ok(RecordKind::Dataset));
        assert_eq!(FormatKind::from_extension("TriG"), Some(FormatKind::Trig));
        assert_eq!(FormatKind::Trig.rules().syntax(), Syntax::TriG);
    }
}
