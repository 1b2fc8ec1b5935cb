//! Error types for Turtle/TriG parsing
//!
//! Positions are byte offsets in the source file (see `PositionOrigin`).

/// Error type for Turtle/TriG parsing operations
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    /// Lexer error (invalid token)
    #[error("Lexer error at position {position}: {message}")]
    Lexer { position: u64, message: String },

    /// Parser error (unexpected token or invalid structure)
    #[error("Parse error at position {position}: {message}")]
    Parse { position: u64, message: String },

    /// IRI resolution error (relative IRI without base)
    #[error("IRI resolution error: {0}")]
    IriResolution(String),

    /// Prefix not declared before use
    #[error("Undefined prefix '{prefix}:' at position {position}")]
    UndefinedPrefix { prefix: String, position: u64 },
}

/// Result type for Turtle operations
pub type Result<T> = std::result::Result<T, TurtleError>;

impl TurtleError {
    /// Create a lexer error
    pub fn lexer(position: u64, message: impl Into<String>) -> Self {
        Self::Lexer {
            position,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(position: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// File offset the error points at, when known
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::Lexer { position, .. }
            | Self::Parse { position, .. }
            | Self::UndefinedPrefix { position, .. } => Some(*position),
            Self::IriResolution(_) => None,
        }
    }
}
