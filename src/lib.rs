//! # gram-codec — Gram Notation Codec
//!
//! Parses gram notation into `Pattern<Subject>` trees and serializes them
//! back to canonical text.
//!
//! ## Design Principles
//!
//! 1. **Parser owns nothing**: text → tokens → patterns is a pure function
//! 2. **Clean DTOs**: `Pattern`, `Subject`, `Value` cross every boundary
//! 3. **Fail fast**: the first structural violation is returned with its location
//! 4. **Total serializer**: every in-memory pattern renders to text that re-parses
//!
//! ## Quick Start
//!
//! ```rust
//! use gram_codec::{parse, round_trip, Value};
//!
//! let doc = parse(r#"(alice:Person {name: "Alice"})-[:KNOWS]->(bob:Person)"#)?;
//! assert_eq!(doc.pattern_count(), 1);
//! assert!(doc.identifiers().contains("alice"));
//!
//! let knows = &doc.patterns()[0];
//! let alice = &knows.elements[0].value;
//! assert_eq!(alice.get_property("name"), Some(&Value::from("Alice")));
//!
//! assert_eq!(
//!     round_trip("(a)-[:KNOWS]->(b)")?,
//!     "(a)-[:KNOWS]->(b)",
//! );
//! # Ok::<(), gram_codec::ParseError>(())
//! ```
//!
//! ## Notation
//!
//! | Form | Example | Pattern |
//! |------|---------|---------|
//! | Node | `(a:Person {age: 30})` | atomic |
//! | Relationship | `(a)-[:KNOWS]->(b)` | anonymous value, elements `[a, b]` |
//! | Undirected | `(a)--(b)`, `(a)~~(b)` | anonymous value, elements `[a, b]` |
//! | Path | `(a)-->(b)-->(c)` | anonymous value, one element per relationship |
//! | Group | `[team:Team \| (a), (b)]` | `team`, elements `[a, b]` |
//! | Annotation | `@type(node) (a)` | anonymous value with `{type: node}`, elements `[a]` |

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod gram;
pub mod serializer;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Pattern, PropertyMap, Subject, Symbol, Value};

// ============================================================================
// Re-exports: Codec
// ============================================================================

pub use gram::{
    parse, parse_with, parse_single, validate, round_trip,
    Document, ParseOptions, ParseSummary,
};
pub use serializer::{serialize, serialize_document, serialize_patterns};

/// Semantic version of the codec.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// Error Types
// ============================================================================

/// Position in the source text: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolve a byte offset against the source it came from. Columns count
    /// characters, not bytes.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count())
            + 1;
        Self { offset, line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Tokenizer failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal starting at {location}")]
    UnterminatedString { location: Location },

    #[error("unterminated quoted identifier starting at {location}")]
    UnterminatedIdentifier { location: Location },

    #[error("unterminated block comment starting at {location}")]
    UnterminatedComment { location: Location },

    #[error("unexpected character '{found}' at {location}")]
    UnexpectedCharacter { location: Location, found: char },

    #[error("invalid numeric literal '{text}' at {location}")]
    InvalidNumber { location: Location, text: String },
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            LexError::UnterminatedString { location }
            | LexError::UnterminatedIdentifier { location }
            | LexError::UnterminatedComment { location }
            | LexError::UnexpectedCharacter { location, .. }
            | LexError::InvalidNumber { location, .. } => *location,
        }
    }
}

/// The limit a `LimitExceeded` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Limit {
    /// Maximum bracket nesting depth.
    Depth(usize),
    /// Maximum input length in bytes.
    InputLength(usize),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Depth(n) => write!(f, "maximum nesting depth {n}"),
            Limit::InputLength(n) => write!(f, "maximum input length {n} bytes"),
        }
    }
}

/// Parser failure. The first violation wins; nothing is aggregated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unclosed '{bracket}' opened at {location}")]
    UnclosedBracket { location: Location, bracket: char },

    #[error("invalid nesting at {location}: a node cannot directly contain another node")]
    InvalidNesting { location: Location },

    #[error("properties at {location} do not belong to a node or subject")]
    OrphanProperties { location: Location },

    #[error("property '{key}' has no value at {location}")]
    EmptyPropertyValue { location: Location, key: String },

    #[error("duplicate key '{key}' at {location}")]
    DuplicateKey { location: Location, key: String },

    #[error("annotation '@{name}' at {location} is not followed by a pattern")]
    DanglingAnnotation { location: Location, name: String },

    #[error("{limit} exceeded at {location}")]
    LimitExceeded { location: Location, limit: Limit },

    #[error("unexpected {found} at {location}, expected {expected}")]
    UnexpectedToken { location: Location, found: String, expected: String },
}

/// Fieldless discriminant of [`ParseError`], for matching and host bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    Lex,
    UnclosedBracket,
    InvalidNesting,
    OrphanProperties,
    EmptyPropertyValue,
    DuplicateKey,
    DanglingAnnotation,
    LimitExceeded,
    UnexpectedToken,
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            ParseError::Lex(e) => e.location(),
            ParseError::UnclosedBracket { location, .. }
            | ParseError::InvalidNesting { location }
            | ParseError::OrphanProperties { location }
            | ParseError::EmptyPropertyValue { location, .. }
            | ParseError::DuplicateKey { location, .. }
            | ParseError::DanglingAnnotation { location, .. }
            | ParseError::LimitExceeded { location, .. }
            | ParseError::UnexpectedToken { location, .. } => *location,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::Lex(_) => ParseErrorKind::Lex,
            ParseError::UnclosedBracket { .. } => ParseErrorKind::UnclosedBracket,
            ParseError::InvalidNesting { .. } => ParseErrorKind::InvalidNesting,
            ParseError::OrphanProperties { .. } => ParseErrorKind::OrphanProperties,
            ParseError::EmptyPropertyValue { .. } => ParseErrorKind::EmptyPropertyValue,
            ParseError::DuplicateKey { .. } => ParseErrorKind::DuplicateKey,
            ParseError::DanglingAnnotation { .. } => ParseErrorKind::DanglingAnnotation,
            ParseError::LimitExceeded { .. } => ParseErrorKind::LimitExceeded,
            ParseError::UnexpectedToken { .. } => ParseErrorKind::UnexpectedToken,
        }
    }
}

/// Invariant violations caught by the model constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("subject identity must not be empty")]
    EmptyIdentity,

    #[error("range lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { lower: f64, upper: f64 },
}

pub type Result<T> = std::result::Result<T, ParseError>;
