//! # Gram Notation
//!
//! Tokenizer and validating parser producing `Pattern<Subject>` trees.
//! Pure functions — no I/O, no shared state.

pub mod document;
pub mod lexer;
pub mod options;
pub mod parser;

pub use document::{Document, ParseSummary};
pub use options::ParseOptions;

use tracing::{debug, trace};

use crate::model::{Pattern, Subject};
use crate::{Limit, Location, ParseError, Result};

/// Parse gram text into a document with default limits.
pub fn parse(input: &str) -> Result<Document> {
    parse_with(input, &ParseOptions::default())
}

/// Parse gram text into a document.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Document> {
    debug!(len = input.len(), "parsing gram");
    check_input_len(input, options)?;

    let result = lexer::tokenize(input)
        .map_err(ParseError::from)
        .and_then(|tokens| parser::parse_document(&tokens, input, options));

    match result {
        Ok(patterns) => {
            debug!(patterns = patterns.len(), "parsed gram");
            Ok(Document::new(patterns))
        }
        Err(e) => {
            debug!(error = %e, kind = ?e.kind(), "gram parse failed");
            Err(e)
        }
    }
}

/// Parse text that must contain exactly one top-level pattern.
pub fn parse_single(input: &str) -> Result<Pattern<Subject>> {
    let options = ParseOptions::default();
    check_input_len(input, &options)?;
    let tokens = lexer::tokenize(input)?;
    parser::parse_single_pattern(&tokens, input, &options)
}

/// True iff `parse` would succeed.
pub fn validate(input: &str) -> bool {
    let valid = parse(input).is_ok();
    trace!(valid, "validated gram");
    valid
}

/// Parse, then serialize to canonical text.
pub fn round_trip(input: &str) -> Result<String> {
    let doc = parse(input)?;
    Ok(crate::serializer::serialize_document(&doc))
}

fn check_input_len(input: &str, options: &ParseOptions) -> Result<()> {
    if input.len() > options.max_input_len {
        return Err(ParseError::LimitExceeded {
            location: Location::from_offset(input, options.max_input_len),
            limit: Limit::InputLength(options.max_input_len),
        });
    }
    Ok(())
}
