//! Canonical gram text — serialize patterns back to notation.
//!
//! ```text
//! Pattern<Subject> → Display → "(a)-[:KNOWS]->(b)"
//!   → parse() yields an equal pattern
//! ```
//!
//! Each pattern picks the most specific written form that re-parses to the
//! same structure: node, relationship, annotation, path, and finally the
//! group form which can express anything.

use std::fmt;

use tracing::trace;

use crate::gram::Document;
use crate::model::value::{write_name, write_record};
use crate::model::{Pattern, Subject};

/// Serialize one pattern to canonical gram text.
///
/// Rendering recurses once per nesting level. Trees within the parser's
/// depth limit (`ParseOptions::max_depth`) always render; a tree built in
/// code with tens of thousands of nested levels can exhaust the stack.
pub fn serialize(pattern: &Pattern<Subject>) -> String {
    pattern.to_string()
}

/// Serialize patterns one per line.
pub fn serialize_patterns(patterns: &[Pattern<Subject>]) -> String {
    trace!(patterns = patterns.len(), "serializing gram");
    let lines: Vec<String> = patterns.iter().map(serialize).collect();
    lines.join("\n")
}

/// Serialize a parsed document one pattern per line.
pub fn serialize_document(doc: &Document) -> String {
    serialize_patterns(doc.patterns())
}

impl fmt::Display for Pattern<Subject> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Form::of(self) {
            Form::Node => write_node(f, &self.value),
            Form::Relationship => write_relationship(f, self),
            Form::Annotated => write_annotated(f, self),
            Form::Path => write_path(f, self),
            Form::Group => write_group(f, self),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.patterns().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Form selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Node,
    Relationship,
    Annotated,
    Path,
    Group,
}

impl Form {
    fn of(p: &Pattern<Subject>) -> Self {
        if p.is_atomic() {
            Form::Node
        } else if is_relationship(p) {
            Form::Relationship
        } else if is_annotation(p) {
            Form::Annotated
        } else if is_path(p) {
            Form::Path
        } else {
            Form::Group
        }
    }
}

/// Anonymous value over exactly a source and a target node.
fn is_relationship(p: &Pattern<Subject>) -> bool {
    p.value.is_anonymous() && p.elements.len() == 2 && p.elements.iter().all(Pattern::is_atomic)
}

/// Anonymous, unlabelled value carrying only properties, wrapping one pattern.
fn is_annotation(p: &Pattern<Subject>) -> bool {
    p.value.is_anonymous()
        && p.value.labels.is_empty()
        && !p.value.properties.is_empty()
        && p.elements.len() == 1
}

/// Empty value over relationships where each target is the next source.
fn is_path(p: &Pattern<Subject>) -> bool {
    p.value.is_empty()
        && p.elements.len() >= 2
        && p.elements.iter().all(is_relationship)
        && p.elements.windows(2).all(|w| w[0].elements[1] == w[1].elements[0])
}

// ============================================================================
// Writers
// ============================================================================

/// `id:Label1:Label2 {k: v}` with empty parts omitted.
fn write_subject(f: &mut fmt::Formatter<'_>, s: &Subject) -> fmt::Result {
    if !s.is_anonymous() {
        write_name(f, s.identity())?;
    }
    for label in &s.labels {
        write!(f, ":")?;
        write_name(f, label)?;
    }
    if !s.properties.is_empty() {
        if !s.is_anonymous() || !s.labels.is_empty() {
            write!(f, " ")?;
        }
        write_record(f, &s.properties)?;
    }
    Ok(())
}

fn write_node(f: &mut fmt::Formatter<'_>, s: &Subject) -> fmt::Result {
    write!(f, "(")?;
    write_subject(f, s)?;
    write!(f, ")")
}

/// `-->` or `-[head]->`.
fn write_arrow(f: &mut fmt::Formatter<'_>, head: &Subject) -> fmt::Result {
    if head.is_empty() {
        return write!(f, "-->");
    }
    write!(f, "-[")?;
    write_subject(f, head)?;
    write!(f, "]->")
}

fn write_relationship(f: &mut fmt::Formatter<'_>, p: &Pattern<Subject>) -> fmt::Result {
    write_node(f, &p.elements[0].value)?;
    write_arrow(f, &p.value)?;
    write_node(f, &p.elements[1].value)
}

fn write_path(f: &mut fmt::Formatter<'_>, p: &Pattern<Subject>) -> fmt::Result {
    write_node(f, &p.elements[0].elements[0].value)?;
    for rel in &p.elements {
        write_arrow(f, &rel.value)?;
        write_node(f, &rel.elements[1].value)?;
    }
    Ok(())
}

fn write_annotated(f: &mut fmt::Formatter<'_>, p: &Pattern<Subject>) -> fmt::Result {
    for (key, value) in p.value.properties.iter() {
        write!(f, "@")?;
        write_name(f, key)?;
        write!(f, "({value}) ")?;
    }
    let inner = &p.elements[0];
    // A directly nested annotation would merge into this one on re-parse.
    if Form::of(inner) == Form::Annotated {
        write_group(f, inner)
    } else {
        write!(f, "{inner}")
    }
}

/// `[head | child, child]`, the form every composite can take.
fn write_group(f: &mut fmt::Formatter<'_>, p: &Pattern<Subject>) -> fmt::Result {
    write!(f, "[")?;
    write_subject(f, &p.value)?;
    if !p.elements.is_empty() {
        if p.value.is_empty() {
            write!(f, "| ")?;
        } else {
            write!(f, " | ")?;
        }
        for (i, child) in p.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
    }
    write!(f, "]")
}
