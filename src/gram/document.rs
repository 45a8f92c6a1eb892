//! Parsed gram document.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Pattern, Subject};

/// The top-level patterns of a gram text, in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    patterns: Vec<Pattern<Subject>>,
}

impl Document {
    pub fn new(patterns: Vec<Pattern<Subject>>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern<Subject>] {
        &self.patterns
    }

    pub fn into_patterns(self) -> Vec<Pattern<Subject>> {
        self.patterns
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every distinct non-empty identity anywhere in the document.
    /// Anonymous subjects never appear here.
    pub fn identifiers(&self) -> BTreeSet<String> {
        self.patterns
            .iter()
            .flat_map(|p| p.values())
            .filter(|s| !s.is_anonymous())
            .map(|s| s.identity().to_owned())
            .collect()
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            pattern_count: self.pattern_count(),
            identifiers: self.identifiers(),
        }
    }
}

impl IntoIterator for Document {
    type Item = Pattern<Subject>;
    type IntoIter = std::vec::IntoIter<Pattern<Subject>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Pattern<Subject>;
    type IntoIter = std::slice::Iter<'a, Pattern<Subject>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Shape of a parse result as reported across a host binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub pattern_count: usize,
    pub identifiers: BTreeSet<String>,
}

impl ParseSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
