//! Parser limits.

use serde::{Deserialize, Serialize};

/// Limits the parser enforces before and during parsing. Adversarial input
/// (deep bracket nesting, huge documents) fails with
/// `ParseError::LimitExceeded` instead of exhausting the stack.
///
/// Deserializable so a host can load it from its own config file; missing
/// fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum nesting of brackets, braces and parentheses.
    pub max_depth: usize,
    /// Maximum input size in bytes.
    pub max_input_len: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
    pub const DEFAULT_MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_input_len: Self::DEFAULT_MAX_INPUT_LEN,
        }
    }
}
