//! Property value type for the gram literal grammar.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::PropertyMap;
use crate::ModelError;
use crate::gram::lexer::is_identifier;

/// A gram property value.
///
/// Covers every literal form the notation can express:
/// - Scalars: String, Integer, Decimal, Boolean, Symbol
/// - Containers: Array, Map
/// - Quantities: Range, Measurement
///
/// `Symbol` is an unquoted identifier (`status: active`). It carries the
/// same text a `String` would but renders without quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Symbol(String),
    Array(Vec<Value>),
    Map(PropertyMap),
    /// Inclusive numeric range `lower..upper`, `lower <= upper`.
    ///
    /// Bounds are `f64`: integer bounds beyond 2^53 lose precision, and
    /// `1.0..2.0` and `1..2` read as the same range.
    Range { lower: f64, upper: f64 },
    /// A magnitude with a unit, written `5.0kg`.
    Measurement { magnitude: f64, unit: String },
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    /// Build a range, rejecting `lower > upper` and NaN bounds.
    pub fn range(lower: f64, upper: f64) -> Result<Self, ModelError> {
        if lower <= upper {
            Ok(Value::Range { lower, upper })
        } else {
            Err(ModelError::InvalidRange { lower, upper })
        }
    }

    pub fn measurement(magnitude: f64, unit: impl Into<String>) -> Self {
        Value::Measurement { magnitude, unit: unit.into() }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }
}

// ============================================================================
// Type checking and accessors
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "STRING",
            Value::Integer(_) => "INTEGER",
            Value::Decimal(_) => "DECIMAL",
            Value::Boolean(_) => "BOOLEAN",
            Value::Symbol(_) => "SYMBOL",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Range { .. } => "RANGE",
            Value::Measurement { .. } => "MEASUREMENT",
        }
    }

    pub fn is_numeric(&self) -> bool { matches!(self, Value::Integer(_) | Value::Decimal(_)) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Numeric widening: Integer or Decimal as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            Value::Range { lower, upper } => Some((*lower, *upper)),
            _ => None,
        }
    }

    pub fn as_measurement(&self) -> Option<(f64, &str)> {
        match self {
            Value::Measurement { magnitude, unit } => Some((*magnitude, unit.as_str())),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Boolean(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Integer(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Integer(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Decimal(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::Array(v.into_iter().map(Into::into).collect()) }
}

// ============================================================================
// Display: canonical gram literal
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write_quoted(f, s, '"'),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write_decimal(f, *d),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Symbol(s) => write_name(f, s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => write_record(f, m),
            Value::Range { lower, upper } => {
                write_bound(f, *lower)?;
                write!(f, "..")?;
                write_bound(f, *upper)
            }
            Value::Measurement { magnitude, unit } => {
                write_decimal(f, *magnitude)?;
                write_name(f, unit)
            }
        }
    }
}

/// `{k: v, ...}` in insertion order.
pub(crate) fn write_record(f: &mut fmt::Formatter<'_>, props: &PropertyMap) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in props.iter().enumerate() {
        if i > 0 { write!(f, ", ")?; }
        write_name(f, k)?;
        write!(f, ": {v}")?;
    }
    write!(f, "}}")
}

/// Identifiers print bare; anything else, including the boolean keywords,
/// prints backtick-quoted.
pub(crate) fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_identifier(name) && name != "true" && name != "false" {
        f.write_str(name)
    } else {
        write_quoted(f, name, '`')
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str, quote: char) -> fmt::Result {
    use fmt::Write;
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Decimals always carry a decimal point so they re-read as decimals.
fn write_decimal(f: &mut fmt::Formatter<'_>, d: f64) -> fmt::Result {
    let text = d.to_string();
    if d.is_finite() && !text.contains('.') {
        write!(f, "{text}.0")
    } else {
        f.write_str(&text)
    }
}

/// Integral bounds inside the exact f64 integer range print as integers.
fn write_bound(f: &mut fmt::Formatter<'_>, b: f64) -> fmt::Result {
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if b.fract() == 0.0 && b.abs() < EXACT {
        write!(f, "{}", b as i64)
    } else {
        write_decimal(f, b)
    }
}
