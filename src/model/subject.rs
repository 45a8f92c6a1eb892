//! Subject — the entity carried by parsed patterns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{PropertyMap, Value};
use crate::ModelError;

/// Subject identity. Empty for anonymous subjects such as `()` or the
/// relationship in `(a)-->(b)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self { Symbol(s.to_owned()) }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self { Symbol(s) }
}

/// An identity with a label set and a property record.
///
/// Labels are a set, so they carry no order and never repeat. Properties keep
/// insertion order for output, but equality ignores that order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subject {
    pub identity: Symbol,
    pub labels: BTreeSet<String>,
    pub properties: PropertyMap,
}

impl Subject {
    /// A named subject. Fails on an empty identity; use
    /// [`Subject::anonymous`] for unnamed subjects.
    pub fn new(identity: impl Into<String>) -> Result<Self, ModelError> {
        let identity = identity.into();
        if identity.is_empty() {
            return Err(ModelError::EmptyIdentity);
        }
        Ok(Self {
            identity: Symbol(identity),
            labels: BTreeSet::new(),
            properties: PropertyMap::new(),
        })
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    pub fn is_anonymous(&self) -> bool {
        self.identity.is_empty()
    }

    /// True when the subject has no identity, labels or properties.
    pub fn is_empty(&self) -> bool {
        self.is_anonymous() && self.labels.is_empty() && self.properties.is_empty()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Returns false when the label was already present.
    pub fn add_label(&mut self, label: impl Into<String>) -> bool {
        self.labels.insert(label.into())
    }

    /// Returns false when the label was absent.
    pub fn remove_label(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key, value)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}
