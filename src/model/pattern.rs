//! Pattern — a recursive tree with a value at every node.

use serde::{Deserialize, Serialize};

/// A node in a pattern tree: a value plus zero or more ordered child patterns.
///
/// A pattern with no elements is *atomic*; otherwise it is *composite*. Each
/// pattern owns its elements outright, so trees can neither share subtrees
/// nor form cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern<T> {
    pub value: T,
    pub elements: Vec<Pattern<T>>,
}

impl<T> Pattern<T> {
    /// An atomic pattern.
    pub fn point(value: T) -> Self {
        Self { value, elements: Vec::new() }
    }

    /// A pattern over the given elements. An empty element list produces an
    /// atomic pattern, so a composite always has at least one child.
    pub fn pattern(value: T, elements: Vec<Pattern<T>>) -> Self {
        Self { value, elements }
    }

    /// A pattern whose elements are atomic patterns over `values`.
    pub fn from_list(value: T, values: impl IntoIterator<Item = T>) -> Self {
        Self::pattern(value, values.into_iter().map(Pattern::point).collect())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn elements(&self) -> &[Pattern<T>] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Pattern<T>> {
        self.elements.get(index)
    }

    pub fn is_atomic(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of direct elements.
    pub fn length(&self) -> usize {
        self.elements.len()
    }

    /// Total number of nodes in this subtree, including this one.
    ///
    /// `size`, `depth`, `values` and `map` recurse per level, so their stack
    /// use grows with `depth()`.
    pub fn size(&self) -> usize {
        1 + self.elements.iter().map(Pattern::size).sum::<usize>()
    }

    /// 1 for an atomic pattern, else 1 + the deepest element.
    pub fn depth(&self) -> usize {
        1 + self.elements.iter().map(Pattern::depth).max().unwrap_or(0)
    }

    /// Every value in the subtree, pre-order.
    pub fn values(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.size());
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a T>) {
        out.push(&self.value);
        for element in &self.elements {
            element.collect_values(out);
        }
    }

    /// Apply `f` to every value, keeping the tree shape.
    pub fn map<U>(self, f: &mut impl FnMut(T) -> U) -> Pattern<U> {
        let value = f(self.value);
        let elements = self.elements.into_iter().map(|e| e.map(f)).collect();
        Pattern { value, elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Pattern<&'static str> {
        // root ─┬─ a ── a1
        //       ├─ b
        //       └─ c ── c1 ── c2
        Pattern::pattern("root", vec![
            Pattern::from_list("a", ["a1"]),
            Pattern::point("b"),
            Pattern::pattern("c", vec![Pattern::from_list("c1", ["c2"])]),
        ])
    }

    #[test]
    fn test_atomic_metrics() {
        let p = Pattern::point("hello");
        assert!(p.is_atomic());
        assert_eq!(p.length(), 0);
        assert_eq!(p.size(), 1);
        assert_eq!(p.depth(), 1);
        assert_eq!(p.values(), vec![&"hello"]);
    }

    #[test]
    fn test_empty_elements_is_atomic() {
        let p: Pattern<&str> = Pattern::pattern("solo", vec![]);
        assert!(p.is_atomic());
        assert_eq!(p.depth(), 1);
    }

    #[test]
    fn test_nested_metrics() {
        let p = tree();
        assert!(!p.is_atomic());
        assert_eq!(p.length(), 3);
        assert_eq!(p.size(), 7);
        assert_eq!(p.depth(), 4);
        assert_eq!(p.element(1).map(|e| e.value), Some("b"));
        assert!(p.element(3).is_none());
    }

    #[test]
    fn test_values_pre_order() {
        let values: Vec<&str> = tree().values().into_iter().copied().collect();
        assert_eq!(values, vec!["root", "a", "a1", "b", "c", "c1", "c2"]);
    }

    #[test]
    fn test_map_keeps_shape() {
        let lengths = tree().map(&mut |s: &str| s.len());
        assert_eq!(lengths.value, 4);
        assert_eq!(lengths.size(), 7);
        assert_eq!(lengths.depth(), 4);
    }

    #[test]
    fn test_hash_eq_usable_in_sets() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(tree());
        set.insert(tree());
        set.insert(Pattern::point("other"));
        assert_eq!(set.len(), 2);
    }
}
