//! Totally ordered sets of comparable elements.
//!
//! A [`ComparableSet`] is used both as a value (the extent or intent of a
//! concept, the valuation of a dependency) and as an ordered map key. Two sets
//! compare by the sequence of their sorted elements, so the ordering is
//! lexicographic and *not* the inclusion order: `{1, 3} > {1, 2, 3}` because
//! `3 > 2` at the first difference. Inclusion is queried explicitly with
//! [`ComparableSet::is_subset`] and [`ComparableSet::is_superset`].

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered set whose own ordering is lexicographic over its elements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent, bound(deserialize = "T: Ord + Deserialize<'de>"))]
pub struct ComparableSet<T> {
    elements: BTreeSet<T>,
}

impl<T: Ord> ComparableSet<T> {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: BTreeSet::new(),
        }
    }

    /// Create a set holding a single element.
    #[must_use]
    pub fn singleton(element: T) -> Self {
        let mut set = Self::new();
        set.insert(element);
        set
    }

    /// Insert an element; returns `true` if it was not already present.
    pub fn insert(&mut self, element: T) -> bool {
        self.elements.insert(element)
    }

    /// Remove an element; returns `true` if it was present.
    pub fn remove(&mut self, element: &T) -> bool {
        self.elements.remove(element)
    }

    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    /// `true` when every element of `self` belongs to `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.elements.is_subset(&other.elements)
    }

    /// `true` when every element of `other` belongs to `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.elements.is_superset(&other.elements)
    }

    /// `true` when `self ⊂ other` strictly.
    #[must_use]
    pub fn is_strict_subset(&self, other: &Self) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// Remove every element of `other` from `self`.
    pub fn remove_all(&mut self, other: &Self) {
        self.elements.retain(|element| !other.contains(element));
    }

    /// Keep only the elements satisfying `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.elements.retain(keep);
    }

    /// The smallest element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate the elements in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.elements.iter()
    }

    /// Consume the set, returning the underlying `BTreeSet`.
    #[must_use]
    pub fn into_inner(self) -> BTreeSet<T> {
        self.elements
    }
}

impl<T: Ord + Clone> ComparableSet<T> {
    /// `self ∪ other` as a new set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.elements.union(&other.elements).cloned().collect()
    }

    /// `self ∖ other` as a new set.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.elements.difference(&other.elements).cloned().collect()
    }

    /// `self ∩ other` as a new set.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.elements.intersection(&other.elements).cloned().collect()
    }

    /// `self ∪ {element}` as a new set.
    #[must_use]
    pub fn with(&self, element: T) -> Self {
        let mut grown = self.clone();
        grown.insert(element);
        grown
    }
}

impl<T: Ord> Default for ComparableSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> From<BTreeSet<T>> for ComparableSet<T> {
    fn from(elements: BTreeSet<T>) -> Self {
        Self { elements }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for ComparableSet<T> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Ord> FromIterator<T> for ComparableSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for ComparableSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<T> IntoIterator for ComparableSet<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ComparableSet<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: fmt::Display> fmt::Display for ComparableSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic_not_inclusion() {
        let a = ComparableSet::from([1, 3]);
        let b = ComparableSet::from([1, 2, 3]);
        assert!(a > b, "3 > 2 at the first difference");

        let prefix = ComparableSet::from([1, 2]);
        assert!(prefix < b, "a strict prefix sorts first");
        assert!(ComparableSet::<i32>::new() < prefix);
    }

    #[test]
    fn equal_sets_compare_equal() {
        let a: ComparableSet<i32> = [3, 1, 2].into_iter().collect();
        let b = ComparableSet::from([1, 2, 3]);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn inclusion_queries() {
        let small = ComparableSet::from([2]);
        let big = ComparableSet::from([1, 2]);
        assert!(small.is_subset(&big));
        assert!(small.is_strict_subset(&big));
        assert!(!big.is_strict_subset(&big));
        assert!(big.is_superset(&small));
    }

    #[test]
    fn set_algebra() {
        let a = ComparableSet::from([1, 2, 3]);
        let b = ComparableSet::from([2, 4]);
        assert_eq!(a.union(&b), ComparableSet::from([1, 2, 3, 4]));
        assert_eq!(a.difference(&b), ComparableSet::from([1, 3]));
        assert_eq!(a.intersection(&b), ComparableSet::from([2]));
        assert_eq!(b.with(5), ComparableSet::from([2, 4, 5]));

        let mut c = a.clone();
        c.remove_all(&b);
        assert_eq!(c, ComparableSet::from([1, 3]));
        assert_eq!(c.first(), Some(&1));
    }

    #[test]
    fn display_lists_sorted_elements() {
        let set = ComparableSet::from(["b", "a"]);
        assert_eq!(set.to_string(), "{a, b}");
        assert_eq!(ComparableSet::<u8>::new().to_string(), "{}");
    }

    #[test]
    fn serde_is_a_plain_sequence() {
        let set = ComparableSet::from([3, 1]);
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, "[1,3]");
        let back: ComparableSet<i32> = serde_json::from_str("[3,1,3]").expect("deserialize");
        assert_eq!(back, set);
    }
}
