//! Concepts: the nodes of a concept (or closed set) lattice.

use std::fmt;

use serde::Serialize;

use crate::set::ComparableSet;

/// An extent/intent pair, either side possibly not (yet) computed.
///
/// In a closed set lattice the extent (set A) is the closed set itself and
/// the intent (set B) is optional side data; concepts are ordered by
/// inclusion of their extents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept<T> {
    extent: Option<ComparableSet<T>>,
    intent: Option<ComparableSet<T>>,
}

impl<T: Ord> Default for Concept<T> {
    fn default() -> Self {
        Self {
            extent: None,
            intent: None,
        }
    }
}

impl<T: Ord> Concept<T> {
    #[must_use]
    pub const fn new(extent: ComparableSet<T>, intent: ComparableSet<T>) -> Self {
        Self {
            extent: Some(extent),
            intent: Some(intent),
        }
    }

    #[must_use]
    pub const fn with_extent(extent: ComparableSet<T>) -> Self {
        Self {
            extent: Some(extent),
            intent: None,
        }
    }

    #[must_use]
    pub const fn with_intent(intent: ComparableSet<T>) -> Self {
        Self {
            extent: None,
            intent: Some(intent),
        }
    }

    #[must_use]
    pub const fn extent(&self) -> Option<&ComparableSet<T>> {
        self.extent.as_ref()
    }

    #[must_use]
    pub const fn intent(&self) -> Option<&ComparableSet<T>> {
        self.intent.as_ref()
    }

    pub fn extent_mut(&mut self) -> Option<&mut ComparableSet<T>> {
        self.extent.as_mut()
    }

    pub fn intent_mut(&mut self) -> Option<&mut ComparableSet<T>> {
        self.intent.as_mut()
    }

    #[must_use]
    pub const fn has_extent(&self) -> bool {
        self.extent.is_some()
    }

    #[must_use]
    pub const fn has_intent(&self) -> bool {
        self.intent.is_some()
    }

    /// Replace the extent, returning the previous one.
    pub fn put_extent(&mut self, extent: Option<ComparableSet<T>>) -> Option<ComparableSet<T>> {
        std::mem::replace(&mut self.extent, extent)
    }

    /// Replace the intent, returning the previous one.
    pub fn put_intent(&mut self, intent: Option<ComparableSet<T>>) -> Option<ComparableSet<T>> {
        std::mem::replace(&mut self.intent, intent)
    }

    /// `true` when the extent is present and contains every element of `set`.
    #[must_use]
    pub fn contains_all_in_extent(&self, set: &ComparableSet<T>) -> bool {
        self.extent.as_ref().is_some_and(|extent| extent.is_superset(set))
    }

    /// `true` when the intent is present and contains every element of `set`.
    #[must_use]
    pub fn contains_all_in_intent(&self, set: &ComparableSet<T>) -> bool {
        self.intent.as_ref().is_some_and(|intent| intent.is_superset(set))
    }

    /// `true` when both extents are present and `self.extent ⊆ other.extent`.
    #[must_use]
    pub fn is_below(&self, other: &Self) -> bool {
        self.extent
            .as_ref()
            .is_some_and(|extent| other.contains_all_in_extent(extent))
    }
}

impl<T: fmt::Display> fmt::Display for Concept<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.extent, &self.intent) {
            (Some(a), Some(b)) => write!(f, "{a} / {b}"),
            (Some(a), None) => write!(f, "{a}"),
            (None, Some(b)) => write!(f, "- / {b}"),
            (None, None) => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_inclusion_orders_concepts() {
        let small = Concept::with_extent(ComparableSet::from([2]));
        let big = Concept::with_extent(ComparableSet::from([1, 2]));
        assert!(small.is_below(&big));
        assert!(!big.is_below(&small));
        assert!(small.is_below(&small));
        assert!(!Concept::<i32>::default().is_below(&big));
    }

    #[test]
    fn put_replaces_and_returns_previous() {
        let mut concept = Concept::new(ComparableSet::from([1]), ComparableSet::from([9]));
        assert_eq!(concept.put_extent(None), Some(ComparableSet::from([1])));
        assert!(!concept.has_extent());
        assert!(concept.contains_all_in_intent(&ComparableSet::from([9])));
        assert!(!concept.contains_all_in_extent(&ComparableSet::new()));
    }

    #[test]
    fn display_shows_available_sides() {
        let concept = Concept::new(ComparableSet::from([1, 2]), ComparableSet::from([7]));
        assert_eq!(concept.to_string(), "{1, 2} / {7}");
        assert_eq!(Concept::with_extent(ComparableSet::from([3])).to_string(), "{3}");
        assert_eq!(Concept::<u8>::default().to_string(), "-");
    }
}
