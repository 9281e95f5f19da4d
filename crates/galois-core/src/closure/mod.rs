//! Closure systems: a finite universe with a closure operator.
//!
//! The lattice generators consume the [`ClosureSystem`] trait only. Two
//! implementations ship with the crate: [`ImplicationalSystem`] (rules
//! `premise → conclusion`, closed by forward chaining) and [`Context`] (a
//! binary relation, closed by the Galois connection `X ↦ X''`).

pub mod context;
pub mod implication;

use std::fmt;

use crate::graph::DGraph;
use crate::lattice::concept::Concept;
use crate::set::ComparableSet;

pub use context::Context;
pub use implication::{ImplicationalSystem, Rule};

/// A finite universe together with a closure operator.
///
/// Implementations must keep `closure` extensive (`X ⊆ closure(X)`),
/// idempotent and monotone; the generators neither check nor terminate
/// otherwise.
pub trait ClosureSystem {
    type Element: Ord + Clone + fmt::Debug;

    /// The finite universe.
    fn ground_set(&self) -> ComparableSet<Self::Element>;

    /// The closure of `set`.
    fn closure(&self, set: &ComparableSet<Self::Element>) -> ComparableSet<Self::Element>;

    /// Wrap a closed set into the concept stored in a generated lattice.
    ///
    /// The default keeps the closed set as extent and leaves the intent out.
    fn concept(&self, closed: ComparableSet<Self::Element>) -> Concept<Self::Element> {
        Concept::with_extent(closed)
    }

    /// The lectically next closed set after `current`, or `None` when
    /// `current` is the last one.
    ///
    /// Elements are ranked by their own order. For the largest `e ∉ current`
    /// such that `closure({x ∈ current | x < e} ∪ {e})` adds no element
    /// smaller than `e`, that closure is the successor (Ganter's Next
    /// Closure step).
    fn next_closure(
        &self,
        current: &ComparableSet<Self::Element>,
    ) -> Option<ComparableSet<Self::Element>> {
        let universe = self.ground_set();
        for e in universe.iter().rev() {
            if current.contains(e) {
                continue;
            }
            let mut seed: ComparableSet<Self::Element> =
                current.iter().filter(|x| *x < e).cloned().collect();
            seed.insert(e.clone());
            let next = self.closure(&seed);
            if next.iter().all(|x| x >= e || current.contains(x)) {
                return Some(next);
            }
        }
        None
    }

    /// Every closed set, exactly once, in increasing lectic order.
    fn all_closures(&self) -> Vec<Concept<Self::Element>> {
        let mut closures = Vec::new();
        let mut current = Some(self.closure(&ComparableSet::new()));
        while let Some(closed) = current {
            current = self.next_closure(&closed);
            closures.push(self.concept(closed));
        }
        closures
    }

    /// The precedence graph: one node per element, and `a → b` when `a ≠ b`
    /// and `a ∈ closure({b})` (`a` depends on `b`).
    ///
    /// The graph is cyclic whenever two elements imply each other.
    fn precedence_graph(&self) -> DGraph<Self::Element> {
        let mut graph = DGraph::new();
        let ids: Vec<_> = self
            .ground_set()
            .into_iter()
            .map(|element| (element.clone(), graph.add_node(element)))
            .collect();
        for (b, b_id) in &ids {
            let closed = self.closure(&ComparableSet::singleton(b.clone()));
            for (a, a_id) in &ids {
                if a_id != b_id && closed.contains(a) {
                    graph.add_edge(*a_id, *b_id);
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every subset is closed.
    struct PowerSet(u8);

    impl ClosureSystem for PowerSet {
        type Element = u8;

        fn ground_set(&self) -> ComparableSet<u8> {
            (1..=self.0).collect()
        }

        fn closure(&self, set: &ComparableSet<u8>) -> ComparableSet<u8> {
            set.clone()
        }
    }

    #[test]
    fn next_closure_enumerates_powerset_in_lectic_order() {
        let closures: Vec<Vec<u8>> = PowerSet(3)
            .all_closures()
            .into_iter()
            .filter_map(|c| c.extent().map(|e| e.iter().copied().collect()))
            .collect();
        assert_eq!(
            closures,
            vec![
                vec![],
                vec![3],
                vec![2],
                vec![2, 3],
                vec![1],
                vec![1, 3],
                vec![1, 2],
                vec![1, 2, 3],
            ]
        );
    }

    #[test]
    fn precedence_graph_of_powerset_has_no_edges() {
        let graph = PowerSet(4).precedence_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn last_closure_has_no_successor() {
        let full = ComparableSet::from([1, 2]);
        assert_eq!(PowerSet(2).next_closure(&full), None);
    }
}
