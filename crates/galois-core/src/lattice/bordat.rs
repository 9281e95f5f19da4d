//! Bordat's immediate-successor step and the dependency graph it fills.
//!
//! # Overview
//!
//! For a closed set `F` and a candidate `x ∉ F`, the closed sets
//! `closure(F ∪ {x})` that are minimal under inclusion are exactly the
//! immediate successors of `F`. The step tests every ordered pair of
//! candidates `(from, to)`: `from ∈ closure(F ∪ {to})` records a dependency
//! edge `from → to`. Collapsing the confirmed edges by strongly connected
//! components, every component no other component depends on yields one
//! successor, `F ∪ component`.
//!
//! Every recorded edge is valuated by the part of `F` that is not already
//! implied by another element of `F` (read off the precedence graph of the
//! closure system) nor by the empty set. Each edge keeps only its inclusion-minimal valuations,
//! so the edges together encode the canonical direct basis; see
//! [`DependencyGraph::implicational_basis`].

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument, trace};

use crate::closure::{ClosureSystem, ImplicationalSystem};
use crate::error::LatticeError;
use crate::graph::{DAGraph, DGraph, NodeId, SccNode};
use crate::set::ComparableSet;

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// An antichain of sets: no member is a strict subset of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valuation<T> {
    sets: BTreeSet<ComparableSet<T>>,
}

impl<T: Ord> Default for Valuation<T> {
    fn default() -> Self {
        Self {
            sets: BTreeSet::new(),
        }
    }
}

impl<T: Ord> Valuation<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `set` unless some member is already included in it; members that
    /// strictly contain `set` are dropped.
    ///
    /// Returns `true` when `set` was added.
    pub fn insert_minimal(&mut self, set: ComparableSet<T>) -> bool {
        if self.sets.iter().any(|member| member.is_subset(&set)) {
            return false;
        }
        self.sets.retain(|member| !set.is_strict_subset(member));
        self.sets.insert(set)
    }

    #[must_use]
    pub fn contains(&self, set: &ComparableSet<T>) -> bool {
        self.sets.contains(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparableSet<T>> + '_ {
        self.sets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// Dependencies between universe elements found while generating a lattice.
///
/// One node per element; an edge `from → to` valuated by the minimal sets
/// `X` such that `from ∈ closure(X ∪ {to})` was observed.
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    graph: DGraph<T, Valuation<T>>,
    index: BTreeMap<T, NodeId>,
    base: ComparableSet<T>,
}

impl<T: Ord + Clone> DependencyGraph<T> {
    /// A graph over `universe` without edges.
    ///
    /// `base` is the closure of the empty set, the premise-free part of the
    /// basis.
    #[must_use]
    pub fn new(universe: &ComparableSet<T>, base: ComparableSet<T>) -> Self {
        let mut graph = DGraph::new();
        let index = universe
            .iter()
            .map(|element| (element.clone(), graph.add_node(element.clone())))
            .collect();
        Self { graph, index, base }
    }

    /// A graph over the universe of `system`, ready for generation.
    #[must_use]
    pub fn for_system<C>(system: &C) -> Self
    where
        C: ClosureSystem<Element = T> + ?Sized,
    {
        Self::new(&system.ground_set(), system.closure(&ComparableSet::new()))
    }

    /// `true` when every element of `universe` has a node.
    #[must_use]
    pub fn covers(&self, universe: &ComparableSet<T>) -> bool {
        universe.iter().all(|element| self.index.contains_key(element))
    }

    #[must_use]
    pub const fn graph(&self) -> &DGraph<T, Valuation<T>> {
        &self.graph
    }

    #[must_use]
    pub fn node_of(&self, element: &T) -> Option<NodeId> {
        self.index.get(element).copied()
    }

    /// The minimal valuations of `from → to`, if that dependency was seen.
    #[must_use]
    pub fn valuation(&self, from: &T, to: &T) -> Option<&Valuation<T>> {
        let edge = self.graph.edge(self.node_of(from)?, self.node_of(to)?)?;
        edge.content()
    }

    /// Every dependency as `(from, to, valuation)`.
    pub fn dependencies(&self) -> impl Iterator<Item = (&T, &T, &Valuation<T>)> + '_ {
        self.graph.edges().filter_map(|edge| {
            Some((
                self.graph.node(edge.from())?,
                self.graph.node(edge.to())?,
                edge.content()?,
            ))
        })
    }

    /// Record `from → to` with valuation `set`, keeping valuations minimal.
    fn record(&mut self, from: NodeId, to: NodeId, set: &ComparableSet<T>) {
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge_with(from, to, Valuation::new());
        }
        if let Some(content) = self.graph.edge_content_mut(from, to) {
            let valuation = content.get_or_insert_with(Valuation::new);
            if valuation.insert_minimal(set.clone()) {
                trace!(%from, %to, sets = valuation.len(), "dependency valuation updated");
            }
        }
    }

    /// The implicational system read off the dependencies: `∅ → base` plus
    /// `X ∪ {to} → {from}` for every edge and minimal valuation `X`, rules
    /// with the same premise merged.
    ///
    /// Once every closed set has been visited, its closure operator is the
    /// one the dependencies were recorded from.
    #[must_use]
    pub fn implicational_basis(&self) -> ImplicationalSystem<T> {
        let mut merged: BTreeMap<ComparableSet<T>, ComparableSet<T>> = BTreeMap::new();
        if !self.base.is_empty() {
            merged.insert(ComparableSet::new(), self.base.clone());
        }
        for (from, to, valuation) in self.dependencies() {
            for set in valuation.iter() {
                merged
                    .entry(set.with(to.clone()))
                    .or_default()
                    .insert(from.clone());
            }
        }

        let mut basis = ImplicationalSystem::with_universe(self.index.keys().cloned().collect());
        for (premise, conclusion) in merged {
            basis.add_rule(premise, conclusion);
        }
        basis
    }
}

// ---------------------------------------------------------------------------
// Precedence
// ---------------------------------------------------------------------------

/// The collapsed precedence graph of a closure system, computed once per
/// generation.
pub(crate) struct Precedence<T> {
    index: BTreeMap<T, NodeId>,
    components: DAGraph<SccNode>,
    membership: BTreeMap<NodeId, NodeId>,
}

impl<T: Ord + Clone> Precedence<T> {
    pub(crate) fn of<C>(system: &C) -> Self
    where
        C: ClosureSystem<Element = T> + ?Sized,
    {
        let graph = system.precedence_graph();
        let components = graph.strongly_connected_components();
        let membership = components.membership();
        let index = graph
            .nodes()
            .map(|(id, element)| (element.clone(), id))
            .collect();
        Self {
            index,
            components,
            membership,
        }
    }

    /// `extent` without the elements implied by another, non-equivalent
    /// element of `extent`.
    pub(crate) fn valuation(&self, extent: &ComparableSet<T>) -> ComparableSet<T> {
        let mut implied: BTreeSet<NodeId> = BTreeSet::new();
        for element in extent {
            let Some(component) = self
                .index
                .get(element)
                .and_then(|id| self.membership.get(id))
            else {
                continue;
            };
            for below in self.components.minorants(*component) {
                if let Some(scc) = self.components.node(below) {
                    implied.extend(scc.members.iter().copied());
                }
            }
        }
        extent
            .iter()
            .filter(|element| {
                self.index
                    .get(*element)
                    .is_none_or(|id| !implied.contains(id))
            })
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Successors
// ---------------------------------------------------------------------------

/// The extents of the immediate successors of the closed set `extent`,
/// recording the dependencies found along the way into `dependencies`.
///
/// # Errors
///
/// [`LatticeError::IncompleteDependencyGraph`] when `dependencies` lacks a
/// node for some element of the universe of `system`; nothing is recorded.
pub fn immediate_successors<C>(
    extent: &ComparableSet<C::Element>,
    system: &C,
    dependencies: &mut DependencyGraph<C::Element>,
) -> Result<Vec<ComparableSet<C::Element>>, LatticeError>
where
    C: ClosureSystem + ?Sized,
{
    let universe = system.ground_set();
    if let Some(missing) = universe
        .iter()
        .find(|element| dependencies.node_of(element).is_none())
    {
        return Err(LatticeError::IncompleteDependencyGraph(format!("{missing:?}")));
    }
    let precedence = Precedence::of(system);
    Ok(successors(extent, system, &precedence, dependencies))
}

/// The successor step proper; `dependencies` must cover the universe.
#[instrument(skip_all, fields(extent = extent.len()))]
pub(crate) fn successors<C>(
    extent: &ComparableSet<C::Element>,
    system: &C,
    precedence: &Precedence<C::Element>,
    dependencies: &mut DependencyGraph<C::Element>,
) -> Vec<ComparableSet<C::Element>>
where
    C: ClosureSystem + ?Sized,
{
    // Elements of closure(∅) hold under any premise.
    let valuation = precedence.valuation(extent).difference(&dependencies.base);
    let candidates: Vec<(C::Element, NodeId)> = system
        .ground_set()
        .into_iter()
        .filter(|element| !extent.contains(element))
        .filter_map(|element| dependencies.node_of(&element).map(|id| (element, id)))
        .collect();

    let mut confirmed: BTreeSet<(NodeId, NodeId)> = BTreeSet::new();
    for (to, to_id) in &candidates {
        let closed = system.closure(&extent.with(to.clone()));
        for (from, from_id) in &candidates {
            if from_id != to_id && closed.contains(from) {
                dependencies.record(*from_id, *to_id, &valuation);
                confirmed.insert((*from_id, *to_id));
            }
        }
    }

    // Reversed, `to → from` reads "closure(F ∪ {to}) holds from": the sinks
    // are the components whose closure adds nothing outside themselves.
    let keep: BTreeSet<NodeId> = candidates.iter().map(|(_, id)| *id).collect();
    let delta = dependencies
        .graph()
        .map(|_, _| (), |_| ())
        .subgraph_by_nodes(&keep)
        .subgraph_by_edges(&confirmed)
        .transposed();
    let components = delta.strongly_connected_components();

    let mut found: Vec<ComparableSet<C::Element>> = components
        .sinks()
        .into_iter()
        .filter_map(|sink| components.node(sink))
        .map(|scc| {
            let mut successor = extent.clone();
            successor.extend(
                scc.members
                    .iter()
                    .filter_map(|&member| dependencies.graph().node(member).cloned()),
            );
            successor
        })
        .collect();
    found.sort();
    debug!(
        candidates = candidates.len(),
        dependencies = confirmed.len(),
        successors = found.len(),
        "immediate successors computed"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elements: &[u8]) -> ComparableSet<u8> {
        elements.iter().copied().collect()
    }

    /// Universe {1, 2, 3} with the single rule {1} → {2}.
    fn one_rule() -> ImplicationalSystem<u8> {
        let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3]));
        is.add_rule(set(&[1]), set(&[2]));
        is
    }

    #[test]
    fn valuation_keeps_an_antichain() {
        let mut valuation = Valuation::new();
        assert!(valuation.insert_minimal(set(&[1, 2])));
        assert!(valuation.insert_minimal(set(&[3])));
        assert!(!valuation.insert_minimal(set(&[1, 2, 4])), "superset of {{1, 2}}");
        assert!(!valuation.insert_minimal(set(&[1, 2])), "already present");
        assert!(valuation.insert_minimal(set(&[1])), "drops {{1, 2}}");
        assert_eq!(valuation.len(), 2);
        assert!(valuation.contains(&set(&[1])));
        assert!(!valuation.contains(&set(&[1, 2])));
    }

    #[test]
    fn successors_of_empty_set_skip_implied_elements() {
        let is = one_rule();
        let mut deps = DependencyGraph::for_system(&is);
        let found = immediate_successors(&set(&[]), &is, &mut deps).expect("complete graph");
        assert_eq!(found, vec![set(&[2]), set(&[3])]);
        assert_eq!(deps.valuation(&2, &1).map(Valuation::len), Some(1));
        assert!(deps.valuation(&1, &2).is_none());
    }

    #[test]
    fn equivalent_elements_join_one_successor() {
        let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3]));
        is.add_rule(set(&[1]), set(&[2]));
        is.add_rule(set(&[2]), set(&[1]));
        let mut deps = DependencyGraph::for_system(&is);
        let found = immediate_successors(&set(&[]), &is, &mut deps).expect("complete graph");
        assert_eq!(found, vec![set(&[1, 2]), set(&[3])]);
    }

    #[test]
    fn top_has_no_successor() {
        let is = one_rule();
        let mut deps = DependencyGraph::for_system(&is);
        let found = immediate_successors(&set(&[1, 2, 3]), &is, &mut deps).expect("complete");
        assert!(found.is_empty());
    }

    #[test]
    fn incomplete_graph_is_rejected() {
        let is = one_rule();
        let mut deps = DependencyGraph::new(&set(&[1, 2]), ComparableSet::new());
        assert!(!deps.covers(&is.ground_set()));
        let err = immediate_successors(&set(&[]), &is, &mut deps).expect_err("3 is missing");
        assert_eq!(err, LatticeError::IncompleteDependencyGraph("3".to_string()));
        assert_eq!(deps.graph().edge_count(), 0);
    }

    #[test]
    fn precedence_valuation_drops_implied_elements() {
        let is = one_rule();
        let precedence = Precedence::of(&is);
        assert_eq!(precedence.valuation(&set(&[1, 2, 3])), set(&[1, 3]));
        assert_eq!(precedence.valuation(&set(&[2, 3])), set(&[2, 3]));
    }

    #[test]
    fn basis_from_recorded_dependencies() {
        let is = one_rule();
        let mut deps = DependencyGraph::for_system(&is);
        for extent in [set(&[]), set(&[2]), set(&[3]), set(&[2, 3]), set(&[1, 2])] {
            immediate_successors(&extent, &is, &mut deps).expect("complete graph");
        }
        let basis = deps.implicational_basis();
        assert_eq!(basis.rules().len(), 1);
        assert_eq!(basis.rules()[0].premise, set(&[1]));
        assert_eq!(basis.rules()[0].conclusion, set(&[2]));
    }
    #[test]
    fn forced_elements_stay_out_of_valuations() {
        // ∅ → {2}, {1} → {3} over {1, 2, 3}.
        let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3]));
        is.add_rule(set(&[]), set(&[2]));
        is.add_rule(set(&[1]), set(&[3]));
        let mut deps = DependencyGraph::for_system(&is);
        for extent in [set(&[2]), set(&[2, 3])] {
            immediate_successors(&extent, &is, &mut deps).expect("complete graph");
        }
        let valuation = deps.valuation(&3, &1).expect("3 depends on 1");
        assert_eq!(valuation.len(), 1);
        assert!(valuation.contains(&set(&[])));

        let rules: Vec<String> = deps
            .implicational_basis()
            .rules()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rules, vec!["{} -> {2}", "{1} -> {3}"]);
    }
}
