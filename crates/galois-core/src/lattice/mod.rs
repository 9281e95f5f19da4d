//! Lattices: acyclic graphs with a unique top, a unique bottom, and a unique
//! join and meet for every pair of nodes.
//!
//! The order is the reachability order of the graph: `a ≤ b` iff `a == b` or
//! a path `a → … → b` exists. A [`Lattice`] may hold either the full
//! comparability relation or only its covering relation (Hasse diagram); all
//! queries give the same answers on both.

#![allow(clippy::module_name_repetitions)]

pub mod bordat;
pub mod concept;
pub mod concept_lattice;

use std::collections::BTreeSet;

use crate::closure::Context;
use crate::error::LatticeError;
use crate::graph::{DAGraph, DGraph, Edge, NodeId};

/// A directed graph proven to be a lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice<N, E = ()> {
    dag: DAGraph<N, E>,
    top: NodeId,
    bottom: NodeId,
}

impl<N, E> TryFrom<DGraph<N, E>> for Lattice<N, E> {
    type Error = LatticeError;

    /// Validate `graph` exhaustively: acyclic, one source, one sink, and a
    /// least upper bound and greatest lower bound for every pair.
    fn try_from(graph: DGraph<N, E>) -> Result<Self, Self::Error> {
        let dag = DAGraph::try_from(graph)?;
        let (top, bottom) = check_lattice(&dag)?;
        Ok(Self { dag, top, bottom })
    }
}

impl<N, E> DGraph<N, E> {
    /// `true` when this graph is a lattice under its reachability order.
    #[must_use]
    pub fn is_lattice(&self) -> bool {
        self.is_acyclic()
            && check_lattice(&DAGraph::from_acyclic(self.map(|_, _| (), |_| ()))).is_ok()
    }
}

impl<N, E> Lattice<N, E> {
    /// Wrap a graph built by a generator that guarantees the lattice property.
    ///
    /// The top is the unique sink; a single-node lattice has `top == bottom`.
    pub(crate) fn from_generated(dag: DAGraph<N, E>, bottom: NodeId) -> Self {
        let top = dag.sinks().into_iter().next().unwrap_or(bottom);
        Self { dag, top, bottom }
    }

    /// The greatest element.
    #[must_use]
    pub const fn top(&self) -> NodeId {
        self.top
    }

    /// The least element.
    #[must_use]
    pub const fn bottom(&self) -> NodeId {
        self.bottom
    }

    #[must_use]
    pub const fn dag(&self) -> &DAGraph<N, E> {
        &self.dag
    }

    #[must_use]
    pub const fn graph(&self) -> &DGraph<N, E> {
        self.dag.graph()
    }

    #[must_use]
    pub fn into_dag(self) -> DAGraph<N, E> {
        self.dag
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.dag.node(id)
    }

    /// Mutable access to a node's content; the order is unaffected.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.dag.node_mut(id)
    }

    #[must_use]
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Edge<'_, E>> {
        self.dag.edge(from, to)
    }

    pub fn edge_content_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut Option<E>> {
        self.dag.edge_content_mut(from, to)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph().node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph().edge_count()
    }

    /// `true` when `a ≤ b`.
    #[must_use]
    pub fn le(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.dag.majorants(a).contains(&b)
    }

    /// The least upper bound of `a` and `b`.
    #[must_use]
    pub fn join(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let up_a = up_set(&self.dag, a);
        let up_b = up_set(&self.dag, b);
        let common: BTreeSet<NodeId> = up_a.intersection(&up_b).copied().collect();
        common
            .iter()
            .copied()
            .find(|&c| common.is_subset(&up_set(&self.dag, c)))
    }

    /// The greatest lower bound of `a` and `b`.
    #[must_use]
    pub fn meet(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let down_a = down_set(&self.dag, a);
        let down_b = down_set(&self.dag, b);
        let common: BTreeSet<NodeId> = down_a.intersection(&down_b).copied().collect();
        common
            .iter()
            .copied()
            .find(|&c| common.is_subset(&down_set(&self.dag, c)))
    }

    /// The covering relation of this lattice, contents stripped.
    fn covering(&self) -> DAGraph<()> {
        let mut cover = DAGraph::from_acyclic(self.graph().map(|_, _| (), |_| ()));
        cover.transitive_reduction();
        cover
    }

    /// Nodes with exactly one lower cover.
    #[must_use]
    pub fn join_irreducibles(&self) -> BTreeSet<NodeId> {
        let cover = self.covering();
        cover
            .graph()
            .node_ids()
            .filter(|&id| cover.graph().predecessors(id).len() == 1)
            .collect()
    }

    /// Nodes with exactly one upper cover.
    #[must_use]
    pub fn meet_irreducibles(&self) -> BTreeSet<NodeId> {
        let cover = self.covering();
        cover
            .graph()
            .node_ids()
            .filter(|&id| cover.graph().successors(id).len() == 1)
            .collect()
    }

    /// Join-irreducibles `j ≤ id`.
    #[must_use]
    pub fn join_irreducibles_below(&self, id: NodeId) -> BTreeSet<NodeId> {
        let below = down_set(&self.dag, id);
        self.join_irreducibles()
            .into_iter()
            .filter(|j| below.contains(j))
            .collect()
    }

    /// Meet-irreducibles `m ≥ id`.
    #[must_use]
    pub fn meet_irreducibles_above(&self, id: NodeId) -> BTreeSet<NodeId> {
        let above = up_set(&self.dag, id);
        self.meet_irreducibles()
            .into_iter()
            .filter(|m| above.contains(m))
            .collect()
    }

    /// The reduced context of the lattice: join-irreducibles as objects,
    /// meet-irreducibles as attributes, `j` incident to `m` iff `j ≤ m`.
    ///
    /// Its concept lattice is isomorphic to this lattice.
    #[must_use]
    pub fn table(&self) -> Context<NodeId> {
        let mut context = Context::new();
        let meets = self.meet_irreducibles();
        for &m in &meets {
            context.add_attribute(m);
        }
        for j in self.join_irreducibles() {
            context.add_object(j);
            let above = up_set(&self.dag, j);
            for &m in meets.iter().filter(|m| above.contains(m)) {
                context.add_incidence(j, m);
            }
        }
        context
    }

    /// Relabel contents, keeping the structure and every identity.
    #[must_use]
    pub fn map<N2, E2>(
        &self,
        node_map: impl FnMut(NodeId, &N) -> N2,
        edge_map: impl FnMut(&E) -> E2,
    ) -> Lattice<N2, E2> {
        Lattice {
            dag: DAGraph::from_acyclic(self.graph().map(node_map, edge_map)),
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl<N: Clone, E: Clone> Lattice<N, E> {
    /// A copy of this lattice restricted to its covering relation.
    #[must_use]
    pub fn hasse(&self) -> Self {
        let mut copy = self.clone();
        copy.dag.transitive_reduction();
        copy
    }
}

fn up_set<N, E>(dag: &DAGraph<N, E>, id: NodeId) -> BTreeSet<NodeId> {
    let mut set = dag.majorants(id);
    set.insert(id);
    set
}

fn down_set<N, E>(dag: &DAGraph<N, E>, id: NodeId) -> BTreeSet<NodeId> {
    let mut set = dag.minorants(id);
    set.insert(id);
    set
}

/// Returns `(top, bottom)` when `dag` is a lattice.
fn check_lattice<N, E>(dag: &DAGraph<N, E>) -> Result<(NodeId, NodeId), LatticeError> {
    let sinks = dag.sinks();
    let sources = dag.sources();
    let (Some(&top), Some(&bottom)) = (sinks.first(), sources.first()) else {
        return Err(LatticeError::NotALattice("graph is empty".to_string()));
    };
    if sinks.len() > 1 {
        return Err(LatticeError::NotALattice(format!(
            "{} maximal nodes, expected one top",
            sinks.len()
        )));
    }
    if sources.len() > 1 {
        return Err(LatticeError::NotALattice(format!(
            "{} minimal nodes, expected one bottom",
            sources.len()
        )));
    }

    let ids: Vec<NodeId> = dag.graph().node_ids().collect();
    let ups: Vec<BTreeSet<NodeId>> = ids.iter().map(|&id| up_set(dag, id)).collect();
    let downs: Vec<BTreeSet<NodeId>> = ids.iter().map(|&id| down_set(dag, id)).collect();
    let position = |id: &NodeId| ids.binary_search(id).ok();

    for (i, &a) in ids.iter().enumerate() {
        for (j, &b) in ids.iter().enumerate().skip(i + 1) {
            let upper: BTreeSet<NodeId> = ups[i].intersection(&ups[j]).copied().collect();
            let has_join = upper.iter().any(|c| {
                position(c).is_some_and(|k| upper.is_subset(&ups[k]))
            });
            if !has_join {
                return Err(LatticeError::NotALattice(format!(
                    "{a} and {b} have no least upper bound"
                )));
            }

            let lower: BTreeSet<NodeId> = downs[i].intersection(&downs[j]).copied().collect();
            let has_meet = lower.iter().any(|c| {
                position(c).is_some_and(|k| lower.is_subset(&downs[k]))
            });
            if !has_meet {
                return Err(LatticeError::NotALattice(format!(
                    "{a} and {b} have no greatest lower bound"
                )));
            }
        }
    }

    Ok((top, bottom))
}
