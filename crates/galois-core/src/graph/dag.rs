//! Acyclic directed graphs and strongly connected component condensation.
//!
//! # Overview
//!
//! A [`DAGraph`] is a [`DGraph`] whose acyclicity has been checked, not merely
//! assumed. It is obtained either by validating an existing graph
//! ([`DAGraph::try_from`]) or by collapsing the strongly connected components
//! (SCCs) of an arbitrary graph ([`DGraph::strongly_connected_components`]),
//! which is acyclic by construction.
//!
//! Edges go from smaller to larger nodes: the *minorants* of a node are the
//! nodes that reach it, its *majorants* the nodes it reaches.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::StableDiGraph;
use tracing::instrument;

use crate::error::LatticeError;
use crate::graph::dgraph::{DGraph, Edge, NodeId};

// ---------------------------------------------------------------------------
// SccNode
// ---------------------------------------------------------------------------

/// A node of a condensed graph: one strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SccNode {
    /// Identities of the original nodes in this component, sorted.
    pub members: Vec<NodeId>,
}

impl SccNode {
    /// Return `true` if this component holds more than one node (a cycle).
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        self.members.len() > 1
    }

    /// The member with the smallest ident.
    #[must_use]
    pub fn representative(&self) -> Option<NodeId> {
        self.members.first().copied()
    }
}

// ---------------------------------------------------------------------------
// DAGraph
// ---------------------------------------------------------------------------

/// A directed graph guaranteed to be acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct DAGraph<N, E = ()> {
    graph: DGraph<N, E>,
}

impl<N, E> Default for DAGraph<N, E> {
    fn default() -> Self {
        Self {
            graph: DGraph::new(),
        }
    }
}

impl<N, E> TryFrom<DGraph<N, E>> for DAGraph<N, E> {
    type Error = LatticeError;

    fn try_from(graph: DGraph<N, E>) -> Result<Self, Self::Error> {
        if graph.is_acyclic() {
            Ok(Self { graph })
        } else {
            Err(LatticeError::Cyclic)
        }
    }
}

impl<N, E> DAGraph<N, E> {
    /// Create an empty acyclic graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a graph the caller has already proven acyclic.
    pub(crate) fn from_acyclic(graph: DGraph<N, E>) -> Self {
        debug_assert!(graph.is_acyclic(), "graph must be acyclic");
        Self { graph }
    }

    /// Read-only view of the underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &DGraph<N, E> {
        &self.graph
    }

    #[must_use]
    pub fn into_graph(self) -> DGraph<N, E> {
        self.graph
    }

    pub fn add_node(&mut self, content: N) -> NodeId {
        self.graph.add_node(content)
    }

    /// Add `from → to` unless it would close a cycle.
    ///
    /// Returns `Ok(false)` when an endpoint is absent or the edge exists.
    ///
    /// # Errors
    ///
    /// [`LatticeError::CycleDetected`] with the closing path when the edge
    /// would make the graph cyclic; the graph is left unchanged.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, LatticeError> {
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            return Ok(false);
        }
        if let Some(path) = self.graph.would_create_cycle(from, to) {
            return Err(LatticeError::CycleDetected {
                from: from.ident(),
                to: to.ident(),
                path: path.into_iter().map(NodeId::ident).collect(),
            });
        }
        Ok(self.graph.add_edge(from, to))
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<N> {
        self.graph.remove_node(id)
    }

    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.graph.remove_edge(from, to)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.graph.node(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.graph.node_mut(id)
    }

    #[must_use]
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Edge<'_, E>> {
        self.graph.edge(from, to)
    }

    pub fn edge_content_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut Option<E>> {
        self.graph.edge_content_mut(from, to)
    }

    /// A topological ordering of every node: each edge goes forward.
    #[must_use]
    pub fn topological_sort(&self) -> Vec<NodeId> {
        self.graph.topological_sort().unwrap_or_else(|| {
            // Unreachable for a checked DAG; keep insertion order rather
            // than panicking.
            self.graph.node_ids().collect()
        })
    }

    /// Nodes without outgoing edges.
    #[must_use]
    pub fn sinks(&self) -> BTreeSet<NodeId> {
        self.graph.sinks()
    }

    /// Nodes without incoming edges.
    #[must_use]
    pub fn sources(&self) -> BTreeSet<NodeId> {
        self.graph.sources()
    }

    /// Nodes strictly below `id`: every node with a path to it.
    #[must_use]
    pub fn minorants(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.graph.ancestors(id)
    }

    /// Nodes strictly above `id`: every node reachable from it.
    #[must_use]
    pub fn majorants(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.graph.reachable(id)
    }

    /// Remove every edge implied by a longer path.
    pub fn transitive_reduction(&mut self) -> usize {
        self.graph.transitive_reduction().unwrap_or(0)
    }

    /// Add an edge for every path.
    pub fn transitive_closure(&mut self) {
        self.graph.transitive_closure();
    }
}

// ---------------------------------------------------------------------------
// SCC condensation
// ---------------------------------------------------------------------------

impl<N, E> DGraph<N, E> {
    /// Collapse the strongly connected components of this graph.
    ///
    /// Each node of the result is an [`SccNode`] listing the original members;
    /// an edge `X → Y` exists iff some original edge goes from a member of `X`
    /// to a member of `Y` (edges inside a component are dropped). Components
    /// are inserted in topological order, so their idents increase along
    /// every edge.
    #[must_use]
    #[instrument(skip(self), fields(nodes = self.node_count(), edges = self.edge_count()))]
    pub fn strongly_connected_components(&self) -> DAGraph<SccNode> {
        // Tarjan's algorithm on the plain structure; components come out in
        // reverse topological order.
        let structure: StableDiGraph<NodeId, ()> = {
            let mut g = StableDiGraph::default();
            let mut index = BTreeMap::new();
            for id in self.node_ids() {
                index.insert(id, g.add_node(id));
            }
            for edge in self.edges() {
                if let (Some(&from), Some(&to)) = (index.get(&edge.from()), index.get(&edge.to())) {
                    g.add_edge(from, to, ());
                }
            }
            g
        };

        let mut condensed: DGraph<SccNode> = DGraph::new();
        let mut component_of: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        for component in tarjan_scc(&structure).into_iter().rev() {
            let mut members: Vec<NodeId> = component
                .into_iter()
                .filter_map(|index| structure.node_weight(index).copied())
                .collect();
            members.sort_unstable();
            let members_copy = members.clone();
            let scc = condensed.add_node(SccNode { members });
            for member in members_copy {
                component_of.insert(member, scc);
            }
        }

        for edge in self.edges() {
            if let (Some(&from), Some(&to)) =
                (component_of.get(&edge.from()), component_of.get(&edge.to()))
            {
                if from != to {
                    condensed.add_edge(from, to);
                }
            }
        }

        DAGraph::from_acyclic(condensed)
    }
}

impl DAGraph<SccNode> {
    /// Map every original node to the component holding it.
    #[must_use]
    pub fn membership(&self) -> BTreeMap<NodeId, NodeId> {
        self.graph
            .nodes()
            .flat_map(|(scc, node)| node.members.iter().map(move |&member| (member, scc)))
            .collect()
    }

    /// The component holding `member`, or `None` if no component does.
    #[must_use]
    pub fn component_of(&self, member: NodeId) -> Option<NodeId> {
        self.graph
            .nodes()
            .find(|(_, node)| node.members.binary_search(&member).is_ok())
            .map(|(scc, _)| scc)
    }
}
