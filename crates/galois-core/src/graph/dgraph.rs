//! General directed graphs with ordered node contents and optional edge
//! contents.
//!
//! # Storage
//!
//! [`DGraph`] wraps a petgraph `StableDiGraph`, so node indices survive node
//! removal. A [`NodeId`] therefore stays valid in every graph derived by
//! copying (subgraphs, transposes, relabelled maps), and its
//! [`NodeId::ident`] serves as the canonical integer label of the node.
//!
//! Identities are unique among the live nodes of a graph only. The slot
//! freed by [`DGraph::remove_node`] is handed to the next
//! [`DGraph::add_node`], so an id kept across a removal may come to name
//! a different node. The lattice generators never remove nodes.
//!
//! # Edges
//!
//! The graph is simple: at most one edge per ordered pair. [`DGraph::add_edge`]
//! returns `false` instead of failing when an endpoint is absent or the edge
//! already exists. Self-loops are not rejected; avoiding them is up to the
//! caller.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::error::LatticeError;

// ---------------------------------------------------------------------------
// NodeId / Edge
// ---------------------------------------------------------------------------

/// Stable identity of a node, shared by every graph copied from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NodeIndex);

impl NodeId {
    /// Canonical integer label of the node, unique among the live nodes of
    /// its graph family.
    #[must_use]
    pub fn ident(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.ident())
    }
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a, E> {
    from: NodeId,
    to: NodeId,
    content: Option<&'a E>,
}

impl<'a, E> Edge<'a, E> {
    #[must_use]
    pub const fn from(&self) -> NodeId {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> NodeId {
        self.to
    }

    /// The valuation carried by the edge, if any.
    #[must_use]
    pub const fn content(&self) -> Option<&'a E> {
        self.content
    }

    #[must_use]
    pub const fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

// ---------------------------------------------------------------------------
// DGraph
// ---------------------------------------------------------------------------

/// A directed graph whose nodes carry `N` and whose edges optionally carry `E`.
#[derive(Debug, Clone)]
pub struct DGraph<N, E = ()> {
    inner: StableDiGraph<N, Option<E>>,
}

impl<N, E> Default for DGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DGraph<N, E> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::default(),
        }
    }

    /// Add a node and return its identity, reusing the slot of the most
    /// recently removed node if there is one.
    pub fn add_node(&mut self, content: N) -> NodeId {
        NodeId(self.inner.add_node(content))
    }

    /// Add the edge `from → to` without content.
    ///
    /// Returns `false` when either endpoint is absent or the edge exists.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.insert_edge(from, to, None)
    }

    /// Add the edge `from → to` valuated by `content`.
    ///
    /// Returns `false` when either endpoint is absent or the edge exists.
    pub fn add_edge_with(&mut self, from: NodeId, to: NodeId, content: E) -> bool {
        self.insert_edge(from, to, Some(content))
    }

    fn insert_edge(&mut self, from: NodeId, to: NodeId, content: Option<E>) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) || self.contains_edge(from, to) {
            return false;
        }
        self.inner.add_edge(from.0, to.0, content);
        true
    }

    /// Remove a node with all its incident edges, returning its content.
    pub fn remove_node(&mut self, id: NodeId) -> Option<N> {
        self.inner.remove_node(id.0)
    }

    /// Remove the edge `from → to`; returns `true` if it existed.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.inner
            .find_edge(from.0, to.0)
            .and_then(|edge| self.inner.remove_edge(edge))
            .is_some()
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.inner.contains_node(id.0)
    }

    #[must_use]
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.inner.find_edge(from.0, to.0).is_some()
    }

    /// Content of a node, or `None` if the node is absent.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.inner.node_weight(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.inner.node_weight_mut(id.0)
    }

    /// The edge `from → to`, or `None` if absent.
    #[must_use]
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Edge<'_, E>> {
        let index = self.inner.find_edge(from.0, to.0)?;
        let content = self.inner.edge_weight(index)?.as_ref();
        Some(Edge { from, to, content })
    }

    /// Mutable access to the content slot of `from → to`.
    pub fn edge_content_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut Option<E>> {
        let index = self.inner.find_edge(from.0, to.0)?;
        self.inner.edge_weight_mut(index)
    }

    /// Node identities in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices().map(NodeId)
    }

    /// Nodes with their contents, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.inner
            .node_indices()
            .filter_map(|index| self.inner.node_weight(index).map(|n| (NodeId(index), n)))
    }

    /// Every edge, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_, E>> + '_ {
        self.inner.edge_indices().filter_map(|index| {
            let (from, to) = self.inner.edge_endpoints(index)?;
            let content = self.inner.edge_weight(index)?.as_ref();
            Some(Edge {
                from: NodeId(from),
                to: NodeId(to),
                content,
            })
        })
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Immediate successors of `id`, sorted by ident.
    #[must_use]
    pub fn successors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Immediate predecessors of `id`, sorted by ident.
    #[must_use]
    pub fn predecessors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: NodeId, direction: Direction) -> BTreeSet<NodeId> {
        if !self.contains_node(id) {
            return BTreeSet::new();
        }
        self.inner
            .neighbors_directed(id.0, direction)
            .map(NodeId)
            .collect()
    }

    /// Outgoing edges of `id`, ordered by target.
    #[must_use]
    pub fn edges_succ(&self, id: NodeId) -> Vec<Edge<'_, E>> {
        self.successors(id)
            .into_iter()
            .filter_map(|to| self.edge(id, to))
            .collect()
    }

    /// Incoming edges of `id`, ordered by source.
    #[must_use]
    pub fn edges_pred(&self, id: NodeId) -> Vec<Edge<'_, E>> {
        self.predecessors(id)
            .into_iter()
            .filter_map(|from| self.edge(from, id))
            .collect()
    }

    /// Nodes without outgoing edges.
    #[must_use]
    pub fn sinks(&self) -> BTreeSet<NodeId> {
        self.node_ids()
            .filter(|&id| {
                self.inner
                    .neighbors_directed(id.0, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Nodes without incoming edges.
    #[must_use]
    pub fn sources(&self) -> BTreeSet<NodeId> {
        self.node_ids()
            .filter(|&id| {
                self.inner
                    .neighbors_directed(id.0, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }

    /// Nodes reachable from `id` through a path of length ≥ 1.
    ///
    /// `id` itself belongs to the result only when it lies on a cycle.
    #[must_use]
    pub fn reachable(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.walk(id, Direction::Outgoing)
    }

    /// Nodes from which `id` is reachable through a path of length ≥ 1.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.walk(id, Direction::Incoming)
    }

    fn walk(&self, start: NodeId, direction: Direction) -> BTreeSet<NodeId> {
        let mut seen = BTreeSet::new();
        if !self.contains_node(start) {
            return seen;
        }
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start.0]);
        while let Some(current) = queue.pop_front() {
            for next in self.inner.neighbors_directed(current, direction) {
                if seen.insert(NodeId(next)) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Reverse every edge in place, keeping edge contents.
    pub fn transpose(&mut self) {
        let indices: Vec<_> = self.inner.edge_indices().collect();
        let mut reversed = Vec::with_capacity(indices.len());
        for index in indices {
            if let Some((from, to)) = self.inner.edge_endpoints(index) {
                if let Some(content) = self.inner.remove_edge(index) {
                    reversed.push((to, from, content));
                }
            }
        }
        for (from, to, content) in reversed {
            self.inner.add_edge(from, to, content);
        }
    }

    /// A topological ordering of every node, or `None` when the graph is
    /// cyclic.
    #[must_use]
    pub fn topological_sort(&self) -> Option<Vec<NodeId>> {
        toposort(&self.inner, None)
            .ok()
            .map(|order| order.into_iter().map(NodeId).collect())
    }

    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.inner)
    }

    /// Check whether adding `from → to` would introduce a cycle.
    ///
    /// Returns the closing path `from → to → … → from` when it would. If the
    /// edge already exists this returns `None` (no *new* cycle is created).
    #[must_use]
    pub fn would_create_cycle(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if from == to {
            return Some(vec![from, from]);
        }
        if self.contains_edge(from, to) || !self.contains_node(to) {
            return None;
        }

        // BFS from `to` looking for `from`.
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([to.0]);
        let mut visited: HashSet<NodeIndex> = HashSet::from([to.0]);
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        while let Some(current) = queue.pop_front() {
            if current == from.0 {
                return Some(reconstruct_cycle_path(from.0, to.0, &parent));
            }
            for next in self.inner.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(next) {
                    parent.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Add `a → b` for every pair joined by a path, self-loops excepted.
    pub fn transitive_closure(&mut self) {
        let pairs: Vec<(NodeId, NodeId)> = self
            .node_ids()
            .flat_map(|from| {
                self.reachable(from)
                    .into_iter()
                    .filter(move |&to| to != from)
                    .map(move |to| (from, to))
            })
            .collect();
        for (from, to) in pairs {
            self.add_edge(from, to);
        }
    }

    /// Remove every edge `(u, v)` for which another path `u → … → v` of
    /// length ≥ 2 exists, returning the number of removed edges.
    ///
    /// # Algorithm
    ///
    /// Process nodes in reverse topological order (sinks first), so that the
    /// reachable set of every successor is known when its predecessor is
    /// visited. An edge `(u, v)` is redundant when `v` is reachable from some
    /// other direct successor `w ≠ v` of `u`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::Cyclic`] and leaves the graph untouched when it
    /// contains a cycle.
    pub fn transitive_reduction(&mut self) -> Result<usize, LatticeError> {
        let topo = self.topological_sort().ok_or(LatticeError::Cyclic)?;

        let mut reachable: HashMap<NodeId, HashSet<NodeId>> = HashMap::with_capacity(topo.len());
        for &u in topo.iter().rev() {
            let mut reach_u: HashSet<NodeId> = HashSet::new();
            for v in self.successors(u) {
                // All nodes reachable from v (including v itself) are
                // reachable from u.
                reach_u.insert(v);
                if let Some(rv) = reachable.get(&v) {
                    reach_u.extend(rv.iter().copied());
                }
            }
            reachable.insert(u, reach_u);
        }

        let to_remove: Vec<(NodeId, NodeId)> = self
            .edges()
            .filter(|edge| {
                let (u, v) = (edge.from(), edge.to());
                self.successors(u)
                    .into_iter()
                    .filter(|&w| w != v)
                    .any(|w| reachable.get(&w).is_some_and(|rw| rw.contains(&v)))
            })
            .map(|edge| (edge.from(), edge.to()))
            .collect();

        for &(from, to) in &to_remove {
            self.remove_edge(from, to);
        }
        Ok(to_remove.len())
    }

    /// Relabel node and edge contents, keeping every identity.
    #[must_use]
    pub fn map<N2, E2>(
        &self,
        mut node_map: impl FnMut(NodeId, &N) -> N2,
        mut edge_map: impl FnMut(&E) -> E2,
    ) -> DGraph<N2, E2> {
        DGraph {
            inner: self.inner.map(
                |index, content| node_map(NodeId(index), content),
                |_, content| content.as_ref().map(&mut edge_map),
            ),
        }
    }
}

impl<N: PartialEq, E> DGraph<N, E> {
    /// The first node whose content equals `content`, in insertion order.
    #[must_use]
    pub fn find_node(&self, content: &N) -> Option<NodeId> {
        self.nodes()
            .find(|(_, candidate)| *candidate == content)
            .map(|(id, _)| id)
    }

    /// The edge between the first nodes holding `from` and `to`.
    #[must_use]
    pub fn find_edge(&self, from: &N, to: &N) -> Option<Edge<'_, E>> {
        self.edge(self.find_node(from)?, self.find_node(to)?)
    }
}

impl<N: Clone, E: Clone> DGraph<N, E> {
    /// A reversed copy of this graph.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut copy = self.clone();
        copy.transpose();
        copy
    }

    /// The subgraph induced by `keep`: those nodes and every edge between them.
    #[must_use]
    pub fn subgraph_by_nodes(&self, keep: &BTreeSet<NodeId>) -> Self {
        let mut sub = self.clone();
        let dropped: Vec<NodeId> = self.node_ids().filter(|id| !keep.contains(id)).collect();
        for id in dropped {
            sub.remove_node(id);
        }
        sub
    }

    /// The subgraph with every node but only the edges listed in `keep`.
    #[must_use]
    pub fn subgraph_by_edges(&self, keep: &BTreeSet<(NodeId, NodeId)>) -> Self {
        let mut sub = self.clone();
        let dropped: Vec<(NodeId, NodeId)> = self
            .edges()
            .map(|edge| (edge.from(), edge.to()))
            .filter(|pair| !keep.contains(pair))
            .collect();
        for (from, to) in dropped {
            sub.remove_edge(from, to);
        }
        sub
    }
}

/// Two graphs are equal when they hold the same identities, contents and
/// edges, regardless of edge insertion order.
impl<N: PartialEq, E: PartialEq> PartialEq for DGraph<N, E> {
    fn eq(&self, other: &Self) -> bool {
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        let same_nodes = self
            .nodes()
            .all(|(id, content)| other.node(id) == Some(content));
        let edges: BTreeMap<(NodeId, NodeId), Option<&E>> = self
            .edges()
            .map(|edge| ((edge.from(), edge.to()), edge.content()))
            .collect();
        same_nodes
            && other.edges().all(|edge| {
                edges.get(&(edge.from(), edge.to())) == Some(&edge.content())
            })
    }
}

fn reconstruct_cycle_path(
    from: NodeIndex,
    to: NodeIndex,
    parent: &HashMap<NodeIndex, NodeIndex>,
) -> Vec<NodeId> {
    // Parent links represent a path: to -> ... -> from.
    let mut to_to_from: Vec<NodeIndex> = vec![from];
    let mut cursor = from;

    while cursor != to {
        if let Some(next) = parent.get(&cursor) {
            cursor = *next;
            to_to_from.push(cursor);
        } else {
            break;
        }
    }

    to_to_from.reverse();

    let mut cycle: Vec<NodeId> = Vec::with_capacity(to_to_from.len() + 1);
    cycle.push(NodeId(from));
    cycle.extend(to_to_from.into_iter().map(NodeId));
    cycle
}
