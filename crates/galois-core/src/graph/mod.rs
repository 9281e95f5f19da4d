//! Directed graph primitives.
//!
//! # Overview
//!
//! ```text
//! DGraph (any directed graph, may contain cycles)
//!        ↓  DGraph::strongly_connected_components()
//! DAGraph<SccNode> (components collapsed, acyclic by construction)
//!        ↓  DAGraph::transitive_reduction()
//! covering relation (Hasse diagram)
//! ```
//!
//! Node identities ([`NodeId`]) are stable across copies: a subgraph, a
//! transposed graph and a relabelled graph all share the identities of the
//! graph they were derived from.

pub mod dag;
pub mod dgraph;

pub use dag::{DAGraph, SccNode};
pub use dgraph::{DGraph, Edge, NodeId};
