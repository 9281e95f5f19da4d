#![forbid(unsafe_code)]
//! galois-core library: closed set lattices of closure systems.
//!
//! # Layout
//!
//! - [`set`]: ordered sets used as extents, intents and valuations.
//! - [`graph`]: directed graphs, acyclic graphs, SCC condensation.
//! - [`lattice`]: lattices, concepts, and the two lattice generators.
//! - [`closure`]: the [`ClosureSystem`] trait, implicational systems and
//!   formal contexts.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return `Result<_, LatticeError>`; lookup
//!   misses return `Option`.
//! - **Logging**: `tracing` spans on the generators, `debug!` per step.

pub mod closure;
pub mod error;
pub mod graph;
pub mod lattice;
pub mod set;

pub use closure::{ClosureSystem, Context, ImplicationalSystem, Rule};
pub use error::{ErrorCode, LatticeError};
pub use graph::{DAGraph, DGraph, Edge, NodeId, SccNode};
pub use lattice::Lattice;
pub use lattice::bordat::{DependencyGraph, Valuation, immediate_successors};
pub use lattice::concept::Concept;
pub use lattice::concept_lattice::{ConceptLattice, Reduced};
pub use set::ComparableSet;
