//! Concept lattices: generation from a closure system, and reductions.
//!
//! Two generators build the closed set lattice of a [`ClosureSystem`]:
//!
//! - [`ConceptLattice::complete_lattice`] enumerates every closed set and
//!   links each pair related by strict inclusion (the comparability graph).
//! - [`ConceptLattice::diagram_lattice`] walks up from the bottom with
//!   Bordat's successor step, producing the Hasse diagram directly together
//!   with a [`DependencyGraph`].
//!
//! Both give the same concepts; the Hasse diagram of the first equals the
//! second.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::closure::{ClosureSystem, ImplicationalSystem};
use crate::error::LatticeError;
use crate::graph::{DAGraph, DGraph, NodeId};
use crate::lattice::bordat::{self, DependencyGraph, Precedence};
use crate::lattice::concept::Concept;
use crate::lattice::Lattice;
use crate::set::ComparableSet;

// ---------------------------------------------------------------------------
// Reduced
// ---------------------------------------------------------------------------

/// Node content of a reduced lattice: irreducible concepts keep one element
/// of their reduced extent or intent, every other concept becomes a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduced<T> {
    Placeholder,
    Join(T),
    Meet(T),
    JoinMeet { join: T, meet: T },
}

impl<T> Reduced<T> {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

impl<T: fmt::Display> fmt::Display for Reduced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => Ok(()),
            Self::Join(element) | Self::Meet(element) => write!(f, "{element}"),
            Self::JoinMeet { join, meet } => write!(f, "{{{join}, {meet}}}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConceptLattice
// ---------------------------------------------------------------------------

/// A lattice of [`Concept`]s ordered by inclusion of their extents.
///
/// Edge contents, when present, are the valuations set by
/// [`make_edge_valuation`](Self::make_edge_valuation).
#[derive(Debug, Clone)]
pub struct ConceptLattice<T> {
    lattice: Lattice<Concept<T>, ComparableSet<T>>,
    dependencies: Option<DependencyGraph<T>>,
}

impl<T: Ord + Clone + fmt::Debug> ConceptLattice<T> {
    /// The comparability graph of the closed sets of `system`: one concept
    /// per closed set, an edge `a → b` whenever `extent(a) ⊊ extent(b)`.
    #[must_use]
    #[instrument(skip_all)]
    pub fn complete_lattice<C>(system: &C) -> Self
    where
        C: ClosureSystem<Element = T> + ?Sized,
    {
        let mut graph: DGraph<Concept<T>, ComparableSet<T>> = DGraph::new();
        let mut extents: Vec<(NodeId, ComparableSet<T>)> = Vec::new();
        for concept in system.all_closures() {
            let extent = concept.extent().cloned().unwrap_or_default();
            extents.push((graph.add_node(concept), extent));
        }
        for (from, smaller) in &extents {
            for (to, larger) in &extents {
                if from != to && smaller.is_strict_subset(larger) {
                    graph.add_edge(*from, *to);
                }
            }
        }
        debug!(
            concepts = graph.node_count(),
            edges = graph.edge_count(),
            "complete lattice generated"
        );

        let bottom = match graph.sources().first() {
            Some(&id) => id,
            None => graph.add_node(system.concept(system.closure(&ComparableSet::new()))),
        };
        Self {
            lattice: Lattice::from_generated(DAGraph::from_acyclic(graph), bottom),
            dependencies: None,
        }
    }

    /// The Hasse diagram of the closed sets of `system`, built upward from
    /// `closure(∅)` by Bordat's successor step.
    ///
    /// The lattice keeps the [`DependencyGraph`] filled during generation.
    #[must_use]
    #[instrument(skip_all)]
    pub fn diagram_lattice<C>(system: &C) -> Self
    where
        C: ClosureSystem<Element = T> + ?Sized,
    {
        let precedence = Precedence::of(system);
        let mut dependencies = DependencyGraph::for_system(system);
        let mut graph: DGraph<Concept<T>, ComparableSet<T>> = DGraph::new();
        let mut index: BTreeMap<ComparableSet<T>, NodeId> = BTreeMap::new();

        let base = system.closure(&ComparableSet::new());
        let bottom = graph.add_node(system.concept(base.clone()));
        let first = bordat::successors(&base, system, &precedence, &mut dependencies);
        index.insert(base, bottom);

        // Depth-first, each frame holding the successors still to link.
        let mut stack = vec![(bottom, first.into_iter())];
        while let Some((node, pending)) = stack.last_mut() {
            let node = *node;
            let Some(extent) = pending.next() else {
                stack.pop();
                continue;
            };
            if let Some(&known) = index.get(&extent) {
                graph.add_edge(node, known);
                continue;
            }
            let next = bordat::successors(&extent, system, &precedence, &mut dependencies);
            let id = graph.add_node(system.concept(extent.clone()));
            index.insert(extent, id);
            graph.add_edge(node, id);
            stack.push((id, next.into_iter()));
        }
        debug!(
            concepts = graph.node_count(),
            edges = graph.edge_count(),
            dependencies = dependencies.graph().edge_count(),
            "diagram generated"
        );

        Self {
            lattice: Lattice::from_generated(DAGraph::from_acyclic(graph), bottom),
            dependencies: Some(dependencies),
        }
    }

    #[must_use]
    pub const fn lattice(&self) -> &Lattice<Concept<T>, ComparableSet<T>> {
        &self.lattice
    }

    #[must_use]
    pub fn into_lattice(self) -> Lattice<Concept<T>, ComparableSet<T>> {
        self.lattice
    }

    /// The dependencies recorded by [`diagram_lattice`](Self::diagram_lattice);
    /// `None` for a complete lattice.
    #[must_use]
    pub const fn dependency_graph(&self) -> Option<&DependencyGraph<T>> {
        self.dependencies.as_ref()
    }

    pub fn concepts(&self) -> impl Iterator<Item = (NodeId, &Concept<T>)> + '_ {
        self.lattice.graph().nodes()
    }

    #[must_use]
    pub fn concept(&self, id: NodeId) -> Option<&Concept<T>> {
        self.lattice.node(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lattice.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.lattice.edge_count()
    }

    /// The concept whose extent is `extent`.
    #[must_use]
    pub fn find_concept(&self, extent: &ComparableSet<T>) -> Option<NodeId> {
        self.concepts()
            .find(|(_, concept)| concept.extent() == Some(extent))
            .map(|(id, _)| id)
    }

    /// A deep copy; identities are kept.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// This lattice restricted to its covering relation.
    #[must_use]
    pub fn hasse(&self) -> Self {
        Self {
            lattice: self.lattice.hasse(),
            dependencies: self.dependencies.clone(),
        }
    }

    /// The extents of the immediate successors of `node`, computed against
    /// this lattice's dependency graph.
    ///
    /// # Errors
    ///
    /// [`LatticeError::UnknownNode`] or [`LatticeError::MissingExtent`] when
    /// `node` has no extent to start from, and
    /// [`LatticeError::IncompleteDependencyGraph`] when the lattice carries no
    /// dependency graph covering the universe of `system`.
    pub fn immediate_successors<C>(
        &mut self,
        node: NodeId,
        system: &C,
    ) -> Result<Vec<ComparableSet<T>>, LatticeError>
    where
        C: ClosureSystem<Element = T> + ?Sized,
    {
        let extent = self.extent_of(node)?.clone();
        match self.dependencies.as_mut() {
            Some(dependencies) => bordat::immediate_successors(&extent, system, dependencies),
            None => {
                let mut empty = DependencyGraph::new(&ComparableSet::new(), ComparableSet::new());
                bordat::immediate_successors(&extent, system, &mut empty)
            }
        }
    }

    /// The implicational system equivalent to the generating closure system,
    /// read off the dependency graph.
    #[must_use]
    pub fn implicational_basis(&self) -> Option<ImplicationalSystem<T>> {
        self.dependencies
            .as_ref()
            .map(DependencyGraph::implicational_basis)
    }

    fn extent_of(&self, id: NodeId) -> Result<&ComparableSet<T>, LatticeError> {
        self.lattice
            .node(id)
            .ok_or_else(|| LatticeError::UnknownNode(id.ident()))?
            .extent()
            .ok_or_else(|| LatticeError::MissingExtent(id.ident()))
    }

    // -----------------------------------------------------------------------
    // Extent and intent handling
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn contains_all_extents(&self) -> bool {
        self.concepts().all(|(_, concept)| concept.has_extent())
    }

    #[must_use]
    pub fn contains_all_intents(&self) -> bool {
        self.concepts().all(|(_, concept)| concept.has_intent())
    }

    pub fn remove_all_extents(&mut self) {
        for id in self.ids() {
            if let Some(concept) = self.lattice.node_mut(id) {
                concept.put_extent(None);
            }
        }
    }

    pub fn remove_all_intents(&mut self) {
        for id in self.ids() {
            if let Some(concept) = self.lattice.node_mut(id) {
                concept.put_intent(None);
            }
        }
    }

    /// Give every join-irreducible concept lacking an extent the singleton
    /// `{label(id)}`.
    pub fn initialize_extents_for_join(&mut self, mut label: impl FnMut(NodeId) -> T) {
        for id in self.lattice.join_irreducibles() {
            if let Some(concept) = self.lattice.node_mut(id) {
                if !concept.has_extent() {
                    concept.put_extent(Some(ComparableSet::singleton(label(id))));
                }
            }
        }
    }

    /// Give every meet-irreducible concept lacking an intent the singleton
    /// `{label(id)}`.
    pub fn initialize_intents_for_meet(&mut self, mut label: impl FnMut(NodeId) -> T) {
        for id in self.lattice.meet_irreducibles() {
            if let Some(concept) = self.lattice.node_mut(id) {
                if !concept.has_intent() {
                    concept.put_intent(Some(ComparableSet::singleton(label(id))));
                }
            }
        }
    }

    fn ids(&self) -> Vec<NodeId> {
        self.lattice.graph().node_ids().collect()
    }

    // -----------------------------------------------------------------------
    // Reductions
    // -----------------------------------------------------------------------

    /// Keep in each extent only the elements not found in a predecessor's
    /// extent, and in each intent only those not found in a successor's
    /// intent.
    ///
    /// Extents are reduced when every concept has one, intents likewise.
    /// Every node's original set is the union of the reduced sets at or
    /// below it (extents) or at or above it (intents).
    ///
    /// # Errors
    ///
    /// [`LatticeError::NothingToReduce`] when neither every extent nor every
    /// intent is present; the lattice is left unchanged.
    pub fn make_inclusion_reduction(&mut self) -> Result<(), LatticeError> {
        let extents = self.contains_all_extents();
        let intents = self.contains_all_intents();
        if !extents && !intents {
            return Err(LatticeError::NothingToReduce);
        }

        // Computed from the unreduced sets, then written back.
        let graph = self.lattice.graph();
        let mut reduced: Vec<(NodeId, Option<ComparableSet<T>>, Option<ComparableSet<T>>)> =
            Vec::new();
        for (id, concept) in graph.nodes() {
            let extent = concept.extent().filter(|_| extents).map(|own| {
                let mut own = own.clone();
                for below in graph.predecessors(id) {
                    if let Some(other) = graph.node(below).and_then(Concept::extent) {
                        own.remove_all(other);
                    }
                }
                own
            });
            let intent = concept.intent().filter(|_| intents).map(|own| {
                let mut own = own.clone();
                for above in graph.successors(id) {
                    if let Some(other) = graph.node(above).and_then(Concept::intent) {
                        own.remove_all(other);
                    }
                }
                own
            });
            reduced.push((id, extent, intent));
        }

        for (id, extent, intent) in reduced {
            if let Some(concept) = self.lattice.node_mut(id) {
                if extent.is_some() {
                    concept.put_extent(extent);
                }
                if intent.is_some() {
                    concept.put_intent(intent);
                }
            }
        }
        Ok(())
    }

    /// Inclusion reduction, then empty the reduced extent of every concept
    /// that is not join-irreducible and the reduced intent of every concept
    /// that is not meet-irreducible.
    ///
    /// # Errors
    ///
    /// As [`make_inclusion_reduction`](Self::make_inclusion_reduction).
    pub fn make_irreducibles_reduction(&mut self) -> Result<(), LatticeError> {
        self.make_inclusion_reduction()?;
        let joins = self.lattice.join_irreducibles();
        let meets = self.lattice.meet_irreducibles();
        for id in self.ids() {
            if let Some(concept) = self.lattice.node_mut(id) {
                if !joins.contains(&id) {
                    if let Some(extent) = concept.extent_mut() {
                        *extent = ComparableSet::new();
                    }
                }
                if !meets.contains(&id) {
                    if let Some(intent) = concept.intent_mut() {
                        *intent = ComparableSet::new();
                    }
                }
            }
        }
        Ok(())
    }

    /// Valuate every edge `a → b` without content by `extent(b) \ extent(a)`.
    ///
    /// # Errors
    ///
    /// [`LatticeError::MissingExtent`] when an endpoint of such an edge has
    /// no extent; no edge is valuated then.
    pub fn make_edge_valuation(&mut self) -> Result<(), LatticeError> {
        let mut valuations = Vec::new();
        for edge in self.lattice.graph().edges() {
            if edge.has_content() {
                continue;
            }
            let lower = self.extent_of(edge.from())?;
            let upper = self.extent_of(edge.to())?;
            valuations.push((edge.from(), edge.to(), upper.difference(lower)));
        }
        for (from, to, valuation) in valuations {
            if let Some(content) = self.lattice.edge_content_mut(from, to) {
                *content = Some(valuation);
            }
        }
        Ok(())
    }

    /// The lattice with join-irreducibles labelled by the first element of
    /// their reduced extent and every other node a placeholder.
    ///
    /// # Errors
    ///
    /// [`LatticeError::MissingExtent`] when some concept has no extent.
    pub fn join_reduction(&self) -> Result<Lattice<Reduced<T>>, LatticeError> {
        self.require_extents()?;
        let mut reduced = self.copy();
        reduced.make_irreducibles_reduction()?;
        let joins = reduced.lattice.join_irreducibles();
        Ok(reduced.lattice.map(
            |id, concept| {
                first_if(joins.contains(&id), concept.extent())
                    .map_or(Reduced::Placeholder, Reduced::Join)
            },
            |_| (),
        ))
    }

    /// The lattice with meet-irreducibles labelled by the first element of
    /// their reduced intent and every other node a placeholder.
    ///
    /// # Errors
    ///
    /// [`LatticeError::MissingIntent`] when some concept has no intent.
    pub fn meet_reduction(&self) -> Result<Lattice<Reduced<T>>, LatticeError> {
        if let Some((id, _)) = self.concepts().find(|(_, concept)| !concept.has_intent()) {
            return Err(LatticeError::MissingIntent(id.ident()));
        }
        let mut reduced = self.copy();
        reduced.make_irreducibles_reduction()?;
        let meets = reduced.lattice.meet_irreducibles();
        Ok(reduced.lattice.map(
            |id, concept| {
                first_if(meets.contains(&id), concept.intent())
                    .map_or(Reduced::Placeholder, Reduced::Meet)
            },
            |_| (),
        ))
    }

    /// The lattice with join-irreducibles labelled from their reduced extent,
    /// meet-irreducibles from their reduced intent, and concepts that are
    /// both labelled by the pair.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NothingToReduce`] when neither every extent nor every
    /// intent is present.
    pub fn irreducibles_reduction(&self) -> Result<Lattice<Reduced<T>>, LatticeError> {
        let mut reduced = self.copy();
        reduced.make_irreducibles_reduction()?;
        let joins = reduced.lattice.join_irreducibles();
        let meets = reduced.lattice.meet_irreducibles();
        Ok(reduced.lattice.map(
            |id, concept| {
                let join = first_if(joins.contains(&id), concept.extent());
                let meet = first_if(meets.contains(&id), concept.intent());
                match (join, meet) {
                    (Some(join), Some(meet)) => Reduced::JoinMeet { join, meet },
                    (Some(join), None) => Reduced::Join(join),
                    (None, Some(meet)) => Reduced::Meet(meet),
                    (None, None) => Reduced::Placeholder,
                }
            },
            |_| (),
        ))
    }

    fn require_extents(&self) -> Result<(), LatticeError> {
        match self.concepts().find(|(_, concept)| !concept.has_extent()) {
            Some((id, _)) => Err(LatticeError::MissingExtent(id.ident())),
            None => Ok(()),
        }
    }
}

fn first_if<T: Ord + Clone>(keep: bool, set: Option<&ComparableSet<T>>) -> Option<T> {
    if keep {
        set.and_then(ComparableSet::first).cloned()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(elements: &[u8]) -> ComparableSet<u8> {
        elements.iter().copied().collect()
    }

    /// Universe {1, 2, 3} with the single rule {1} → {2}.
    fn one_rule() -> ImplicationalSystem<u8> {
        let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3]));
        is.add_rule(set(&[1]), set(&[2]));
        is
    }

    fn extents(lattice: &ConceptLattice<u8>) -> BTreeSet<ComparableSet<u8>> {
        lattice
            .concepts()
            .filter_map(|(_, concept)| concept.extent().cloned())
            .collect()
    }

    #[test]
    fn diagram_of_one_rule_has_six_concepts() {
        let lattice = ConceptLattice::diagram_lattice(&one_rule());
        assert_eq!(lattice.node_count(), 6);
        assert_eq!(lattice.edge_count(), 7);
        assert_eq!(
            extents(&lattice),
            BTreeSet::from([
                set(&[]),
                set(&[2]),
                set(&[3]),
                set(&[1, 2]),
                set(&[2, 3]),
                set(&[1, 2, 3]),
            ])
        );
        let bottom = lattice.lattice().bottom();
        let top = lattice.lattice().top();
        assert_eq!(lattice.concept(bottom).and_then(Concept::extent), Some(&set(&[])));
        assert_eq!(lattice.concept(top).and_then(Concept::extent), Some(&set(&[1, 2, 3])));
    }

    #[test]
    fn complete_lattice_reduces_to_diagram() {
        let is = one_rule();
        let complete = ConceptLattice::complete_lattice(&is);
        assert_eq!(complete.node_count(), 6);
        assert_eq!(complete.edge_count(), 12);
        assert!(complete.dependency_graph().is_none());

        let hasse = complete.hasse();
        assert_eq!(hasse.edge_count(), 7);
        assert_eq!(extents(&hasse), extents(&ConceptLattice::diagram_lattice(&is)));
    }

    #[test]
    fn inclusion_reduction_keeps_new_elements() {
        let mut lattice = ConceptLattice::diagram_lattice(&one_rule());
        lattice.make_inclusion_reduction().expect("extents are present");
        let reduced_of = |extent: &[u8]| {
            let original = ConceptLattice::diagram_lattice(&one_rule());
            let id = original.find_concept(&set(extent)).expect("closed set");
            lattice.concept(id).and_then(Concept::extent).cloned()
        };
        assert_eq!(reduced_of(&[1, 2]), Some(set(&[1])));
        assert_eq!(reduced_of(&[2]), Some(set(&[2])));
        assert_eq!(reduced_of(&[2, 3]), Some(set(&[])));
        assert_eq!(reduced_of(&[1, 2, 3]), Some(set(&[])));
    }

    #[test]
    fn join_reduction_labels_join_irreducibles() {
        let lattice = ConceptLattice::diagram_lattice(&one_rule());
        let reduced = lattice.join_reduction().expect("extents are present");
        let labels: BTreeSet<Reduced<u8>> = reduced
            .graph()
            .nodes()
            .map(|(_, label)| label.clone())
            .filter(|label| !label.is_placeholder())
            .collect();
        assert_eq!(
            labels,
            BTreeSet::from([Reduced::Join(1), Reduced::Join(2), Reduced::Join(3)])
        );
        assert_eq!(reduced.edge_count(), lattice.edge_count());
    }

    #[test]
    fn edge_valuation_is_extent_difference() {
        let mut lattice = ConceptLattice::diagram_lattice(&one_rule());
        lattice.make_edge_valuation().expect("extents are present");
        let from = lattice.find_concept(&set(&[2])).expect("closed");
        let to = lattice.find_concept(&set(&[1, 2])).expect("closed");
        let edge = lattice.lattice().edge(from, to).expect("covering edge");
        assert_eq!(edge.content(), Some(&set(&[1])));
    }

    #[test]
    fn reductions_without_extents_fail_and_leave_lattice_unchanged() {
        let mut lattice = ConceptLattice::diagram_lattice(&one_rule());
        lattice.remove_all_extents();
        assert!(!lattice.contains_all_extents());
        assert_eq!(lattice.make_inclusion_reduction(), Err(LatticeError::NothingToReduce));
        assert!(matches!(
            lattice.make_edge_valuation(),
            Err(LatticeError::MissingExtent(_))
        ));
        assert!(matches!(
            lattice.join_reduction(),
            Err(LatticeError::MissingExtent(_))
        ));
        assert!(lattice.lattice().graph().edges().all(|edge| !edge.has_content()));
    }

    #[test]
    fn initialize_extents_labels_join_irreducibles() {
        let mut lattice = ConceptLattice::diagram_lattice(&one_rule());
        lattice.remove_all_extents();
        lattice.initialize_extents_for_join(|id| u8::try_from(id.ident()).unwrap_or(u8::MAX));
        let labelled = lattice
            .concepts()
            .filter(|(_, concept)| concept.has_extent())
            .count();
        assert_eq!(labelled, lattice.lattice().join_irreducibles().len());
    }

    #[test]
    fn context_concepts_reduce_both_sides() {
        let mut ctx = crate::closure::Context::new();
        ctx.add_incidence("o1", "a");
        ctx.add_incidence("o2", "b");
        let mut lattice = ConceptLattice::diagram_lattice(&ctx);
        assert_eq!(lattice.node_count(), 4);
        assert!(lattice.contains_all_intents());

        let reduced = lattice.irreducibles_reduction().expect("both sides present");
        assert!(reduced.graph().nodes().any(|(_, label)| matches!(
            label,
            Reduced::JoinMeet { join: "a", meet: "o1" }
        )));

        lattice.make_inclusion_reduction().expect("both sides present");
        let top = lattice.lattice().top();
        assert_eq!(lattice.concept(top).and_then(Concept::intent), Some(&ComparableSet::new()));
    }

    #[test]
    fn basis_of_one_rule() {
        let lattice = ConceptLattice::diagram_lattice(&one_rule());
        let basis = lattice.implicational_basis().expect("diagram keeps dependencies");
        assert_eq!(basis.rules().len(), 1);
        assert_eq!(basis.rules()[0].to_string(), "{1} -> {2}");
        assert!(ConceptLattice::complete_lattice(&one_rule())
            .implicational_basis()
            .is_none());
    }

    #[test]
    fn online_successors_need_a_dependency_graph() {
        let is = one_rule();
        let mut diagram = ConceptLattice::diagram_lattice(&is);
        let bottom = diagram.lattice().bottom();
        assert_eq!(
            diagram.immediate_successors(bottom, &is),
            Ok(vec![set(&[2]), set(&[3])])
        );

        let mut complete = ConceptLattice::complete_lattice(&is);
        let bottom = complete.lattice().bottom();
        assert!(matches!(
            complete.immediate_successors(bottom, &is),
            Err(LatticeError::IncompleteDependencyGraph(_))
        ));
    }
}
