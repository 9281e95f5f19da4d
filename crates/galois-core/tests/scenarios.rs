//! Known lattices with hand-computed shapes.
//!
//! Each test builds a small closure system whose closed sets are known and
//! checks node counts, covering edges and irreducibles against values
//! computed on paper.

use std::collections::BTreeSet;

use galois_core::{
    ClosureSystem, ComparableSet, ConceptLattice, Context, ImplicationalSystem, Lattice, NodeId,
    Reduced,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn set(elements: &[u8]) -> ComparableSet<u8> {
    elements.iter().copied().collect()
}

/// Every subset of {1..=n} is closed.
fn boolean(n: u8) -> ImplicationalSystem<u8> {
    ImplicationalSystem::with_universe((1..=n).collect())
}

/// Objects and attributes {1, 2, 3}, object `o` having every attribute but `o`.
fn contranominal() -> Context<u8> {
    let mut ctx = Context::new();
    for object in 1..=3 {
        for attribute in (1..=3).filter(|&a| a != object) {
            ctx.add_incidence(object, attribute);
        }
    }
    ctx
}

fn extent_set(lattice: &ConceptLattice<u8>, ids: &BTreeSet<NodeId>) -> BTreeSet<ComparableSet<u8>> {
    ids.iter()
        .filter_map(|&id| lattice.concept(id).and_then(|c| c.extent().cloned()))
        .collect()
}

/// Extent pairs of every edge.
fn covers(lattice: &ConceptLattice<u8>) -> BTreeSet<(ComparableSet<u8>, ComparableSet<u8>)> {
    let graph = lattice.lattice().graph();
    graph
        .edges()
        .filter_map(|e| {
            Some((
                graph.node(e.from())?.extent()?.clone(),
                graph.node(e.to())?.extent()?.clone(),
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Boolean lattice B3
// ---------------------------------------------------------------------------

#[test]
fn complete_b3_is_the_full_inclusion_order() {
    let lattice = ConceptLattice::complete_lattice(&boolean(3));
    assert_eq!(lattice.node_count(), 8);
    // Strict inclusions between subsets of a 3-set: 3^3 - 2^3.
    assert_eq!(lattice.edge_count(), 19);
}

#[test]
fn diagram_b3_is_the_cube() {
    let lattice = ConceptLattice::diagram_lattice(&boolean(3));
    assert_eq!(lattice.node_count(), 8);
    assert_eq!(lattice.edge_count(), 12);

    let joins = lattice.lattice().join_irreducibles();
    let meets = lattice.lattice().meet_irreducibles();
    assert_eq!(
        extent_set(&lattice, &joins),
        BTreeSet::from([set(&[1]), set(&[2]), set(&[3])])
    );
    assert_eq!(
        extent_set(&lattice, &meets),
        BTreeSet::from([set(&[1, 2]), set(&[1, 3]), set(&[2, 3])])
    );
}

#[test]
fn b3_has_no_implications() {
    let lattice = ConceptLattice::diagram_lattice(&boolean(3));
    let basis = lattice.implicational_basis().expect("diagram keeps dependencies");
    assert!(basis.rules().is_empty());
    assert_eq!(lattice.dependency_graph().map(|d| d.graph().edge_count()), Some(0));
}

#[test]
fn contranominal_scale_reduces_to_singletons() {
    let lattice = ConceptLattice::diagram_lattice(&contranominal());
    assert_eq!(lattice.node_count(), 8);

    let joins = lattice.join_reduction().expect("extents are present");
    let meets = lattice.meet_reduction().expect("intents are present");
    let labels = |reduced: &Lattice<Reduced<u8>>| -> BTreeSet<Reduced<u8>> {
        reduced
            .graph()
            .nodes()
            .map(|(_, label)| label.clone())
            .filter(|label| !label.is_placeholder())
            .collect()
    };
    assert_eq!(
        labels(&joins),
        BTreeSet::from([Reduced::Join(1), Reduced::Join(2), Reduced::Join(3)])
    );
    assert_eq!(
        labels(&meets),
        BTreeSet::from([Reduced::Meet(1), Reduced::Meet(2), Reduced::Meet(3)])
    );
}

#[test]
fn join_reduction_of_b4_keeps_the_shape() {
    let lattice = ConceptLattice::diagram_lattice(&boolean(4));
    let reduced = lattice.join_reduction().expect("extents are present");
    assert_eq!(reduced.node_count(), 16);
    assert_eq!(reduced.edge_count(), 32);
    assert!(reduced.graph().is_lattice());
    let labelled = reduced
        .graph()
        .nodes()
        .filter(|(_, label)| !label.is_placeholder())
        .count();
    assert_eq!(labelled, 4);
    assert_eq!(reduced.join_irreducibles().len(), 4);
}

#[test]
fn table_of_b3_relates_atoms_to_coatoms_above_them() {
    let lattice = ConceptLattice::diagram_lattice(&boolean(3));
    let table = lattice.lattice().table();
    assert_eq!(table.objects().len(), 3);
    assert_eq!(table.attributes().len(), 3);
    let incidences = table
        .objects()
        .iter()
        .flat_map(|j| table.attributes().iter().map(move |m| (*j, *m)))
        .filter(|(j, m)| table.has(j, m))
        .count();
    assert_eq!(incidences, 6, "each atom lies below two coatoms");
}

// ---------------------------------------------------------------------------
// One implication
// ---------------------------------------------------------------------------

fn one_rule() -> ImplicationalSystem<u8> {
    let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3]));
    is.add_rule(set(&[1]), set(&[2]));
    is
}

#[test]
fn single_implication_leaves_six_closed_sets() {
    let is = one_rule();
    for lattice in [
        ConceptLattice::complete_lattice(&is),
        ConceptLattice::diagram_lattice(&is),
    ] {
        let extents: BTreeSet<ComparableSet<u8>> = lattice
            .concepts()
            .filter_map(|(_, c)| c.extent().cloned())
            .collect();
        assert_eq!(
            extents,
            BTreeSet::from([
                set(&[]),
                set(&[2]),
                set(&[3]),
                set(&[1, 2]),
                set(&[2, 3]),
                set(&[1, 2, 3]),
            ])
        );
    }
}

#[test]
fn dependency_graph_records_the_implication() {
    let lattice = ConceptLattice::diagram_lattice(&one_rule());
    let deps = lattice.dependency_graph().expect("diagram keeps dependencies");
    let valuation = deps.valuation(&2, &1).expect("2 depends on 1");
    assert_eq!(valuation.iter().collect::<Vec<_>>(), vec![&set(&[])]);
    assert_eq!(deps.dependencies().count(), 1);
}

#[test]
fn complete_and_diagram_share_the_hasse_diagram() {
    let is = one_rule();
    let hasse = ConceptLattice::complete_lattice(&is).hasse();
    let diagram = ConceptLattice::diagram_lattice(&is);
    assert_eq!(covers(&hasse), covers(&diagram));
}

// ---------------------------------------------------------------------------
// Equivalent elements and a non-empty bottom
// ---------------------------------------------------------------------------

#[test]
fn cyclic_precedence_and_forced_elements() {
    // 1 and 2 imply each other; 4 holds everywhere.
    let mut is = ImplicationalSystem::with_universe(set(&[1, 2, 3, 4]));
    is.add_rule(set(&[1]), set(&[2]));
    is.add_rule(set(&[2]), set(&[1]));
    is.add_rule(set(&[]), set(&[4]));

    let lattice = ConceptLattice::diagram_lattice(&is);
    assert_eq!(lattice.node_count(), 4);
    let bottom = lattice.lattice().bottom();
    assert_eq!(lattice.concept(bottom).and_then(|c| c.extent()), Some(&set(&[4])));

    let basis = lattice.implicational_basis().expect("diagram keeps dependencies");
    for subset in [set(&[]), set(&[1]), set(&[2, 3]), set(&[3])] {
        assert_eq!(basis.closure(&subset), is.closure(&subset), "closure of {subset}");
    }
    // 4 never shows up in a premise.
    let rules: Vec<String> = basis.rules().iter().map(ToString::to_string).collect();
    assert_eq!(rules, vec!["{} -> {4}", "{1} -> {2}", "{2} -> {1}"]);
}
