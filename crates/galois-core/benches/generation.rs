use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use galois_core::{ComparableSet, ConceptLattice, ImplicationalSystem};

/// Boolean lattices B_n and a chain-of-implications variant of the same size.
const SIZES: [u8; 3] = [4, 6, 8];

fn boolean(n: u8) -> ImplicationalSystem<u8> {
    ImplicationalSystem::with_universe((1..=n).collect())
}

/// `{i} → {i + 1}` for every odd `i`: halves the closed sets of B_n.
fn chained(n: u8) -> ImplicationalSystem<u8> {
    let mut system = boolean(n);
    for i in (1..n).step_by(2) {
        system.add_rule(ComparableSet::singleton(i), ComparableSet::singleton(i + 1));
    }
    system
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for n in SIZES {
        for (name, system) in [("boolean", boolean(n)), ("chained", chained(n))] {
            let concepts = ConceptLattice::diagram_lattice(&system).node_count();
            group.throughput(Throughput::Elements(concepts as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("complete/{name}"), n),
                &system,
                |b, system| b.iter(|| black_box(ConceptLattice::complete_lattice(system))),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("complete+hasse/{name}"), n),
                &system,
                |b, system| b.iter(|| black_box(ConceptLattice::complete_lattice(system).hasse())),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("diagram/{name}"), n),
                &system,
                |b, system| b.iter(|| black_box(ConceptLattice::diagram_lattice(system))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
