use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use incident_reader::{Coordinate, IncidentRecord};
use rand::{rngs::StdRng, Rng, SeedableRng};
use safe_route::{prelude::*, util::test_graphs::graph_corrientes};

criterion_group!(benches, route_on_sample, route_on_random_walk);
criterion_main!(benches);

/// Records of a random walk over a `side` x `side` grid of locations
fn random_walk(side: u32, len: usize) -> Vec<IncidentRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| {
            IncidentRecord::new(
                -27.40 - rng.gen_range(0..side) as f64 * 0.001,
                -58.80 - rng.gen_range(0..side) as f64 * 0.001,
                rng.gen_range(0..5),
            )
        })
        .collect()
}

fn route_on_sample(c: &mut Criterion) {
    let g = graph_corrientes();
    let origin = Coordinate::new(-27.48, -58.83);
    let destination = Coordinate::new(-27.52, -58.87);

    c.bench_with_input(
        BenchmarkId::new("route_on_incident_graph", "corrientes"),
        &g,
        |b, g| {
            b.iter(|| {
                let mut router = SafetyRouter::new(g);
                let _ = router.route(black_box(origin), black_box(destination));
            })
        },
    );
}

fn route_on_random_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_on_random_walk");
    for side in [10u32, 50, 100].iter() {
        let records = random_walk(*side, (*side * *side * 4) as usize);
        let g = IncidentAggregator::new(AggregationParams::default()).build(&records);

        let mut rng = StdRng::seed_from_u64(7);
        let pairs: Vec<(Coordinate, Coordinate)> = (0..100)
            .map(|_| {
                (
                    g.nodes[rng.gen_range(0..g.nodes.len())].coordinate,
                    g.nodes[rng.gen_range(0..g.nodes.len())].coordinate,
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(side), &g, |b, g| {
            b.iter(|| {
                let mut router = SafetyRouter::new(g);
                for (src, dst) in &pairs {
                    let _ = router.route(*src, *dst);
                }
            })
        });
    }
    group.finish();
}
