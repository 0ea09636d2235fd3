use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use incident_reader::IncidentRecord;
use rand::{rngs::StdRng, Rng, SeedableRng};
use safe_route::prelude::*;

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = build_incident_graph
}
criterion_main!(benches);

fn records(len: usize) -> Vec<IncidentRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| {
            let mut record = IncidentRecord::new(
                -27.40 - rng.gen_range(0..200) as f64 * 0.0005,
                -58.80 - rng.gen_range(0..200) as f64 * 0.0005,
                rng.gen_range(0..5),
            );
            record.fatalities = rng.gen_range(0..2);
            record
        })
        .collect()
}

fn build_incident_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_incident_graph");
    for len in [1_000usize, 10_000, 100_000].iter() {
        let records = records(*len);
        group.throughput(Throughput::Elements(*len as u64));

        for policy in [MergePolicy::Overwrite, MergePolicy::Accumulate] {
            let params = AggregationParams::new().merge_policy(policy);
            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), len),
                &records,
                |b, records| {
                    b.iter(|| IncidentAggregator::new(params).build(black_box(records)))
                },
            );
        }
    }
    group.finish();
}
