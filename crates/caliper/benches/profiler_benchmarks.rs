//! Column profiling performance benchmarks.
//!
//! Measures the profiler on numeric, date and text columns, and the effect
//! of shard size on large columns.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use caliper::profile::{ColumnProfiler, ProfileConfig};
use caliper::{Dataset, InferredType};

/// Generate a three-column dataset with a few nulls and outliers.
fn generate_dataset(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let data = (0..rows)
        .map(|row| {
            let amount = if rng.gen_bool(0.01) {
                rng.gen_range(10_000.0..50_000.0)
            } else {
                rng.gen_range(5.0..500.0)
            };
            let amount = (!rng.gen_bool(0.02)).then(|| format!("{:.2}", amount));
            let date = format!(
                "2023-{:02}-{:02}",
                rng.gen_range(1..=12),
                rng.gen_range(1..=28)
            );
            let name = format!("customer_{}", row % 997);
            vec![amount, Some(date), Some(name)]
        })
        .collect();

    Dataset::new(
        vec!["amount".into(), "order_date".into(), "name".into()],
        data,
    )
    .unwrap()
}

/// Benchmark single-column profiling per inferred type.
fn bench_profile_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_column");
    let profiler = ColumnProfiler::new();

    for rows in [1_000, 10_000, 100_000].iter() {
        let ds = generate_dataset(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        for (index, inferred_type) in [
            (0, InferredType::Numeric),
            (1, InferredType::Date),
            (2, InferredType::Text),
        ] {
            group.bench_with_input(
                BenchmarkId::new(inferred_type.label(), rows),
                &ds,
                |b, ds| b.iter(|| black_box(profiler.profile_column(ds, index, inferred_type))),
            );
        }
    }

    group.finish();
}

/// Benchmark shard sizes on a large numeric column.
fn bench_shard_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_rows");
    let ds = generate_dataset(200_000);

    for shard_rows in [4_096, 65_536, 1_000_000].iter() {
        let profiler = ColumnProfiler::with_config(ProfileConfig {
            shard_rows: *shard_rows,
            ..ProfileConfig::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(shard_rows), &ds, |b, ds| {
            b.iter(|| black_box(profiler.profile_column(ds, 0, InferredType::Numeric)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_profile_column);

criterion_group!(
    name = large_column_benches;
    config = Criterion::default().sample_size(10);
    targets = bench_shard_rows
);

criterion_main!(benches, large_column_benches);
