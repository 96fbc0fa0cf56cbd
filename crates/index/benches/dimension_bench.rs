//! Benchmarks for snapshot-index using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use snapshot_core::{Record, Value};
use snapshot_index::{IndexCollection, KeyRange};

fn records(size: i64) -> Vec<Record> {
    (0..size)
        .map(|i| {
            Record::from_iter([
                ("id", Value::from(i)),
                ("bucket", Value::from(i % 97)),
                ("word", Value::from(format!("w{:06}", (i * 7919) % size))),
            ])
        })
        .collect()
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimension_build");

    for size in [1_000, 10_000, 100_000].iter() {
        let data: std::sync::Arc<[Record]> = records(*size).into();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut collection = IndexCollection::new(data.clone());
                collection.add_dimension("id");
                collection.add_dimension("word");
                black_box(collection)
            });
        });
    }

    group.finish();
}

fn range_filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimension_range_filter");

    for size in [1_000, 10_000, 100_000].iter() {
        let mut collection = IndexCollection::new(records(*size));
        collection.add_dimension("id");
        collection.add_dimension("bucket");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut id = collection.dimension_mut("id").unwrap();
                id.filter_range(KeyRange::inclusive(Value::from(size / 4), Value::from(size / 2)));
                black_box(collection.filtered_len())
            });
        });
    }

    group.finish();
}

fn top_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimension_top");

    let mut collection = IndexCollection::new(records(100_000));
    collection.add_dimension("word");
    collection.add_dimension("bucket");
    collection.dimension_mut("bucket").unwrap().filter_exact(13);

    for limit in [10usize, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(limit), limit, |b, &limit| {
            b.iter(|| black_box(collection.dimension("word").unwrap().top(Some(limit)).len()));
        });
    }

    group.bench_function("group_all", |b| {
        b.iter(|| black_box(collection.dimension("bucket").unwrap().group_all().len()));
    });

    group.finish();
}

criterion_group!(benches, build_benchmark, range_filter_benchmark, top_benchmark);
criterion_main!(benches);
