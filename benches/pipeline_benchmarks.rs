//! Pipeline Benchmarks
//!
//! Measures baseline throughput and setup overhead for the core primitives:
//! - Single stage construction
//! - Batch stage construction (10 stages)
//! - Ordered pool throughput
//! - Unordered pool throughput

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use conveyor::{Pipeline, Stage};

/// Benchmark: construct a single ordered stage (setup overhead).
fn stage_construction_single(c: &mut Criterion) {
    c.bench_function("stage_construction_single", |b| {
        b.iter(|| {
            let stage = Stage::ordered(|x: i32| Some(x), 4).unwrap();
            black_box(stage);
        });
    });
}

/// Benchmark: construct 10 ordered stages in a row.
fn stage_construction_batch_small(c: &mut Criterion) {
    c.bench_function("stage_construction_batch_small", |b| {
        b.iter(|| {
            let mut stages = Vec::with_capacity(10);
            for _ in 0..10 {
                stages.push(Stage::ordered(|x: i32| Some(x), 4).unwrap());
            }
            black_box(stages);
        });
    });
}

/// Benchmark: ordered-pool throughput for 1000 items.
fn ordered_pool_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("ordered_pool_throughput", |b| {
        b.to_async(&rt).iter(|| async {
            let root = Stage::ordered(|x: i32| Some(x * 2), 4).unwrap();
            let pipeline = Pipeline::new(root).unwrap();

            for i in 0..1000 {
                pipeline.put(i).await.unwrap();
            }
            pipeline.stop().await.unwrap();

            let mut cursor = pipeline.results();
            let mut count = 0;
            while cursor.next().await.is_some() {
                count += 1;
            }
            black_box(count);
        });
    });
}

/// Benchmark: unordered-pool throughput for 1000 items.
fn unordered_pool_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("unordered_pool_throughput", |b| {
        b.to_async(&rt).iter(|| async {
            let root = Stage::unordered(|x: i32| Some(x * 2), 4).unwrap();
            let pipeline = Pipeline::new(root).unwrap();

            for i in 0..1000 {
                pipeline.put(i).await.unwrap();
            }
            pipeline.stop().await.unwrap();

            let mut cursor = pipeline.results();
            let mut count = 0;
            while cursor.next().await.is_some() {
                count += 1;
            }
            black_box(count);
        });
    });
}

/// Configure criterion for resource-conscious benchmarking.
fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        stage_construction_single,
        stage_construction_batch_small,
        ordered_pool_throughput,
        unordered_pool_throughput
}

criterion_main!(benches);
