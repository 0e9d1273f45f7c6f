//! Layout performance benchmarks.
//!
//! Measures row layout with a cold and a warm wrap memo, and height-index construction for a
//! fully loaded list.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use reviewlist::model::{ReviewRecord, RowFactory, RowModel};
use reviewlist::view_state::{HeightIndex, RowLayoutEngine};

fn rows(count: usize) -> Vec<RowModel> {
    let factory = RowFactory::default();
    (0..count)
        .map(|i| {
            factory.make_row(ReviewRecord {
                text: "The room was clean and the staff were helpful. ".repeat(i % 12),
                created: "4 April 2024".to_string(),
                first_name: "Sam".to_string(),
                last_name: format!("Reviewer{i}"),
                rating: (i % 6) as i32,
                avatar_url: None,
            })
        })
        .collect()
}

fn bench_row_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_layout");
    let rows = rows(200);

    for width in [320.0, 375.0, 768.0] {
        group.bench_with_input(BenchmarkId::new("cold", width), &width, |b, &width| {
            b.iter_batched(
                RowLayoutEngine::default,
                |engine| {
                    for row in &rows {
                        black_box(engine.layout(row, width));
                    }
                },
                BatchSize::SmallInput,
            );
        });

        let engine = RowLayoutEngine::default();
        for row in &rows {
            engine.layout(row, width);
        }
        group.bench_with_input(BenchmarkId::new("warm", width), &width, |b, &width| {
            b.iter(|| {
                for row in &rows {
                    black_box(engine.layout(row, width));
                }
            });
        });
    }

    group.finish();
}

fn bench_height_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_index");

    for count in [100usize, 1_000, 10_000] {
        let engine = RowLayoutEngine::default();
        let rows = rows(count);
        let heights: Vec<usize> = rows
            .iter()
            .map(|row| HeightIndex::units(engine.height(row, 375.0)))
            .collect();

        group.bench_with_input(BenchmarkId::new("build", count), &heights, |b, heights| {
            b.iter(|| HeightIndex::from_heights(heights.iter().copied()));
        });

        let index = HeightIndex::from_heights(heights.iter().copied());
        let total = index.total();
        group.bench_with_input(BenchmarkId::new("lower_bound", count), &index, |b, index| {
            b.iter(|| {
                for offset in (0..total).step_by(97) {
                    black_box(index.lower_bound(offset));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_layout, bench_height_index);
criterion_main!(benches);
