//! Benchmarks for the line diff.
//!
//! Performance-critical paths:
//! - `difference`: Myers diff plus part reduction on source-like texts
//! - affix trimming when only a few lines in the middle differ

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use duplex_differ::difference;

/// Source-like text of `lines` lines.
fn document(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("    let value_{i} = compute({i}, {});\n", i % 7))
        .collect()
}

/// `base` with every `stride`-th line rewritten.
fn edited(base: &str, stride: usize) -> String {
    base.split_inclusive('\n')
        .enumerate()
        .map(|(i, line)| {
            if i % stride == 0 {
                format!("    // changed {i}\n")
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn bench_scattered_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("difference/scattered");

    for lines in [100usize, 1000, 5000] {
        let left = document(lines);
        let right = edited(&left, 10);

        group.throughput(Throughput::Bytes(left.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}_lines")),
            &(left, right),
            |b, (left, right)| b.iter(|| difference(black_box(left), black_box(right))),
        );
    }

    group.finish();
}

fn bench_single_hunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("difference/single_hunk");

    // Shared prefix and suffix are trimmed before the search
    for lines in [1000usize, 10_000] {
        let left = document(lines);
        let mut right = left.clone();
        right.insert_str(left.len() / 2, "inserted line\n");

        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter(|| difference(black_box(&left), black_box(&right)));
        });
    }

    group.finish();
}

fn bench_disjoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("difference/disjoint");

    // Worst case: nothing in common
    for lines in [50usize, 200] {
        let left = document(lines);
        let right = left.replace("let", "var");

        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter(|| difference(black_box(&left), black_box(&right)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scattered_edits, bench_single_hunk, bench_disjoint);
criterion_main!(benches);
