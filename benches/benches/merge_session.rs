//! Benchmarks for merge session operations.
//!
//! - `load_diff`: materializing aligned buffers and regions
//! - `merge`: resolving every region, which rebases all later regions

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use duplex_kernel::session::Direction;
use duplex_kernel::{DocumentId, MemoryBuffer, MergeSession, Side};

fn pair(lines: usize) -> (String, String) {
    let left: String = (0..lines).map(|i| format!("line {i}\n")).collect();
    let right: String = (0..lines)
        .map(|i| {
            if i % 5 == 0 {
                format!("LINE {i}\n")
            } else {
                format!("line {i}\n")
            }
        })
        .collect();
    (left, right)
}

fn session(left: &str, right: &str) -> MergeSession {
    MergeSession::new(
        MemoryBuffer::new(DocumentId::new(1), left),
        MemoryBuffer::new(DocumentId::new(2), right),
    )
}

fn bench_load_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_session/load_diff");

    for lines in [500usize, 5000] {
        let (left, right) = pair(lines);
        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter_batched(
                || session(&left, &right),
                |mut session| {
                    session.load_diff().unwrap();
                    black_box(session.regions().len())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_merge_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_session/merge_all");

    for lines in [500usize, 2000] {
        let (left, right) = pair(lines);
        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter_batched(
                || {
                    let mut session = session(&left, &right);
                    session.load_diff().unwrap();
                    session
                },
                |mut session| {
                    while session.merge(Direction::RightToLeft).unwrap().is_some() {}
                    black_box(session.buffer(Side::Left).as_str().len())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_abandon(c: &mut Criterion) {
    let (left, right) = pair(2000);
    c.bench_function("merge_session/abandon_2000_lines", |b| {
        b.iter_batched(
            || {
                let mut session = session(&left, &right);
                session.load_diff().unwrap();
                session
            },
            |mut session| black_box(session.abandon_unmerged_diffs(Side::Right).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_load_diff, bench_merge_all, bench_abandon);
criterion_main!(benches);
