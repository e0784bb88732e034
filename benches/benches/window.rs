// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_pooled_list::{HeightLedger, WindowQuery, compute_visible_window};

fn ledger(len: usize, explicit_every: Option<usize>) -> HeightLedger {
    let mut ledger = HeightLedger::new();
    ledger.set_template_height(20.0);
    if let Some(every) = explicit_every {
        for index in (0..len).step_by(every) {
            ledger.set(index, 20.0 + (index % 7) as f64 * 6.0);
        }
    }
    ledger
}

fn bench_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/uniform");

    // Closed form: cost should not depend on the list length.
    for len in [1_000usize, 100_000, 10_000_000] {
        let ledger = ledger(len, None);
        let query = WindowQuery {
            offset: (len as f64 * 21.0) / 2.0,
            viewport_height: 800.0,
            len,
            separator: 1.0,
        };
        group.bench_with_input(BenchmarkId::from_parameter(len), &query, |b, query| {
            b.iter(|| black_box(compute_visible_window(black_box(query), &ledger)));
        });
    }

    group.finish();
}

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/mixed");

    // Accumulating scan: cost grows with the rows above the window.
    for len in [1_000usize, 10_000, 100_000] {
        let ledger = ledger(len, Some(3));
        group.throughput(Throughput::Elements(len as u64 / 2));
        for (label, fraction) in [("top", 0.0), ("middle", 0.5)] {
            let query = WindowQuery {
                offset: len as f64 * 21.0 * fraction,
                viewport_height: 800.0,
                len,
                separator: 1.0,
            };
            group.bench_with_input(BenchmarkId::new(label, len), &query, |b, query| {
                b.iter(|| black_box(compute_visible_window(black_box(query), &ledger)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_uniform, bench_mixed);
criterion_main!(benches);
