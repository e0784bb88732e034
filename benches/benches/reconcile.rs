// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_pooled_list::{ListItem, WidgetList};

#[derive(Default)]
struct Cell {
    row: usize,
}

impl ListItem for Cell {
    fn min_size(&self) -> Size {
        Size::new(200.0, 24.0)
    }
}

fn list(len: usize) -> WidgetList<Cell> {
    let mut list = WidgetList::new(
        move || len,
        Cell::default,
        |row, cell: &mut Cell| cell.row = row,
    );
    list.resize(Size::new(400.0, 800.0));
    list
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile/scroll");

    // One pixel at a time: mostly reuse, rarely a new row.
    group.bench_function("smooth", |b| {
        let mut list = list(100_000);
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 1.0) % 50_000.0;
            list.set_scroll_offset(black_box(offset));
        });
    });

    // Long jumps: every visible row is replaced each pass.
    group.bench_function("jump", |b| {
        let mut list = list(100_000);
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 7_919.0) % 2_000_000.0;
            list.set_scroll_offset(black_box(offset));
        });
    });

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    c.bench_function("reconcile/refresh", |b| {
        b.iter_batched(
            || list(10_000),
            |mut list| {
                list.refresh();
                black_box(list);
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_mixed_heights(c: &mut Criterion) {
    c.bench_function("reconcile/mixed_scroll", |b| {
        let mut list = list(10_000);
        for row in (0..10_000).step_by(5) {
            list.set_item_height(row, 24.0 + (row % 11) as f64 * 3.0);
        }
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 13.0) % 200_000.0;
            list.set_scroll_offset(black_box(offset));
        });
    });
}

criterion_group!(benches, bench_scroll, bench_refresh, bench_mixed_heights);
criterion_main!(benches);
