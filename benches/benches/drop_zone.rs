// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use understory_drag_drop::{
    DragContext, DragOptions, DragSession, DragTree, MemoryTree, NodeId, PointerDown, PointerMove,
    SessionKind, create,
};

const ROW: f64 = 20.0;
const WIDTH: f64 = 100.0;
const GAP: f64 = 20.0;

/// `columns` side-by-side lists of `rows` items each.
fn board(columns: usize, rows: usize) -> (MemoryTree, Vec<NodeId>) {
    let mut tree = MemoryTree::new();
    let root = tree.root();
    let mut lists = Vec::with_capacity(columns);
    for col in 0..columns {
        let x0 = col as f64 * (WIDTH + GAP);
        let list = tree.append(root, "list", Rect::new(x0, 0.0, x0 + WIDTH, rows as f64 * ROW));
        for row in 0..rows {
            let y0 = row as f64 * ROW;
            let item = tree.append(list, "item", Rect::new(x0, y0, x0 + WIDTH, y0 + ROW));
            tree.append(item, "label", Rect::new(x0 + 4.0, y0 + 4.0, x0 + 60.0, y0 + 16.0));
        }
        lists.push(list);
    }
    (tree, lists)
}

/// Pointer positions sweeping every list top to bottom.
fn sweep(columns: usize, rows: usize, samples: usize) -> Vec<Point> {
    let height = rows as f64 * ROW;
    (0..samples)
        .map(|i| {
            let col = i % columns;
            let x = col as f64 * (WIDTH + GAP) + WIDTH / 2.0;
            let y = (i as f64 * 7.3) % height;
            Point::new(x, y)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_drop/resolve");

    // Hypothesis: resolution is dominated by the hit test and the linear
    // sibling scan, so cost grows with rows per list rather than list count.
    for (columns, rows) in [(2_usize, 16_usize), (4, 64), (8, 256)] {
        let (mut tree, lists) = board(columns, rows);
        let options = DragOptions::<MemoryTree>::default().with_containers(lists.iter().copied());
        let item = tree.first_child(lists[0]).expect("non-empty list");
        let context = DragContext {
            item,
            source: lists[0],
            sibling: tree.next_sibling(item),
        };
        let mut session = DragSession::new(context, SessionKind::Move);
        session.start(&mut tree, &options);
        let points = sweep(columns, rows, 256);

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("sweep", format!("{columns}x{rows}")),
            &points,
            |b, points| {
                b.iter(|| {
                    for &p in points {
                        black_box(session.resolve(&tree, &options, p));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_drop/gesture");

    // A full press, sweep and release through the controller, including
    // placeholder moves and event relay.
    for rows in [16_usize, 128] {
        let (tree, lists) = board(2, rows);
        let points = sweep(2, rows, 64);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::new("sweep", rows), &points, |b, points| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    let mut drake =
                        create(lists.iter().copied(), DragOptions::<MemoryTree>::default());
                    let Some(item) = tree.first_child(lists[0]) else {
                        return;
                    };
                    let grab = tree.bounds(item).map(|r| r.center()).unwrap_or_default();
                    drake.pointer_down(&tree, PointerDown::primary(item, grab));
                    for &p in points {
                        drake.pointer_move(&mut tree, PointerMove::held(p));
                    }
                    let last = points.last().copied().unwrap_or(grab);
                    drake.pointer_up(&mut tree, last);
                    black_box(tree);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_gesture);
criterion_main!(benches);
