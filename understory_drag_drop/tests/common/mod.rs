// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixture for drag and drop integration tests.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test file uses every helper."
)]

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_drag_drop::{
    Channel, DragController, DragEvent, DragOptions, DragTree, MemoryTree, NodeId, PointerDown,
    PointerMove, create,
};

pub(crate) const ROW: f64 = 30.0;
pub(crate) const COLUMN_WIDTH: f64 = 100.0;

/// Empty space at the bottom of the left column.
pub(crate) const LEFT_EMPTY: Point = Point::new(50.0, 250.0);
/// Empty space at the bottom of the right column.
pub(crate) const RIGHT_EMPTY: Point = Point::new(250.0, 250.0);
/// The gap between the columns; only the root is there.
pub(crate) const OUTSIDE: Point = Point::new(150.0, 250.0);

pub(crate) type Log = Rc<RefCell<Vec<DragEvent<NodeId>>>>;

/// Two columns: `left` (x 0..100) holding `a`, `b`, `c`, and an empty `right` (x 200..300).
pub(crate) struct Board {
    pub(crate) tree: MemoryTree,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) a: NodeId,
    pub(crate) b: NodeId,
    pub(crate) c: NodeId,
}

impl Board {
    pub(crate) fn new() -> Self {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let left = tree.append(root, "left", Rect::new(0.0, 0.0, COLUMN_WIDTH, 300.0));
        let right = tree.append(root, "right", Rect::new(200.0, 0.0, 300.0, 300.0));
        let a = tree.append(left, "a", Rect::ZERO);
        let b = tree.append(left, "b", Rect::ZERO);
        let c = tree.append(left, "c", Rect::ZERO);
        let mut board = Self {
            tree,
            left,
            right,
            a,
            b,
            c,
        };
        board.layout();
        board
    }

    /// A controller over both columns.
    pub(crate) fn controller(
        &self,
        options: DragOptions<MemoryTree>,
    ) -> DragController<MemoryTree> {
        create([self.left, self.right], options)
    }

    /// Stack every column's children in rows, the way a layout pass would.
    pub(crate) fn layout(&mut self) {
        for column in [self.left, self.right] {
            let Some(frame) = self.tree.bounds(column) else {
                continue;
            };
            let rows: Vec<NodeId> = self.tree.children_of(column).to_vec();
            for (i, node) in rows.into_iter().enumerate() {
                let y = frame.y0 + i as f64 * ROW;
                self.tree
                    .set_bounds(node, Rect::new(frame.x0, y, frame.x0 + COLUMN_WIDTH, y + ROW));
            }
        }
    }

    pub(crate) fn center(&self, node: NodeId) -> Point {
        self.tree.bounds(node).map(|r| r.center()).unwrap_or_default()
    }

    /// Press the primary button over the center of `node`.
    pub(crate) fn press(&self, drake: &mut DragController<MemoryTree>, node: NodeId) -> bool {
        drake.pointer_down(&self.tree, PointerDown::primary(node, self.center(node)))
    }

    /// Move with the button held, then lay out again.
    pub(crate) fn hover(&mut self, drake: &mut DragController<MemoryTree>, point: Point) {
        drake.pointer_move(&mut self.tree, PointerMove::held(point));
        self.layout();
    }

    pub(crate) fn release(&mut self, drake: &mut DragController<MemoryTree>, point: Point) {
        drake.pointer_up(&mut self.tree, point);
        self.layout();
    }

    pub(crate) fn children(&self, container: NodeId) -> Vec<NodeId> {
        self.tree.children_of(container).to_vec()
    }
}

/// Record every event the controller relays.
pub(crate) fn record(drake: &mut DragController<MemoryTree>) -> Log {
    let log = Log::default();
    let sink = log.clone();
    drake.subscribe_all(move |ev| sink.borrow_mut().push(*ev));
    log
}

pub(crate) fn channels(log: &Log) -> Vec<Channel> {
    log.borrow().iter().map(DragEvent::channel).collect()
}

/// Empty the log, returning what it held.
pub(crate) fn drain(log: &Log) -> Vec<DragEvent<NodeId>> {
    log.borrow_mut().drain(..).collect()
}
