// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag contexts, drop zones, and the geometric helpers behind them.
//!
//! A [`DropZone`] is a container plus the sibling the item would be inserted
//! before. Given the container child under the pointer, [`position_in`]
//! decides between "before this child" and "after this child" by bisecting
//! the child's box along the configured [`Direction`].

use kurbo::{Point, Rect};

use crate::options::Direction;
use crate::tree::{DragTree, ancestors_or_self, children};

/// Where a drag came from. Fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DragContext<N> {
    /// Draggable root: the direct child of `source` that contains the grabbed node.
    pub item: N,
    /// Container the item was grabbed from.
    pub source: N,
    /// Sibling that followed `item` in `source` at grab time.
    pub sibling: Option<N>,
}

impl<N: Copy + Eq> DragContext<N> {
    /// Returns `true` if `(container, sibling)` is where the item started.
    pub fn is_initial(&self, container: N, sibling: Option<N>) -> bool {
        container == self.source && sibling == self.sibling
    }

    /// The zone describing the starting position.
    pub fn origin(&self) -> DropZone<N> {
        DropZone {
            container: self.source,
            sibling: self.sibling,
        }
    }
}

/// A prospective insertion point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DropZone<N> {
    /// Container receiving the item.
    pub container: N,
    /// Node to insert before; `None` appends.
    pub sibling: Option<N>,
}

impl<N> DropZone<N> {
    /// Zone appending to the end of `container`.
    pub fn end_of(container: N) -> Self {
        Self {
            container,
            sibling: None,
        }
    }
}

/// The child of `container` that is `node` or contains it.
///
/// Returns `None` when `node` is `container` itself or is not below it.
pub fn immediate_child<T: DragTree + ?Sized>(
    tree: &T,
    container: T::Node,
    node: T::Node,
) -> Option<T::Node> {
    ancestors_or_self(tree, node)
        .take_while(|&n| n != container)
        .find(|&n| tree.parent(n) == Some(container))
}

/// Insertion sibling for a pointer over `child` of `container`.
///
/// Inside the child's box, the first half along `direction` means "before
/// `child`" and the second half "before the child's next sibling". When the
/// pointer is outside the child's box (fast movement, overflowing content),
/// every child is scanned in order for the first whose leading edge lies past
/// the pointer, defaulting to the end.
pub fn position_in<T: DragTree + ?Sized>(
    tree: &T,
    container: T::Node,
    child: T::Node,
    point: Point,
    direction: Direction,
) -> Option<T::Node> {
    match tree.bounds(child) {
        Some(rect) if rect.contains(point) => {
            if in_trailing_half(rect, point, direction) {
                tree.next_sibling(child)
            } else {
                Some(child)
            }
        }
        _ => scan_leading_edges(tree, container, point, direction),
    }
}

fn in_trailing_half(rect: Rect, point: Point, direction: Direction) -> bool {
    match direction {
        Direction::Horizontal => point.x > rect.x0 + rect.width() / 2.0,
        Direction::Vertical => point.y > rect.y0 + rect.height() / 2.0,
    }
}

fn scan_leading_edges<T: DragTree + ?Sized>(
    tree: &T,
    container: T::Node,
    point: Point,
    direction: Direction,
) -> Option<T::Node> {
    children(tree, container).find(|&c| {
        tree.bounds(c).is_some_and(|rect| match direction {
            Direction::Horizontal => rect.x0 > point.x,
            Direction::Vertical => rect.y0 > point.y,
        })
    })
}

/// Skip over `skip` nodes, which mark the item's own position.
///
/// Inserting before the travelling item or its placeholder is the same as
/// inserting before whatever follows them.
pub(crate) fn normalize_sibling<T: DragTree + ?Sized>(
    tree: &T,
    mut sibling: Option<T::Node>,
    skip: &[T::Node],
) -> Option<T::Node> {
    while let Some(s) = sibling {
        if !skip.contains(&s) {
            break;
        }
        sibling = tree.next_sibling(s);
    }
    sibling
}
