// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree and geometry adapter consumed by drag sessions.
//!
//! The engine never owns the visual tree. It navigates and mutates it through
//! [`DragTree`], which a host implements for its own scene graph (a DOM-like
//! element tree, a box tree, a widget arena, ...). [`MemoryTree`](crate::MemoryTree)
//! is a small in-memory implementation used by the tests and benchmarks.

use core::fmt::Debug;

use kurbo::{Point, Rect};

/// Tree navigation, hit testing, and the handful of mutations a drag needs.
///
/// ## Contract
///
/// - `Node` is a cheap handle. Two handles are the same node iff they compare equal.
/// - [`insert_before`](DragTree::insert_before) moves a node: if it already has a
///   parent it is detached first. A `before` of `None` appends.
/// - [`detach`](DragTree::detach) on a node without a parent is a no-op.
/// - [`hit_test`](DragTree::hit_test) returns the topmost node under a point, skipping
///   `exclude` and its whole subtree. Detached nodes are never hit.
pub trait DragTree {
    /// Handle type for nodes in this tree.
    type Node: Copy + Eq + Debug;

    /// Parent of `node`, or `None` for roots and detached nodes.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// First child of `node`.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Sibling following `node` inside its parent.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Bounding box of `node` in the same space as pointer positions.
    ///
    /// Returns `None` if the node has no geometry (for example while detached).
    fn bounds(&self, node: Self::Node) -> Option<Rect>;

    /// Topmost node at `point`, ignoring `exclude` and its descendants.
    fn hit_test(&self, point: Point, exclude: Option<Self::Node>) -> Option<Self::Node>;

    /// Insert `node` into `parent` before `before` (or at the end).
    fn insert_before(&mut self, parent: Self::Node, node: Self::Node, before: Option<Self::Node>);

    /// Remove `node` from its parent, keeping the node (and its subtree) alive.
    fn detach(&mut self, node: Self::Node);

    /// Create a detached structural copy of `node` and its subtree.
    fn duplicate(&mut self, node: Self::Node) -> Self::Node;

    /// Returns `true` for text-input-like nodes where a press starts a text selection.
    fn is_text_input(&self, node: Self::Node) -> bool {
        let _ = node;
        false
    }

    /// Set or clear the "in transit" visual state of a node that is being dragged.
    fn set_in_transit(&mut self, node: Self::Node, in_transit: bool) {
        let _ = (node, in_transit);
    }

    /// Position the floating visual so that its top-left corner sits at `origin`.
    fn move_visual(&mut self, visual: Self::Node, origin: Point) {
        let _ = (visual, origin);
    }
}

/// Iterate over the children of `parent` in order.
pub fn children<T: DragTree + ?Sized>(
    tree: &T,
    parent: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    core::iter::successors(tree.first_child(parent), move |&n| tree.next_sibling(n))
}

/// Iterate over `node` and then each of its ancestors up to the root.
pub fn ancestors_or_self<T: DragTree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    core::iter::successors(Some(node), move |&n| tree.parent(n))
}
