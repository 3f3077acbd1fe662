// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An arena-backed [`DragTree`] with explicit geometry.
//!
//! [`MemoryTree`] keeps parent/child links and a caller-provided bounding box per
//! node. It performs no layout: bounds are whatever the caller last set, which
//! makes drag scenarios fully deterministic in tests and benchmarks.
//!
//! ```
//! use kurbo::Rect;
//! use understory_drag_drop::{DragTree, MemoryTree};
//!
//! let mut tree = MemoryTree::new();
//! let list = tree.append(tree.root(), "list", Rect::new(0.0, 0.0, 100.0, 60.0));
//! let a = tree.append(list, "a", Rect::new(0.0, 0.0, 100.0, 30.0));
//! let b = tree.append(list, "b", Rect::new(0.0, 30.0, 100.0, 60.0));
//!
//! assert_eq!(tree.next_sibling(a), Some(b));
//! assert_eq!(tree.hit_test((10.0, 40.0).into(), None), Some(b));
//! assert_eq!(tree.hit_test((10.0, 40.0).into(), Some(list)), Some(tree.root()));
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::tree::DragTree;

/// Identifier for a node in a [`MemoryTree`].
///
/// A slot index. Detached nodes keep their slot, so ids stay valid for the
/// life of the tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const fn new(idx: u32) -> Self {
        Self(idx)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node flags for a [`MemoryTree`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node participates in hit testing.
        const PICKABLE   = 0b0000_0001;
        /// Node is a text-input-like element.
        const TEXT_INPUT = 0b0000_0010;
        /// Node is currently being dragged.
        const IN_TRANSIT = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::PICKABLE
    }
}

#[derive(Clone, Debug)]
struct Slot {
    tag: &'static str,
    bounds: Rect,
    flags: NodeFlags,
    visual_origin: Option<Point>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A small arena tree implementing [`DragTree`].
#[derive(Clone, Debug)]
pub struct MemoryTree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Create a tree holding a single root node with unbounded extent.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            root: NodeId::new(0),
        };
        let big = f64::MAX / 4.0;
        tree.root = tree.create("root", Rect::new(-big, -big, big, big));
        tree
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node.
    pub fn create(&mut self, tag: &'static str, bounds: Rect) -> NodeId {
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            tag,
            bounds,
            flags: NodeFlags::default(),
            visual_origin: None,
            parent: None,
            children: Vec::new(),
        });
        NodeId::new(idx)
    }

    /// Create a node and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &'static str, bounds: Rect) -> NodeId {
        let id = self.create(tag, bounds);
        self.insert_before(parent, id, None);
        id
    }

    /// Returns `true` if `id` refers to a node of this tree.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Tag given at creation time.
    pub fn tag(&self, id: NodeId) -> Option<&'static str> {
        self.slot(id).map(|s| s.tag)
    }

    /// Children of `id` in order.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Replace the bounding box of `id`.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(slot) = self.slot_mut(id) {
            slot.bounds = bounds;
        }
    }

    /// Flags of `id`.
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.slot(id).map(|s| s.flags).unwrap_or(NodeFlags::empty())
    }

    /// Replace the flags of `id`.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(slot) = self.slot_mut(id) {
            slot.flags = flags;
        }
    }

    /// Last origin given to [`DragTree::move_visual`] for `id`.
    pub fn visual_origin(&self, id: NodeId) -> Option<Point> {
        self.slot(id).and_then(|s| s.visual_origin)
    }

    /// Returns `true` if `node` equals `ancestor` or lies below it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        crate::tree::ancestors_or_self(self, node).any(|n| n == ancestor)
    }

    /// Structural fingerprint of a subtree: tags in depth-first order.
    pub fn shape(&self, id: NodeId) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_shape(id, &mut out);
        out
    }

    fn collect_shape(&self, id: NodeId, out: &mut Vec<&'static str>) {
        if let Some(slot) = self.slot(id) {
            out.push(slot.tag);
            for &child in &slot.children {
                self.collect_shape(child, out);
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.idx())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.idx())
    }

    fn hit(&self, id: NodeId, point: Point, exclude: Option<NodeId>) -> Option<NodeId> {
        if Some(id) == exclude {
            return None;
        }
        let slot = self.slot(id)?;
        // Later children paint above earlier ones.
        for &child in slot.children.iter().rev() {
            if let Some(found) = self.hit(child, point, exclude) {
                return Some(found);
            }
        }
        (slot.flags.contains(NodeFlags::PICKABLE) && slot.bounds.contains(point)).then_some(id)
    }
}

impl DragTree for MemoryTree {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node)?.children.first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&n| n == node)?;
        siblings.get(pos + 1).copied()
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        let slot = self.slot(node)?;
        let offset = slot
            .visual_origin
            .map(|o| o - slot.bounds.origin())
            .unwrap_or(Vec2::ZERO);
        Some(slot.bounds + offset)
    }

    fn hit_test(&self, point: Point, exclude: Option<NodeId>) -> Option<NodeId> {
        self.hit(self.root, point, exclude)
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        if node == parent || !self.is_alive(parent) || self.is_within(parent, node) {
            return;
        }
        self.detach(node);
        let Some(slot) = self.slot_mut(parent) else {
            return;
        };
        let at = before
            .and_then(|b| slot.children.iter().position(|&n| n == b))
            .unwrap_or(slot.children.len());
        slot.children.insert(at, node);
        if let Some(child) = self.slot_mut(node) {
            child.parent = Some(parent);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.retain(|&n| n != node);
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.parent = None;
        }
    }

    fn duplicate(&mut self, node: NodeId) -> NodeId {
        let Some(src) = self.slot(node).cloned() else {
            return self.create("", Rect::ZERO);
        };
        let copy = self.create(src.tag, src.bounds);
        self.set_flags(copy, src.flags - NodeFlags::IN_TRANSIT);
        for child in src.children {
            let child_copy = self.duplicate(child);
            self.insert_before(copy, child_copy, None);
        }
        copy
    }

    fn is_text_input(&self, node: NodeId) -> bool {
        self.flags(node).contains(NodeFlags::TEXT_INPUT)
    }

    fn set_in_transit(&mut self, node: NodeId, in_transit: bool) {
        if let Some(slot) = self.slot_mut(node) {
            slot.flags.set(NodeFlags::IN_TRANSIT, in_transit);
        }
    }

    fn move_visual(&mut self, visual: NodeId, origin: Point) {
        if let Some(slot) = self.slot_mut(visual) {
            slot.visual_origin = Some(origin);
        }
    }
}
