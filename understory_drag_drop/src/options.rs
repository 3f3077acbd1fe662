// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag configuration: containers, gates, providers and spill policy.
//!
//! Every field has a default; the `with_*` methods replace one field at a time.
//!
//! ```
//! use understory_drag_drop::{CopyMode, Direction, DragOptions, MemoryTree};
//!
//! let mut tree = MemoryTree::new();
//! let left = tree.append(tree.root(), "left", kurbo::Rect::ZERO);
//! let right = tree.append(tree.root(), "right", kurbo::Rect::ZERO);
//!
//! // Copies from `left`, which itself accepts nothing.
//! let options = DragOptions::<MemoryTree>::default()
//!     .with_containers([left, right])
//!     .with_copy(CopyMode::when(move |_, source| source == left))
//!     .with_accepts(move |_, target, _, _| target != left)
//!     .with_direction(Direction::Horizontal);
//!
//! assert!(options.requires_copy(tree.root(), left));
//! assert!(!options.requires_copy(tree.root(), right));
//! ```

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::tree::DragTree;

/// Axis used to decide whether the pointer is before or after a sibling.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Items are stacked top to bottom.
    #[default]
    Vertical,
    /// Items flow left to right.
    Horizontal,
}

type NodePredicate<N> = Box<dyn Fn(N) -> bool>;
type PairPredicate<N> = Box<dyn Fn(N, N) -> bool>;
type PlacementPredicate<N> = Box<dyn Fn(N, N, N, Option<N>) -> bool>;

/// Produces the floating visual for a node.
pub type FlyingVisualProvider<T> =
    Box<dyn Fn(&mut T, <T as DragTree>::Node) -> <T as DragTree>::Node>;

/// Produces the placeholder for a node entering a container.
pub type PlaceholderProvider<T> =
    Box<dyn Fn(&mut T, <T as DragTree>::Node, <T as DragTree>::Node) -> <T as DragTree>::Node>;

/// Whether a drag duplicates its item instead of moving it.
pub enum CopyMode<N> {
    /// Always move.
    Never,
    /// Always copy.
    Always,
    /// Decide per drag from `(item, source)`.
    When(PairPredicate<N>),
}

impl<N> CopyMode<N> {
    /// Decide per drag with `predicate(item, source)`.
    pub fn when(predicate: impl Fn(N, N) -> bool + 'static) -> Self {
        Self::When(Box::new(predicate))
    }

    /// Evaluate for a grabbed `item` in `source`.
    pub fn resolve(&self, item: N, source: N) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::When(predicate) => predicate(item, source),
        }
    }
}

impl<N> From<bool> for CopyMode<N> {
    fn from(copy: bool) -> Self {
        if copy { Self::Always } else { Self::Never }
    }
}

impl<N> fmt::Debug for CopyMode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Always => f.write_str("Always"),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Options shared by a [`DragController`](crate::DragController) and its sessions.
pub struct DragOptions<T: DragTree> {
    /// Statically registered containers.
    pub containers: SmallVec<[T::Node; 4]>,
    /// `moves(item, source, handle, sibling)`: may this drag start? Default: always.
    pub moves: PlacementPredicate<T::Node>,
    /// `accepts(item, target, source, sibling)`: may the item land here? Default: always.
    pub accepts: PlacementPredicate<T::Node>,
    /// `invalid(node, handle)`: is `node` never a drag unit or part of one? Default: never.
    pub invalid: PairPredicate<T::Node>,
    /// `is_container(node)`: dynamic container membership. Default: never.
    pub is_container: NodePredicate<T::Node>,
    /// Copy instead of move. Default: [`CopyMode::Never`].
    pub copy: CopyMode<T::Node>,
    /// Let copies be dropped back into their own source container. Default: `false`.
    pub copy_sort_source: bool,
    /// On a spill, show and return the item at its origin. Default: `false`.
    pub revert_on_spill: bool,
    /// On a spill, delete the item. Default: `false`.
    pub remove_on_spill: bool,
    /// Axis for position bisection. Default: [`Direction::Vertical`].
    pub direction: Direction,
    /// Never start a drag from a text-input-like node. Default: `true`.
    pub ignore_input_text_selection: bool,
    /// Floating visual provider. Default: [`DragTree::duplicate`].
    pub flying_visual_provider: FlyingVisualProvider<T>,
    /// Placeholder provider. Default: the item itself.
    pub placeholder_provider: PlaceholderProvider<T>,
    /// Container the floating visual is appended to. Default: left detached.
    pub mirror_container: Option<T::Node>,
}

impl<T: DragTree> Default for DragOptions<T> {
    fn default() -> Self {
        Self {
            containers: SmallVec::new(),
            moves: Box::new(|_, _, _, _| true),
            accepts: Box::new(|_, _, _, _| true),
            invalid: Box::new(|_, _| false),
            is_container: Box::new(|_| false),
            copy: CopyMode::Never,
            copy_sort_source: false,
            revert_on_spill: false,
            remove_on_spill: false,
            direction: Direction::Vertical,
            ignore_input_text_selection: true,
            flying_visual_provider: Box::new(|tree: &mut T, node| tree.duplicate(node)),
            placeholder_provider: Box::new(|_: &mut T, node, _| node),
            mirror_container: None,
        }
    }
}

impl<T: DragTree> fmt::Debug for DragOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragOptions")
            .field("containers", &self.containers)
            .field("copy", &self.copy)
            .field("copy_sort_source", &self.copy_sort_source)
            .field("revert_on_spill", &self.revert_on_spill)
            .field("remove_on_spill", &self.remove_on_spill)
            .field("direction", &self.direction)
            .field(
                "ignore_input_text_selection",
                &self.ignore_input_text_selection,
            )
            .field("mirror_container", &self.mirror_container)
            .finish_non_exhaustive()
    }
}

impl<T: DragTree> DragOptions<T> {
    /// Replace the static container list.
    pub fn with_containers(mut self, containers: impl IntoIterator<Item = T::Node>) -> Self {
        self.containers = containers.into_iter().collect();
        self
    }

    /// Replace the `moves` gate.
    pub fn with_moves(
        mut self,
        moves: impl Fn(T::Node, T::Node, T::Node, Option<T::Node>) -> bool + 'static,
    ) -> Self {
        self.moves = Box::new(moves);
        self
    }

    /// Replace the `accepts` gate.
    pub fn with_accepts(
        mut self,
        accepts: impl Fn(T::Node, T::Node, T::Node, Option<T::Node>) -> bool + 'static,
    ) -> Self {
        self.accepts = Box::new(accepts);
        self
    }

    /// Replace the `invalid` predicate.
    pub fn with_invalid(mut self, invalid: impl Fn(T::Node, T::Node) -> bool + 'static) -> Self {
        self.invalid = Box::new(invalid);
        self
    }

    /// Replace the dynamic container predicate.
    pub fn with_is_container(mut self, is_container: impl Fn(T::Node) -> bool + 'static) -> Self {
        self.is_container = Box::new(is_container);
        self
    }

    /// Set the copy mode. Accepts a [`CopyMode`] or a `bool`.
    pub fn with_copy(mut self, copy: impl Into<CopyMode<T::Node>>) -> Self {
        self.copy = copy.into();
        self
    }

    /// Allow copies to be reordered inside their source container.
    pub fn with_copy_sort_source(mut self, copy_sort_source: bool) -> Self {
        self.copy_sort_source = copy_sort_source;
        self
    }

    /// Return spilled items to their origin.
    pub fn with_revert_on_spill(mut self, revert_on_spill: bool) -> Self {
        self.revert_on_spill = revert_on_spill;
        self
    }

    /// Delete spilled items.
    pub fn with_remove_on_spill(mut self, remove_on_spill: bool) -> Self {
        self.remove_on_spill = remove_on_spill;
        self
    }

    /// Set the bisection axis.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Allow or forbid drags that begin over text inputs.
    pub fn with_ignore_input_text_selection(mut self, ignore: bool) -> Self {
        self.ignore_input_text_selection = ignore;
        self
    }

    /// Replace the floating visual provider.
    pub fn with_flying_visual_provider(
        mut self,
        provider: impl Fn(&mut T, T::Node) -> T::Node + 'static,
    ) -> Self {
        self.flying_visual_provider = Box::new(provider);
        self
    }

    /// Replace the placeholder provider.
    pub fn with_placeholder_provider(
        mut self,
        provider: impl Fn(&mut T, T::Node, T::Node) -> T::Node + 'static,
    ) -> Self {
        self.placeholder_provider = Box::new(provider);
        self
    }

    /// Append floating visuals to `container`.
    pub fn with_mirror_container(mut self, container: T::Node) -> Self {
        self.mirror_container = Some(container);
        self
    }

    /// Returns `true` if `node` is a registered or predicate-accepted container.
    pub fn is_container(&self, node: T::Node) -> bool {
        self.containers.contains(&node) || (self.is_container)(node)
    }

    /// Returns `true` if dragging `item` out of `source` produces a copy.
    pub fn requires_copy(&self, item: T::Node, source: T::Node) -> bool {
        self.copy.resolve(item, source)
    }
}
