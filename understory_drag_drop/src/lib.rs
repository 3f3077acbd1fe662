// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Drag Drop: pointer-driven drag and drop between containers.
//!
//! This crate moves (or copies) nodes between registered containers of a host
//! tree: sortable lists, kanban boards, palettes that hand out copies. It
//! decides what a press grabs, where a moving pointer would drop, keeps a
//! placeholder in that spot, and reports every step as an ordered event.
//!
//! - [`DragTree`]: the adapter a host implements for its own tree and geometry.
//! - [`DragOptions`]: containers, gating predicates, copy and spill policy, providers.
//! - [`DragController`]: long-lived entry point; feed it [`PointerDown`],
//!   [`PointerMove`] and pointer releases.
//! - [`DragSession`]: one gesture, from grab to drop, cancel or remove.
//! - [`DragEvent`] / [`Emitter`]: lifecycle notifications and their delivery.
//! - [`MemoryTree`]: an in-memory [`DragTree`] for tests, tools and benchmarks.
//!
//! ## Not a renderer
//!
//! The engine never paints or listens to platform input. Hosts translate their
//! input stream into pointer records and implement [`DragTree`] on top of
//! whatever owns the nodes. Bounds are read fresh on every query; the engine
//! caches no layout.
//!
//! ## Lifecycle
//!
//! A press arms a session. The first movement while the button is held starts
//! the drag: `drag` then `cloned`. Each movement hit-tests below the floating
//! visual, walks up to the nearest accepting container, and moves the
//! placeholder there (`out`, `over`, `shadow`). Releasing resolves the gesture
//! into exactly one of `drop`, `cancel` or `remove`, always followed by
//! `dragend`.
//!
//! ## Example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use kurbo::{Point, Rect};
//! use understory_drag_drop::{
//!     Channel, DragEvent, DragOptions, DragTree, MemoryTree, PointerDown, PointerMove, create,
//! };
//!
//! let mut tree = MemoryTree::new();
//! let todo = tree.append(tree.root(), "todo", Rect::new(0.0, 0.0, 100.0, 200.0));
//! let done = tree.append(tree.root(), "done", Rect::new(200.0, 0.0, 300.0, 200.0));
//! let task = tree.append(todo, "task", Rect::new(0.0, 0.0, 100.0, 30.0));
//!
//! let drops = Rc::new(RefCell::new(Vec::new()));
//! let mut drake = create([todo, done], DragOptions::<MemoryTree>::default());
//! let sink = drops.clone();
//! drake.on(Channel::Drop, move |ev| sink.borrow_mut().push(*ev));
//!
//! assert!(drake.pointer_down(&tree, PointerDown::primary(task, Point::new(10.0, 10.0))));
//! drake.pointer_move(&mut tree, PointerMove::held(Point::new(250.0, 100.0)));
//! assert!(drake.is_dragging());
//! drake.pointer_up(&mut tree, Point::new(250.0, 100.0));
//!
//! assert_eq!(tree.parent(task), Some(done));
//! assert_eq!(
//!     *drops.borrow(),
//!     vec![DragEvent::Drop { item: task, target: done, source: todo, sibling: None }]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod event;
mod memory;
mod options;
mod pointer;
mod session;
mod tree;
mod zone;

pub use controller::{DragController, create};
pub use event::{Channel, CloneKind, DragEvent, Emitter, SubscriptionId};
pub use memory::{MemoryTree, NodeFlags, NodeId};
pub use options::{CopyMode, Direction, DragOptions, FlyingVisualProvider, PlaceholderProvider};
pub use pointer::{Modifiers, PointerButton, PointerDown, PointerMove, PointerTrack};
pub use session::{DragSession, Outcome, Phase, Release, SessionKind};
pub use tree::{DragTree, ancestors_or_self, children};
pub use zone::{DragContext, DropZone, immediate_child, position_in};
