// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle events and a synchronous publish/subscribe emitter.
//!
//! ## Ordering
//!
//! Within one pointer movement an [`Out`](DragEvent::Out) always precedes the
//! [`Over`](DragEvent::Over) for the next container, and a
//! [`Shadow`](DragEvent::Shadow) follows both. [`DragEnd`](DragEvent::DragEnd)
//! is the last event of a session and follows its `Drop`, `Cancel` or `Remove`.
//!
//! ## Emitter
//!
//! [`Emitter`] invokes callbacks synchronously, in registration order, filtered
//! by [`Channel`]. Once [`completed`](Emitter::complete) it delivers nothing and
//! silently drops new registrations.
//!
//! ```
//! use understory_drag_drop::{Channel, DragEvent, Emitter};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut emitter = Emitter::new();
//! let sink = seen.clone();
//! emitter.subscribe(Channel::DragEnd, move |ev| sink.borrow_mut().push(*ev));
//!
//! emitter.emit(&DragEvent::Drag { item: 1, source: 0 });
//! emitter.emit(&DragEvent::DragEnd { item: 1 });
//! emitter.complete();
//! emitter.emit(&DragEvent::DragEnd { item: 2 });
//!
//! assert_eq!(*seen.borrow(), vec![DragEvent::DragEnd { item: 1 }]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// How the floating visual relates to the dragged node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloneKind {
    /// A visual proxy of a node that is moved.
    Mirror,
    /// A duplicate that will be inserted while the original stays put.
    Copy,
}

/// Event channels a callback can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// [`DragEvent::Drag`].
    Drag,
    /// [`DragEvent::Cloned`].
    Cloned,
    /// [`DragEvent::Over`].
    Over,
    /// [`DragEvent::Out`].
    Out,
    /// [`DragEvent::Shadow`].
    Shadow,
    /// [`DragEvent::Drop`].
    Drop,
    /// [`DragEvent::Cancel`].
    Cancel,
    /// [`DragEvent::Remove`].
    Remove,
    /// [`DragEvent::DragEnd`].
    DragEnd,
}

/// A drag lifecycle notification.
///
/// `item` is always the travelling node: the original for plain drags, the
/// duplicate for copies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragEvent<N> {
    /// The drag became active.
    Drag {
        /// Travelling node.
        item: N,
        /// Container the drag started in.
        source: N,
    },
    /// A floating visual (or duplicate) was produced.
    Cloned {
        /// The floating visual for mirrors, the duplicate for copies.
        visual: N,
        /// The node that was grabbed.
        original: N,
        /// Mirror or copy.
        kind: CloneKind,
    },
    /// The pointer entered an accepting container.
    Over {
        /// Travelling node.
        item: N,
        /// Container now under the pointer.
        container: N,
        /// Container the drag started in.
        source: N,
    },
    /// The pointer left a container.
    Out {
        /// Travelling node.
        item: N,
        /// Container that was under the pointer.
        container: N,
        /// Container the drag started in.
        source: N,
    },
    /// The placeholder moved.
    Shadow {
        /// The placeholder node.
        placeholder: N,
        /// Container now holding the placeholder.
        container: N,
        /// Container the drag started in.
        source: N,
    },
    /// The drag ended with the item in a new position.
    Drop {
        /// Travelling node.
        item: N,
        /// Container that received the item.
        target: N,
        /// Container the drag started in.
        source: N,
        /// Node the item was inserted before, `None` when appended.
        sibling: Option<N>,
    },
    /// The drag ended without a change.
    Cancel {
        /// Travelling node.
        item: N,
        /// Container holding the item afterwards, `None` for a discarded copy.
        container: Option<N>,
        /// Container the drag started in.
        source: N,
    },
    /// The drag ended by deleting the item from the tree.
    Remove {
        /// Travelling node.
        item: N,
        /// Container that held the item last.
        container: N,
        /// Container the drag started in.
        source: N,
    },
    /// The session is over. Always the last event.
    DragEnd {
        /// Travelling node.
        item: N,
    },
}

impl<N> DragEvent<N> {
    /// Channel this event is delivered on.
    pub fn channel(&self) -> Channel {
        match self {
            Self::Drag { .. } => Channel::Drag,
            Self::Cloned { .. } => Channel::Cloned,
            Self::Over { .. } => Channel::Over,
            Self::Out { .. } => Channel::Out,
            Self::Shadow { .. } => Channel::Shadow,
            Self::Drop { .. } => Channel::Drop,
            Self::Cancel { .. } => Channel::Cancel,
            Self::Remove { .. } => Channel::Remove,
            Self::DragEnd { .. } => Channel::DragEnd,
        }
    }

    /// Returns `true` for `Drop`, `Cancel` and `Remove`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drop { .. } | Self::Cancel { .. } | Self::Remove { .. })
    }
}

/// Handle returned by [`Emitter::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<N> = Box<dyn FnMut(&DragEvent<N>)>;

struct Registration<N> {
    id: SubscriptionId,
    channel: Option<Channel>,
    callback: Callback<N>,
}

/// Ordered, channel-filtered callback list.
pub struct Emitter<N> {
    registrations: Vec<Registration<N>>,
    next_id: u64,
    completed: bool,
}

impl<N> fmt::Debug for Emitter<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("registrations", &self.registrations.len())
            .field("next_id", &self.next_id)
            .field("completed", &self.completed)
            .finish()
    }
}

impl<N> Default for Emitter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Emitter<N> {
    /// Create an open emitter with no subscribers.
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            next_id: 0,
            completed: false,
        }
    }

    /// Register `callback` for events on `channel`.
    pub fn subscribe(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&DragEvent<N>) + 'static,
    ) -> SubscriptionId {
        self.register(Some(channel), Box::new(callback))
    }

    /// Register `callback` for every event.
    pub fn subscribe_all(
        &mut self,
        callback: impl FnMut(&DragEvent<N>) + 'static,
    ) -> SubscriptionId {
        self.register(None, Box::new(callback))
    }

    fn register(&mut self, channel: Option<Channel>, callback: Callback<N>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if !self.completed {
            self.registrations.push(Registration {
                id,
                channel,
                callback,
            });
        }
        id
    }

    /// Remove a registration. Returns `false` if it was not present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Deliver `event` to matching subscribers in registration order.
    pub fn emit(&mut self, event: &DragEvent<N>) {
        if self.completed {
            return;
        }
        let channel = event.channel();
        for reg in &mut self.registrations {
            if reg.channel.is_none_or(|c| c == channel) {
                (reg.callback)(event);
            }
        }
    }

    /// Stop all deliveries and drop every registration.
    pub fn complete(&mut self) {
        self.completed = true;
        self.registrations.clear();
    }

    /// Returns `true` once [`complete`](Self::complete) was called.
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
