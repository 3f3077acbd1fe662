// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The long-lived drag controller.
//!
//! A [`DragController`] owns the [`DragOptions`], turns pointer presses into
//! sessions, and relays every session event to its own subscribers. At most
//! one session exists at a time.

use core::fmt;

use kurbo::Point;

use crate::event::{Channel, DragEvent, Emitter, SubscriptionId};
use crate::options::DragOptions;
use crate::pointer::{PointerDown, PointerMove};
use crate::session::{DragSession, Release, SessionKind};
use crate::tree::{DragTree, ancestors_or_self};
use crate::zone::DragContext;

/// Create a controller for `containers`.
///
/// Containers already listed in `options` take precedence.
pub fn create<T: DragTree>(
    containers: impl IntoIterator<Item = T::Node>,
    options: DragOptions<T>,
) -> DragController<T> {
    DragController::with_containers(containers, options)
}

/// Owns options and the current [`DragSession`].
pub struct DragController<T: DragTree> {
    options: DragOptions<T>,
    session: Option<DragSession<T::Node>>,
    emitter: Emitter<T::Node>,
    accepting_grabs: bool,
}

impl<T: DragTree> fmt::Debug for DragController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("options", &self.options)
            .field("session", &self.session)
            .field("emitter", &self.emitter)
            .field("accepting_grabs", &self.accepting_grabs)
            .finish()
    }
}

impl<T: DragTree> DragController<T> {
    /// Create a controller with `options`.
    pub fn new(options: DragOptions<T>) -> Self {
        Self {
            options,
            session: None,
            emitter: Emitter::new(),
            accepting_grabs: true,
        }
    }

    /// Create a controller, using `containers` unless `options` already lists some.
    pub fn with_containers(
        containers: impl IntoIterator<Item = T::Node>,
        mut options: DragOptions<T>,
    ) -> Self {
        if options.containers.is_empty() {
            options.containers = containers.into_iter().collect();
        }
        Self::new(options)
    }

    /// Current options.
    pub fn options(&self) -> &DragOptions<T> {
        &self.options
    }

    /// Mutable access to the options; changes apply to the next event.
    pub fn options_mut(&mut self) -> &mut DragOptions<T> {
        &mut self.options
    }

    /// Statically registered containers.
    pub fn containers(&self) -> &[T::Node] {
        &self.options.containers
    }

    /// Register `container`. Registering twice has no effect.
    pub fn add_container(&mut self, container: T::Node) {
        if !self.options.containers.contains(&container) {
            self.options.containers.push(container);
        }
    }

    /// Unregister `container`. Returns `false` if it was not registered.
    pub fn remove_container(&mut self, container: T::Node) -> bool {
        let before = self.options.containers.len();
        self.options.containers.retain(|c| *c != container);
        self.options.containers.len() != before
    }

    /// Returns `true` if `node` is a container.
    pub fn is_container(&self, node: T::Node) -> bool {
        self.options.is_container(node)
    }

    /// Returns `true` if dragging `item` out of `source` would copy it.
    pub fn requires_copy(&self, item: T::Node, source: T::Node) -> bool {
        self.options.requires_copy(item, source)
    }

    /// The current session, armed or dragging.
    pub fn session(&self) -> Option<&DragSession<T::Node>> {
        self.session.as_ref()
    }

    /// Returns `true` while a session is dragging.
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_dragging)
    }

    /// Returns `true` once [`destroy`](Self::destroy) was called.
    pub fn is_destroyed(&self) -> bool {
        !self.accepting_grabs
    }

    /// Work out what a grab on `handle` would drag, if anything.
    ///
    /// Walks up from `handle` to the first node whose parent is a container,
    /// rejecting the grab if any node on the way is `invalid`, if `handle` is
    /// itself a container, or if `moves` declines. Returns `None` while a
    /// session exists.
    pub fn start_context(&self, tree: &T, handle: T::Node) -> Option<DragContext<T::Node>> {
        if self.session.is_some() || self.is_container(handle) {
            return None;
        }
        let options = &self.options;
        let mut item = None;
        for node in ancestors_or_self(tree, handle) {
            if (options.invalid)(node, handle) {
                return None;
            }
            let parent = tree.parent(node)?;
            if options.is_container(parent) {
                item = Some(node);
                break;
            }
        }
        let item = item?;
        let source = tree.parent(item)?;
        let sibling = tree.next_sibling(item);
        if !(options.moves)(item, source, handle, sibling) {
            log::trace!("grab on {handle:?} declined by `moves`");
            return None;
        }
        Some(DragContext {
            item,
            source,
            sibling,
        })
    }

    /// Handle a pointer press. Returns `true` if a session was armed.
    ///
    /// Presses are ignored after [`destroy`](Self::destroy), for non-primary
    /// buttons, with Ctrl or Meta held, and while another session is dragging.
    /// A press while a previous session is merely armed replaces it.
    pub fn pointer_down(&mut self, tree: &T, down: PointerDown<T::Node>) -> bool {
        if !self.accepting_grabs || !down.can_grab() {
            return false;
        }
        match &self.session {
            Some(session) if session.is_dragging() => {
                log::debug!("press on {:?} ignored: a drag is in progress", down.target);
                return false;
            }
            Some(_) => self.session = None,
            None => {}
        }
        let Some(context) = self.start_context(tree, down.target) else {
            return false;
        };
        let session = self.spawn(context);
        let session = self.session.insert(session);
        session.grab(down.position);
        true
    }

    /// Handle a pointer movement.
    pub fn pointer_move(&mut self, tree: &mut T, movement: PointerMove) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let released = session.pointer_move(tree, &self.options, movement);
        self.settle(released);
    }

    /// Handle a pointer release.
    pub fn pointer_up(&mut self, tree: &mut T, position: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let released = session.release(tree, &self.options, position);
        self.settle(Some(released));
    }

    /// Start dragging `node` immediately, as if it had been grabbed and moved.
    ///
    /// Any active drag is ended first. Returns `false` if `node` cannot be dragged.
    pub fn start(&mut self, tree: &mut T, node: T::Node) -> bool {
        if self.is_dragging() {
            self.end(tree);
        }
        self.session = None;
        let Some(context) = self.start_context(tree, node) else {
            return false;
        };
        let session = self.spawn(context);
        let session = self.session.insert(session);
        session.start(tree, &self.options);
        self.settle(None);
        true
    }

    /// End the drag where its placeholder is. No-op unless dragging.
    pub fn end(&mut self, tree: &mut T) {
        if let Some(session) = self.session.as_mut() {
            session.end(tree, &self.options);
            self.settle(None);
        }
    }

    /// Cancel the drag, moving the item back when `revert` is set. No-op unless dragging.
    pub fn cancel(&mut self, tree: &mut T, revert: bool) {
        if let Some(session) = self.session.as_mut() {
            session.cancel(tree, &self.options, revert);
            self.settle(None);
        }
    }

    /// Delete the dragged item from the tree. No-op unless dragging.
    pub fn remove(&mut self, tree: &mut T) {
        if let Some(session) = self.session.as_mut() {
            session.remove(tree);
            self.settle(None);
        }
    }

    /// Subscribe to `channel`, builder style.
    pub fn on(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&DragEvent<T::Node>) + 'static,
    ) -> &mut Self {
        self.emitter.subscribe(channel, callback);
        self
    }

    /// Subscribe to `channel`, returning a handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&DragEvent<T::Node>) + 'static,
    ) -> SubscriptionId {
        self.emitter.subscribe(channel, callback)
    }

    /// Subscribe to every event.
    pub fn subscribe_all(
        &mut self,
        callback: impl FnMut(&DragEvent<T::Node>) + 'static,
    ) -> SubscriptionId {
        self.emitter.subscribe_all(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    /// Stop accepting presses and settle the current session.
    ///
    /// A dragging session is cancelled without revert; an armed one is
    /// discarded. Calling this again does nothing.
    pub fn destroy(&mut self, tree: &mut T) {
        if !self.accepting_grabs {
            return;
        }
        self.accepting_grabs = false;
        log::debug!("drag controller destroyed");
        if self.is_dragging() {
            self.cancel(tree, false);
        }
        self.session = None;
    }

    fn spawn(&self, context: DragContext<T::Node>) -> DragSession<T::Node> {
        let kind = if self.requires_copy(context.item, context.source) {
            SessionKind::Copy
        } else {
            SessionKind::Move
        };
        DragSession::new(context, kind)
    }

    /// Relay queued session events and drop sessions that are over.
    fn settle(&mut self, released: Option<Release>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for event in session.take_events() {
            self.emitter.emit(&event);
        }
        if session.is_finished() || released == Some(Release::CancelledBeforeDragging) {
            self.session = None;
        }
    }
}
