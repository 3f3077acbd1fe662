// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One drag gesture, from grab to a terminal outcome.
//!
//! ## Phases
//!
//! A [`DragSession`] starts [`Armed`](Phase::Armed) after a press, becomes
//! [`Dragging`](Phase::Dragging) on the first movement (or immediately through
//! [`DragSession::start`]), and ends in exactly one [`Outcome`]. Terminal
//! operations on an armed or finished session do nothing.
//!
//! ## Plain and copy sessions
//!
//! A [`SessionKind::Move`] session drags the grabbed node itself. A
//! [`SessionKind::Copy`] session drags a duplicate made when the drag starts;
//! the original never moves, the source container is not a drop target
//! (unless [`copy_sort_source`](crate::DragOptions::copy_sort_source) is set),
//! and cancelling or removing always reports a cancel.
//!
//! ## Events
//!
//! Events go to the session's own subscribers and are also queued for the
//! owner, which drains them with [`DragSession::take_events`]. After the
//! final [`DragEnd`](DragEvent::DragEnd) the session emitter is completed.

use alloc::vec::Vec;
use core::mem;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::event::{Channel, CloneKind, DragEvent, Emitter, SubscriptionId};
use crate::options::DragOptions;
use crate::pointer::{PointerMove, PointerTrack};
use crate::tree::{DragTree, ancestors_or_self};
use crate::zone::{DragContext, DropZone, immediate_child, normalize_sibling, position_in};

/// Lifecycle phase of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pressed, not yet moved.
    Armed,
    /// Floating visual exists and drop zones are tracked.
    Dragging,
    /// Terminal; the session is inert.
    Finished(Outcome),
}

/// How a session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The item landed somewhere new.
    Dropped,
    /// Nothing changed (or a copy was discarded).
    Cancelled,
    /// The item was deleted from the tree.
    Removed,
}

/// Result of releasing the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Release {
    /// The press never became a drag; the owner should discard the session.
    CancelledBeforeDragging,
    /// The drag ended with this outcome.
    Ended(Outcome),
    /// The session had already finished.
    Inert,
}

/// Move or copy strategy of a session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Drag the grabbed node.
    #[default]
    Move,
    /// Drag a duplicate of the grabbed node.
    Copy,
}

impl SessionKind {
    fn clone_kind(self) -> CloneKind {
        match self {
            Self::Move => CloneKind::Mirror,
            Self::Copy => CloneKind::Copy,
        }
    }

    fn rejects<N: Eq>(self, container: N, source: N, copy_sort_source: bool) -> bool {
        self == Self::Copy && !copy_sort_source && container == source
    }
}

/// State of one drag gesture.
#[derive(Debug)]
pub struct DragSession<N> {
    context: DragContext<N>,
    kind: SessionKind,
    item: N,
    phase: Phase,
    pointer: PointerTrack,
    anchor: Option<Rect>,
    visual: Option<N>,
    placeholder: Option<N>,
    placed: Option<DropZone<N>>,
    hover: Option<N>,
    last_container: N,
    emitter: Emitter<N>,
    outbox: Vec<DragEvent<N>>,
}

impl<N: Copy + Eq + core::fmt::Debug> DragSession<N> {
    /// Create an armed session for `context`.
    pub fn new(context: DragContext<N>, kind: SessionKind) -> Self {
        Self {
            context,
            kind,
            item: context.item,
            phase: Phase::Armed,
            pointer: PointerTrack::default(),
            anchor: None,
            visual: None,
            placeholder: None,
            placed: None,
            hover: None,
            last_container: context.source,
            emitter: Emitter::new(),
            outbox: Vec::new(),
        }
    }

    /// Where the drag came from.
    pub fn context(&self) -> &DragContext<N> {
        &self.context
    }

    /// Move or copy.
    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// The travelling node: the grabbed node, or its duplicate once a copy starts.
    pub fn item(&self) -> N {
        self.item
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` while dragging.
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    /// Returns `true` once a terminal outcome was reached.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// The floating visual, while dragging.
    pub fn visual(&self) -> Option<N> {
        self.visual
    }

    /// The placeholder node, once one was requested.
    pub fn placeholder(&self) -> Option<N> {
        self.placeholder
    }

    /// Zone currently holding the placeholder.
    pub fn drop_zone(&self) -> Option<DropZone<N>> {
        self.placed
    }

    /// Container currently under the pointer.
    pub fn hovered(&self) -> Option<N> {
        self.hover
    }

    /// Pointer positions seen so far.
    pub fn pointer(&self) -> &PointerTrack {
        &self.pointer
    }

    /// Where the floating visual's top-left corner currently is.
    pub fn visual_origin(&self) -> Option<Point> {
        self.anchor
            .map(|anchor| anchor.origin() + self.pointer.total_offset())
    }

    /// Subscribe to this session's events on `channel`.
    pub fn on(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&DragEvent<N>) + 'static,
    ) -> SubscriptionId {
        self.emitter.subscribe(channel, callback)
    }

    /// Subscribe to every event of this session.
    pub fn on_any(&mut self, callback: impl FnMut(&DragEvent<N>) + 'static) -> SubscriptionId {
        self.emitter.subscribe_all(callback)
    }

    /// Remove a subscription made with [`on`](Self::on) or [`on_any`](Self::on_any).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter.unsubscribe(id)
    }

    /// Drain events emitted since the last call, in emission order.
    pub fn take_events(&mut self) -> Vec<DragEvent<N>> {
        mem::take(&mut self.outbox)
    }

    /// Record the press position. The session stays armed.
    pub fn grab(&mut self, position: Point) {
        if self.phase == Phase::Armed {
            self.pointer.start(position);
        }
    }

    /// Promote to [`Phase::Dragging`] without waiting for movement.
    ///
    /// Emits [`Drag`](DragEvent::Drag) then [`Cloned`](DragEvent::Cloned).
    pub fn start<T: DragTree<Node = N>>(&mut self, tree: &mut T, options: &DragOptions<T>) {
        if self.phase != Phase::Armed {
            return;
        }
        self.phase = Phase::Dragging;
        let original = self.context.item;
        if self.kind == SessionKind::Copy {
            self.item = tree.duplicate(original);
        }
        log::debug!(
            "drag started: {:?} from {:?} ({:?})",
            original,
            self.context.source,
            self.kind
        );
        self.emit(DragEvent::Drag {
            item: self.item,
            source: self.context.source,
        });

        // The duplicate has no geometry until placed, so copies fly the original.
        self.anchor = tree.bounds(original);
        let visual = (options.flying_visual_provider)(tree, original);
        if let Some(mirror) = options.mirror_container {
            tree.insert_before(mirror, visual, None);
        }
        if let Some(anchor) = self.anchor {
            tree.move_visual(visual, anchor.origin());
        }
        self.visual = Some(visual);
        tree.set_in_transit(self.item, true);

        let shown = match self.kind {
            SessionKind::Move => visual,
            SessionKind::Copy => self.item,
        };
        self.emit(DragEvent::Cloned {
            visual: shown,
            original,
            kind: self.kind.clone_kind(),
        });
    }

    /// Feed a pointer movement.
    ///
    /// Returns `Some` when the movement ended the gesture: the primary button
    /// was no longer held, or an armed press turned out to be a text selection.
    pub fn pointer_move<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        movement: PointerMove,
    ) -> Option<Release> {
        if self.is_finished() {
            return None;
        }
        if !movement.primary_held {
            return Some(self.release(tree, options, movement.position));
        }
        if self.phase == Phase::Armed {
            let over_input = tree
                .hit_test(movement.position, None)
                .is_some_and(|n| tree.is_text_input(n));
            if options.ignore_input_text_selection && over_input {
                return Some(self.release(tree, options, movement.position));
            }
            self.start(tree, options);
        }

        self.pointer.update(movement.position);
        if let (Some(visual), Some(origin)) = (self.visual, self.visual_origin()) {
            tree.move_visual(visual, origin);
        }
        self.detect(tree, options, movement.position);
        None
    }

    /// Release the pointer at `position` and resolve the gesture.
    pub fn release<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        position: Point,
    ) -> Release {
        match self.phase {
            Phase::Armed => return Release::CancelledBeforeDragging,
            Phase::Finished(_) => return Release::Inert,
            Phase::Dragging => {}
        }
        match self.resolve(tree, options, position) {
            Some(zone) => self.drop(tree, options, zone),
            None => {
                self.apply_zone(tree, options, None);
                if options.remove_on_spill {
                    self.remove(tree);
                } else {
                    self.cancel(tree, options, false);
                }
            }
        }
        match self.phase {
            Phase::Finished(outcome) => Release::Ended(outcome),
            _ => Release::Inert,
        }
    }

    /// Find the accepted drop zone under `point`, if any.
    ///
    /// This does not apply the spill fallback and does not mutate anything.
    pub fn resolve<T: DragTree<Node = N>>(
        &self,
        tree: &T,
        options: &DragOptions<T>,
        point: Point,
    ) -> Option<DropZone<N>> {
        let hit = tree.hit_test(point, self.visual)?;
        let markers = self.markers();
        // Never resolve into the item itself: lift hits inside it to the item.
        let start = ancestors_or_self(tree, hit)
            .filter(|n| markers.contains(n))
            .last()
            .unwrap_or(hit);
        let source = self.context.source;

        let mut candidate = Some(start);
        while let Some(container) = candidate {
            candidate = tree.parent(container);
            if !options.is_container(container)
                || self
                    .kind
                    .rejects(container, source, options.copy_sort_source)
            {
                continue;
            }
            match immediate_child(tree, container, start) {
                None => {
                    if container == source || (options.accepts)(self.item, container, source, None)
                    {
                        return Some(DropZone::end_of(container));
                    }
                }
                Some(child) => {
                    let sibling = position_in(tree, container, child, point, options.direction);
                    let sibling = normalize_sibling(tree, sibling, &markers);
                    if self.is_initial(container, sibling)
                        || (options.accepts)(self.item, container, source, sibling)
                    {
                        return Some(DropZone { container, sibling });
                    }
                }
            }
        }
        None
    }

    /// Drop the item into `zone`.
    ///
    /// Dropping a plain item exactly where it started reports a cancel.
    pub fn drop<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        zone: DropZone<N>,
    ) {
        if !self.is_dragging() {
            return;
        }
        self.apply_zone(tree, options, Some(zone));
        self.materialize(tree);
        let source = self.context.source;
        if self.is_initial(zone.container, zone.sibling) {
            self.emit(DragEvent::Cancel {
                item: self.item,
                container: Some(zone.container),
                source,
            });
            self.finish(tree, Outcome::Cancelled);
        } else {
            self.emit(DragEvent::Drop {
                item: self.item,
                target: zone.container,
                source,
                sibling: zone.sibling,
            });
            self.finish(tree, Outcome::Dropped);
        }
    }

    /// Cancel the drag.
    ///
    /// A plain item that is away from its origin is moved back when `revert`
    /// or [`revert_on_spill`](DragOptions::revert_on_spill) is set; otherwise it
    /// stays at its last placement and the cancel is reported as a drop there.
    pub fn cancel<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        revert: bool,
    ) {
        if !self.is_dragging() {
            return;
        }
        let source = self.context.source;
        if self.kind == SessionKind::Copy {
            self.discard_copy(tree);
            self.emit(DragEvent::Cancel {
                item: self.item,
                container: Some(source),
                source,
            });
            self.finish(tree, Outcome::Cancelled);
            return;
        }

        let reverts = revert || options.revert_on_spill;
        let zone = self.placed.unwrap_or(self.context.origin());
        if reverts || self.context.is_initial(zone.container, zone.sibling) {
            self.restore_origin(tree);
            self.emit(DragEvent::Cancel {
                item: self.item,
                container: Some(source),
                source,
            });
            self.finish(tree, Outcome::Cancelled);
        } else {
            self.materialize(tree);
            self.emit(DragEvent::Drop {
                item: self.item,
                target: zone.container,
                source,
                sibling: zone.sibling,
            });
            self.finish(tree, Outcome::Dropped);
        }
    }

    /// Delete the item from the tree. Copies are discarded and reported as a cancel.
    pub fn remove<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        if !self.is_dragging() {
            return;
        }
        let source = self.context.source;
        if self.kind == SessionKind::Copy {
            self.discard_copy(tree);
            self.emit(DragEvent::Cancel {
                item: self.item,
                container: None,
                source,
            });
            self.finish(tree, Outcome::Cancelled);
            return;
        }

        self.detach_distinct_placeholder(tree);
        let container = tree.parent(self.item).unwrap_or(self.last_container);
        tree.detach(self.item);
        self.emit(DragEvent::Remove {
            item: self.item,
            container,
            source,
        });
        self.finish(tree, Outcome::Removed);
    }

    /// End the drag where the placeholder is, without hit testing.
    pub fn end<T: DragTree<Node = N>>(&mut self, tree: &mut T, options: &DragOptions<T>) {
        if !self.is_dragging() {
            return;
        }
        match self.placed {
            Some(zone) => self.drop(tree, options, zone),
            None => self.cancel(tree, options, false),
        }
    }

    fn detect<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        point: Point,
    ) {
        let zone = self.resolve(tree, options, point).or_else(|| {
            (options.revert_on_spill && self.kind == SessionKind::Move)
                .then(|| self.context.origin())
        });
        self.apply_zone(tree, options, zone);
    }

    /// Emit `out`/`over` for a container change, then move the placeholder.
    fn apply_zone<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        zone: Option<DropZone<N>>,
    ) {
        let container = zone.map(|z| z.container);
        let source = self.context.source;
        if container != self.hover {
            log::trace!("drop target {:?} -> {:?}", self.hover, container);
            if let Some(old) = self.hover.take() {
                self.emit(DragEvent::Out {
                    item: self.item,
                    container: old,
                    source,
                });
            }
            if let Some(new) = container {
                self.hover = Some(new);
                self.emit(DragEvent::Over {
                    item: self.item,
                    container: new,
                    source,
                });
            }
        }
        match zone {
            Some(zone) => self.place_placeholder(tree, options, zone),
            None => self.retract_placeholder(tree),
        }
    }

    fn place_placeholder<T: DragTree<Node = N>>(
        &mut self,
        tree: &mut T,
        options: &DragOptions<T>,
        zone: DropZone<N>,
    ) {
        let placeholder = match self.placeholder {
            Some(placeholder) => placeholder,
            None => {
                let placeholder = (options.placeholder_provider)(tree, self.item, zone.container);
                self.placeholder = Some(placeholder);
                placeholder
            }
        };
        self.placed = Some(zone);
        self.last_container = zone.container;

        let markers = self.markers();
        let in_place = tree.parent(placeholder) == Some(zone.container)
            && normalize_sibling(tree, tree.next_sibling(placeholder), &markers) == zone.sibling;
        if in_place {
            return;
        }
        tree.insert_before(zone.container, placeholder, zone.sibling);
        self.emit(DragEvent::Shadow {
            placeholder,
            container: zone.container,
            source: self.context.source,
        });
    }

    fn retract_placeholder<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        if let Some(placeholder) = self.placeholder {
            tree.detach(placeholder);
        }
        self.placed = None;
    }

    /// Put the item where the placeholder is and retire a distinct placeholder.
    fn materialize<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        let (Some(zone), Some(placeholder)) = (self.placed, self.placeholder) else {
            return;
        };
        if placeholder != self.item && tree.parent(placeholder) == Some(zone.container) {
            tree.insert_before(zone.container, self.item, Some(placeholder));
            tree.detach(placeholder);
        }
    }

    fn restore_origin<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        self.detach_distinct_placeholder(tree);
        let DragContext {
            item,
            source,
            sibling,
        } = self.context;
        let at_origin = tree.parent(item) == Some(source)
            && normalize_sibling(tree, tree.next_sibling(item), &self.markers()) == sibling;
        if !at_origin {
            tree.insert_before(source, item, sibling);
        }
        self.placed = None;
    }

    fn discard_copy<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        self.detach_distinct_placeholder(tree);
        tree.detach(self.item);
        self.placed = None;
    }

    fn detach_distinct_placeholder<T: DragTree<Node = N>>(&mut self, tree: &mut T) {
        if let Some(placeholder) = self.placeholder {
            if placeholder != self.item {
                tree.detach(placeholder);
            }
        }
    }

    /// Runs once per session: `out` for the hovered container, then `dragend`.
    fn finish<T: DragTree<Node = N>>(&mut self, tree: &mut T, outcome: Outcome) {
        if self.is_finished() {
            return;
        }
        self.phase = Phase::Finished(outcome);
        log::debug!("drag finished: {:?} ({:?})", self.item, outcome);
        tree.set_in_transit(self.item, false);
        self.detach_distinct_placeholder(tree);
        if let Some(visual) = self.visual.take() {
            if visual != self.item && visual != self.context.item {
                tree.detach(visual);
            }
            if let Some(container) = self.hover.take() {
                self.emit(DragEvent::Out {
                    item: self.item,
                    container,
                    source: self.context.source,
                });
            }
        }
        self.emit(DragEvent::DragEnd { item: self.item });
        self.emitter.complete();
    }

    fn is_initial(&self, container: N, sibling: Option<N>) -> bool {
        self.kind == SessionKind::Move && self.context.is_initial(container, sibling)
    }

    /// Nodes that mark the item's own position in the tree.
    fn markers(&self) -> SmallVec<[N; 2]> {
        let mut markers = SmallVec::new();
        markers.push(self.item);
        if let Some(placeholder) = self.placeholder {
            if placeholder != self.item {
                markers.push(placeholder);
            }
        }
        markers
    }

    fn emit(&mut self, event: DragEvent<N>) {
        if self.emitter.is_completed() {
            return;
        }
        self.emitter.emit(&event);
        self.outbox.push(event);
    }
}
