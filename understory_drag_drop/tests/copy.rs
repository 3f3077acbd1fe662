// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Copy drags: the original stays put and a duplicate travels.

mod common;

use common::{Board, LEFT_EMPTY, OUTSIDE, RIGHT_EMPTY, channels, drain, record};
use kurbo::{Point, Rect};
use understory_drag_drop::{
    Channel, CloneKind, CopyMode, DragEvent, DragOptions, DragTree, MemoryTree, NodeFlags, NodeId,
};

fn copying() -> DragOptions<MemoryTree> {
    DragOptions::<MemoryTree>::default().with_copy(true)
}

/// The duplicate reported by the first `drag` event.
fn travelling(events: &[DragEvent<NodeId>]) -> NodeId {
    match events.first() {
        Some(DragEvent::Drag { item, .. }) => *item,
        other => panic!("expected a `drag` event first, got {other:?}"),
    }
}

#[test]
fn copy_lands_in_another_container() {
    let mut board = Board::new();
    let (a, b, c, left, right) = (board.a, board.b, board.c, board.left, board.right);
    let mut drake = board.controller(copying());
    let log = record(&mut drake);

    board.press(&mut drake, a);
    board.hover(&mut drake, RIGHT_EMPTY);
    assert_eq!(board.children(left), vec![a, b, c]);
    assert!(!board.tree.flags(a).contains(NodeFlags::IN_TRANSIT));
    board.release(&mut drake, RIGHT_EMPTY);

    let events = drain(&log);
    let dup = travelling(&events);
    assert_ne!(dup, a);
    assert_eq!(
        events,
        vec![
            DragEvent::Drag {
                item: dup,
                source: left
            },
            DragEvent::Cloned {
                visual: dup,
                original: a,
                kind: CloneKind::Copy
            },
            DragEvent::Over {
                item: dup,
                container: right,
                source: left
            },
            DragEvent::Shadow {
                placeholder: dup,
                container: right,
                source: left
            },
            DragEvent::Drop {
                item: dup,
                target: right,
                source: left,
                sibling: None
            },
            DragEvent::Out {
                item: dup,
                container: right,
                source: left
            },
            DragEvent::DragEnd { item: dup },
        ]
    );
    assert_eq!(board.children(left), vec![a, b, c]);
    assert_eq!(board.children(right), vec![dup]);
    assert_eq!(board.tree.shape(dup), board.tree.shape(a));
    assert!(!board.tree.flags(dup).contains(NodeFlags::IN_TRANSIT));
}

#[test]
fn copy_never_lands_in_its_source() {
    let mut board = Board::new();
    let (a, b, c, left) = (board.a, board.b, board.c, board.left);
    let mut drake = board.controller(copying());
    let log = record(&mut drake);

    board.press(&mut drake, a);
    board.hover(&mut drake, LEFT_EMPTY);
    board.hover(&mut drake, Point::new(50.0, 45.0));
    board.release(&mut drake, LEFT_EMPTY);

    let events = drain(&log);
    let dup = travelling(&events);
    assert_eq!(
        channels_of(&events),
        vec![
            Channel::Drag,
            Channel::Cloned,
            Channel::Cancel,
            Channel::DragEnd
        ]
    );
    assert_eq!(
        events[2],
        DragEvent::Cancel {
            item: dup,
            container: Some(left),
            source: left
        }
    );
    assert_eq!(board.children(left), vec![a, b, c]);
    assert_eq!(board.tree.parent(dup), None);
}

#[test]
fn copy_sort_source_allows_the_source_without_an_initial_placement() {
    let mut board = Board::new();
    let (a, b, c, left) = (board.a, board.b, board.c, board.left);
    let mut drake = board.controller(copying().with_copy_sort_source(true));
    let log = record(&mut drake);

    board.press(&mut drake, a);
    // Upper half of `a`: for a move this would be the origin.
    board.hover(&mut drake, Point::new(50.0, 10.0));
    board.release(&mut drake, Point::new(50.0, 10.0));

    let events = drain(&log);
    let dup = travelling(&events);
    assert!(events.contains(&DragEvent::Drop {
        item: dup,
        target: left,
        source: left,
        sibling: Some(a)
    }));
    assert_eq!(board.children(left), vec![dup, a, b, c]);
}

#[test]
fn removing_a_copy_reports_a_cancel_without_container() {
    let mut board = Board::new();
    let (a, b, c, left, right) = (board.a, board.b, board.c, board.left, board.right);
    let mut drake = board.controller(copying().with_remove_on_spill(true));
    let log = record(&mut drake);

    board.press(&mut drake, a);
    board.hover(&mut drake, RIGHT_EMPTY);
    let dup = travelling(&log.borrow());
    drain(&log);
    board.release(&mut drake, OUTSIDE);

    assert_eq!(
        drain(&log),
        vec![
            DragEvent::Out {
                item: dup,
                container: right,
                source: left
            },
            DragEvent::Cancel {
                item: dup,
                container: None,
                source: left
            },
            DragEvent::DragEnd { item: dup },
        ]
    );
    assert!(board.children(right).is_empty());
    assert_eq!(board.children(left), vec![a, b, c]);
}

#[test]
fn cancelling_a_copy_discards_it() {
    let mut board = Board::new();
    let (a, left, right) = (board.a, board.left, board.right);
    let mut drake = board.controller(copying());
    let log = record(&mut drake);

    board.press(&mut drake, a);
    board.hover(&mut drake, RIGHT_EMPTY);
    drake.cancel(&mut board.tree, false);

    let events = drain(&log);
    let dup = travelling(&events);
    assert!(events.contains(&DragEvent::Cancel {
        item: dup,
        container: Some(left),
        source: left
    }));
    assert!(!events.iter().any(|ev| ev.channel() == Channel::Drop));
    assert!(board.children(right).is_empty());
    assert_eq!(board.tree.parent(dup), None);
}

#[test]
fn copy_mode_predicate_decides_per_source() {
    let mut board = Board::new();
    let (a, left, right) = (board.a, board.left, board.right);
    let r = board.tree.append(right, "r", Rect::ZERO);
    board.layout();
    let mut drake = board.controller(
        DragOptions::<MemoryTree>::default()
            .with_copy(CopyMode::when(move |_, source| source == left)),
    );
    let log = record(&mut drake);

    assert!(drake.requires_copy(a, left));
    assert!(!drake.requires_copy(r, right));

    drake.start(&mut board.tree, a);
    assert_ne!(travelling(&log.borrow()), a);
    drake.cancel(&mut board.tree, false);
    drain(&log);

    drake.start(&mut board.tree, r);
    assert_eq!(travelling(&log.borrow()), r);
    assert_eq!(channels(&log), vec![Channel::Drag, Channel::Cloned]);
}

fn channels_of(events: &[DragEvent<NodeId>]) -> Vec<Channel> {
    events.iter().map(DragEvent::channel).collect()
}
