// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized pointer input and the per-session pointer tracker.
//!
//! The engine does not listen to platform events. Hosts translate their
//! mouse/touch/pen streams into [`PointerDown`] and [`PointerMove`] records and
//! feed them to a [`DragController`](crate::DragController).
//!
//! [`PointerTrack`] computes the cumulative offset used to position the
//! floating visual:
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_drag_drop::PointerTrack;
//!
//! let mut track = PointerTrack::default();
//! track.start(Point::new(10.0, 20.0));
//! assert_eq!(track.update(Point::new(15.0, 25.0)), Vec2::new(5.0, 5.0));
//! assert_eq!(track.total_offset(), Vec2::new(5.0, 5.0));
//! ```

use kurbo::{Point, Vec2};

/// Which button went down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, a touch contact, or a pen tip.
    #[default]
    Primary,
    /// Right mouse button or pen barrel button.
    Secondary,
    /// Middle mouse button (wheel click).
    Auxiliary,
    /// Any other button.
    Other(u8),
}

bitflags::bitflags! {
    /// Keyboard modifiers held while a pointer button went down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Control key.
        const CTRL  = 0b0000_0010;
        /// Alt / Option key.
        const ALT   = 0b0000_0100;
        /// Meta / Command / Windows key.
        const META  = 0b0000_1000;
    }
}

/// A pointer press on some node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerDown<N> {
    /// Node under the pointer (the "handle" passed to `moves` and `invalid`).
    pub target: N,
    /// Pointer position.
    pub position: Point,
    /// Button that went down.
    pub button: PointerButton,
    /// Modifiers held at press time.
    pub modifiers: Modifiers,
}

impl<N> PointerDown<N> {
    /// Primary-button press without modifiers.
    pub fn primary(target: N, position: Point) -> Self {
        Self {
            target,
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
        }
    }

    /// Returns `true` if this press may start a drag.
    ///
    /// Only the primary button grabs, and never with Ctrl or Meta held
    /// (those are reserved for selection and link gestures).
    pub fn can_grab(&self) -> bool {
        self.button == PointerButton::Primary
            && !self.modifiers.intersects(Modifiers::CTRL | Modifiers::META)
    }
}

/// A pointer movement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerMove {
    /// Pointer position.
    pub position: Point,
    /// Whether the primary button is still held.
    ///
    /// Some platforms swallow the release inside text inputs; a move without
    /// the button held is treated as an implicit release.
    pub primary_held: bool,
}

impl PointerMove {
    /// A move with the primary button held.
    pub fn held(position: Point) -> Self {
        Self {
            position,
            primary_held: true,
        }
    }
}

/// Tracks pointer positions over one drag gesture.
#[derive(Debug, Clone, Default, Copy)]
pub struct PointerTrack {
    /// Position where tracking began.
    pub start_pos: Option<Point>,
    /// Last recorded position.
    pub last_pos: Option<Point>,
}

impl PointerTrack {
    /// Begin tracking at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Record `pos` and return the delta since the previous position.
    ///
    /// If tracking had not begun (a programmatic start has no press
    /// position), `pos` becomes the start and the delta is zero.
    pub fn update(&mut self, pos: Point) -> Vec2 {
        let Some(last) = self.last_pos else {
            self.start(pos);
            return Vec2::ZERO;
        };
        self.last_pos = Some(pos);
        pos - last
    }

    /// Offset between the start and the last recorded position.
    pub fn total_offset(&self) -> Vec2 {
        match (self.start_pos, self.last_pos) {
            (Some(start), Some(last)) => last - start,
            _ => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_track_has_no_offset() {
        let track = PointerTrack::default();
        assert_eq!(track.start_pos, None);
        assert_eq!(track.total_offset(), Vec2::ZERO);
    }

    #[test]
    fn update_without_start_begins_tracking() {
        let mut track = PointerTrack::default();
        assert_eq!(track.update(Point::new(4.0, 4.0)), Vec2::ZERO);
        assert_eq!(track.start_pos, Some(Point::new(4.0, 4.0)));
        assert_eq!(track.update(Point::new(6.0, 1.0)), Vec2::new(2.0, -3.0));
        assert_eq!(track.total_offset(), Vec2::new(2.0, -3.0));
    }

    #[test]
    fn incremental_deltas_sum_to_total() {
        let mut track = PointerTrack::default();
        track.start(Point::ZERO);
        let d1 = track.update(Point::new(5.0, 3.0));
        let d2 = track.update(Point::new(8.0, 7.0));
        let d3 = track.update(Point::new(10.0, 10.0));
        assert_eq!(d1 + d2 + d3, track.total_offset());
        assert_eq!(track.total_offset(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn only_plain_primary_presses_grab() {
        let down = PointerDown::primary(1_u32, Point::ZERO);
        assert!(down.can_grab());
        assert!(
            PointerDown {
                modifiers: Modifiers::SHIFT,
                ..down
            }
            .can_grab()
        );
        assert!(
            !PointerDown {
                modifiers: Modifiers::CTRL,
                ..down
            }
            .can_grab()
        );
        assert!(
            !PointerDown {
                modifiers: Modifiers::META,
                ..down
            }
            .can_grab()
        );
        assert!(
            !PointerDown {
                button: PointerButton::Secondary,
                ..down
            }
            .can_grab()
        );
        assert!(
            !PointerDown {
                button: PointerButton::Auxiliary,
                ..down
            }
            .can_grab()
        );
    }
}
