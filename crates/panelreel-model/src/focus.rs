//! Focus / navigation state machine.
//!
//! A reel's focus is either `Empty` (no tablets) or `On(TabletId)`. `next`
//! and `prev` walk the ring relative to the focused tablet according to the
//! reel's `infinitescroll`/`circular` configuration (spec §4.5):
//!
//! * Neither flag: advancing past the last tablet (or before the first) is a
//!   no-op — focus stays put and the caller is told nothing moved.
//! * `infinitescroll` only: advancing past either end wraps focus to the
//!   opposite end, but the on-screen geometry does not wrap (the solver is
//!   still responsible for clipping).
//! * `circular` (implies `infinitescroll`): same wraparound, and the
//!   geometry solver additionally treats the ring as visually continuous.
//!
//! This module only owns the focus *pointer*; ring topology lives in
//! [`crate::ring::Ring`].

use crate::ring::{Ring, TabletId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Empty,
    On(TabletId),
}

impl Focus {
    pub fn tablet(&self) -> Option<TabletId> {
        match self {
            Focus::Empty => None,
            Focus::On(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Focus::Empty)
    }
}

/// Whether advancing focus past an end of the ring wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMode {
    pub infinitescroll: bool,
    pub circular: bool,
}

impl ScrollMode {
    pub fn wraps(&self) -> bool {
        self.infinitescroll || self.circular
    }
}

/// Outcome of a focus-moving operation, distinguishing "moved" from
/// "clamped at an edge" without using an error type (spec §8: clamped moves
/// are not errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    Moved(TabletId),
    Unchanged,
}

/// Advance focus to the next tablet in ring order. Stops at the ring's tail
/// (spec line 105: "non-circular mode stop at ring endpoints") unless `mode`
/// wraps.
pub fn next<T>(ring: &Ring<T>, focus: Focus, mode: ScrollMode) -> (Focus, FocusOutcome) {
    step(ring, focus, mode, Ring::next, Ring::is_tail)
}

/// Advance focus to the previous tablet in ring order. Stops at the ring's
/// head unless `mode` wraps.
pub fn prev<T>(ring: &Ring<T>, focus: Focus, mode: ScrollMode) -> (Focus, FocusOutcome) {
    step(ring, focus, mode, Ring::prev, Ring::is_head)
}

fn step<T>(
    ring: &Ring<T>,
    focus: Focus,
    mode: ScrollMode,
    advance: fn(&Ring<T>, TabletId) -> TabletId,
    at_boundary: fn(&Ring<T>, TabletId) -> bool,
) -> (Focus, FocusOutcome) {
    let Focus::On(current) = focus else {
        return (Focus::Empty, FocusOutcome::Unchanged);
    };
    if ring.len() <= 1 {
        return (focus, FocusOutcome::Unchanged);
    }
    if !mode.wraps() && at_boundary(ring, current) {
        return (focus, FocusOutcome::Unchanged);
    }
    let candidate = advance(ring, current);
    (Focus::On(candidate), FocusOutcome::Moved(candidate))
}

/// Resolve the new focus after a tablet is removed from the ring.
///
/// * Removing a non-focused tablet never changes focus.
/// * Removing the focused tablet moves focus to its successor, unless it was
///   the last tablet in the ring, in which case focus becomes `Empty`.
///
/// `successor` must be the removed tablet's `next` *before* removal (the
/// caller captures this prior to calling [`Ring::remove`], since the link is
/// gone afterward).
pub fn on_remove(
    focus: Focus,
    removed: TabletId,
    successor: TabletId,
    ring_len_after: usize,
) -> Focus {
    match focus {
        Focus::On(current) if current == removed => {
            if ring_len_after == 0 {
                Focus::Empty
            } else {
                Focus::On(successor)
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawArea, TabletCanvas};

    fn draw() -> Box<dyn FnMut(&mut i32, DrawArea, &mut dyn TabletCanvas) -> u16 + Send> {
        Box::new(|_: &mut i32, _: DrawArea, _: &mut dyn TabletCanvas| 0)
    }

    #[test]
    fn next_wraps_ring_adjacency_regardless_of_mode() {
        let mut ring: Ring<i32> = Ring::new();
        let a = ring.insert_after(None, 1, draw());
        let b = ring.insert_after(Some(a), 2, draw());
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (focus, outcome) = next(&ring, Focus::On(a), mode);
        assert_eq!(focus, Focus::On(b));
        assert_eq!(outcome, FocusOutcome::Moved(b));
    }

    #[test]
    fn single_tablet_ring_never_moves_focus() {
        let mut ring: Ring<i32> = Ring::new();
        let a = ring.insert_after(None, 1, draw());
        let mode = ScrollMode {
            infinitescroll: true,
            circular: true,
        };
        let (focus, outcome) = next(&ring, Focus::On(a), mode);
        assert_eq!(focus, Focus::On(a));
        assert_eq!(outcome, FocusOutcome::Unchanged);
    }

    #[test]
    fn non_wrapping_next_stops_at_tail() {
        let mut ring: Ring<i32> = Ring::new();
        let a = ring.insert_after(None, 1, draw());
        let b = ring.insert_after(Some(a), 2, draw());
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (focus, outcome) = next(&ring, Focus::On(b), mode);
        assert_eq!(focus, Focus::On(b));
        assert_eq!(outcome, FocusOutcome::Unchanged);
    }

    #[test]
    fn non_wrapping_prev_stops_at_head() {
        let mut ring: Ring<i32> = Ring::new();
        let a = ring.insert_after(None, 1, draw());
        let _b = ring.insert_after(Some(a), 2, draw());
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (focus, outcome) = prev(&ring, Focus::On(a), mode);
        assert_eq!(focus, Focus::On(a));
        assert_eq!(outcome, FocusOutcome::Unchanged);
    }

    #[test]
    fn infinitescroll_wraps_past_tail_to_head() {
        let mut ring: Ring<i32> = Ring::new();
        let a = ring.insert_after(None, 1, draw());
        let b = ring.insert_after(Some(a), 2, draw());
        let mode = ScrollMode {
            infinitescroll: true,
            circular: false,
        };
        let (focus, outcome) = next(&ring, Focus::On(b), mode);
        assert_eq!(focus, Focus::On(a));
        assert_eq!(outcome, FocusOutcome::Moved(a));
    }

    #[test]
    fn on_remove_moves_focus_to_successor() {
        let focus = Focus::On(dummy_id(0));
        let successor = dummy_id(1);
        let resolved = on_remove(focus, dummy_id(0), successor, 1);
        assert_eq!(resolved, Focus::On(successor));
    }

    #[test]
    fn on_remove_last_tablet_yields_empty() {
        let focus = Focus::On(dummy_id(0));
        let resolved = on_remove(focus, dummy_id(0), dummy_id(0), 0);
        assert_eq!(resolved, Focus::Empty);
    }

    #[test]
    fn on_remove_ignores_non_focused_removal() {
        let focus = Focus::On(dummy_id(0));
        let resolved = on_remove(focus, dummy_id(7), dummy_id(8), 3);
        assert_eq!(resolved, focus);
    }

    fn dummy_id(slot: u32) -> TabletId {
        let mut ring: Ring<i32> = Ring::new();
        let mut id = ring.insert_after(None, 0, draw());
        for _ in 0..slot {
            let next = ring.insert_after(Some(id), 0, draw());
            id = next;
        }
        id
    }
}
