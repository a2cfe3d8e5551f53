//! Geometry solver ([`solve`]) and redraw engine ([`redraw`]).
//!
//! Both are whole-reel: `solve` recomputes placement for every live tablet
//! on every call (no incremental diffing), and `redraw` repaints every
//! on-screen tablet every time it runs. There is no partial-redraw path —
//! that architecture belongs to a different kind of widget than this one.

use anyhow::Result;
use bitflags::bitflags;
use panelreel_model::{ClipDirection, DrawArea, Focus, Ring, ScrollMode, TabletCanvas, TabletId};
use panelreel_term::style::Style;
use panelreel_term::surface::{DrawingSurface, SurfaceId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Scopes a tablet's draw callback to its own content area within a
/// [`DrawingSurface`] region (spec §4.4): `write_line`'s `(row, col)` are
/// relative to the tablet's own top-left corner, translated here by the
/// border inset before reaching the real surface.
struct SurfaceCanvas<'a> {
    surface: &'a mut dyn DrawingSurface,
    id: SurfaceId,
    row_offset: u16,
    col_offset: u16,
    max_lines: u16,
    max_cols: u16,
    style: Style,
}

impl TabletCanvas for SurfaceCanvas<'_> {
    fn write_line(&mut self, row: u16, col: u16, text: &str) {
        if row >= self.max_lines || col >= self.max_cols {
            return;
        }
        self.surface
            .write_line(self.id, self.row_offset + row, self.col_offset + col, text, self.style);
    }

    fn max_lines(&self) -> u16 {
        self.max_lines
    }

    fn max_cols(&self) -> u16 {
        self.max_cols
    }
}

/// A [`TabletCanvas`] that throws away everything written to it. Used only
/// for the one-time measurement invocation that discovers a newly added
/// tablet's desired height before its first real draw (see `redraw`'s
/// measurement pre-pass) — its output never reaches the screen.
struct DiscardCanvas {
    max_lines: u16,
    max_cols: u16,
}

impl TabletCanvas for DiscardCanvas {
    fn write_line(&mut self, _row: u16, _col: u16, _text: &str) {}

    fn max_lines(&self) -> u16 {
        self.max_lines
    }

    fn max_cols(&self) -> u16 {
        self.max_cols
    }
}

/// A tablet's planned on-screen placement, produced by [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOrder {
    pub tablet: TabletId,
    pub rect: panelreel_model::Rect,
    pub clip: ClipDirection,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BorderMask: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
    }
}

/// A set bit in a bordermask inhibits drawing that edge (spec §3), so the
/// edges actually drawn are the complement of the mask.
fn drawn_edges(mask: BorderMask) -> panelreel_term::surface::BorderEdges {
    panelreel_term::surface::BorderEdges {
        top: !mask.contains(BorderMask::TOP),
        right: !mask.contains(BorderMask::RIGHT),
        bottom: !mask.contains(BorderMask::BOTTOM),
        left: !mask.contains(BorderMask::LEFT),
    }
}

/// The redraw engine's static configuration, carried in from a reel's
/// `ReelOptions` (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct RedrawOptions {
    pub toff: u16,
    pub roff: u16,
    pub boff: u16,
    pub loff: u16,
    pub bordermask: BorderMask,
    pub tabletmask: BorderMask,
    pub border_style: Style,
    pub tablet_style: Style,
    pub focused_style: Style,
    pub min_supported_cols: u16,
    pub min_supported_rows: u16,
    /// 0 means unlimited (spec §3). When non-zero and smaller than the
    /// offset-reserved interior, the interior is shrunk to this maximum and
    /// top-left anchored within the offsets (spec §9 Open Question 3).
    pub max_supported_cols: u16,
    pub max_supported_rows: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// The host window is smaller than `min_supported_{cols,rows}`; a
    /// stand-in message was drawn instead of any tablet content.
    TooSmall,
    /// No tablets are present; only the outer border (if any) was drawn.
    Empty,
    /// Tablets were drawn, identified in draw order (top to bottom).
    Drawn(Vec<TabletId>),
}

/// Plan on-screen placement for every tablet that should be visible given
/// `interior` (the reel's content area, after border/offset reservation),
/// the currently focused tablet, and the ring's scroll mode.
///
/// `focus_top_hint` is the focused region's top row remembered from the
/// previous redraw (spec §4.3 step 2: "anchored to the interior top on the
/// first render, and to its remembered top on subsequent renders when
/// possible"); pass `None` for a reel's first redraw. Returns the draw
/// orders together with the top row the caller should remember and pass
/// back in on the next call.
///
/// Pure: takes no drawing surface and performs no I/O. Desired heights come
/// from [`Ring::desired_lines`], not from invoking a tablet's draw callback
/// (the callback itself runs later, in [`redraw`], against the rect this
/// function computed). `redraw` measures any tablet `solve` would otherwise
/// find unmeasured before calling this function, so the `unwrap_or` fallback
/// below is only ever exercised by callers that invoke `solve` directly.
pub fn solve<T>(
    interior: panelreel_model::Rect,
    focus: TabletId,
    ring: &Ring<T>,
    mode: ScrollMode,
    focus_top_hint: Option<u16>,
) -> (Vec<DrawOrder>, u16) {
    if interior.is_empty() || ring.is_empty() {
        return (Vec::new(), interior.top());
    }

    // A tablet that has never been drawn has no measured desired height yet;
    // assume it wants the interior's full height so its first layout pass
    // gives it a generous region instead of guessing low. The real figure is
    // fed back into the ring once `redraw` actually invokes its callback.
    let focus_desired = ring.desired_lines(focus).unwrap_or(interior.height).max(1);
    let focus_height = focus_desired.min(interior.height);
    let focus_clip = if focus_height < focus_desired {
        ClipDirection::Bottom
    } else {
        ClipDirection::None
    };

    // Anchor to the remembered position, sliding just enough to keep the
    // focused region inside the interior (spec §4.3 step 2).
    let mut focus_top = focus_top_hint.unwrap_or_else(|| interior.top());
    if focus_top + focus_height > interior.bottom() + 1 {
        focus_top = (interior.bottom() + 1).saturating_sub(focus_height);
    }
    if focus_top < interior.top() {
        focus_top = interior.top();
    }

    let mut orders = vec![DrawOrder {
        tablet: focus,
        rect: panelreel_model::Rect::new(interior.x, focus_top, interior.width, focus_height),
        clip: focus_clip,
    }];

    // Non-circular rings place each distinct tablet at most once per
    // direction; circular rings may wrap around to absorb a remaining gap,
    // bounded at two full passes so a reel with very few, very short
    // tablets in a tall host can't loop forever re-placing the same handful.
    let max_total = if mode.circular {
        ring.len().saturating_mul(2)
    } else {
        ring.len()
    };
    let mut placed = 1usize;

    // Fill downward (step 3), tracking whether we stopped because the ring
    // ran out (vs. ran out of vertical space) — step 6 needs to tell those
    // apart to decide which direction to slide. Non-circular mode stops at
    // the ring's tail (its physical bottom); circular mode wraps freely,
    // stopping only after one full revolution back to the focus.
    let mut down_cursor = focus;
    let mut bottom_edge = focus_top + focus_height;
    let mut bottom_ring_exhausted = false;
    while bottom_edge <= interior.bottom() && placed < max_total {
        if !mode.circular && ring.is_tail(down_cursor) {
            bottom_ring_exhausted = true;
            break;
        }
        let candidate = ring.next(down_cursor);
        if mode.circular && candidate == focus {
            bottom_ring_exhausted = true;
            break;
        }
        let avail = interior.bottom() + 1 - bottom_edge;
        let desired = ring.desired_lines(candidate).unwrap_or(avail).max(1);
        let height = desired.min(avail);
        let clip = if height < desired {
            ClipDirection::Bottom
        } else {
            ClipDirection::None
        };
        orders.push(DrawOrder {
            tablet: candidate,
            rect: panelreel_model::Rect::new(interior.x, bottom_edge, interior.width, height),
            clip,
        });
        bottom_edge += height;
        down_cursor = candidate;
        placed += 1;
    }
    if placed >= max_total {
        bottom_ring_exhausted = true;
    }

    // Fill upward (step 4), symmetrically.
    let mut up_cursor = focus;
    let mut top_edge = focus_top;
    let mut top_ring_exhausted = false;
    while top_edge > interior.top() && placed < max_total {
        if !mode.circular && ring.is_head(up_cursor) {
            top_ring_exhausted = true;
            break;
        }
        let candidate = ring.prev(up_cursor);
        if mode.circular && candidate == focus {
            top_ring_exhausted = true;
            break;
        }
        let avail = top_edge - interior.top();
        let desired = ring.desired_lines(candidate).unwrap_or(avail).max(1);
        let height = desired.min(avail);
        let clip = if height < desired {
            ClipDirection::Top
        } else {
            ClipDirection::None
        };
        let y = top_edge - height;
        orders.push(DrawOrder {
            tablet: candidate,
            rect: panelreel_model::Rect::new(interior.x, y, interior.width, height),
            clip,
        });
        top_edge = y;
        up_cursor = candidate;
        placed += 1;
    }
    if placed >= max_total {
        top_ring_exhausted = true;
    }

    // Step 6: in finite-scroll mode, a one-sided gap (one direction ran out
    // of ring while the other ran out of space first) is absorbed by
    // sliding the whole arrangement toward the exhausted side and resuming
    // the other walk into the freed space, so no interior rows go unused
    // while tablets remain to fill them.
    if !mode.infinitescroll {
        let top_slack = top_edge.saturating_sub(interior.top());
        let bottom_slack = (interior.bottom() + 1).saturating_sub(bottom_edge);

        if bottom_slack > 0 && !top_ring_exhausted {
            for order in &mut orders {
                order.rect.y += bottom_slack;
            }
            focus_top += bottom_slack;
            top_edge += bottom_slack;
            while top_edge > interior.top() && placed < max_total {
                if ring.is_head(up_cursor) {
                    break;
                }
                let candidate = ring.prev(up_cursor);
                let avail = top_edge - interior.top();
                let desired = ring.desired_lines(candidate).unwrap_or(avail).max(1);
                let height = desired.min(avail);
                let clip = if height < desired {
                    ClipDirection::Top
                } else {
                    ClipDirection::None
                };
                let y = top_edge - height;
                orders.push(DrawOrder {
                    tablet: candidate,
                    rect: panelreel_model::Rect::new(interior.x, y, interior.width, height),
                    clip,
                });
                top_edge = y;
                up_cursor = candidate;
                placed += 1;
            }
        } else if top_slack > 0 && !bottom_ring_exhausted {
            for order in &mut orders {
                order.rect.y -= top_slack;
            }
            focus_top -= top_slack;
            bottom_edge -= top_slack;
            while bottom_edge <= interior.bottom() && placed < max_total {
                if ring.is_tail(down_cursor) {
                    break;
                }
                let candidate = ring.next(down_cursor);
                let avail = interior.bottom() + 1 - bottom_edge;
                let desired = ring.desired_lines(candidate).unwrap_or(avail).max(1);
                let height = desired.min(avail);
                let clip = if height < desired {
                    ClipDirection::Bottom
                } else {
                    ClipDirection::None
                };
                orders.push(DrawOrder {
                    tablet: candidate,
                    rect: panelreel_model::Rect::new(interior.x, bottom_edge, interior.width, height),
                    clip,
                });
                bottom_edge += height;
                down_cursor = candidate;
                placed += 1;
            }
        }
    }

    orders.sort_by_key(|o| o.rect.y);
    (orders, focus_top)
}

fn summary_header(id: TabletId, desired: u16, begy: u16, maxy: u16) -> String {
    let plural = if desired == 1 { "" } else { "s" };
    format!("[#{} {} line{} {}/{}]", id.slot(), desired, plural, begy, maxy)
}

fn header_row(clip: ClipDirection, ll: u16, height: u16) -> u16 {
    match clip {
        ClipDirection::Top if ll == height => ll.saturating_sub(1),
        ClipDirection::Top => ll,
        _ => 0,
    }
}

const TOO_SMALL_NOTICE: &str = "terminal too small";

/// Repaint the whole reel: every visible tablet's border, content, and
/// summary header, then hide any previously-visible tablet that fell out of
/// the current placement.
#[allow(clippy::too_many_arguments)]
pub fn redraw<T>(
    surface: &mut dyn DrawingSurface,
    host: panelreel_model::Rect,
    ring: &mut Ring<T>,
    focus: Focus,
    mode: ScrollMode,
    options: &RedrawOptions,
    surfaces: &mut HashMap<TabletId, SurfaceId>,
    border_surface: &mut Option<SurfaceId>,
    notice_surface: &mut Option<SurfaceId>,
    tablet_tops: &mut HashMap<TabletId, u16>,
) -> Result<RedrawOutcome> {
    if host.width < options.min_supported_cols || host.height < options.min_supported_rows {
        debug!(width = host.width, height = host.height, "reel too small to draw");
        for (_, id) in surfaces.drain() {
            surface.hide(id);
        }
        if let Some(id) = *border_surface {
            surface.hide(id);
        }
        let id = match *notice_surface {
            Some(id) => {
                surface.move_to(id, host.x, host.y);
                surface.resize(id, host.width.max(1), host.height.max(1));
                surface.show(id);
                id
            }
            None => {
                let id = surface.create(host.x, host.y, host.width.max(1), host.height.max(1));
                *notice_surface = Some(id);
                id
            }
        };
        surface.clear(id);
        surface.write_line(id, 0, 0, TOO_SMALL_NOTICE, options.border_style);
        surface.refresh()?;
        return Ok(RedrawOutcome::TooSmall);
    }
    if let Some(id) = *notice_surface {
        surface.hide(id);
    }

    let available_width = host.width.saturating_sub(options.loff + options.roff);
    let available_height = host.height.saturating_sub(options.toff + options.boff);
    let max_width = if options.max_supported_cols == 0 {
        available_width
    } else {
        options.max_supported_cols
    };
    let max_height = if options.max_supported_rows == 0 {
        available_height
    } else {
        options.max_supported_rows
    };
    // The offset- and maxima-bounded rect the outer border (if any) is drawn
    // around; top-left anchored within the offsets (spec §9 Open Question 3).
    let bordered_rect = panelreel_model::Rect::new(
        host.x + options.loff,
        host.y + options.toff,
        available_width.min(max_width),
        available_height.min(max_height),
    );

    let outer_edges = drawn_edges(options.bordermask);
    if bordered_rect.width >= 2 && bordered_rect.height >= 2 && outer_edges.any() {
        let id = match *border_surface {
            Some(id) => {
                surface.move_to(id, bordered_rect.x, bordered_rect.y);
                surface.resize(id, bordered_rect.width, bordered_rect.height);
                surface.show(id);
                id
            }
            None => {
                let id = surface.create(bordered_rect.x, bordered_rect.y, bordered_rect.width, bordered_rect.height);
                *border_surface = Some(id);
                id
            }
        };
        surface.border(id, outer_edges, options.border_style);
    } else if let Some(id) = *border_surface {
        surface.hide(id);
    }

    let interior = panelreel_model::Rect::new(
        bordered_rect.x + outer_edges.left as u16,
        bordered_rect.y + outer_edges.top as u16,
        bordered_rect
            .width
            .saturating_sub(outer_edges.left as u16 + outer_edges.right as u16),
        bordered_rect
            .height
            .saturating_sub(outer_edges.top as u16 + outer_edges.bottom as u16),
    );

    let Focus::On(focus_id) = focus else {
        for (_, surface_id) in surfaces.drain() {
            surface.hide(surface_id);
        }
        tablet_tops.clear();
        surface.refresh()?;
        return Ok(RedrawOutcome::Empty);
    };

    // `solve` needs every live tablet's desired height, but a tablet only
    // learns its own once its draw callback has actually run. A tablet added
    // since the last redraw has no such measurement yet, so take one now,
    // against a trial region sized to the whole interior (spec §4.3 step 2's
    // "given unlimited space") and a canvas that discards what it writes —
    // this is not the tablet's real on-screen paint, just enough to learn
    // its line count before `solve` has to place it. A tablet that ends up
    // placed is then drawn again for real below; one that never does (too
    // far from focus to ever be visible) only ever pays this one measurement.
    if let Some(start) = ring.any() {
        let unmeasured: Vec<TabletId> = ring
            .walk_forward(start)
            .filter(|&id| ring.desired_lines(id).is_none())
            .collect();
        for id in unmeasured {
            let trial = DrawArea::new(interior, ClipDirection::None, id == focus_id);
            let mut discard = DiscardCanvas {
                max_lines: interior.height,
                max_cols: interior.width,
            };
            let ll = ring.draw(id, trial, &mut discard);
            ring.set_desired_lines(id, ll);
        }
    }

    // Remembered per-tablet, not a single scalar: when focus moves to a
    // tablet that was on screen last redraw, anchoring to its own prior top
    // (rather than the old focus's) lets the view slide and bring its
    // neighbours into place above/below it (spec §4.3 step 2, §8 scenario 2).
    // A tablet that has never been drawn has no entry and falls back to
    // anchoring at the interior top, same as a reel's very first redraw.
    let hint = tablet_tops.get(&focus_id).copied();
    let (orders, _) = solve(interior, focus_id, ring, mode, hint);
    let mut drawn = Vec::with_capacity(orders.len());
    let mut still_visible: HashMap<TabletId, SurfaceId> = HashMap::with_capacity(orders.len());

    for order in &orders {
        let surface_id = match surfaces.remove(&order.tablet) {
            Some(id) => {
                surface.move_to(id, order.rect.x, order.rect.y);
                surface.resize(id, order.rect.width, order.rect.height);
                surface.show(id);
                id
            }
            None => surface.create(order.rect.x, order.rect.y, order.rect.width, order.rect.height),
        };

        let focused = order.tablet == focus_id;
        let border_style = if focused {
            options.focused_style
        } else {
            options.tablet_style
        };
        let tablet_edges = drawn_edges(options.tabletmask);
        // Clear before bordering (spec §4.6 step 5): `clear` wipes every row
        // of the region including its first/last rows, so a border drawn
        // beforehand would be erased once the surface's queued commands run
        // in push order on `refresh`.
        surface.clear(surface_id);
        if order.rect.width >= 2 && order.rect.height >= 2 && tablet_edges.any() {
            surface.border(surface_id, tablet_edges, border_style);
        }

        let content_rect = panelreel_model::Rect::new(
            order.rect.x + tablet_edges.left as u16,
            order.rect.y + tablet_edges.top as u16,
            order
                .rect
                .width
                .saturating_sub(tablet_edges.left as u16 + tablet_edges.right as u16),
            order
                .rect
                .height
                .saturating_sub(tablet_edges.top as u16 + tablet_edges.bottom as u16),
        );
        let area = DrawArea::new(content_rect, order.clip, focused);
        let ll = {
            let mut canvas = SurfaceCanvas {
                surface: &mut *surface,
                id: surface_id,
                row_offset: tablet_edges.top as u16,
                col_offset: tablet_edges.left as u16,
                max_lines: content_rect.height,
                max_cols: content_rect.width,
                style: border_style,
            };
            ring.draw(order.tablet, area, &mut canvas)
        };
        // Feed the callback's real line count back into the ring so the next
        // `solve` (and this header) see the tablet's true desired height
        // rather than a caller-supplied or stale guess (spec Glossary:
        // desired height is "as reported by its callback"). When clipped,
        // `ll` is only a lower bound — the true figure surfaces once the
        // tablet gets enough room to render unclipped.
        ring.set_desired_lines(order.tablet, ll);
        let header_text = summary_header(order.tablet, ll.max(1), content_rect.y, interior.bottom());
        let row = header_row(order.clip, ll, content_rect.height) + tablet_edges.top as u16;
        surface.write_line(surface_id, row, tablet_edges.left as u16, &header_text, border_style);

        trace!(tablet = order.tablet.slot(), row, ll, "drew tablet");
        tablet_tops.insert(order.tablet, order.rect.y);
        still_visible.insert(order.tablet, surface_id);
        drawn.push(order.tablet);
    }

    for (_, leftover) in surfaces.drain() {
        surface.hide(leftover);
    }
    *surfaces = still_visible;

    surface.refresh()?;
    Ok(RedrawOutcome::Drawn(drawn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelreel_model::Rect;
    use pretty_assertions::assert_eq;

    fn draw_n(n: u16) -> Box<dyn FnMut(&mut i32, DrawArea, &mut dyn TabletCanvas) -> u16 + Send> {
        Box::new(move |_: &mut i32, _: DrawArea, _: &mut dyn TabletCanvas| n)
    }

    /// Insert a tablet whose desired height is already known, as if it had
    /// already been drawn once with that result — `solve` is pure and never
    /// invokes callbacks itself, so these unit tests seed the ring's cached
    /// desired height directly rather than exercising a real draw.
    fn insert_measured(ring: &mut Ring<i32>, after: Option<TabletId>, h: u16) -> TabletId {
        let id = ring.insert_after(after, 0, draw_n(h));
        ring.set_desired_lines(id, h);
        id
    }

    #[test]
    fn solve_single_tablet_fills_available_height_when_shorter() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 3);
        let interior = Rect::new(0, 0, 40, 10);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, _) = solve(interior, a, &ring, mode, None);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].rect.height, 3);
        assert_eq!(orders[0].clip, ClipDirection::None);
    }

    #[test]
    fn solve_anchors_focus_to_interior_top_on_first_render() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 3);
        let interior = Rect::new(0, 0, 40, 10);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, new_top) = solve(interior, a, &ring, mode, None);
        assert_eq!(orders[0].rect.y, interior.top());
        assert_eq!(new_top, interior.top());
    }

    #[test]
    fn solve_remembers_focus_top_across_calls() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 2);
        let b = insert_measured(&mut ring, Some(a), 2);
        let interior = Rect::new(0, 0, 40, 9);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (_, first_top) = solve(interior, a, &ring, mode, None);
        // A hint in the middle of the interior should be preserved as-is
        // when it still fits, rather than re-anchored to the top.
        let (orders, second_top) = solve(interior, b, &ring, mode, Some(first_top + 3));
        assert_eq!(second_top, first_top + 3);
        let b_order = orders.iter().find(|o| o.tablet == b).unwrap();
        assert_eq!(b_order.rect.y, first_top + 3);
    }

    #[test]
    fn solve_slides_focus_hint_back_inside_interior() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 4);
        let interior = Rect::new(0, 0, 40, 10);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        // A hint that would push the focus past the interior bottom slides
        // back up just enough to fit.
        let (orders, new_top) = solve(interior, a, &ring, mode, Some(8));
        assert_eq!(orders[0].rect.y, 6);
        assert_eq!(new_top, 6);
    }

    #[test]
    fn solve_clips_focus_when_desired_exceeds_interior() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 50);
        let interior = Rect::new(0, 0, 40, 10);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, _) = solve(interior, a, &ring, mode, None);
        assert_eq!(orders[0].rect.height, 10);
        assert_eq!(orders[0].clip, ClipDirection::Bottom);
    }

    #[test]
    fn solve_places_neighbours_above_and_below_focus() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 2);
        let b = insert_measured(&mut ring, Some(a), 2);
        let c = insert_measured(&mut ring, Some(b), 2);
        let interior = Rect::new(0, 0, 40, 9);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, _) = solve(interior, b, &ring, mode, None);
        let tablets: Vec<_> = orders.iter().map(|o| o.tablet).collect();
        assert!(tablets.contains(&a));
        assert!(tablets.contains(&b));
        assert!(tablets.contains(&c));
    }

    #[test]
    fn solve_non_circular_does_not_repeat_the_sole_tablet() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 2);
        let interior = Rect::new(0, 0, 40, 20);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, _) = solve(interior, a, &ring, mode, None);
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn solve_absorbs_bottom_gap_by_sliding_down_when_more_tablets_remain_above() {
        // Five tablets of height 2 each (10 rows total) in an 8-row interior,
        // focused on the last one: the downward walk exhausts the ring
        // immediately (nothing below the focus), leaving slack at the
        // bottom, while tablets remain above that the initial upward walk
        // couldn't fit. Step 6 slides the block down so the focus's region
        // touches the interior bottom and the freed top space pulls in one
        // more neighbour instead of leaving 2 rows of dead space below.
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 2);
        let b = insert_measured(&mut ring, Some(a), 2);
        let c = insert_measured(&mut ring, Some(b), 2);
        let d = insert_measured(&mut ring, Some(c), 2);
        let e = insert_measured(&mut ring, Some(d), 2);
        let interior = Rect::new(0, 0, 40, 8);
        let mode = ScrollMode {
            infinitescroll: false,
            circular: false,
        };
        let (orders, _) = solve(interior, e, &ring, mode, None);
        let e_order = orders.iter().find(|o| o.tablet == e).unwrap();
        assert_eq!(e_order.rect.y + e_order.rect.height, interior.bottom() + 1);
        let tablets: Vec<_> = orders.iter().map(|o| o.tablet).collect();
        assert!(tablets.contains(&d));
        assert!(tablets.contains(&c));
    }

    #[test]
    fn header_row_uses_zero_when_not_clipped_at_top() {
        assert_eq!(header_row(ClipDirection::None, 4, 8), 0);
        assert_eq!(header_row(ClipDirection::Bottom, 4, 8), 0);
    }

    #[test]
    fn header_row_uses_last_row_when_top_clipped_and_full() {
        assert_eq!(header_row(ClipDirection::Top, 8, 8), 7);
    }

    #[test]
    fn header_row_uses_ll_when_top_clipped_but_not_full() {
        assert_eq!(header_row(ClipDirection::Top, 5, 8), 5);
    }

    #[test]
    fn summary_header_pluralizes_single_line() {
        let mut ring: Ring<i32> = Ring::new();
        let a = insert_measured(&mut ring, None, 1);
        let text = summary_header(a, 1, 0, 9);
        assert!(text.ends_with("1 line 0/9]"));
    }
}
