//! Public facade for panelreel: a vertically stacked, scrollable carousel of
//! variable-height content panels ("tablets") hosted inside a single drawing
//! surface.
//!
//! # Locking order
//!
//! `Reel<T>` holds one [`std::sync::Mutex`] guarding its ring, focus, and
//! surface bookkeeping. Every operation except [`Reel::touch`] takes this
//! lock. A tablet's own payload lock (if the payload owns one, e.g. for a
//! worker thread updating its content) is the payload owner's
//! responsibility and is acquired *inside* the draw callback — never by the
//! reel itself, and never while the reel lock is held by anyone other than
//! the thread currently running the callback. Concretely: always acquire
//! the reel lock before a payload lock, never the other way around, or a
//! worker thread blocked on its payload lock while `redraw` holds the reel
//! lock (which it must, to run the callback) can deadlock against another
//! thread trying to take the reel lock first.
//!
//! `touch` never takes the full reel lock; it only forwards to the
//! [`panelreel_notify::Notifier`], so a worker thread can always wake the
//! redraw loop even while the reel lock is held elsewhere.

mod error;
mod options;

pub use error::PanelReelError;
pub use options::ReelOptions;
pub use panelreel_model::{ClipDirection, DrawArea, Focus, FocusOutcome, Rect, TabletCanvas, TabletId};
pub use panelreel_render::RedrawOutcome;

use panelreel_model::{Ring, ScrollMode};
use panelreel_notify::{ChannelNotifier, Notifier};
use panelreel_render::RedrawOptions;
use panelreel_term::surface::{DrawingSurface, SurfaceId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// Outcome of [`Reel::move_by`]: either the host window actually moved, or
/// the requested offset was clamped to the screen bounds (spec §5's
/// "snap back" behaviour, not treated as an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Clipped,
}

struct ReelState<T> {
    host: Rect,
    ring: Ring<T>,
    focus: Focus,
    surfaces: HashMap<TabletId, SurfaceId>,
    border_surface: Option<SurfaceId>,
    notice_surface: Option<SurfaceId>,
    /// Last on-screen top row per tablet that was actually drawn, keyed by
    /// tablet so moving focus onto one that was already visible preserves
    /// its position instead of re-anchoring to the interior top.
    tablet_tops: HashMap<TabletId, u16>,
}

/// A reel: the public type applications create, populate with tablets, and
/// redraw.
pub struct Reel<T> {
    state: Mutex<ReelState<T>>,
    surface: Mutex<Box<dyn DrawingSurface + Send>>,
    notifier: Arc<dyn Notifier>,
    options: ReelOptions,
    mode: ScrollMode,
}

impl<T> Reel<T> {
    /// Construct a reel hosted at `host` within `surface`, validating
    /// `options` eagerly rather than deferring invalid configuration to the
    /// first redraw.
    pub fn create(
        host: Rect,
        options: ReelOptions,
        surface: Box<dyn DrawingSurface + Send>,
    ) -> Result<Self, PanelReelError> {
        options
            .validate()
            .map_err(PanelReelError::InvalidConfig)?;
        let mode = ScrollMode {
            infinitescroll: options.infinitescroll,
            circular: options.circular,
        };
        Ok(Self {
            state: Mutex::new(ReelState {
                host,
                ring: Ring::new(),
                focus: Focus::Empty,
                surfaces: HashMap::new(),
                border_surface: None,
                notice_surface: None,
                tablet_tops: HashMap::new(),
            }),
            surface: Mutex::new(surface),
            notifier: Arc::new(ChannelNotifier::new()),
            options,
            mode,
        })
    }

    /// Construct a reel sharing an existing notifier, e.g. one a caller also
    /// hands to an external poll loop.
    pub fn create_with_notifier(
        host: Rect,
        options: ReelOptions,
        surface: Box<dyn DrawingSurface + Send>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, PanelReelError> {
        let mut reel = Self::create(host, options, surface)?;
        reel.notifier = notifier;
        Ok(reel)
    }

    /// Tear down the reel. Present for symmetry with `create`; a reel is
    /// also fully cleaned up by ordinary drop.
    pub fn destroy(self) {}

    /// Add a tablet. `after`/`before` hints place it at a specific ring
    /// position; when both are given they must already be adjacent
    /// (`after.next == before`). When neither is given, the new tablet is
    /// placed immediately after the currently focused tablet, or becomes
    /// the ring's sole member if the reel is empty.
    #[instrument(skip(self, payload, draw))]
    pub fn add(
        &self,
        after: Option<TabletId>,
        before: Option<TabletId>,
        payload: T,
        draw: Box<dyn FnMut(&mut T, DrawArea, &mut dyn TabletCanvas) -> u16 + Send>,
    ) -> Result<TabletId, PanelReelError> {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        let id = match (after, before) {
            (Some(a), Some(b)) => state
                .ring
                .insert_between(a, b, payload, draw)
                .ok_or(PanelReelError::AdjacencyViolation)?,
            (Some(a), None) => {
                if !state.ring.contains(a) {
                    return Err(PanelReelError::NotFound);
                }
                state.ring.insert_after(Some(a), payload, draw)
            }
            (None, Some(b)) => {
                if !state.ring.contains(b) {
                    return Err(PanelReelError::NotFound);
                }
                let prev_of_b = state.ring.prev(b);
                state
                    .ring
                    .insert_between(prev_of_b, b, payload, draw)
                    .ok_or(PanelReelError::AdjacencyViolation)?
            }
            (None, None) => {
                let anchor = state.focus.tablet().or_else(|| state.ring.any());
                state.ring.insert_after(anchor, payload, draw)
            }
        };
        if state.focus.is_empty() {
            state.focus = Focus::On(id);
        }
        Ok(id)
    }

    /// Remove `id`. The caller is responsible for ensuring any worker thread
    /// owning the tablet's payload has been joined first — the reel does not
    /// (and in safe Rust cannot) cancel threads on the caller's behalf.
    #[instrument(skip(self))]
    pub fn del(&self, id: TabletId) -> Result<T, PanelReelError> {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        if !state.ring.contains(id) {
            return Err(PanelReelError::NotFound);
        }
        let successor = state.ring.next(id);
        let payload = state.ring.remove(id).ok_or(PanelReelError::NotFound)?;
        let len_after = state.ring.len();
        state.focus = panelreel_model::focus::on_remove(state.focus, id, successor, len_after);
        state.surfaces.remove(&id);
        state.tablet_tops.remove(&id);
        Ok(payload)
    }

    /// Remove the currently focused tablet. `Ok(None)` means the reel was
    /// already empty — informational, not an error (spec §4.7, §7: "Empty"
    /// is modeled as the absence of a value, not a failure).
    pub fn del_focused(&self) -> Result<Option<T>, PanelReelError> {
        let focused = {
            let state = self.state.lock().expect("reel mutex poisoned");
            state.focus.tablet()
        };
        match focused {
            Some(id) => self.del(id).map(Some),
            None => Ok(None),
        }
    }

    /// Wake the redraw loop. Never takes the reel lock, so it's safe to call
    /// from a tablet's worker thread at any time, including while `redraw`
    /// is in progress on another thread.
    pub fn touch(&self) {
        self.notifier.touch();
    }

    /// A handle to this reel's notifier, for registering with an external
    /// event loop.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Shift the reel's host position by `(dx, dy)`, clamping rather than
    /// erroring if the result would place the host partially or fully off
    /// the governing max bounds (spec §5).
    pub fn move_by(&self, dx: i32, dy: i32) -> MoveOutcome {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        let max_x = if self.options.max_supported_cols == 0 {
            i32::MAX
        } else {
            self.options.max_supported_cols as i32
        };
        let max_y = if self.options.max_supported_rows == 0 {
            i32::MAX
        } else {
            self.options.max_supported_rows as i32
        };
        let new_x = state.host.x as i32 + dx;
        let new_y = state.host.y as i32 + dy;
        let clamped_x = new_x.clamp(0, max_x);
        let clamped_y = new_y.clamp(0, max_y);
        let clipped = clamped_x != new_x || clamped_y != new_y;
        state.host.x = clamped_x as u16;
        state.host.y = clamped_y as u16;
        if clipped {
            MoveOutcome::Clipped
        } else {
            MoveOutcome::Moved
        }
    }

    /// Update the reel's host window geometry, e.g. in response to a
    /// terminal resize signal (spec §1: tablets are "re-laid-out in response
    /// to host-window resizes"). Takes effect on the next `redraw`; this
    /// method does not itself redraw.
    pub fn resize_host(&self, host: Rect) {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        state.host = host;
    }

    /// Re-plan and repaint the whole reel.
    #[instrument(skip(self))]
    pub fn redraw(&self) -> anyhow::Result<RedrawOutcome> {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        let mut surface = self.surface.lock().expect("surface mutex poisoned");
        let redraw_options = RedrawOptions {
            toff: self.options.toff,
            roff: self.options.roff,
            boff: self.options.boff,
            loff: self.options.loff,
            bordermask: self.options.bordermask,
            tabletmask: self.options.tabletmask,
            border_style: self.options.border_style,
            tablet_style: self.options.tablet_style,
            focused_style: self.options.focused_style,
            min_supported_cols: self.options.min_supported_cols,
            min_supported_rows: self.options.min_supported_rows,
            max_supported_cols: self.options.max_supported_cols,
            max_supported_rows: self.options.max_supported_rows,
        };
        let ReelState {
            host,
            ring,
            focus,
            surfaces,
            border_surface,
            notice_surface,
            tablet_tops,
        } = &mut *state;
        panelreel_render::redraw(
            surface.as_mut(),
            *host,
            ring,
            *focus,
            self.mode,
            &redraw_options,
            surfaces,
            border_surface,
            notice_surface,
            tablet_tops,
        )
    }

    pub fn focused(&self) -> Option<TabletId> {
        self.state.lock().expect("reel mutex poisoned").focus.tablet()
    }

    /// Borrow a tablet's payload for the duration of `f` (spec §4.2: "obtain
    /// the user payload"). `None` if `id` no longer names a live tablet. The
    /// reel lock is held for `f`'s duration, matching every other Facade
    /// operation.
    pub fn with_payload<R>(&self, id: TabletId, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.state.lock().expect("reel mutex poisoned");
        state.ring.contains(id).then(|| f(state.ring.payload(id)))
    }

    /// Mutably borrow a tablet's payload for the duration of `f`. `None` if
    /// `id` no longer names a live tablet.
    pub fn with_payload_mut<R>(&self, id: TabletId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        if !state.ring.contains(id) {
            return None;
        }
        Some(f(state.ring.payload_mut(id)))
    }

    pub fn next(&self) -> FocusOutcome {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        let (focus, outcome) = panelreel_model::focus::next(&state.ring, state.focus, self.mode);
        state.focus = focus;
        outcome
    }

    pub fn prev(&self) -> FocusOutcome {
        let mut state = self.state.lock().expect("reel mutex poisoned");
        let (focus, outcome) = panelreel_model::focus::prev(&state.ring, state.focus, self.mode);
        state.focus = focus;
        outcome
    }

    pub fn tabletcount(&self) -> usize {
        self.state.lock().expect("reel mutex poisoned").ring.len()
    }

    /// Assert ring consistency (spec §8). Intended for tests and debug
    /// assertions, not the hot path.
    pub fn validate(&self) -> bool {
        self.state.lock().expect("reel mutex poisoned").ring.check_consistency()
    }
}
