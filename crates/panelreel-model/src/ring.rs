//! Tablet arena and circular doubly-linked ring.
//!
//! Design note (spec §9): the original C implementation links tablets with
//! raw `prev`/`next` pointers forming a genuine cycle. Rust ownership can't
//! express a cyclic graph of owned nodes directly, so this module follows the
//! suggested translation: an arena of slots indexed by a stable, generation-
//! checked handle (`TabletId`), with `prev`/`next` stored as handles rather
//! than pointers. The arena itself owns every tablet; `TabletId` is Copy and
//! carries no lifetime, so it can be handed out to callers (e.g. as the
//! return value of `add`) without borrowing the ring.
//!
//! Invariants maintained by every public mutator (spec §3):
//! * `ring[t].next].prev == t` and `ring[t.prev].next == t` for every live `t`.
//! * When exactly one tablet is live, its `prev` and `next` both equal itself.

use std::num::NonZeroU32;
use tracing::trace;

/// Stable handle to a tablet. Carries a generation counter so a handle from a
/// removed tablet can never alias a later tablet reusing the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabletId {
    index: u32,
    generation: NonZeroU32,
}

impl TabletId {
    /// Raw slot index, exposed only for building stable, human-readable
    /// summary-header ids (spec §4.4) — never used for arena lookups.
    pub fn slot(&self) -> u32 {
        self.index
    }
}

struct Slot<T> {
    generation: NonZeroU32,
    entry: Option<Entry<T>>,
}

struct Entry<T> {
    payload: T,
    draw: Box<dyn FnMut(&mut T, crate::DrawArea, &mut dyn crate::TabletCanvas) -> u16 + Send>,
    /// Cached desired height (spec §4.3 step 2's "desired height"), entirely
    /// derived from the callback's own return value (spec's Glossary: "the
    /// number of rows a tablet would render... as reported by its
    /// callback") rather than supplied by the caller at `add` time. `None`
    /// until the tablet has actually been drawn once; [`Ring::set_desired_lines`]
    /// is how the redraw engine feeds back each real invocation's line count.
    desired_lines: Option<u16>,
    prev: TabletId,
    next: TabletId,
}

/// Arena-backed circular doubly-linked ring of tablets.
pub struct Ring<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    /// An arbitrary live member used as a traversal anchor (e.g. for
    /// `add`'s "neither hint" tail placement). `None` iff the ring is empty.
    anchor: Option<TabletId>,
    len: usize,
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ring<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            anchor: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: TabletId) -> bool {
        self.slots
            .get(id.index as usize)
            .map(|s| s.generation == id.generation && s.entry.is_some())
            .unwrap_or(false)
    }

    fn entry(&self, id: TabletId) -> &Entry<T> {
        self.slots[id.index as usize].entry.as_ref().expect("live tablet")
    }

    fn entry_mut(&mut self, id: TabletId) -> &mut Entry<T> {
        self.slots[id.index as usize].entry.as_mut().expect("live tablet")
    }

    pub fn next(&self, id: TabletId) -> TabletId {
        self.entry(id).next
    }

    pub fn prev(&self, id: TabletId) -> TabletId {
        self.entry(id).prev
    }

    pub fn payload(&self, id: TabletId) -> &T {
        &self.entry(id).payload
    }

    pub fn payload_mut(&mut self, id: TabletId) -> &mut T {
        &mut self.entry_mut(id).payload
    }

    /// The tablet's current desired height (spec §4.3's "desired height"),
    /// as last reported by its own draw callback. `None` if the tablet has
    /// never been drawn — callers needing a layout value for that case fall
    /// back to some caller-chosen default rather than treating `None` as 0.
    pub fn desired_lines(&self, id: TabletId) -> Option<u16> {
        self.entry(id).desired_lines
    }

    /// Record a tablet's just-measured desired height. Called by the redraw
    /// engine after invoking the draw callback for real, never by a caller
    /// directly — there is no facade operation for setting this out of band.
    pub fn set_desired_lines(&mut self, id: TabletId, desired_lines: u16) {
        self.entry_mut(id).desired_lines = Some(desired_lines);
    }

    /// Any live tablet, used as a default traversal start. Stable across
    /// calls as long as that particular tablet remains live.
    pub fn any(&self) -> Option<TabletId> {
        self.anchor
    }

    /// Whether `id` is the ring's conceptual "first" tablet — the arena's
    /// `anchor`, which only moves on `add`/`remove`. Gives the otherwise
    /// topologically circular ring a stable reference point for "physical
    /// top", the boundary non-wrapping focus navigation and layout stop at
    /// (spec: "the first tablet cannot scroll up past the reel top").
    pub fn is_head(&self, id: TabletId) -> bool {
        self.anchor == Some(id)
    }

    /// Whether `id` is the ring's conceptual "last" tablet: the head's
    /// predecessor, the physical bottom boundary.
    pub fn is_tail(&self, id: TabletId) -> bool {
        match self.anchor {
            Some(head) => id == self.prev(head),
            None => false,
        }
    }

    /// Invoke this tablet's draw callback with `area` and `canvas`, returning
    /// the number of lines written, clamped to `[0, area.max_lines()]` (spec
    /// §7: "returned values outside [0, height] are silently clamped").
    pub fn draw(&mut self, id: TabletId, area: crate::DrawArea, canvas: &mut dyn crate::TabletCanvas) -> u16 {
        let max = area.max_lines();
        let entry = self.entry_mut(id);
        let ll = (entry.draw)(&mut entry.payload, area, canvas);
        ll.min(max)
    }

    fn alloc_slot(&mut self) -> (u32, NonZeroU32) {
        if let Some(index) = self.free.pop() {
            let slot = &self.slots[index as usize];
            (index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: NonZeroU32::new(1).unwrap(),
                entry: None,
            });
            (index, NonZeroU32::new(1).unwrap())
        }
    }

    /// Insert a new tablet immediately after `after` (ring-order successor of
    /// `after` becomes the new tablet; the new tablet's successor is `after`'s
    /// old next). If the ring is empty, `after` is ignored and the tablet
    /// becomes the sole member, linked to itself.
    pub fn insert_after(
        &mut self,
        after: Option<TabletId>,
        payload: T,
        draw: Box<dyn FnMut(&mut T, crate::DrawArea, &mut dyn crate::TabletCanvas) -> u16 + Send>,
    ) -> TabletId {
        let (index, generation) = self.alloc_slot();
        let id = TabletId { index, generation };

        match after {
            None => {
                debug_assert!(self.is_empty(), "after=None only valid on an empty ring");
                self.slots[index as usize].entry = Some(Entry {
                    payload,
                    draw,
                    desired_lines: None,
                    prev: id,
                    next: id,
                });
                self.anchor = Some(id);
            }
            Some(after_id) => {
                let before_id = self.entry(after_id).next;
                self.slots[index as usize].entry = Some(Entry {
                    payload,
                    draw,
                    desired_lines: None,
                    prev: after_id,
                    next: before_id,
                });
                self.entry_mut(after_id).next = id;
                self.entry_mut(before_id).prev = id;
            }
        }
        self.len += 1;
        trace!(slot = id.index, len = self.len, "tablet inserted");
        id
    }

    /// Insert `payload` such that `after.next == id && id.next == before`,
    /// failing if `after` and `before` are not already adjacent in that order.
    pub fn insert_between(
        &mut self,
        after: TabletId,
        before: TabletId,
        payload: T,
        draw: Box<dyn FnMut(&mut T, crate::DrawArea, &mut dyn crate::TabletCanvas) -> u16 + Send>,
    ) -> Option<TabletId> {
        if self.entry(after).next != before {
            return None;
        }
        Some(self.insert_after(Some(after), payload, draw))
    }

    /// Remove a tablet from the ring, splicing its neighbours together.
    /// Returns `None` if `id` does not name a live tablet in this ring.
    pub fn remove(&mut self, id: TabletId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let (prev, next) = {
            let e = self.entry(id);
            (e.prev, e.next)
        };
        if prev == id {
            // sole member
            self.anchor = None;
        } else {
            self.entry_mut(prev).next = next;
            self.entry_mut(next).prev = prev;
            if self.anchor == Some(id) {
                self.anchor = Some(next);
            }
        }
        let slot = &mut self.slots[id.index as usize];
        let entry = slot.entry.take().expect("live tablet");
        slot.generation = NonZeroU32::new(slot.generation.get().wrapping_add(1).max(1)).unwrap();
        self.free.push(id.index);
        self.len -= 1;
        trace!(slot = id.index, len = self.len, "tablet removed");
        Some(entry.payload)
    }

    /// Walk `id.next` repeatedly, yielding at most `len()` ids (guards against
    /// infinite traversal — ring consistency is an invariant, not an
    /// assumption callers must re-verify on every walk).
    pub fn walk_forward(&self, start: TabletId) -> impl Iterator<Item = TabletId> + '_ {
        let total = self.len;
        let mut current = Some(start);
        let mut yielded = 0usize;
        std::iter::from_fn(move || {
            if yielded >= total {
                return None;
            }
            let id = current?;
            current = Some(self.next(id));
            yielded += 1;
            Some(id)
        })
    }

    pub fn walk_backward(&self, start: TabletId) -> impl Iterator<Item = TabletId> + '_ {
        let total = self.len;
        let mut current = Some(start);
        let mut yielded = 0usize;
        std::iter::from_fn(move || {
            if yielded >= total {
                return None;
            }
            let id = current?;
            current = Some(self.prev(id));
            yielded += 1;
            Some(id)
        })
    }

    /// Assert full ring consistency (spec §8). Intended for tests and for
    /// `Facade::validate`.
    pub fn check_consistency(&self) -> bool {
        let Some(start) = self.anchor else {
            return self.len == 0;
        };
        let mut seen = 0usize;
        let mut id = start;
        loop {
            let e = self.entry(id);
            if self.next(e.prev) != id || self.prev(e.next) != id {
                return false;
            }
            seen += 1;
            id = e.next;
            if id == start || seen > self.len {
                break;
            }
        }
        seen == self.len
    }
}
