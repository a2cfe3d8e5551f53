//! Shared test double for integration tests: a `DrawingSurface` that
//! records every region's final geometry and visibility instead of
//! touching a real terminal, so tests can assert on what the redraw
//! engine actually laid out.

use panelreel_term::surface::{BorderEdges, DrawingSurface, SurfaceId};
use panelreel_term::style::Style;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub visible: bool,
}

#[derive(Default)]
pub struct Recorded {
    pub regions: HashMap<u32, RecordedRegion>,
}

/// Cheap handle to a `RecordingSurface`'s state, cloned before the surface
/// itself is boxed and handed to `Reel::create` (which takes ownership),
/// so the test retains a way to read what was drawn.
#[derive(Clone, Default)]
pub struct Recorder(pub Arc<Mutex<Recorded>>);

impl Recorder {
    pub fn visible_regions(&self) -> Vec<RecordedRegion> {
        let state = self.0.lock().unwrap();
        state
            .regions
            .values()
            .filter(|r| r.visible)
            .copied()
            .collect()
    }
}

pub struct RecordingSurface {
    shared: Arc<Mutex<Recorded>>,
    next_id: u32,
}

impl RecordingSurface {
    pub fn new() -> (Self, Recorder) {
        let shared = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                shared: Arc::clone(&shared),
                next_id: 0,
            },
            Recorder(shared),
        )
    }
}

impl DrawingSurface for RecordingSurface {
    fn create(&mut self, x: u16, y: u16, width: u16, height: u16) -> SurfaceId {
        let id = self.next_id;
        self.next_id += 1;
        self.shared.lock().unwrap().regions.insert(
            id,
            RecordedRegion {
                x,
                y,
                width,
                height,
                visible: true,
            },
        );
        SurfaceId(id)
    }

    fn move_to(&mut self, id: SurfaceId, x: u16, y: u16) {
        let mut state = self.shared.lock().unwrap();
        let region = state.regions.get_mut(&id.0).expect("live region");
        region.x = x;
        region.y = y;
    }

    fn resize(&mut self, id: SurfaceId, width: u16, height: u16) {
        let mut state = self.shared.lock().unwrap();
        let region = state.regions.get_mut(&id.0).expect("live region");
        region.width = width;
        region.height = height;
    }

    fn show(&mut self, id: SurfaceId) {
        self.shared.lock().unwrap().regions.get_mut(&id.0).unwrap().visible = true;
    }

    fn hide(&mut self, id: SurfaceId) {
        self.shared.lock().unwrap().regions.get_mut(&id.0).unwrap().visible = false;
    }

    fn destroy(&mut self, id: SurfaceId) {
        self.shared.lock().unwrap().regions.remove(&id.0);
    }

    fn border(&mut self, _id: SurfaceId, _edges: BorderEdges, _style: Style) {}

    fn write_line(&mut self, _id: SurfaceId, _row: u16, _col: u16, _text: &str, _style: Style) {}

    fn clear(&mut self, _id: SurfaceId) {}

    fn refresh(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
