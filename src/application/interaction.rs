use crate::domain::chart::coordinates::CoordinateSystem;
use crate::domain::chart::value_objects::{Camera, ScreenPoint};
use crate::domain::wagers::ContractId;
use crate::ecs::components::BoxGeometry;

/// Pointer/wheel state. A press arms a possible drag; the drag only becomes
/// real once movement crosses the activation threshold, and a release whose
/// total travel stayed inside the click tolerance resolves as a click
/// instead. Wheel deltas accumulate here and are resolved once per frame.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub pointer_down: bool,
    pub dragging: bool,
    pub drag_start: ScreenPoint,
    pub drag_start_camera: (f64, f64),
    pub max_drag_distance: f64,
    wheel_accum: f64,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, at: ScreenPoint, camera: &Camera) {
        self.pointer_down = true;
        self.dragging = false;
        self.drag_start = at;
        self.drag_start_camera = (camera.x, camera.y);
        self.max_drag_distance = 0.0;
    }

    pub fn reset(&mut self) {
        self.pointer_down = false;
        self.dragging = false;
        self.max_drag_distance = 0.0;
    }

    pub fn accumulate_wheel(&mut self, delta: f64) {
        if delta.is_finite() {
            self.wheel_accum += delta;
        }
    }

    pub fn take_wheel(&mut self) -> f64 {
        std::mem::take(&mut self.wheel_accum)
    }
}

/// Screen-space rectangle of a box under the current view.
fn screen_rect(
    geometry: &BoxGeometry,
    coords: &CoordinateSystem,
    camera: &Camera,
) -> (ScreenPoint, ScreenPoint) {
    // top-left uses the box's upper price edge, bottom-right its lower one
    let top_left = coords.world_to_screen(camera, geometry.world_x, geometry.world_y + geometry.height);
    let bottom_right = coords.world_to_screen(camera, geometry.world_x + geometry.width, geometry.world_y);
    (top_left, bottom_right)
}

/// Resolve which box a click lands on.
///
/// All candidates whose screen rectangle contains the pointer compete; the
/// winner is the one whose *center* is nearest the pointer, not the first
/// one found, so overlapping edges resolve predictably.
pub fn resolve_click_target(
    pointer: ScreenPoint,
    candidates: &[(ContractId, BoxGeometry)],
    coords: &CoordinateSystem,
    camera: &Camera,
) -> Option<ContractId> {
    let mut best: Option<(ContractId, f64)> = None;

    for (id, geometry) in candidates {
        let (top_left, bottom_right) = screen_rect(geometry, coords, camera);
        let inside = pointer.x >= top_left.x
            && pointer.x <= bottom_right.x
            && pointer.y >= top_left.y
            && pointer.y <= bottom_right.y;
        if !inside {
            continue;
        }

        let (cx, cy) = geometry.center();
        let center = coords.world_to_screen(camera, cx, cy);
        let distance = pointer.distance_to(&center);
        match &best {
            Some((_, best_distance)) if *best_distance <= distance => {}
            _ => best = Some((id.clone(), distance)),
        }
    }

    best.map(|(id, _)| id)
}
