use super::config::EngineTuning;
use super::coordinates::CoordinateSystem;
use super::value_objects::Camera;

/// Camera behavior mode: auto-tracking the live price or parked wherever the
/// user panned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Following,
    Free,
}

/// Maintains the current/target/smoothed camera position.
///
/// While following, the target is recomputed from the live edge every frame
/// and the render position eases toward it; smoothing is configured per axis
/// (looser on X for fluid scroll, tighter on Y for responsive price
/// tracking). A drag past the activation threshold switches to `Free`, which
/// halts target updates entirely until [`CameraController::reset_to_follow`].
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    mode: CameraMode,
    smoothing_x: f64,
    smoothing_y: f64,
    offset_ratio: f64,
}

impl CameraController {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self {
            camera: Camera::default(),
            mode: CameraMode::Following,
            smoothing_x: tuning.camera_smoothing_x,
            smoothing_y: tuning.camera_smoothing_y,
            offset_ratio: tuning.camera_offset_ratio,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_following(&self) -> bool {
        self.mode == CameraMode::Following
    }

    /// World-X the camera's left edge aims at so the now line sits at the
    /// configured screen fraction.
    fn follow_x(&self, now_world_x: f64, coords: &CoordinateSystem) -> f64 {
        (now_world_x - coords.width() * self.offset_ratio / coords.horizontal_scale()).max(0.0)
    }

    /// Recompute the follow target from the live edge. No-op in free mode.
    pub fn update_follow_target(
        &mut self,
        now_world_x: f64,
        latest_price: f64,
        coords: &CoordinateSystem,
    ) {
        if self.mode != CameraMode::Following {
            return;
        }
        self.camera.target_x = self.follow_x(now_world_x, coords);
        self.camera.target_y = latest_price;
    }

    /// One smoothing step; the authoritative position is set from the
    /// smoothed value.
    pub fn advance(&mut self) {
        let cam = &mut self.camera;
        cam.smooth_x = cam.smooth_x * self.smoothing_x + cam.target_x * (1.0 - self.smoothing_x);
        cam.smooth_y = cam.smooth_y * self.smoothing_y + cam.target_y * (1.0 - self.smoothing_y);
        cam.x = cam.smooth_x;
        cam.y = cam.smooth_y;
    }

    /// Bypass smoothing for a one-shot realignment (reconnect/resume).
    pub fn snap_to_price(
        &mut self,
        now_world_x: f64,
        latest_price: f64,
        coords: &CoordinateSystem,
    ) {
        let x = if self.mode == CameraMode::Following {
            self.follow_x(now_world_x, coords)
        } else {
            self.camera.x
        };
        let y = latest_price;
        self.camera.place(x, y);
    }

    /// Switch to manual panning. Returns true when the mode actually changed.
    pub fn release_to_free(&mut self) -> bool {
        if self.mode == CameraMode::Free {
            return false;
        }
        self.mode = CameraMode::Free;
        true
    }

    /// Re-engage price following. Target, smoothed, and authoritative
    /// positions are all set together, so there is no snap-then-drift.
    /// Returns true when the mode actually changed.
    pub fn reset_to_follow(
        &mut self,
        now_world_x: f64,
        latest_price: f64,
        coords: &CoordinateSystem,
    ) -> bool {
        let changed = self.mode != CameraMode::Following;
        self.mode = CameraMode::Following;
        self.camera.place(self.follow_x(now_world_x, coords), latest_price);
        changed
    }
}
