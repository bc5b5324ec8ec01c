use std::collections::HashMap;

use crate::application::interaction::{self, InteractionState};
use crate::domain::chart::camera::CameraController;
use crate::domain::chart::config::EngineTuning;
use crate::domain::chart::coordinates::CoordinateSystem;
use crate::domain::chart::culling::WorldBounds;
use crate::domain::chart::value_objects::{Camera, ScreenPoint};
use crate::domain::chart::viewport::ViewportSizer;
use crate::domain::errors::EngineError;
use crate::domain::events::{CoreEvent, EventQueue};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{PricePoint, PriceSeries};
use crate::domain::wagers::{AnimationTimeline, BackendBox, ContractId, GameMode};
use crate::ecs::board::{RenderBox, WagerBoard};

/// Cheap diagnostic counters for a long-running session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    pub frames_skipped: u64,
    pub boxes_evicted: u64,
    pub fillers_spawned: u64,
    pub fillers_trimmed: u64,
}

/// The non-visual engine beneath the drawing calls.
///
/// Owns the coordinate transform, camera, price history, viewport sizing,
/// the box board, animations, and interaction state, and advances them in a
/// fixed order once per frame via [`ChartEngine::tick`]. Feed data and
/// pointer input are applied immediately as they arrive; the next tick
/// observes whatever state was most recently written. Everything is
/// single-threaded; the engine never blocks and never throws on the frame
/// path.
pub struct ChartEngine {
    tuning: EngineTuning,
    mode: GameMode,
    coords: CoordinateSystem,
    camera: CameraController,
    series: PriceSeries,
    sizer: ViewportSizer,
    board: WagerBoard,
    timeline: AnimationTimeline,
    interaction: InteractionState,
    events: EventQueue,
    zoom_level: f64,
    frame: u64,
    last_tick_ms: Option<f64>,
    clock_ms: f64,
    stats: EngineStats,
}

impl ChartEngine {
    pub fn new(tuning: EngineTuning) -> Result<Self, EngineError> {
        tuning.validate()?;
        let coords = CoordinateSystem::new(&tuning);
        let camera = CameraController::new(&tuning);
        let series = PriceSeries::new(&tuning);
        let sizer = ViewportSizer::new(&tuning);
        let timeline = AnimationTimeline::new(tuning.animation_duration_ms);

        get_logger().info(LogComponent::Application("ChartEngine"), "engine created");

        Ok(Self {
            tuning,
            mode: GameMode::Standard,
            coords,
            camera,
            series,
            sizer,
            board: WagerBoard::new(),
            timeline,
            interaction: InteractionState::new(),
            events: EventQueue::new(),
            zoom_level: 1.0,
            frame: 0,
            last_tick_ms: None,
            clock_ms: 0.0,
            stats: EngineStats::default(),
        })
    }

    pub fn with_defaults() -> Self {
        Self::new(EngineTuning::default()).expect("default tuning is valid")
    }

    // --- inbound feed -----------------------------------------------------

    pub fn add_price_data(&mut self, point: PricePoint) {
        self.series.add_price_data(point);
    }

    /// Merge a full authoritative box snapshot from the feed.
    pub fn update_multipliers(&mut self, snapshot: &HashMap<ContractId, BackendBox>) {
        let outcome = self.board.merge_snapshot(
            snapshot,
            &mut self.timeline,
            self.camera.camera().x,
            self.coords.viewport_world_width(),
            &self.tuning,
        );
        self.stats.boxes_evicted += outcome.evicted as u64;
    }

    pub fn confirm_selected_contract(&mut self, id: &ContractId) {
        self.board.confirm_selected_contract(id, self.clock_ms, &mut self.timeline, &mut self.events);
    }

    pub fn cancel_pending_contract(&mut self, id: &ContractId, keep_highlight: bool) {
        self.board.cancel_pending_contract(id, keep_highlight, &mut self.timeline, &mut self.events);
    }

    pub fn mark_contract_as_hit(&mut self, id: &ContractId) {
        self.board.mark_contract_as_hit(id, self.clock_ms, &mut self.timeline, &mut self.events);
    }

    pub fn mark_contract_as_missed(&mut self, id: &ContractId) {
        self.board.mark_contract_as_missed(id, self.clock_ms, &mut self.timeline, &mut self.events);
    }

    // --- host notifications ----------------------------------------------

    pub fn resize(&mut self, width: f64, height: f64) {
        self.coords.update_viewport(width, height);
        self.events.push(CoreEvent::Resized { width, height });
        crate::log_debug!(
            LogComponent::Application("ChartEngine"),
            "viewport resized to {}x{}",
            width,
            height
        );
    }

    pub fn set_game_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn game_mode(&self) -> GameMode {
        self.mode
    }

    // --- frame tick -------------------------------------------------------

    /// One frame. Frames arriving faster than the target interval are
    /// skipped, not queued.
    pub fn tick(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            return;
        }
        if let Some(last) = self.last_tick_ms {
            if now_ms - last < self.tuning.target_frame_interval_ms {
                self.stats.frames_skipped += 1;
                return;
            }
        }
        self.last_tick_ms = Some(now_ms);
        self.clock_ms = now_ms;

        if !self.coords.is_viewport_ready() {
            return;
        }

        let range = self.sizer.advance(
            &self.series,
            self.board.backend_box_height(),
            self.mode,
            self.zoom_level,
        );
        self.coords.set_visible_range(range);

        self.resolve_wheel();

        let now_world_x = self.series.now_world_x();
        if let Some(price) = self.series.latest_price() {
            self.camera.update_follow_target(now_world_x, price, &self.coords);
        }
        self.camera.advance();

        self.board.refresh_clickability(now_world_x, self.buffer_columns());
        self.timeline.advance(now_ms);

        self.frame += 1;
        if self.frame % self.tuning.filler_interval_frames == 0 {
            self.run_filler_pass(now_world_x);
        }
        self.stats.frames += 1;
    }

    fn buffer_columns(&self) -> u32 {
        match self.mode {
            GameMode::Standard => self.tuning.clickable_buffer_columns,
            GameMode::BoxesHidden => self.tuning.clickable_buffer_columns_hidden,
        }
    }

    fn run_filler_pass(&mut self, now_world_x: f64) {
        let buffer_px = self
            .board
            .alignment()
            .map(|a| a.box_width() * self.coords.horizontal_scale())
            .unwrap_or(0.0);
        let bounds = self.coords.visible_world_bounds(self.camera.camera(), buffer_px);
        self.stats.fillers_spawned += self.board.fill_viewport(&bounds) as u64;
        self.stats.fillers_trimmed += self
            .board
            .trim_fillers(
                now_world_x,
                self.camera.camera().y,
                self.coords.viewport_world_width(),
                self.coords.viewport_world_height(),
                &self.tuning,
            ) as u64;
    }

    // --- camera control ---------------------------------------------------

    /// One-shot realignment onto the live price, bypassing smoothing.
    /// Used after a feed reconnect or tab resume.
    pub fn snap_to_price(&mut self) {
        if let Some(price) = self.series.latest_price() {
            self.camera.snap_to_price(self.series.now_world_x(), price, &self.coords);
        }
    }

    /// Leave free pan and re-engage price following without a visible
    /// snap-then-drift.
    pub fn reset_camera_to_follow_price(&mut self) {
        self.series.unfreeze_reference_point();
        let price = self.series.latest_price().unwrap_or(self.camera.camera().y);
        let changed = self.camera.reset_to_follow(self.series.now_world_x(), price, &self.coords);
        if changed {
            self.events.push(CoreEvent::CameraFollowingChanged { is_following: true });
        }
    }

    // --- pointer & wheel --------------------------------------------------

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.interaction.arm(ScreenPoint::new(x, y), self.camera.camera());
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.interaction.pointer_down {
            return;
        }
        let dx = x - self.interaction.drag_start.x;
        let dy = y - self.interaction.drag_start.y;
        let distance = dx.hypot(dy);
        self.interaction.max_drag_distance = self.interaction.max_drag_distance.max(distance);

        if !self.interaction.dragging && distance > self.tuning.drag_activation_px {
            self.interaction.dragging = true;
            if self.camera.release_to_free() {
                self.series.freeze_reference_point();
                self.events.push(CoreEvent::CameraFollowingChanged { is_following: false });
            }
        }

        if self.interaction.dragging {
            // pointer delta maps 1:1 to world delta through the live scales
            let (start_x, start_y) = self.interaction.drag_start_camera;
            let new_x = (start_x - dx / self.coords.horizontal_scale()).max(0.0);
            let new_y = start_y + dy / self.coords.price_scale();
            self.camera.camera_mut().place(new_x, new_y);
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        let was_click = self.interaction.pointer_down
            && self.interaction.max_drag_distance <= self.tuning.click_tolerance_px;
        self.interaction.reset();
        if was_click {
            self.resolve_click(ScreenPoint::new(x, y));
        }
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.reset();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.interaction.accumulate_wheel(delta_y);
    }

    fn resolve_click(&mut self, pointer: ScreenPoint) {
        let candidates = self.board.clickable_boxes();
        if let Some(id) = interaction::resolve_click_target(
            pointer,
            &candidates,
            &self.coords,
            self.camera.camera(),
        ) {
            self.board.select_box(&id, &mut self.timeline, &mut self.events);
        }
    }

    /// Apply the wheel delta accumulated since the previous frame.
    fn resolve_wheel(&mut self) {
        let accum = self.interaction.take_wheel();
        if accum == 0.0 {
            return;
        }
        let delta = -accum * self.tuning.wheel_sensitivity;
        let new_zoom = (self.zoom_level + delta).clamp(self.tuning.zoom_min, self.tuning.zoom_max);
        if (new_zoom - self.zoom_level).abs() < f64::EPSILON {
            return;
        }

        if self.camera.is_following() {
            self.coords.set_zoom(new_zoom);
        } else {
            // keep the world point at the viewport center fixed across the
            // scale change
            let center = self.coords.screen_to_world(
                self.camera.camera(),
                self.coords.width() / 2.0,
                self.coords.height() / 2.0,
            );
            self.coords.set_zoom(new_zoom);
            let new_cam_x =
                (center.x - self.coords.width() / 2.0 / self.coords.horizontal_scale()).max(0.0);
            self.camera.camera_mut().place(new_cam_x, center.y);
        }

        self.zoom_level = new_zoom;
        self.events.push(CoreEvent::ZoomLevelChanged { zoom_level: new_zoom });
    }

    // --- query surface ----------------------------------------------------

    pub fn get_selected_squares(&self) -> Vec<ContractId> {
        self.board.selected_ids()
    }

    pub fn get_hit_boxes(&self) -> Vec<ContractId> {
        self.board.hit_ids()
    }

    pub fn get_missed_boxes(&self) -> Vec<ContractId> {
        self.board.missed_ids()
    }

    pub fn get_viewport_bounds(&self) -> WorldBounds {
        self.coords.visible_world_bounds(self.camera.camera(), 0.0)
    }

    pub fn get_backend_multipliers(&self) -> Vec<BackendBox> {
        self.board.backend_boxes()
    }

    pub fn get_zoom_level(&self) -> f64 {
        self.zoom_level
    }

    pub fn is_camera_following_price(&self) -> bool {
        self.camera.is_following()
    }

    /// Culled render list: every box intersecting the viewport expanded by
    /// `buffer_px`.
    pub fn visible_boxes(&self, buffer_px: f64) -> Vec<RenderBox> {
        let bounds = self.coords.visible_world_bounds(self.camera.camera(), buffer_px);
        self.board.visible_boxes(&bounds, &self.timeline)
    }

    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        self.events.drain()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    // --- component access for hosts and tests -----------------------------

    pub fn price_series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn camera(&self) -> &Camera {
        self.camera.camera()
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coords
    }

    pub fn board(&self) -> &WagerBoard {
        &self.board
    }

    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }
}
