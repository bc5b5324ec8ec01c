use crate::domain::errors::{ConfigResult, EngineError};
use serde::Deserialize;

/// Every tunable constant of the engine in one place.
///
/// Defaults match the live product; hosts may deserialize overrides from a
/// JSON blob and must call [`EngineTuning::validate`] before handing the
/// tuning to the engine. Smoothing factors are the weight of the *previous*
/// value unless noted otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    // --- coordinate transform ---
    /// World units between consecutive price points.
    pub pixels_per_point: f64,
    /// Fixed reference height so the price scale is independent of the
    /// actual pixel height of the canvas.
    pub reference_viewport_height: f64,

    // --- price series ---
    pub price_history_cap: usize,
    /// Weight of the incoming tick in the one-pole price filter.
    pub price_smoothing: f64,
    pub default_ms_per_point: f64,
    pub ms_per_point_smoothing: f64,
    /// Timestamp gaps above this are feed hiccups and ignored.
    pub feed_gap_ms: f64,
    pub min_ms_per_point: f64,

    // --- camera ---
    /// Fraction of the screen width where the now line sits while following.
    pub camera_offset_ratio: f64,
    pub camera_smoothing_x: f64,
    pub camera_smoothing_y: f64,

    // --- interaction ---
    /// Pointer movement (px) that promotes a press into a drag.
    pub drag_activation_px: f64,
    /// Total movement (px) under which a release still counts as a click.
    pub click_tolerance_px: f64,
    pub wheel_sensitivity: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,

    // --- visible price range ---
    pub base_visible_range: f64,
    pub visible_box_rows: f64,
    pub visible_box_rows_hidden: f64,
    pub volatility_window: usize,
    pub volatility_expansion: f64,
    /// Floor for the recent min-max spread, so flat data never collapses
    /// the range toward zero.
    pub min_spread_floor: f64,
    pub range_smoothing: f64,
    pub min_visible_range: f64,
    pub max_visible_range: f64,

    // --- boxes ---
    pub max_backend_boxes: usize,
    /// Eviction threshold behind the camera, in viewport widths.
    pub eviction_viewports_behind: f64,
    pub clickable_buffer_columns: u32,
    pub clickable_buffer_columns_hidden: u32,

    // --- filler grid ---
    pub filler_interval_frames: u64,
    pub filler_trim_viewports_behind: f64,
    /// Vertical keep-alive corridor for fillers, in viewport heights.
    pub filler_y_viewports: f64,

    // --- animation ---
    pub animation_duration_ms: f64,
    pub select_animation_start_scale: f64,

    // --- frame cadence ---
    pub target_frame_interval_ms: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            pixels_per_point: 5.0,
            reference_viewport_height: 800.0,

            price_history_cap: 500,
            price_smoothing: 0.85,
            default_ms_per_point: 100.0,
            ms_per_point_smoothing: 0.8,
            feed_gap_ms: 60_000.0,
            min_ms_per_point: 1.0,

            camera_offset_ratio: 0.66,
            camera_smoothing_x: 0.92,
            camera_smoothing_y: 0.80,

            drag_activation_px: 6.0,
            click_tolerance_px: 10.0,
            wheel_sensitivity: 0.001,
            zoom_min: 0.4,
            zoom_max: 3.0,

            base_visible_range: 2.0,
            visible_box_rows: 7.0,
            visible_box_rows_hidden: 9.0,
            volatility_window: 240,
            volatility_expansion: 1.8,
            min_spread_floor: 0.25,
            range_smoothing: 0.85,
            min_visible_range: 0.5,
            max_visible_range: 500.0,

            max_backend_boxes: 800,
            eviction_viewports_behind: 2.0,
            clickable_buffer_columns: 1,
            clickable_buffer_columns_hidden: 2,

            filler_interval_frames: 30,
            filler_trim_viewports_behind: 3.0,
            filler_y_viewports: 2.0,

            animation_duration_ms: 400.0,
            select_animation_start_scale: 0.3,

            target_frame_interval_ms: 15.0,
        }
    }
}

impl EngineTuning {
    pub fn validate(&self) -> ConfigResult<()> {
        fn positive(name: &str, v: f64) -> ConfigResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(EngineError::ConfigError(format!("{} must be positive, got {}", name, v)))
            }
        }
        fn unit_interval(name: &str, v: f64) -> ConfigResult<()> {
            if v.is_finite() && (0.0..1.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::ConfigError(format!("{} must be in [0, 1), got {}", name, v)))
            }
        }

        positive("pixels_per_point", self.pixels_per_point)?;
        positive("reference_viewport_height", self.reference_viewport_height)?;
        positive("default_ms_per_point", self.default_ms_per_point)?;
        positive("feed_gap_ms", self.feed_gap_ms)?;
        positive("min_ms_per_point", self.min_ms_per_point)?;
        positive("base_visible_range", self.base_visible_range)?;
        positive("min_visible_range", self.min_visible_range)?;
        positive("max_visible_range", self.max_visible_range)?;
        positive("min_spread_floor", self.min_spread_floor)?;
        positive("animation_duration_ms", self.animation_duration_ms)?;
        positive("target_frame_interval_ms", self.target_frame_interval_ms)?;
        positive("zoom_min", self.zoom_min)?;
        positive("zoom_max", self.zoom_max)?;

        unit_interval("price_smoothing", self.price_smoothing)?;
        unit_interval("ms_per_point_smoothing", self.ms_per_point_smoothing)?;
        unit_interval("camera_smoothing_x", self.camera_smoothing_x)?;
        unit_interval("camera_smoothing_y", self.camera_smoothing_y)?;
        unit_interval("range_smoothing", self.range_smoothing)?;
        unit_interval("camera_offset_ratio", self.camera_offset_ratio)?;

        if self.price_history_cap == 0 {
            return Err(EngineError::ConfigError("price_history_cap must be > 0".into()));
        }
        if self.zoom_min >= self.zoom_max {
            return Err(EngineError::ConfigError(format!(
                "zoom_min {} must be below zoom_max {}",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.min_visible_range >= self.max_visible_range {
            return Err(EngineError::ConfigError(format!(
                "min_visible_range {} must be below max_visible_range {}",
                self.min_visible_range, self.max_visible_range
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let tuning: EngineTuning = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("tuning parse failed: {}", e)))?;
        tuning.validate()?;
        Ok(tuning)
    }
}
