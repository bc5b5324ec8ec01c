use super::config::EngineTuning;
use crate::domain::market_data::PriceSeries;
use crate::domain::wagers::GameMode;

/// Derives the visible price range each frame from recent volatility and box
/// geometry.
///
/// The target range is the largest of a configured base range, the
/// authoritative box height times a per-mode row count, and an expansion of
/// the recent min-max price spread. The *target* is what gets exponentially
/// smoothed - not the raw signal - which is what keeps the price axis from
/// visibly breathing during volatility spikes. The smoothed target is then
/// divided by the zoom's vertical scale and clamped.
#[derive(Debug, Clone)]
pub struct ViewportSizer {
    smoothed_target: Option<f64>,
    base_visible_range: f64,
    visible_box_rows: f64,
    visible_box_rows_hidden: f64,
    volatility_window: usize,
    volatility_expansion: f64,
    min_spread_floor: f64,
    range_smoothing: f64,
    min_visible_range: f64,
    max_visible_range: f64,
}

impl ViewportSizer {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self {
            smoothed_target: None,
            base_visible_range: tuning.base_visible_range,
            visible_box_rows: tuning.visible_box_rows,
            visible_box_rows_hidden: tuning.visible_box_rows_hidden,
            volatility_window: tuning.volatility_window,
            volatility_expansion: tuning.volatility_expansion,
            min_spread_floor: tuning.min_spread_floor,
            range_smoothing: tuning.range_smoothing,
            min_visible_range: tuning.min_visible_range,
            max_visible_range: tuning.max_visible_range,
        }
    }

    fn rows_for(&self, mode: GameMode) -> f64 {
        match mode {
            GameMode::Standard => self.visible_box_rows,
            GameMode::BoxesHidden => self.visible_box_rows_hidden,
        }
    }

    /// One frame step: returns the clamped visible price range.
    pub fn advance(
        &mut self,
        series: &PriceSeries,
        box_height: Option<f64>,
        mode: GameMode,
        vertical_scale: f64,
    ) -> f64 {
        let mut target = self.base_visible_range;

        if let Some(height) = box_height {
            if height.is_finite() && height > 0.0 {
                target = target.max(height * self.rows_for(mode));
            }
        }

        if let Some((min, max)) = series.recent_spread(self.volatility_window) {
            let spread = (max - min).max(self.min_spread_floor);
            target = target.max(spread * self.volatility_expansion);
        }

        let smoothed = match self.smoothed_target {
            Some(prev) => prev * self.range_smoothing + target * (1.0 - self.range_smoothing),
            None => target,
        };
        self.smoothed_target = Some(smoothed);

        let scale = if vertical_scale.is_finite() && vertical_scale > 0.0 {
            vertical_scale
        } else {
            1.0
        };
        (smoothed / scale).clamp(self.min_visible_range, self.max_visible_range)
    }
}
