use super::config::EngineTuning;
use super::culling::WorldBounds;
use super::value_objects::{Camera, ScreenPoint, WorldPoint};

/// Bidirectional mapping between world units (time-index × price) and screen
/// pixels, parameterized by camera position and zoom.
///
/// `screen_x = (world_x - camera.x) * horizontal_scale` and
/// `screen_y = height/2 - (world_y - camera.y) * price_scale`, where
/// `price_scale = (reference_viewport_height / visible_range) * vertical_scale`.
/// The horizontal and vertical scales carry the same zoom factor so grid
/// cells stay square. The price scale references a fixed viewport height, so
/// it depends only on zoom and visible range, never on the real pixel height.
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    width: f64,
    height: f64,
    horizontal_scale: f64,
    vertical_scale: f64,
    price_scale: f64,
    visible_range: f64,
    pixels_per_point: f64,
    reference_viewport_height: f64,
    viewport_ready: bool,
}

impl CoordinateSystem {
    pub fn new(tuning: &EngineTuning) -> Self {
        let mut cs = Self {
            width: 0.0,
            height: 0.0,
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            price_scale: 1.0,
            visible_range: tuning.base_visible_range,
            pixels_per_point: tuning.pixels_per_point,
            reference_viewport_height: tuning.reference_viewport_height,
            viewport_ready: false,
        };
        cs.recompute_price_scale();
        cs
    }

    /// Must be called at least once before any projection is meaningful.
    pub fn update_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
            self.viewport_ready = true;
        }
    }

    pub fn is_viewport_ready(&self) -> bool {
        self.viewport_ready
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.horizontal_scale = zoom;
            self.vertical_scale = zoom;
            self.recompute_price_scale();
        }
    }

    /// Callers clamp upstream; a zero or negative range is dropped here so a
    /// bad frame can never corrupt the transform.
    pub fn set_visible_range(&mut self, range: f64) {
        if range.is_finite() && range > 0.0 {
            self.visible_range = range;
            self.recompute_price_scale();
        }
    }

    fn recompute_price_scale(&mut self) {
        self.price_scale =
            self.reference_viewport_height / self.visible_range * self.vertical_scale;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn horizontal_scale(&self) -> f64 {
        self.horizontal_scale
    }

    pub fn price_scale(&self) -> f64 {
        self.price_scale
    }

    pub fn visible_range(&self) -> f64 {
        self.visible_range
    }

    /// Width of the viewport in world units.
    pub fn viewport_world_width(&self) -> f64 {
        self.width / self.horizontal_scale
    }

    /// Height of the viewport in world (price) units.
    pub fn viewport_world_height(&self) -> f64 {
        self.height / self.price_scale
    }

    pub fn world_to_screen(&self, camera: &Camera, world_x: f64, world_y: f64) -> ScreenPoint {
        ScreenPoint {
            x: (world_x - camera.x) * self.horizontal_scale,
            y: self.height / 2.0 - (world_y - camera.y) * self.price_scale,
        }
    }

    pub fn screen_to_world(&self, camera: &Camera, screen_x: f64, screen_y: f64) -> WorldPoint {
        WorldPoint {
            x: camera.x + screen_x / self.horizontal_scale,
            y: camera.y + (self.height / 2.0 - screen_y) / self.price_scale,
        }
    }

    /// Inverse-project the viewport edges, expanded by `buffer_px` on every
    /// side (converted through the current scales).
    pub fn visible_world_bounds(&self, camera: &Camera, buffer_px: f64) -> WorldBounds {
        let top_left = self.screen_to_world(camera, -buffer_px, -buffer_px);
        let bottom_right =
            self.screen_to_world(camera, self.width + buffer_px, self.height + buffer_px);
        WorldBounds {
            left: top_left.x,
            right: bottom_right.x,
            top: top_left.y,
            bottom: bottom_right.y,
        }
    }

    /// World position of the price point at `index` given the series'
    /// eviction offset.
    pub fn line_position(&self, index: u64, offset: u64, price: f64) -> WorldPoint {
        WorldPoint { x: (index + offset) as f64 * self.pixels_per_point, y: price }
    }
}
