pub use super::value_objects::{Price, PricePoint, Timestamp};
use crate::domain::chart::config::EngineTuning;
use crate::domain::logging::LogComponent;
use std::collections::VecDeque;

/// Anchor used to resolve timestamp↔world-X conversions while the camera is
/// panned away from the live edge. Freezing pins the mapping so axis labels
/// and box positions do not drift as new ticks arrive.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrozenReference {
    world_x: f64,
    timestamp: f64,
}

/// Domain entity - bounded, smoothed price history.
///
/// Points are stored oldest-first. Eviction on overflow increments a
/// monotonic `data_offset` so the world-X of every retained point is stable
/// for the lifetime of the session: the world-X of the point at local index
/// `i` is always `(data_offset + i) * pixels_per_point`.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: VecDeque<PricePoint>,
    max_size: usize,
    data_offset: u64,
    ms_per_point: f64,
    last_timestamp: Option<f64>,
    frozen: Option<FrozenReference>,
    price_smoothing: f64,
    ms_per_point_smoothing: f64,
    feed_gap_ms: f64,
    min_ms_per_point: f64,
    pixels_per_point: f64,
}

impl PriceSeries {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self {
            points: VecDeque::new(),
            max_size: tuning.price_history_cap,
            data_offset: 0,
            ms_per_point: tuning.default_ms_per_point,
            last_timestamp: None,
            frozen: None,
            price_smoothing: tuning.price_smoothing,
            ms_per_point_smoothing: tuning.ms_per_point_smoothing,
            feed_gap_ms: tuning.feed_gap_ms,
            min_ms_per_point: tuning.min_ms_per_point,
            pixels_per_point: tuning.pixels_per_point,
        }
    }

    /// Ingest one tick. Non-finite prices are dropped, leaving prior state
    /// untouched.
    pub fn add_price_data(&mut self, point: PricePoint) {
        if !point.price.is_finite() {
            crate::log_warn!(
                LogComponent::Domain("PriceSeries"),
                "dropping non-finite price tick: {:?}",
                point.price
            );
            return;
        }

        let smoothed = match self.points.back() {
            Some(prev) => {
                let a = self.price_smoothing;
                prev.price.value() * (1.0 - a) + point.price.value() * a
            }
            None => point.price.value(),
        };

        if let Some(ts) = point.timestamp {
            self.update_point_spacing(ts.as_f64());
            self.last_timestamp = Some(ts.as_f64());
        }

        self.points.push_back(PricePoint { price: Price::from(smoothed), ..point });

        if self.points.len() > self.max_size {
            self.points.pop_front();
            self.data_offset += 1;
        }
    }

    /// Smoothed estimate of milliseconds between consecutive points. Gaps
    /// longer than the configured feed-gap threshold are treated as feed
    /// hiccups and ignored.
    fn update_point_spacing(&mut self, timestamp: f64) {
        if let Some(last) = self.last_timestamp {
            let delta = timestamp - last;
            if delta > 0.0 && delta <= self.feed_gap_ms {
                let b = self.ms_per_point_smoothing;
                self.ms_per_point =
                    (self.ms_per_point * b + delta * (1.0 - b)).max(self.min_ms_per_point);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    pub fn ms_per_point(&self) -> f64 {
        self.ms_per_point
    }

    pub fn points(&self) -> &VecDeque<PricePoint> {
        &self.points
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.points.back().map(|p| p.price.value())
    }

    /// World-X of the point at local index `i` (0 = oldest retained).
    pub fn world_x_at(&self, index: usize) -> f64 {
        (self.data_offset + index as u64) as f64 * self.pixels_per_point
    }

    /// World-X of the most recent point - the "now line". 0.0 before any
    /// data has arrived.
    pub fn now_world_x(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.world_x_at(self.points.len() - 1)
    }

    /// Pin timestamp↔world-X conversions to the current live edge.
    /// No-op when the series is empty or the anchor is already frozen.
    pub fn freeze_reference_point(&mut self) {
        if self.frozen.is_some() {
            return;
        }
        if let Some(ts) = self.last_timestamp {
            self.frozen = Some(FrozenReference { world_x: self.now_world_x(), timestamp: ts });
        }
    }

    pub fn unfreeze_reference_point(&mut self) {
        self.frozen = None;
    }

    pub fn is_reference_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    fn anchor(&self) -> Option<FrozenReference> {
        if let Some(frozen) = self.frozen {
            return Some(frozen);
        }
        self.last_timestamp
            .map(|ts| FrozenReference { world_x: self.now_world_x(), timestamp: ts })
    }

    /// Linear extrapolation from the anchor point using the current spacing
    /// estimate. Returns `None` until a timestamped tick has arrived.
    pub fn world_x_for_timestamp(&self, timestamp: f64) -> Option<f64> {
        let anchor = self.anchor()?;
        Some(anchor.world_x + (timestamp - anchor.timestamp) / self.ms_per_point * self.pixels_per_point)
    }

    /// Inverse of [`Self::world_x_for_timestamp`].
    pub fn timestamp_for_world_x(&self, world_x: f64) -> Option<f64> {
        let anchor = self.anchor()?;
        Some(anchor.timestamp + (world_x - anchor.world_x) / self.pixels_per_point * self.ms_per_point)
    }

    /// Min/max price over the most recent `window` points.
    pub fn recent_spread(&self, window: usize) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let start = self.points.len().saturating_sub(window);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in self.points.iter().skip(start) {
            let p = point.price.value();
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }
}
