use super::entities::BackendBox;
use crate::domain::chart::culling::WorldBounds;

/// Frozen grid alignment for the filler generator.
///
/// Computed exactly once from the first authoritative box and never again:
/// `(offset_x, offset_y) = (box.world_x mod width, box.world_y mod height)`.
/// Recomputing it later would shift every filler box already on screen as
/// old authoritative boxes get evicted, so construction is the only way to
/// obtain a value and there is no mutator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAlignment {
    offset_x: f64,
    offset_y: f64,
    box_width: f64,
    box_height: f64,
}

/// Inclusive cell-index window covering a world rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub x0: i64,
    pub x1: i64,
    pub y0: i64,
    pub y1: i64,
}

impl CellRange {
    pub fn cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let ys = self.y0..=self.y1;
        (self.x0..=self.x1).flat_map(move |ix| ys.clone().map(move |iy| (ix, iy)))
    }

    pub fn len(&self) -> usize {
        if self.x1 < self.x0 || self.y1 < self.y0 {
            return 0;
        }
        ((self.x1 - self.x0 + 1) * (self.y1 - self.y0 + 1)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GridAlignment {
    /// The one-shot initializer; `None` when the reference box geometry is
    /// degenerate.
    pub fn from_reference_box(reference: &BackendBox) -> Option<Self> {
        if !(reference.width.is_finite() && reference.width > 0.0)
            || !(reference.height.is_finite() && reference.height > 0.0)
        {
            return None;
        }
        Some(Self {
            offset_x: reference.world_x.rem_euclid(reference.width),
            offset_y: reference.world_y.rem_euclid(reference.height),
            box_width: reference.width,
            box_height: reference.height,
        })
    }

    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    pub fn box_height(&self) -> f64 {
        self.box_height
    }

    /// Cell index containing the world point.
    pub fn cell_of(&self, world_x: f64, world_y: f64) -> (i64, i64) {
        (
            ((world_x - self.offset_x) / self.box_width).floor() as i64,
            ((world_y - self.offset_y) / self.box_height).floor() as i64,
        )
    }

    /// Bottom-left world corner of a cell.
    pub fn cell_origin(&self, ix: i64, iy: i64) -> (f64, f64) {
        (ix as f64 * self.box_width + self.offset_x, iy as f64 * self.box_height + self.offset_y)
    }

    /// Cells whose rectangles overlap `bounds`.
    pub fn cells_in(&self, bounds: &WorldBounds) -> CellRange {
        let (x0, y0) = self.cell_of(bounds.left, bounds.bottom);
        let (x1, y1) = self.cell_of(bounds.right, bounds.top);
        CellRange { x0, x1, y0, y1 }
    }

    /// Cells covered by a box rectangle. Edges landing exactly on a grid
    /// line do not claim the next cell over.
    pub fn cells_covering_rect(&self, x: f64, y: f64, width: f64, height: f64) -> CellRange {
        let (x0, y0) = self.cell_of(x, y);
        let eps = 1e-9;
        let (x1, y1) = self
            .cell_of(x + width - eps * self.box_width, y + height - eps * self.box_height);
        CellRange { x0, x1, y0, y1 }
    }

    /// Cells covered by an authoritative box.
    pub fn cells_covered_by(&self, b: &BackendBox) -> CellRange {
        self.cells_covering_rect(b.world_x, b.world_y, b.width, b.height)
    }
}
