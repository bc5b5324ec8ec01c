use crate::domain::wagers::{BoxStatus, ContractId, SelectionPhase};

/// ECS component carrying the box's public identifier.
#[derive(Debug, Clone)]
pub struct BoxId(pub ContractId);

/// ECS component distinguishing authoritative boxes from filler placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Backend,
    Filler,
}

/// ECS component for world-space geometry; origin is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub world_x: f64,
    pub world_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn right_edge(&self) -> f64 {
        self.world_x + self.width
    }

    pub fn center(&self) -> (f64, f64) {
        (self.world_x + self.width / 2.0, self.world_y + self.height / 2.0)
    }
}

/// ECS component with the tradable numbers shown on an authoritative box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStake {
    pub value: f64,
    pub total_trades: u64,
    pub user_trade: Option<f64>,
}

/// ECS component for the selection lifecycle. The outcome layers on top of
/// the phase rather than replacing it, so a resolved box stays user-owned.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lifecycle {
    pub phase: SelectionPhase,
    pub outcome: Option<BoxStatus>,
}

/// ECS component caching this frame's clickability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clickable(pub bool);

/// ECS component pinning a filler box to its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillerCell {
    pub ix: i64,
    pub iy: i64,
}
