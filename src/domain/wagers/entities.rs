use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Opaque contract identifier assigned by the backend feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ContractId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContractId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Authoritative outcome of a resolved box, stamped by the feed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum BoxStatus {
    #[strum(serialize = "hit")]
    #[serde(rename = "hit")]
    Hit,
    #[strum(serialize = "missed")]
    #[serde(rename = "missed")]
    Missed,
}

/// Game presentation mode. Hidden-box rounds widen the visible price range
/// and demand a larger clickability buffer ahead of the now line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum GameMode {
    #[strum(serialize = "standard")]
    #[serde(rename = "standard")]
    Standard,
    #[strum(serialize = "boxes-hidden")]
    #[serde(rename = "boxes-hidden")]
    BoxesHidden,
}

/// Where a box sits in its selection lifecycle.
///
/// `Pending` means the user clicked and the wager is in flight; `Selected`
/// means the backend confirmed it. A resolved box keeps `Selected` with the
/// outcome layered on top, so it stays user-owned for rendering. Modeling
/// this as a single tag per entity makes "at most one active state"
/// structural rather than conventional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
pub enum SelectionPhase {
    #[default]
    #[strum(serialize = "idle")]
    Idle,
    #[strum(serialize = "highlighted")]
    Highlighted,
    #[strum(serialize = "pending")]
    Pending,
    #[strum(serialize = "selected")]
    Selected,
}

/// One authoritative box record as merged from the feed snapshot.
/// `world_x`/`world_y` are the bottom-left corner in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendBox {
    pub id: ContractId,
    pub world_x: f64,
    pub world_y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    pub total_trades: u64,
    pub user_trade: Option<f64>,
    pub status: Option<BoxStatus>,
}

impl BackendBox {
    pub fn right_edge(&self) -> f64 {
        self.world_x + self.width
    }
}
