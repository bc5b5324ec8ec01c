use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::errors::{EngineError, FeedResult};
use crate::domain::market_data::PricePoint;
use crate::domain::wagers::{BackendBox, BoxStatus, ContractId};

/// DTO for one price tick pushed by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceTickDto {
    pub price: f64,
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl PriceTickDto {
    /// Convert the DTO into the domain entity.
    pub fn to_domain(&self) -> FeedResult<PricePoint> {
        if !self.price.is_finite() {
            return Err(EngineError::FeedError(format!("non-finite price: {}", self.price)));
        }
        Ok(match self.timestamp {
            Some(ts) => PricePoint::at(self.price, ts),
            None => PricePoint::bare(self.price),
        })
    }
}

/// DTO for one contract inside a box snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractDto {
    #[serde(rename = "worldX")]
    pub world_x: f64,
    #[serde(rename = "worldY")]
    pub world_y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    #[serde(rename = "totalTrades", default)]
    pub total_trades: u64,
    #[serde(rename = "userTrade", default)]
    pub user_trade: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ContractDto {
    /// Convert the DTO into the domain entity.
    pub fn to_domain(&self, id: &str) -> FeedResult<BackendBox> {
        if id.is_empty() {
            return Err(EngineError::ValidationError("contract id cannot be empty".into()));
        }
        for (name, v) in [
            ("worldX", self.world_x),
            ("worldY", self.world_y),
            ("width", self.width),
            ("height", self.height),
            ("value", self.value),
        ] {
            if !v.is_finite() {
                return Err(EngineError::FeedError(format!(
                    "contract {}: non-finite {}: {}",
                    id, name, v
                )));
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(EngineError::FeedError(format!(
                "contract {}: degenerate geometry {}x{}",
                id, self.width, self.height
            )));
        }
        let status = match &self.status {
            Some(raw) => Some(BoxStatus::from_str(raw).map_err(|_| {
                EngineError::FeedError(format!("contract {}: unknown status {:?}", id, raw))
            })?),
            None => None,
        };
        Ok(BackendBox {
            id: ContractId::from(id),
            world_x: self.world_x,
            world_y: self.world_y,
            width: self.width,
            height: self.height,
            value: self.value,
            total_trades: self.total_trades,
            user_trade: self.user_trade,
            status,
        })
    }
}

/// DTO for the full snapshot message.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxSnapshotDto {
    pub contracts: HashMap<String, ContractDto>,
}

/// Parse a snapshot payload into the id→box map consumed by
/// `ChartEngine::update_multipliers`.
pub fn parse_snapshot(json: &str) -> FeedResult<HashMap<ContractId, BackendBox>> {
    let dto: BoxSnapshotDto = serde_json::from_str(json)
        .map_err(|e| EngineError::FeedError(format!("snapshot parse failed: {}", e)))?;

    let mut snapshot = HashMap::with_capacity(dto.contracts.len());
    for (id, contract) in &dto.contracts {
        let backend_box = contract.to_domain(id)?;
        snapshot.insert(backend_box.id.clone(), backend_box);
    }
    Ok(snapshot)
}

/// Parse a single tick payload.
pub fn parse_tick(json: &str) -> FeedResult<PricePoint> {
    let dto: PriceTickDto = serde_json::from_str(json)
        .map_err(|e| EngineError::FeedError(format!("tick parse failed: {}", e)))?;
    dto.to_domain()
}
