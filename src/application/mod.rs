pub mod coordinator;
pub mod engine;
pub mod interaction;

pub use engine::{ChartEngine, EngineStats};
