use crate::domain::logging::{LogComponent, get_logger};

pub mod application;
pub mod domain;
pub mod ecs;
pub mod infrastructure;

pub use application::engine::ChartEngine;
pub use domain::chart::config::EngineTuning;
pub use domain::events::CoreEvent;
pub use domain::market_data::{Price, PricePoint, Timestamp};
pub use domain::wagers::{BackendBox, BoxStatus, ContractId, GameMode};

/// Initialize the engine's global services (logger + time provider).
///
/// Safe to call more than once; only the first call wins.
pub fn initialize() {
    let stderr_logger = Box::new(infrastructure::services::StderrLogger::new_development());
    domain::logging::init_logger(stderr_logger);

    let time_provider = Box::new(infrastructure::services::SystemTimeProvider::new());
    domain::logging::init_time_provider(time_provider);

    get_logger().info(
        LogComponent::Presentation("Initialize"),
        "🚀 Engine services initialized",
    );
}
