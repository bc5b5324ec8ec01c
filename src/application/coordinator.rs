use std::cell::RefCell;

use crate::application::engine::ChartEngine;
use crate::domain::chart::config::EngineTuning;
use crate::domain::errors::EngineError;
use crate::domain::logging::{LogComponent, get_logger};

// Global engine instance for host shells that drive a single chart.
thread_local! {
    pub static GLOBAL_ENGINE: RefCell<Option<ChartEngine>> = const { RefCell::new(None) };
}

/// Create (or replace) the global engine instance.
pub fn initialize_global_engine(tuning: EngineTuning) -> Result<(), EngineError> {
    let engine = ChartEngine::new(tuning)?;
    GLOBAL_ENGINE.with(|global| {
        *global.borrow_mut() = Some(engine);
    });
    get_logger().info(LogComponent::Application("Coordinator"), "global engine initialized");
    Ok(())
}

/// Run a closure against the global engine for reading.
pub fn with_engine<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&ChartEngine) -> R,
{
    GLOBAL_ENGINE.with(|global| global.borrow().as_ref().map(f))
}

/// Run a closure against the global engine for mutation.
pub fn with_engine_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut ChartEngine) -> R,
{
    GLOBAL_ENGINE.with(|global| global.borrow_mut().as_mut().map(f))
}
