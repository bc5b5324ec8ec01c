/// Simplified error system - no over-engineering!
///
/// The per-frame path never returns errors; malformed numeric input is
/// dropped defensively where it arrives. `EngineError` only shows up at the
/// validation seams: tuning validation and feed payload conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    ConfigError(String),
    FeedError(String),
    ValidationError(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::ConfigError(msg) => write!(f, "Config Error: {}", msg),
            EngineError::FeedError(msg) => write!(f, "Feed Error: {}", msg),
            EngineError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

// Simple convenience type aliases
pub type FeedResult<T> = Result<T, EngineError>;
pub type ConfigResult<T> = Result<T, EngineError>;
