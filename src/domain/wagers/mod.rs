pub mod animation;
pub mod collision;
pub mod entities;
pub mod grid;

pub use animation::{AnimationKind, AnimationTimeline, BoxAnimation};
pub use entities::{BackendBox, BoxStatus, ContractId, GameMode, SelectionPhase};
pub use grid::GridAlignment;
