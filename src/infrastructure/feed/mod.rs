pub mod dto;

pub use dto::{parse_snapshot, parse_tick};
