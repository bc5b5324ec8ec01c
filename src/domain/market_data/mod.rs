pub mod entities;
pub mod value_objects;

pub use entities::PriceSeries;
pub use value_objects::{Price, PricePoint, Timestamp};
