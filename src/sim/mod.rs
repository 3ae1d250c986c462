// sim/mod.rs
pub mod generator;
pub mod types;

pub use generator::PositionGenerator;
pub use types::{InstrumentClass, Position, PositionSide};
