// sink/mod.rs
pub mod client;
pub mod errors;
pub mod statement;

// Re-export main interfaces for easy access
pub use client::{QuestDbClient, Sink};
pub use errors::SinkError;
pub use statement::{InsertStatement, POSITIONS_TABLE_DDL};
