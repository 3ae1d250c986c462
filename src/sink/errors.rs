// =================================================================
// sink/errors.rs - Sink Error Types
// =================================================================

use thiserror::Error;

/// Failures observed while submitting a statement to the sink.
///
/// Only `Unreachable` is transient; everything else indicates a
/// schema/data problem that a pause will not fix.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The sink answered and rejected the statement (SQL error or
    /// non-success HTTP status)
    #[error("statement rejected by sink: {0}")]
    Rejected(String),

    /// The sink could not be reached at all
    #[error("sink unreachable: {0}")]
    Unreachable(String),

    /// The sink answered with something we could not interpret
    #[error("unexpected sink response: {0}")]
    Unexpected(String),
}
