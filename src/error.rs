//! Error types for the search engine
//!
//! All errors are reported synchronously to the caller; nothing is retried
//! internally and no error is fatal to the process.

use thiserror::Error;

/// Errors surfaced at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Move targets an occupied cell or a finished game.
    #[error("illegal move at ({row}, {col}): cell occupied or game over")]
    IllegalMove { row: u8, col: u8 },

    /// Malformed or already-terminal board passed to a top-level search.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// Comparison requested with an empty algorithm list.
    #[error("comparison requested with no algorithms")]
    NoAlgorithms,

    /// Unrecognized algorithm identifier.
    #[error("unknown algorithm id: {0:?}")]
    UnknownAlgorithm(String),
}
