//! Error types for the core crate

use crate::board::Cell;

/// Errors raised while building or loading core services
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("({x}, {y}) is not a cell on the board")]
    InvalidCell { x: u8, y: u8 },

    #[error("no path between {a} and {b} on the board graph")]
    UnreachablePair { a: Cell, b: Cell },

    #[error("distance table has no entry for {a} -> {b}")]
    MissingDistance { a: Cell, b: Cell },

    #[error("distance table is asymmetric for {a} <-> {b}: {forward} vs {backward}")]
    AsymmetricDistance {
        a: Cell,
        b: Cell,
        forward: u8,
        backward: u8,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
