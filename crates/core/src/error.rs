//! Error types shared by the engine and configuration layers.

use thiserror::Error;

/// Errors raised while building core values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A row or column outside the 3×3 board.
    #[error("coordinate ({row}, {col}) is off the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// A row-major cell index outside `0..9`.
    #[error("cell index {0} is off the board")]
    InvalidIndex(usize),

    /// A configuration value that loaded but cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why the engine refused a move. Refusals leave all state untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The requested coordinates are not on the board.
    #[error("cell is off the board")]
    OutOfBounds,

    /// The target cell already holds a mark.
    #[error("cell is already occupied")]
    Occupied,

    /// The game has already been won or tied.
    #[error("game is already over")]
    GameOver,
}
