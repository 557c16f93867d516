//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the engine façade. Every variant leaves the game
/// state untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Cell index outside `0..64`.
    #[error("cell index {cell} out of range (must be 0-63)")]
    OutOfRange { cell: u8 },

    /// Target cell already holds a stone.
    #[error("cell {cell} is already occupied")]
    OccupiedCell { cell: u8 },

    /// A forced-move set exists and the cell is not in it.
    #[error("cell {cell} ignores a forced move (block the threat or win)")]
    NotForced { cell: u8 },

    /// Move submitted after the game ended.
    #[error("the game is over")]
    GameOver,
}

pub type EngineResult<T> = Result<T, EngineError>;
