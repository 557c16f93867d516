//! Three-player Squava engine.
//!
//! 8x8 board, four-in-a-row wins outright, three-in-a-row eliminates the
//! forming player, play continues clockwise among the survivors. The crate
//! provides the bitboard rules kernel, a Monte-Carlo Tree Search with a
//! shared transposition table, and an I/O-free session façade consumed by
//! front-ends.

// Rules kernel
pub mod bitboard; // Masks and the branchless threat extractor
pub mod board; // Position, moves, forced-move rule
pub mod state; // Full game state and its successor function
pub mod zobrist; // Position hashing keys

// Search
pub mod mcts; // UCT search over the position graph
pub mod node; // Search node statistics
pub mod transposition; // Shared node cache

// Session surface
pub mod engine; // I/O-free façade for front-ends
pub mod error;
pub mod notation; // Algebraic cell names

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod transposition_tests;

pub use board::{Board, Move};
pub use engine::{BoardView, Engine};
pub use error::{EngineError, EngineResult};
pub use mcts::MctsPlayer;
pub use state::GameState;
pub use transposition::TranspositionTable;
