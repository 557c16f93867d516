//! # Engine Session
//!
//! I/O-free façade over the rules and the search, holding one game state,
//! the shared transposition table, and the session PRNG seed. Front-ends
//! (the CLI here, an FFI worker elsewhere) drive the game exclusively
//! through these operations.

use std::sync::Arc;

use crate::bitboard::{wins_and_losses, Bitboard, BOARD_CELLS};
use crate::board::Move;
use crate::error::{EngineError, EngineResult};
use crate::mcts::{MctsPlayer, DEFAULT_ITERATIONS};
use crate::state::GameState;
use crate::transposition::TranspositionTable;

/// Snapshot of the observable game state, shaped for rendering front-ends.
#[derive(Clone, Copy, Debug)]
pub struct BoardView {
    /// Per-player stone masks.
    pub p: [Bitboard; 3],
    pub player_id: i8,
    pub active_mask: u8,
    pub forced_moves: Bitboard,
    /// Cells of the winner's four-in-a-row, when the game is won.
    pub winning_bits: Bitboard,
    /// Cells of each eliminated player's three-in-a-row.
    pub losing_bits: Bitboard,
    pub winner_id: i8,
    pub terminal: bool,
}

pub struct Engine {
    state: GameState,
    table: Arc<TranspositionTable>,
    ai: MctsPlayer,
    seed: u64,
}

impl Engine {
    pub fn new() -> Self {
        let table = Arc::new(TranspositionTable::default());
        let ai = MctsPlayer::new(Arc::clone(&table), DEFAULT_ITERATIONS);
        Engine {
            state: GameState::initial(),
            table,
            ai,
            seed: 0,
        }
    }

    /// Start a fresh game. Seed 0 picks an arbitrary nonzero seed; the
    /// transposition table is cleared so the search starts cold. Returns
    /// the root position hash.
    pub fn new_game(&mut self, seed: u64) -> u64 {
        self.seed = if seed == 0 {
            rand::random::<u64>() | 1
        } else {
            seed
        };
        self.ai.set_seed(self.seed);
        self.table.clear();
        self.state = GameState::initial();
        self.state.hash
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ai_mut(&mut self) -> &mut MctsPlayer {
        &mut self.ai
    }

    /// Play `cell` for the current mover. Rejects out-of-range, occupied,
    /// and forced-rule-violating cells without touching the state. Returns
    /// the new position hash.
    pub fn apply_move(&mut self, cell: u8) -> EngineResult<u64> {
        if cell as usize >= BOARD_CELLS {
            return Err(EngineError::OutOfRange { cell });
        }
        if self.state.is_terminal().1 {
            return Err(EngineError::GameOver);
        }
        let mask = 1u64 << cell;
        if self.state.board.occupied & mask != 0 {
            return Err(EngineError::OccupiedCell { cell });
        }
        let forced = self.state.forced();
        if forced != 0 && forced & mask == 0 {
            return Err(EngineError::NotForced { cell });
        }
        self.state.apply_move(Move::from_index(cell));
        Ok(self.state.hash)
    }

    /// Forced-move mask for the current mover; zero when unrestricted.
    pub fn forced_moves(&self) -> Bitboard {
        self.state.forced()
    }

    /// Ask the search for a move. `None` on a finished game. A lone forced
    /// cell short-circuits the search.
    pub fn best_move(&mut self, iterations: Option<usize>) -> Option<u8> {
        if self.state.is_terminal().1 {
            return None;
        }
        let forced = self.state.forced();
        if forced.count_ones() == 1 {
            return Some(forced.trailing_zeros() as u8);
        }
        self.ai.iterations = iterations.unwrap_or(DEFAULT_ITERATIONS);
        let active = self.state.active_ids();
        let mv = self
            .ai
            .get_move(&self.state.board, &active, self.state.turn_idx());
        Some(mv.to_index())
    }

    /// Observable snapshot: stone masks, mover, forced cells, and the
    /// decorations front-ends highlight. Winning/losing run cells are
    /// recovered by running the threat extractor over a player's own
    /// stones, which flags exactly the stones participating in a completed
    /// run.
    pub fn board_view(&self) -> BoardView {
        let (winner_id, terminal) = self.state.is_terminal();
        let mut winning_bits = 0;
        let mut losing_bits = 0;
        for p in 0..3u8 {
            let eliminated = self.state.active_mask & (1 << p) == 0;
            let is_winner = terminal && winner_id == p as i8;
            if eliminated || is_winner {
                let stones = self.state.board.stones(p);
                let (w, l) = wins_and_losses(stones, stones);
                if is_winner {
                    winning_bits |= w;
                }
                if eliminated {
                    losing_bits |= l;
                }
            }
        }
        BoardView {
            p: self.state.board.p,
            player_id: self.state.player_id,
            active_mask: self.state.active_mask,
            forced_moves: self.state.forced(),
            winning_bits,
            losing_bits,
            winner_id,
            terminal,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
