//! Zobrist keys for position hashing.
//!
//! One key per (cell, player), one per turn index among the active players,
//! and one per active-mask value. The tables are generated once from a
//! fixed `Pcg64` stream so hashes are stable across runs and platforms.

use std::sync::LazyLock;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

use crate::bitboard::BOARD_CELLS;
use crate::board::Board;

const KEY_STREAM_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    cells: [[u64; 3]; BOARD_CELLS],
    turn: [u64; 3],
    active: [u64; 8],
}

impl ZobristKeys {
    fn new(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut cells = [[0u64; 3]; BOARD_CELLS];
        for cell in cells.iter_mut() {
            for key in cell.iter_mut() {
                *key = rng.next_u64();
            }
        }
        let mut turn = [0u64; 3];
        for key in turn.iter_mut() {
            *key = rng.next_u64();
        }
        let mut active = [0u64; 8];
        for key in active.iter_mut() {
            *key = rng.next_u64();
        }
        ZobristKeys {
            cells,
            turn,
            active,
        }
    }

    #[inline]
    pub fn cell(&self, idx: u8, player: u8) -> u64 {
        self.cells[idx as usize][player as usize]
    }

    /// Key for the mover's index among the active players.
    #[inline]
    pub fn turn(&self, turn_idx: usize) -> u64 {
        self.turn[turn_idx]
    }

    #[inline]
    pub fn active(&self, mask: u8) -> u64 {
        self.active[mask as usize]
    }
}

static KEYS: LazyLock<ZobristKeys> = LazyLock::new(|| ZobristKeys::new(KEY_STREAM_SEED));

pub fn keys() -> &'static ZobristKeys {
    &KEYS
}

/// Hash a position from scratch. `turn_idx` is `None` on terminal states,
/// where there is no mover; the incremental path in `GameState` maintains
/// the same convention.
pub fn hash_position(board: &Board, turn_idx: Option<usize>, active_mask: u8) -> u64 {
    let keys = keys();
    let mut h = keys.active(active_mask);
    if let Some(t) = turn_idx {
        h ^= keys.turn(t);
    }
    for player in 0..3u8 {
        let mut stones = board.stones(player);
        while stones != 0 {
            let idx = stones.trailing_zeros() as u8;
            h ^= keys.cell(idx, player);
            stones &= stones - 1;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tables_are_deterministic() {
        let a = ZobristKeys::new(42);
        let b = ZobristKeys::new(42);
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.turn, b.turn);
        assert_eq!(a.active, b.active);
    }

    #[test]
    fn hash_changes_with_each_component() {
        let mut board = Board::new();
        board.place(0, 0);
        let base = hash_position(&board, Some(0), 0b111);

        assert_ne!(base, hash_position(&board, Some(1), 0b111));
        assert_ne!(base, hash_position(&board, Some(0), 0b011));

        let mut other = board;
        other.place(1, 1);
        assert_ne!(base, hash_position(&other, Some(0), 0b111));
    }
}
