//! Full position state: board, mover, active-player mask, cached Zobrist
//! hash and cached winner, with the successor function `apply_move`.

use crate::bitboard::{Bitboard, FULL};
use crate::board::{forced_moves, Board, Move, PlayerList};
use crate::zobrist;

/// Sentinel for "no player": non-terminal winner, or the mover of a
/// terminal state.
pub const NO_PLAYER: i8 = -1;

/// Next set bit of `mask` strictly after `player`, cyclically.
///
/// Serves both the normal advance (the mover's own bit is still set but is
/// skipped) and the post-elimination advance (the mover's bit was just
/// cleared, so the successor is whoever follows the vacated seat).
#[inline]
pub fn next_active(mask: u8, player: u8) -> u8 {
    let higher = mask >> (player + 1);
    if higher != 0 {
        player + 1 + higher.trailing_zeros() as u8
    } else {
        mask.trailing_zeros() as u8
    }
}

/// Index of `player` among the set bits of `mask`.
#[inline]
pub fn turn_index(mask: u8, player: u8) -> usize {
    (mask & ((1u8 << player) - 1)).count_ones() as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Player to move, or [`NO_PLAYER`] once the state is terminal.
    pub player_id: i8,
    /// Bit `i` set iff player `i` has not been eliminated.
    pub active_mask: u8,
    pub hash: u64,
    /// Winning player, or [`NO_PLAYER`] while undecided (and on draws).
    pub winner_id: i8,
}

impl GameState {
    /// Build a state from its components, deriving the cached winner and
    /// hash. `player_id` must be an active player unless the position is
    /// already decided.
    pub fn new(board: Board, player_id: u8, active_mask: u8) -> Self {
        let mut winner_id = NO_PLAYER;
        for p in 0..3u8 {
            if active_mask & (1 << p) != 0 && board.check_player(p).0 {
                winner_id = p as i8;
                break;
            }
        }
        if winner_id < 0 && active_mask.count_ones() == 1 {
            winner_id = active_mask.trailing_zeros() as i8;
        }
        let terminal = winner_id >= 0;
        let hash = zobrist::hash_position(
            &board,
            (!terminal).then(|| turn_index(active_mask, player_id)),
            active_mask,
        );
        GameState {
            board,
            player_id: if terminal { NO_PLAYER } else { player_id as i8 },
            active_mask,
            hash,
            winner_id,
        }
    }

    /// Fresh three-player game, player 0 to move.
    pub fn initial() -> Self {
        GameState::new(Board::new(), 0, 0b111)
    }

    /// Active player ids in clockwise order.
    pub fn active_ids(&self) -> PlayerList {
        let mut ids = PlayerList::new();
        for p in 0..3u8 {
            if self.active_mask & (1 << p) != 0 {
                ids.push(p);
            }
        }
        ids
    }

    /// The mover's index among the active players.
    #[inline]
    pub fn turn_idx(&self) -> usize {
        turn_index(self.active_mask, self.player_id as u8)
    }

    /// Forced-move mask for the current mover; zero when unrestricted or
    /// terminal.
    pub fn forced(&self) -> Bitboard {
        if self.player_id < 0 {
            return 0;
        }
        forced_moves(&self.board, &self.active_ids(), self.turn_idx())
    }

    /// Cells the mover may legally occupy: the forced set when one exists,
    /// otherwise every empty cell.
    pub fn legal_mask(&self) -> Bitboard {
        let forced = self.forced();
        if forced != 0 {
            forced
        } else {
            self.board.empty()
        }
    }

    /// Play `mv` for the current mover.
    ///
    /// Four-in-a-row wins outright (and takes priority over a simultaneous
    /// three-in-a-row); three-in-a-row eliminates the mover, with the last
    /// surviving player declared winner; otherwise the turn passes
    /// clockwise. The cached hash is maintained incrementally: metadata
    /// keys out, the placed stone in, the new metadata keys back in (no
    /// turn key once terminal).
    ///
    /// The caller must ensure the state is non-terminal and `mv` targets an
    /// empty cell; forced-move legality is the caller's contract.
    pub fn apply_move(&mut self, mv: Move) {
        let keys = zobrist::keys();
        let pid = self.player_id as u8;
        let idx = mv.to_index();
        debug_assert!(self.player_id >= 0, "move applied to terminal state");
        debug_assert!(self.board.empty() & (1 << idx) != 0);

        self.hash ^= keys.turn(self.turn_idx()) ^ keys.active(self.active_mask);
        self.board.place(idx, pid);
        self.hash ^= keys.cell(idx, pid);

        let (won, lost) = self.board.check_player(pid);
        if won {
            self.winner_id = pid as i8;
            self.player_id = NO_PLAYER;
            self.hash ^= keys.active(self.active_mask);
        } else if lost {
            self.active_mask &= !(1 << pid);
            if self.active_mask.count_ones() == 1 {
                self.winner_id = self.active_mask.trailing_zeros() as i8;
                self.player_id = NO_PLAYER;
                self.hash ^= keys.active(self.active_mask);
            } else {
                self.advance(pid, keys);
            }
        } else {
            self.advance(pid, keys);
        }
    }

    #[inline]
    fn advance(&mut self, after: u8, keys: &zobrist::ZobristKeys) {
        let next = next_active(self.active_mask, after);
        self.player_id = next as i8;
        self.hash ^=
            keys.turn(turn_index(self.active_mask, next)) ^ keys.active(self.active_mask);
    }

    /// `(winner_or_minus_one, is_terminal)`; a full board with no winner is
    /// a draw.
    pub fn is_terminal(&self) -> (i8, bool) {
        if self.winner_id >= 0 {
            (self.winner_id, true)
        } else if self.board.occupied == FULL {
            (NO_PLAYER, true)
        } else {
            (NO_PLAYER, false)
        }
    }
}
