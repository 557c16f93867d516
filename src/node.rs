//! Search-tree node with atomic statistics.
//!
//! Nodes are keyed by position hash and shared through the transposition
//! table, so one node may sit under several parents. Statistics use atomics
//! so a future parallel search can update them without a tree-wide lock;
//! tree edges sit behind small mutexes.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::board::{moves_from_mask, Move};
use crate::state::GameState;

pub struct SearchNode {
    pub state: GameState,
    visits: AtomicU32,
    /// Rollout wins credited to each player at this position.
    wins: [AtomicU32; 3],
    /// Moves not yet expanded, drawn from the forced set when one exists,
    /// otherwise every empty cell. Drained in arbitrary order.
    pub untried: Mutex<Vec<Move>>,
    /// Expanded edges in insertion order.
    pub children: Mutex<Vec<(Move, Arc<SearchNode>)>>,
}

impl SearchNode {
    pub fn new(state: GameState) -> Self {
        let untried = if state.is_terminal().1 {
            Vec::new()
        } else {
            moves_from_mask(state.legal_mask())
        };
        SearchNode {
            state,
            visits: AtomicU32::new(0),
            wins: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
            untried: Mutex::new(untried),
            children: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn wins_for(&self, player: u8) -> u32 {
        self.wins[player as usize].load(Ordering::Relaxed)
    }

    /// Record one rollout outcome: a visit, plus a win for `winner` when
    /// the rollout was not a draw.
    pub fn record(&self, winner: i8) {
        self.visits.fetch_add(1, Ordering::Relaxed);
        if winner >= 0 {
            self.wins[winner as usize].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// UCT score of this node as a child choice for `chooser` (the mover at
    /// the parent). Unvisited nodes score infinite so every child is tried
    /// once before any is revisited.
    pub fn uct_score(&self, chooser: u8, parent_visits: u32, exploration: f64) -> f64 {
        let n = self.visits();
        if n == 0 {
            return f64::INFINITY;
        }
        let q = self.wins_for(chooser) as f64 / n as f64;
        q + exploration * ((parent_visits as f64).ln() / n as f64).sqrt()
    }

    pub fn has_untried(&self) -> bool {
        !self.untried.lock().unwrap().is_empty()
    }
}
