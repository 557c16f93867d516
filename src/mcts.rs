//! # Monte Carlo Tree Search
//!
//! Visit-weighted UCT search over a position graph. Because positions
//! reached by different move orders share nodes through the transposition
//! table, the "tree" is a DAG; each iteration therefore records its own
//! selection path on a stack and backpropagates along that, never through
//! parent pointers.
//!
//! ## Phases
//!
//! 1. **Selection** — descend while the node is fully expanded and has
//!    children, taking the child with the best UCT score from the
//!    perspective of the mover at the current node. Unvisited children win
//!    outright; ties keep the earliest edge.
//! 2. **Expansion** — pop a random untried move, apply it, and fetch or
//!    install the child in the transposition table.
//! 3. **Simulation** — play random moves under the forced-move policy
//!    (block-or-win when the next player threatens) until the game ends.
//! 4. **Backpropagation** — along the recorded path, count the visit and
//!    credit the rollout winner in each node's per-player accumulator.
//!
//! Move generation honors the forced-move rule at every node, so the
//! untried/children sets already encode the legal-move restriction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitboard::{nth_set_bit, wins_and_losses};
use crate::board::{forced_moves, Board, Move};
use crate::node::SearchNode;
use crate::state::GameState;
use crate::transposition::TranspositionTable;

pub const DEFAULT_ITERATIONS: usize = 10_000;

pub struct MctsPlayer {
    pub iterations: usize,
    pub exploration: f64,
    pub verbose: bool,
    /// Soft search deadline; when it passes, the best move found so far is
    /// returned.
    pub deadline: Option<Duration>,
    table: Arc<TranspositionTable>,
    rng: StdRng,
}

impl MctsPlayer {
    pub fn new(table: Arc<TranspositionTable>, iterations: usize) -> Self {
        MctsPlayer {
            iterations,
            exploration: std::f64::consts::SQRT_2,
            verbose: false,
            deadline: None,
            table,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reseed the rollout generator for reproducible searches.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Choose a move for the player at `turn_idx` of the clockwise active
    /// list.
    ///
    /// Fast paths skip the search entirely: a single forced cell is played
    /// immediately, and an immediate win is taken (lowest cell first). On a
    /// degenerate call (terminal position) the lowest empty cell is
    /// returned as a last resort; callers are expected not to ask.
    pub fn get_move(&mut self, board: &Board, active: &[u8], turn_idx: usize) -> Move {
        let mover = active[turn_idx];
        let empty = board.empty();
        let forced = forced_moves(board, active, turn_idx);

        if forced.count_ones() == 1 {
            return Move::from_index(forced.trailing_zeros() as u8);
        }
        let my_wins = wins_and_losses(board.stones(mover), empty).0;
        if my_wins != 0 {
            return Move::from_index(my_wins.trailing_zeros() as u8);
        }

        let mut active_mask = 0u8;
        for &id in active {
            active_mask |= 1 << id;
        }
        let root_state = GameState::new(*board, mover, active_mask);
        if root_state.is_terminal().1 || empty == 0 {
            return fallback_move(forced, empty);
        }

        let root = self
            .table
            .get_or_insert(root_state.hash, || Arc::new(SearchNode::new(root_state)));

        let start = Instant::now();
        let mut completed = 0usize;
        for _ in 0..self.iterations {
            if let Some(limit) = self.deadline {
                if start.elapsed() >= limit {
                    break;
                }
            }
            self.run_iteration(&root);
            completed += 1;
        }

        if self.verbose {
            let elapsed = start.elapsed();
            log::info!(
                "mcts: {} iterations in {:.2}s ({:.0} iter/s), {} root children, {} root visits",
                completed,
                elapsed.as_secs_f64(),
                completed as f64 / elapsed.as_secs_f64().max(1e-9),
                root.children.lock().unwrap().len(),
                root.visits(),
            );
        }

        let children = root.children.lock().unwrap();
        if children.is_empty() {
            return fallback_move(forced, empty);
        }
        let mut best = &children[0];
        for edge in children.iter().skip(1) {
            if edge.1.visits() > best.1.visits() {
                best = edge;
            }
        }
        best.0
    }

    /// One selection / expansion / simulation / backpropagation pass.
    fn run_iteration(&mut self, root: &Arc<SearchNode>) {
        let mut path: Vec<Arc<SearchNode>> = vec![Arc::clone(root)];

        // Selection
        loop {
            let node = Arc::clone(path.last().unwrap());
            if node.has_untried() {
                break;
            }
            let children = node.children.lock().unwrap();
            if children.is_empty() {
                break;
            }
            let chooser = node.state.player_id as u8;
            let parent_visits = node.visits();
            let mut best = &children[0];
            let mut best_score = best.1.uct_score(chooser, parent_visits, self.exploration);
            for edge in children.iter().skip(1) {
                let score = edge.1.uct_score(chooser, parent_visits, self.exploration);
                if score > best_score {
                    best = edge;
                    best_score = score;
                }
            }
            let next = Arc::clone(&best.1);
            drop(children);
            path.push(next);
        }

        // Expansion
        let leaf = Arc::clone(path.last().unwrap());
        let picked = {
            let mut untried = leaf.untried.lock().unwrap();
            if untried.is_empty() {
                None
            } else {
                let i = self.rng.random_range(0..untried.len());
                Some(untried.swap_remove(i))
            }
        };
        if let Some(mv) = picked {
            let mut child_state = leaf.state;
            child_state.apply_move(mv);
            let child = self
                .table
                .get_or_insert(child_state.hash, || Arc::new(SearchNode::new(child_state)));
            leaf.children.lock().unwrap().push((mv, Arc::clone(&child)));
            path.push(child);
        }

        // Simulation
        let tail = path.last().unwrap();
        let (winner, terminal) = tail.state.is_terminal();
        let result = if terminal {
            winner
        } else {
            self.rollout(tail.state)
        };

        // Backpropagation
        for node in &path {
            node.record(result);
            self.table.record_visit(node.state.hash, node.visits());
        }
    }

    /// Random playout to a terminal state. Each ply draws uniformly from
    /// the mover's legal mask (the forced set when one exists, otherwise
    /// any empty cell). Returns the winner id, or -1 on a draw.
    fn rollout(&mut self, mut state: GameState) -> i8 {
        loop {
            let (winner, terminal) = state.is_terminal();
            if terminal {
                return winner;
            }
            let legal = state.legal_mask();
            let pick = self.rng.random_range(0..legal.count_ones());
            state.apply_move(Move::from_index(nth_set_bit(legal, pick)));
        }
    }
}

/// Last-resort move for calls on finished positions: a forced cell, then
/// the lowest empty cell, then A1.
fn fallback_move(forced: u64, empty: u64) -> Move {
    if forced != 0 {
        Move::from_index(forced.trailing_zeros() as u8)
    } else if empty != 0 {
        Move::from_index(empty.trailing_zeros() as u8)
    } else {
        Move::new(0, 0)
    }
}
