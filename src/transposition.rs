//! # Transposition Table
//!
//! Fixed-size, hash-addressed cache of search nodes, so positions reached
//! by different move orders share one node and its statistics.
//!
//! The table is a power-of-two array of slots, direct-mapped by
//! `hash & (size - 1)` and partitioned across 64 lock stripes (slot `s`
//! lives in stripe `s % 64`). A colliding insert evicts the resident only
//! while the resident is still lightly visited; past the replacement
//! threshold the caller gets a scratch node instead, so the search always
//! progresses and the table degrades rather than fails.
//!
//! The single-threaded engine touches one stripe at a time; the striping
//! exists so parallel rollouts can share the table later.

use std::sync::{Arc, Mutex};

use crate::node::SearchNode;

pub const DEFAULT_LOG2_SLOTS: u32 = 20;

const STRIPES: usize = 64;

/// Residents with at least this many recorded visits are worth keeping
/// over a brand-new node.
pub(crate) const REPLACE_THRESHOLD: u32 = 32;

struct Slot {
    hash: u64,
    node: Arc<SearchNode>,
    visits: u32,
}

pub struct TranspositionTable {
    stripes: Vec<Mutex<Box<[Option<Slot>]>>>,
    slot_mask: u64,
}

impl TranspositionTable {
    /// Table with `2^log2_slots` slots. Sizes below one slot per stripe
    /// are rounded up.
    pub fn new(log2_slots: u32) -> Self {
        let log2 = log2_slots.max(STRIPES.trailing_zeros());
        let size = 1usize << log2;
        let per_stripe = size / STRIPES;
        let stripes = (0..STRIPES)
            .map(|_| {
                let slots: Box<[Option<Slot>]> =
                    (0..per_stripe).map(|_| None).collect();
                Mutex::new(slots)
            })
            .collect();
        TranspositionTable {
            stripes,
            slot_mask: (size - 1) as u64,
        }
    }

    #[inline]
    fn locate(&self, hash: u64) -> (usize, usize) {
        let slot = (hash & self.slot_mask) as usize;
        (slot % STRIPES, slot / STRIPES)
    }

    /// Node for `hash`, creating it with `make` when absent.
    ///
    /// On a slot collision the resident survives once established
    /// (visits >= threshold) and the new node is returned uncached; a
    /// lightly-visited resident is evicted instead.
    pub fn get_or_insert(
        &self,
        hash: u64,
        make: impl FnOnce() -> Arc<SearchNode>,
    ) -> Arc<SearchNode> {
        let (stripe, idx) = self.locate(hash);
        let mut slots = self.stripes[stripe].lock().unwrap();
        match &mut slots[idx] {
            Some(slot) if slot.hash == hash => Arc::clone(&slot.node),
            Some(slot) if slot.visits < REPLACE_THRESHOLD => {
                let node = make();
                *slot = Slot {
                    hash,
                    node: Arc::clone(&node),
                    visits: 0,
                };
                node
            }
            Some(_) => make(),
            vacant => {
                let node = make();
                *vacant = Some(Slot {
                    hash,
                    node: Arc::clone(&node),
                    visits: 0,
                });
                node
            }
        }
    }

    /// Raise the recorded visit count for `hash`. Monotonic; a stale lower
    /// value never overwrites a higher one.
    pub fn record_visit(&self, hash: u64, visits: u32) {
        let (stripe, idx) = self.locate(hash);
        let mut slots = self.stripes[stripe].lock().unwrap();
        if let Some(slot) = &mut slots[idx] {
            if slot.hash == hash && slot.visits < visits {
                slot.visits = visits;
            }
        }
    }

    /// Drop every cached node. Runs on `new_game`.
    pub fn clear(&self) {
        for stripe in &self.stripes {
            for slot in stripe.lock().unwrap().iter_mut() {
                *slot = None;
            }
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.stripes
            .iter()
            .map(|s| s.lock().unwrap().iter().filter(|slot| slot.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        (self.slot_mask + 1) as usize
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_LOG2_SLOTS)
    }
}
