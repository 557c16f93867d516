#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::board::Move;
    use crate::node::SearchNode;
    use crate::state::GameState;
    use crate::transposition::{TranspositionTable, REPLACE_THRESHOLD};

    fn node_after(cells: &[u8]) -> Arc<SearchNode> {
        let mut state = GameState::initial();
        for &cell in cells {
            state.apply_move(Move::from_index(cell));
        }
        Arc::new(SearchNode::new(state))
    }

    #[test]
    fn same_hash_returns_the_shared_node() {
        let table = TranspositionTable::default();
        let node = node_after(&[]);
        let hash = node.state.hash;

        let first = table.get_or_insert(hash, || Arc::clone(&node));
        let second = table.get_or_insert(hash, || panic!("resident must be reused"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_hashes_get_different_nodes() {
        let table = TranspositionTable::default();
        let a = node_after(&[]);
        let b = node_after(&[0]);
        assert_ne!(a.state.hash, b.state.hash);

        let ra = table.get_or_insert(a.state.hash, || Arc::clone(&a));
        let rb = table.get_or_insert(b.state.hash, || Arc::clone(&b));
        assert!(!Arc::ptr_eq(&ra, &rb));
    }

    #[test]
    fn lightly_visited_resident_is_evicted_on_collision() {
        // One slot per stripe: any two hashes with equal low bits collide.
        let table = TranspositionTable::new(6);
        let h1 = 0x40u64 + 5;
        let h2 = 0x80u64 + 5;

        let first = table.get_or_insert(h1, || node_after(&[]));
        let second = table.get_or_insert(h2, || node_after(&[0]));
        assert!(!Arc::ptr_eq(&first, &second));

        // The newcomer owns the slot now; the old resident is gone.
        let again = table.get_or_insert(h2, || panic!("resident must be reused"));
        assert!(Arc::ptr_eq(&second, &again));
        let refetched = table.get_or_insert(h1, || node_after(&[]));
        assert!(!Arc::ptr_eq(&first, &refetched));
    }

    #[test]
    fn established_resident_survives_and_yields_scratch_nodes() {
        let table = TranspositionTable::new(6);
        let h1 = 0x40u64 + 9;
        let h2 = 0x80u64 + 9;

        let resident = table.get_or_insert(h1, || node_after(&[]));
        table.record_visit(h1, REPLACE_THRESHOLD);

        let scratch_a = table.get_or_insert(h2, || node_after(&[0]));
        let scratch_b = table.get_or_insert(h2, || node_after(&[0]));
        assert!(
            !Arc::ptr_eq(&scratch_a, &scratch_b),
            "scratch nodes are uncached"
        );

        let still_there = table.get_or_insert(h1, || panic!("resident must survive"));
        assert!(Arc::ptr_eq(&resident, &still_there));
    }

    #[test]
    fn record_visit_is_monotonic() {
        let table = TranspositionTable::new(6);
        let h1 = 0x40u64 + 3;
        let h2 = 0x80u64 + 3;

        table.get_or_insert(h1, || node_after(&[]));
        table.record_visit(h1, REPLACE_THRESHOLD + 10);
        // A stale lower count must not reopen the slot for replacement.
        table.record_visit(h1, 1);

        let resident = table.get_or_insert(h1, || panic!("resident must be reused"));
        let scratch = table.get_or_insert(h2, || node_after(&[0]));
        assert!(!Arc::ptr_eq(&resident, &scratch));
        let still_there = table.get_or_insert(h1, || panic!("resident must survive"));
        assert!(Arc::ptr_eq(&resident, &still_there));
    }

    #[test]
    fn clear_empties_every_slot() {
        let table = TranspositionTable::default();
        for cells in [&[][..], &[0][..], &[1][..], &[2][..]] {
            let node = node_after(cells);
            table.get_or_insert(node.state.hash, || node);
        }
        assert!(table.len() >= 4);

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn capacity_is_rounded_to_power_of_two() {
        assert_eq!(TranspositionTable::new(10).capacity(), 1 << 10);
        // Below one slot per stripe the size rounds up.
        assert_eq!(TranspositionTable::new(3).capacity(), 64);
    }
}
