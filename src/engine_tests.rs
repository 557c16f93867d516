#[cfg(test)]
mod tests {
    use crate::engine::Engine;
    use crate::error::EngineError;

    fn engine_with_moves(cells: &[u8]) -> Engine {
        let mut engine = Engine::new();
        engine.new_game(1);
        for &cell in cells {
            engine.apply_move(cell).expect("setup move");
        }
        engine
    }

    /// P0 builds A3,B3 on the row and D1,D4 on the file, then forks with
    /// D3, threatening C3 and D2 at once; one block cannot cover both.
    /// P1 and P2 fill far-away cells that never threaten anything.
    const FORK_SETUP: [u8; 15] = [
        16, 40, 56, // A3 / A6 / A8
        17, 42, 58, // B3 / C6 / C8
        3, 44, 60, // D1 / E6 / E8
        27, 46, 62, // D4 / G6 / G8
        19, 48, 11, // D3 fork / A7 / P2 blocks D2
    ];

    #[test]
    fn new_game_resets_to_the_initial_position() {
        let mut engine = Engine::new();
        let h1 = engine.new_game(123);
        engine.apply_move(0).unwrap();
        let h2 = engine.new_game(123);
        assert_eq!(h1, h2);
        assert_eq!(engine.state().board.occupied, 0);
        assert_eq!(engine.seed(), 123);
    }

    #[test]
    fn seed_zero_picks_a_nonzero_seed() {
        let mut engine = Engine::new();
        engine.new_game(0);
        assert_ne!(engine.seed(), 0);
    }

    #[test]
    fn apply_move_rejects_bad_cells_without_state_change() {
        let mut engine = engine_with_moves(&[0]);
        let before = *engine.state();

        assert_eq!(
            engine.apply_move(64),
            Err(EngineError::OutOfRange { cell: 64 })
        );
        assert_eq!(
            engine.apply_move(0),
            Err(EngineError::OccupiedCell { cell: 0 })
        );
        assert_eq!(before, *engine.state());
    }

    #[test]
    fn forced_mask_is_binding_for_every_outside_cell() {
        // P1 assembles the split pattern A2,B2,D2 (threatening C2); P0 then
        // faces a forced block.
        let mut engine = engine_with_moves(&[0, 8, 16, 1, 9, 17, 32, 11, 33]);
        let forced = engine.forced_moves();
        assert_eq!(forced, 1 << 10, "P1 threatens C2 only");

        let occupied = engine.state().board.occupied;
        for cell in 0..64u8 {
            let mask = 1u64 << cell;
            if forced & mask != 0 {
                continue;
            }
            let result = engine.apply_move(cell);
            if occupied & mask != 0 {
                assert_eq!(result, Err(EngineError::OccupiedCell { cell }));
            } else {
                assert_eq!(result, Err(EngineError::NotForced { cell }));
            }
        }

        // The block itself is accepted.
        assert!(engine.apply_move(10).is_ok());
    }

    #[test]
    fn moves_after_the_game_ends_are_rejected() {
        // P0 and P1 walk into three-runs; P2 wins as the last one standing.
        let mut engine = engine_with_moves(&[0, 8, 16, 1, 9, 17, 2, 10]);

        let view = engine.board_view();
        assert!(view.terminal);
        assert_eq!(view.winner_id, 2);
        assert_eq!(view.active_mask, 0b100);
        assert_eq!(engine.apply_move(5), Err(EngineError::GameOver));
        assert_eq!(engine.best_move(Some(10)), None);
    }

    #[test]
    fn board_view_decorates_the_winning_run() {
        let mut engine = engine_with_moves(&FORK_SETUP);
        // P2 blocked D2; the row threat at C3 still wins. C3 also completes
        // A3-C3, and the win takes priority over that three-run.
        engine.apply_move(18).unwrap();

        let view = engine.board_view();
        assert!(view.terminal);
        assert_eq!(view.winner_id, 0);
        assert_eq!(view.active_mask, 0b111, "winning never eliminates");
        let run = (1u64 << 16) | (1 << 17) | (1 << 18) | (1 << 19);
        assert_eq!(view.winning_bits, run);
        assert_eq!(view.losing_bits, 0);
    }

    #[test]
    fn board_view_decorates_an_eliminated_run() {
        // P0 walks into the three-run A1-C1.
        let mut engine = engine_with_moves(&[0, 8, 16, 1, 9, 17]);
        engine.apply_move(2).unwrap();

        let view = engine.board_view();
        assert!(!view.terminal);
        assert_eq!(view.active_mask, 0b110);
        assert_eq!(view.player_id, 1);
        let run = 0b111u64;
        assert_eq!(view.losing_bits & run, run);
        assert_eq!(view.winning_bits, 0);
    }

    #[test]
    fn best_move_takes_the_available_win() {
        let mut engine = engine_with_moves(&FORK_SETUP);
        let cell = engine.best_move(Some(200)).expect("game is live");
        assert_eq!(cell, 18);
    }

    #[test]
    fn best_move_short_circuits_a_lone_forced_cell() {
        // P1 threatens C2 only; the single forced cell skips the search.
        let mut engine = engine_with_moves(&[0, 8, 16, 1, 9, 17, 32, 11, 33]);
        assert_eq!(engine.best_move(Some(1)), Some(10));
    }
}
