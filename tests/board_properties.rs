//! Property tests for board generation, swap validation and special blasts.

use cascade::{
    blast_area, find_all_matches, Board, BoardEvent, GenerationConfig, Piece, PieceType, Position,
    ResolutionEngine, BOMB_RADIUS,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #[test]
    fn initial_board_has_no_match(
        seed in any::<u64>(),
        width in 3i32..12,
        height in 3i32..12,
        colors in 3usize..=6,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::create_initial(width, height, colors, &mut rng).unwrap();
        prop_assert!(board.is_full());
        prop_assert!(find_all_matches(&board).is_empty());
    }

    #[test]
    fn only_orthogonal_neighbors_can_swap(
        seed in any::<u64>(),
        width in 3i32..10,
        height in 3i32..10,
        x1 in -2i32..12, y1 in -2i32..12,
        x2 in -2i32..12, y2 in -2i32..12,
    ) {
        let config = GenerationConfig::new(seed).with_size(width, height);
        let mut engine = ResolutionEngine::new(&config).unwrap();
        let before = engine.board().type_map();

        let first = Position::new(x1, y1);
        let second = Position::new(x2, y2);
        let accepted = engine.request_swap(x1, y1, x2, y2, true);
        let in_bounds = engine.board().contains(first) && engine.board().contains(second);

        if first.manhattan_distance(second) != 1 || !in_bounds {
            prop_assert!(!accepted);
            prop_assert!(!engine.is_processing());
        } else {
            prop_assert!(accepted);
        }
        prop_assert_eq!(engine.board().type_map(), before);
    }

    #[test]
    fn rolled_back_swap_restores_board(
        seed in any::<u64>(),
        x in 0i32..7,
        y in 0i32..7,
        horizontal in any::<bool>(),
    ) {
        let mut engine = ResolutionEngine::new(&GenerationConfig::new(seed)).unwrap();
        let before = engine.board().type_map();
        let second = if horizontal { Position::new(x + 1, y) } else { Position::new(x, y + 1) };

        prop_assert!(engine.request_swap(x, y, second.x, second.y, true));
        let events = engine.run_to_idle();
        let rolled_back = events
            .iter()
            .any(|event| matches!(event, BoardEvent::SwapRolledBack { .. }));
        if rolled_back {
            prop_assert_eq!(engine.board().type_map(), before);
            prop_assert!(!events.contains(&BoardEvent::MoveUsed));
        } else {
            prop_assert!(events.contains(&BoardEvent::MoveUsed));
        }
        prop_assert!(engine.board().is_full());
    }

    #[test]
    fn bomb_blast_stays_on_board(seed in any::<u64>(), x in 0i32..8, y in 0i32..8) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::create_initial(8, 8, 6, &mut rng).unwrap();
        let bomb = Position::new(x, y);
        board.set(x, y, Some(Piece::new(PieceType::Bomb, bomb)));

        let area = blast_area(&board, bomb);
        prop_assert!(area.len() <= 17);
        for position in area.positions() {
            prop_assert!(board.contains(position));
            prop_assert!(position.x == x || position.y == y);
            prop_assert!(position.manhattan_distance(bomb) <= BOMB_RADIUS as u32);
        }

        let neighbor = if x + 1 < 8 { Position::new(x + 1, y) } else { Position::new(x - 1, y) };
        let mut engine = ResolutionEngine::with_board(board, 6, seed).unwrap();
        prop_assert!(engine.request_swap(x, y, neighbor.x, neighbor.y, true));
        engine.step();
        let activation = engine.step();
        for event in &activation.events {
            match event {
                BoardEvent::PieceMatched { count, is_combo } => {
                    prop_assert!(*count <= 17);
                    prop_assert!(*is_combo);
                }
                BoardEvent::PiecesDestroyed { positions } => {
                    prop_assert!(positions.len() <= 17);
                    prop_assert!(positions
                        .iter()
                        .all(|p| (0..8).contains(&p.x) && (0..8).contains(&p.y)));
                }
                _ => {}
            }
        }
    }
}
