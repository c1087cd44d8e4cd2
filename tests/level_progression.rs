//! Level sessions driven through the game state, with catalogs from disk.

use cascade::{
    create_rng, productive_swaps, CascadeResult, GameState, GenerationConfig, LevelCatalog,
    LevelData, LevelGenerator, LevelOutcome, LevelType, ScoreRules,
};
use tempfile::tempdir;

#[test]
fn test_generated_catalog_round_trips_through_disk() -> CascadeResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("levels.json");

    let config = GenerationConfig::new(21);
    let levels = LevelGenerator::default().generate_levels(12, &mut create_rng(&config));
    LevelCatalog::new(levels.clone()).save_file(&path)?;

    let mut catalog = LevelCatalog::load_file(&path)?;
    assert_eq!(catalog.levels(), levels.as_slice());
    assert_eq!(catalog.load_by_number(7)?.level_number, 7);
    assert_eq!(catalog.next().map(|level| level.level_number), Some(8));
    Ok(())
}

#[test]
fn test_playing_a_level_to_the_end() -> CascadeResult<()> {
    let level = LevelData {
        target_score: 10_000,
        moves_limit: 6,
        ..LevelData::test_level()
    };
    let mut game = GameState::new(level, ScoreRules::light(), 77)?;

    for _ in 0..50 {
        if game.is_game_ended() {
            break;
        }
        let Some(&(from, to)) = productive_swaps(game.board()).first() else {
            break;
        };
        let report = game.run_turn(from, to)?;
        assert!(report.points > 0);
        assert!(!game.is_processing());
    }

    let session = game.session();
    let stats = game.statistics();
    assert_eq!(session.remaining_moves(), 6 - stats.moves_used as i32);
    assert_eq!(u64::from(session.score()), game.score_keeper().total());
    if stats.moves_used == 6 {
        assert_eq!(session.outcome(), LevelOutcome::Failed);
        assert!(!session.is_level_active());
    }
    Ok(())
}

#[test]
fn test_moves_level_completes_when_moves_run_out() -> CascadeResult<()> {
    let level = LevelData {
        level_type: LevelType::Moves,
        moves_limit: 1,
        ..LevelData::test_level()
    };
    let mut game = GameState::new(level, ScoreRules::classic(), 3)?;
    let Some(&(from, to)) = productive_swaps(game.board()).first() else {
        return Ok(());
    };
    let report = game.run_turn(from, to)?;
    assert!(matches!(report.outcome, LevelOutcome::Completed { .. }));
    assert!(report.points >= 300);
    Ok(())
}

#[test]
fn test_load_next_level_resets_session() -> CascadeResult<()> {
    let mut catalog = LevelCatalog::new(vec![
        LevelData::test_level(),
        LevelData {
            level_number: 2,
            name: "Second".to_string(),
            board_width: 6,
            board_height: 7,
            ..LevelData::test_level()
        },
    ]);
    let mut game = GameState::new(catalog.current().clone(), ScoreRules::light(), 1)?;
    if let Some(next) = catalog.next() {
        game.load_level(next.clone())?;
    }
    assert_eq!(game.session().level().level_number, 2);
    assert_eq!(game.board().width(), 6);
    assert_eq!(game.board().height(), 7);
    assert_eq!(game.session().score(), 0);
    assert!(game.session().is_level_active());
    Ok(())
}
