//! Integration test to ensure the engine can start up without errors.

use gitquest::{
    config, Direction, GameState, GitQuestResult, InputHandler, LevelCatalog, PlayerInput,
    Position,
};

#[test]
fn test_basic_startup() -> GitQuestResult<()> {
    let catalog = LevelCatalog::builtin()?;
    let mut game_state = GameState::new(catalog);

    // Nothing is being played until a level is entered
    assert!(game_state.session().is_none());
    assert!(game_state.progress().is_empty());

    let session = game_state.enter_level(config::ENTRY_LEVEL)?;
    assert_eq!(session.level().id, config::ENTRY_LEVEL);
    assert_eq!(session.player().position, Position::new(1, 4));
    assert_eq!(session.player().facing, Direction::Down);
    assert!(session.encounter().is_none());
    assert!(!session.is_complete());

    // The start cell must be walkable terrain
    let grid = session.grid();
    assert!(grid.is_in_bounds(session.player().position));
    assert!(!grid.is_obstacle(session.player().position));

    Ok(())
}

#[test]
fn test_every_builtin_level_starts_cleanly() -> GitQuestResult<()> {
    let catalog = LevelCatalog::builtin()?;
    for level in catalog.iter() {
        let session = gitquest::LevelSession::new(level.clone());
        assert_eq!(session.player().position, level.start_position);
        assert_eq!(session.objectives().total(), level.objectives.len());
        assert_eq!(session.objectives().completed_count(), 0);
        assert!(
            session.grid().enemy_at(level.start_position).is_none(),
            "Level {} starts on an enemy",
            level.id
        );
    }
    Ok(())
}

#[test]
fn test_input_handler_drives_game_state() -> GitQuestResult<()> {
    let mut game_state = GameState::new(LevelCatalog::builtin()?);
    game_state.enter_level(1)?;
    let handler = InputHandler::new();

    match handler.parse_line("d") {
        Some(PlayerInput::Move(direction)) => {
            game_state.move_player(direction)?;
        }
        other => panic!("Expected a move, got {:?}", other),
    }

    let position = game_state.session().map(|s| s.player().position);
    assert_eq!(position, Some(Position::new(2, 4)));
    Ok(())
}
