//! # GitQuest Terminal Entry Point
//!
//! Loads the level catalog and saved progress, then plays levels from
//! standard input until the player quits or every level is completed.

use clap::Parser;
use gitquest::{
    config, EngineConfig, GameEvent, GameState, GitQuestResult, InputHandler, LevelCatalog,
    LevelId, LevelSession, ObjectiveKind, PlayerInput, Position, ProgressState, SuccessorPolicy,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::{error, info};

#[cfg(not(feature = "dev-tools"))]
use log::{error, info};

/// Command line arguments for GitQuest.
#[derive(Parser, Debug)]
#[command(name = "gitquest")]
#[command(about = "A tile-based adventure that teaches Git commands")]
#[command(version)]
struct Args {
    /// File holding the completed levels
    #[arg(long, default_value = config::DEFAULT_PROGRESS_FILE)]
    progress: PathBuf,

    /// Level to start from (must be unlocked)
    #[arg(long)]
    level: Option<LevelId>,

    /// How the next level is chosen: sequential or branch-aware
    #[arg(long, default_value = "branch-aware")]
    policy: SuccessorPolicy,

    /// Forget all completed levels before starting
    #[arg(long)]
    reset: bool,

    /// List levels with their lock state and exit
    #[arg(long)]
    list: bool,

    /// Also accept h/j/k/l for movement
    #[arg(long)]
    vi_keys: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> GitQuestResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting GitQuest v{}", gitquest::VERSION);

    let engine_config = EngineConfig {
        successor_policy: args.policy,
        progress_path: args.progress.clone(),
    };
    let mut game = GameState::with_config(
        LevelCatalog::builtin()?,
        ProgressState::new(),
        engine_config,
    );
    if args.reset {
        game.clear_saved_progress()?;
        println!("Progress reset.");
    } else {
        game.load_progress()?;
    }

    if args.list {
        print_levels(&game);
        return Ok(());
    }

    let start = args.level.unwrap_or_else(|| starting_level(&game));
    if let Err(e) = game.enter_level(start) {
        error!("Cannot start level {}: {}", start, e);
        return Err(e);
    }

    let mut input_handler = InputHandler::new();
    input_handler.vi_keys_enabled = args.vi_keys;

    run_game_loop(&mut game, &input_handler)?;

    info!("Game loop ended");
    Ok(())
}

/// Initializes logging for the requested level.
///
/// With `dev-tools` a tracing subscriber is installed, which also receives
/// the engine's `log` records.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

/// First level without a recorded completion, or the entry level when the
/// whole adventure has been finished.
fn starting_level(game: &GameState) -> LevelId {
    if !game.progress().is_completed(config::ENTRY_LEVEL) {
        return config::ENTRY_LEVEL;
    }
    game.graph()
        .successor(
            config::ENTRY_LEVEL,
            game.progress(),
            SuccessorPolicy::BranchAware,
        )
        .unwrap_or(config::ENTRY_LEVEL)
}

fn run_game_loop(game: &mut GameState, input_handler: &InputHandler) -> GitQuestResult<()> {
    if let Some(session) = game.session() {
        print_intro(session);
        print_map(session);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let Some(input) = input_handler.parse_line(&line?) else {
            continue;
        };

        let events = match input {
            PlayerInput::Quit => {
                game.leave_level();
                break;
            }
            PlayerInput::Help => {
                print_help();
                continue;
            }
            PlayerInput::ShowLevels => {
                print_levels(game);
                continue;
            }
            PlayerInput::ShowMap => {
                if let Some(session) = game.session() {
                    print_map(session);
                }
                continue;
            }
            PlayerInput::Hint => {
                match game.current_hint() {
                    Some(hint) => println!("Hint: {}", hint),
                    None => println!("No hint right now. Explore the map!"),
                }
                continue;
            }
            PlayerInput::Move(direction) => game.move_player(direction)?,
            PlayerInput::Flee => game.flee_encounter()?,
            PlayerInput::Command(text) => game.submit_command(&text)?,
        };

        let completed = events
            .iter()
            .any(|event| matches!(event, GameEvent::LevelCompleted { .. }));

        if let Some(session) = game.session() {
            for event in &events {
                if let Some(message) = describe_event(session, event) {
                    println!("{}", message);
                }
            }
            print!("{}", render_map(session));
            if events.iter().any(GameEvent::is_progress) {
                print_objectives(session);
            }
        }

        if completed {
            game.save_progress()?;
            match game.next_level() {
                Some(next) => {
                    let session = game.enter_level(next)?;
                    println!();
                    print_intro(session);
                    print_map(session);
                }
                None => {
                    println!("Every level is complete. You have mastered GitQuest!");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Player-facing text for an event.
fn describe_event(session: &LevelSession, event: &GameEvent) -> Option<String> {
    let level = session.level();
    let enemy_name = |id: &str| {
        level
            .enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(|enemy| enemy.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let message = match event {
        GameEvent::PlayerMoved { .. } => return None,
        GameEvent::MoveBlocked { .. } => "You can't go that way.".to_string(),
        GameEvent::EnemyEncountered { enemy_id } => {
            let block_message = level
                .enemies
                .iter()
                .find(|enemy| &enemy.id == enemy_id)
                .map(|enemy| enemy.block_message.clone())
                .unwrap_or_default();
            format!("{}\nType a Git command to attack, or 'flee'.", block_message)
        }
        GameEvent::AttackResult {
            enemy_id,
            success: true,
            remaining_health,
        } => format!("Hit! {} has {} health left.", enemy_name(enemy_id), remaining_health),
        GameEvent::AttackResult { success: false, .. } => {
            "That command has no effect. Try 'hint'.".to_string()
        }
        GameEvent::EnemyDefeated { enemy_id } => format!("{} is defeated!", enemy_name(enemy_id)),
        GameEvent::EncounterFled {
            enemy_id,
            remaining_health,
        } => format!(
            "You step back from {} ({} health left).",
            enemy_name(enemy_id),
            remaining_health
        ),
        GameEvent::CommandResult { success: true } => "Correct!".to_string(),
        GameEvent::CommandResult { success: false } => {
            "Nothing happens. That command isn't needed here.".to_string()
        }
        GameEvent::CollectibleGathered { label, .. } => format!("Collected commit node {}.", label),
        GameEvent::LessonOpened { objective } => match &level.objectives.get(*objective)?.kind {
            ObjectiveKind::Learn { lesson, .. } => {
                let mut text = format!("--- {} ---\n{}\n", lesson.title, lesson.content);
                for example in &lesson.examples {
                    text.push_str(&format!("  {}\n", example));
                }
                text
            }
            _ => return None,
        },
        GameEvent::ObjectiveCompleted { index } => format!(
            "Objective complete: {}",
            level.objectives.get(*index)?.description
        ),
        GameEvent::LevelCompleted { level_id } => format!("*** Level {} complete! ***", level_id),
    };
    Some(message)
}

fn print_intro(session: &LevelSession) {
    let level = session.level();
    println!("=== Level {}: {} ===", level.id, level.title);
    println!("{}", level.tutorial);
}

fn print_map(session: &LevelSession) {
    print!("{}", render_map(session));
    print_objectives(session);
}

fn print_objectives(session: &LevelSession) {
    let objectives = session.objectives();
    for (index, objective) in session.level().objectives.iter().enumerate() {
        let mark = if objectives.is_completed(index) { 'x' } else { ' ' };
        println!("[{}] {}", mark, objective.description);
    }
}

/// Text rendering of the map: `@` player, `#` obstacle, `E` enemy,
/// `*` collectible, `?` lesson, `G` goal.
fn render_map(session: &LevelSession) -> String {
    let grid = session.grid();
    let level = session.level();
    let mut out = String::new();

    for y in 0..level.map_size.height as i32 {
        for x in 0..level.map_size.width as i32 {
            let pos = Position::new(x, y);
            let glyph = if pos == session.player().position {
                '@'
            } else if grid.is_obstacle(pos) {
                '#'
            } else if grid.enemy_at(pos).is_some() {
                'E'
            } else if grid.collectible_at(pos).is_some() {
                '*'
            } else if let Some(index) = grid.objective_target_hit(pos).first() {
                match level.objectives[*index].kind {
                    ObjectiveKind::Learn { .. } => '?',
                    _ => 'G',
                }
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_levels(game: &GameState) {
    for level in game.catalog().iter() {
        let status = if game.progress().is_completed(level.id) {
            "done"
        } else if game.is_unlocked(level.id) {
            "open"
        } else {
            "locked"
        };
        let branch = format!("{:?}", level.branch()).to_lowercase();
        println!(
            "{:>2}. [{:<6}] {:<20} ({}, {})",
            level.id, status, level.title, branch, level.kind
        );
    }
}

fn print_help() {
    println!("Move: w/a/s/d or up/down/left/right");
    println!("flee   leave the current battle");
    println!("hint   show a hint");
    println!("levels list levels");
    println!("map    redraw the map");
    println!("quit   exit the game");
    println!("Anything else is typed as a Git command.");
}
