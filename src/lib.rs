//! # GitQuest
//!
//! A tile-based adventure that teaches version-control commands. The player
//! walks grid maps, defeats "enemies" by typing the right Git command and
//! completes per-level objectives to unlock new levels.
//!
//! ## Architecture Overview
//!
//! The crate is the game's progression and validation engine. Presentation
//! (drawing, dialogs, toasts) lives outside of it and talks to the engine
//! through [`GameState`] and the [`GameEvent`]s it returns.
//!
//! - **Command Matcher**: decides whether a typed string counts as a command
//! - **Tile Grid**: bounds, obstacles, enemies, collectibles and targets
//! - **Level Session**: movement, triggers, objectives and battles for one
//!   play-through of a level
//! - **Level Graph**: prerequisite-based unlock rules and saved progress
//!
//! Commands are never executed. They are only pattern-matched.

pub mod game;
pub mod input;

// Core module re-exports
pub use game::*;
pub use input::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From battle
    AttackOutcome,
    Encounter,
    // From catalog
    LevelCatalog,
    // From events
    GameEvent,
    // From level
    Branch,
    BranchInfo,
    Collectible,
    Enemy,
    LessonContent,
    Level,
    LevelId,
    LevelKind,
    MapSize,
    Objective,
    ObjectiveKind,
    // From objectives
    ObjectiveTracker,
    Trigger,
    // From progress
    LevelGraph,
    ProgressState,
    SuccessorPolicy,
    // From session
    LevelSession,
    PlayerState,
    // From state
    EngineConfig,
    GameState,
    // From grid
    TileGrid,
};

pub use input::{CommandMatcher, InputHandler, MatchRule, PlayerInput};

/// Core error type for the GitQuest engine.
#[derive(thiserror::Error, Debug)]
pub enum GitQuestError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Level definition is malformed
    #[error("Invalid level {level}: {reason}")]
    InvalidLevel { level: LevelId, reason: String },

    /// An objective references an enemy the level does not define
    #[error("Level {level} references unknown enemy '{enemy_id}'")]
    UnknownEnemy { level: LevelId, enemy_id: String },

    /// A collect-set objective references a label no collectible carries
    #[error("Level {level} references unknown collectible '{label}'")]
    UnknownCollectible { level: LevelId, label: String },

    /// A level lists a prerequisite that is not in the catalog
    #[error("Level {level} requires unknown level {prerequisite}")]
    UnknownPrerequisite {
        level: LevelId,
        prerequisite: LevelId,
    },

    /// Requested level does not exist
    #[error("Unknown level: {0}")]
    UnknownLevel(LevelId),

    /// Requested level exists but its prerequisites are not completed
    #[error("Level {0} is locked")]
    LevelLocked(LevelId),

    /// Engine state does not allow the requested operation
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the GitQuest codebase.
pub type GitQuestResult<T> = Result<T, GitQuestError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    use crate::LevelId;

    /// Default file used to persist completed levels
    pub const DEFAULT_PROGRESS_FILE: &str = "gitquest-progress.json";

    /// Level the adventure starts from
    pub const ENTRY_LEVEL: LevelId = 1;

    /// Largest map width accepted when validating level data
    pub const MAX_MAP_WIDTH: u32 = 64;

    /// Largest map height accepted when validating level data
    pub const MAX_MAP_HEIGHT: u32 = 64;

    /// Damage dealt by one correct command
    pub const DAMAGE_PER_HIT: u32 = 1;
}
