//! # Game State Module
//!
//! Central coordination between the level catalog, saved progress and the
//! level currently being played.
//!
//! [`GameState`] is the engine's public surface: a presentation layer calls
//! into it with player input and renders the [`GameEvent`]s it returns.
//! Completing a level through the state records it in the progress set.

use crate::{
    config, Direction, GameEvent, GitQuestError, GitQuestResult, Level, LevelCatalog,
    LevelGraph, LevelId, LevelSession, ProgressState, SuccessorPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Engine settings chosen by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How the next level is picked after a completion
    #[serde(default)]
    pub successor_policy: SuccessorPolicy,
    /// Where completed levels are persisted
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,
}

fn default_progress_path() -> PathBuf {
    PathBuf::from(config::DEFAULT_PROGRESS_FILE)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            successor_policy: SuccessorPolicy::default(),
            progress_path: default_progress_path(),
        }
    }
}

/// Serialized form of a [`GameState`].
///
/// Session flags are not saved. A restored game re-enters its level from
/// the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedGame {
    config: EngineConfig,
    progress: ProgressState,
    current_level: Option<LevelId>,
}

/// Central game state.
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: LevelCatalog,
    progress: ProgressState,
    session: Option<LevelSession>,
    config: EngineConfig,
}

impl GameState {
    /// Creates a game with no completed levels and default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::{GameState, LevelCatalog};
    ///
    /// let mut game = GameState::new(LevelCatalog::builtin().unwrap());
    /// assert!(game.session().is_none());
    /// game.enter_level(1).unwrap();
    /// assert_eq!(game.current_level_id(), Some(1));
    /// assert!(game.enter_level(2).is_err());
    /// ```
    pub fn new(catalog: LevelCatalog) -> Self {
        Self::with_config(catalog, ProgressState::new(), EngineConfig::default())
    }

    pub fn with_config(
        catalog: LevelCatalog,
        progress: ProgressState,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            progress,
            session: None,
            config,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> LevelGraph<'_> {
        LevelGraph::new(&self.catalog)
    }

    /// Returns the immutable definition of a level.
    pub fn load_level(&self, id: LevelId) -> GitQuestResult<Arc<Level>> {
        self.catalog.load_level(id)
    }

    pub fn is_unlocked(&self, id: LevelId) -> bool {
        self.graph().is_unlocked(id, &self.progress)
    }

    /// Starts a fresh session of a level.
    ///
    /// Any session in progress is discarded. Entering a completed level
    /// replays it with every objective, enemy and collectible reset.
    pub fn enter_level(&mut self, id: LevelId) -> GitQuestResult<&LevelSession> {
        let level = self.catalog.load_level(id)?;
        if !self.is_unlocked(id) {
            log::warn!("Refused to enter locked level {}", id);
            return Err(GitQuestError::LevelLocked(id));
        }

        log::info!("Entering level {}: {}", id, level.title);
        Ok(self.session.insert(LevelSession::new(level)))
    }

    /// Leaves the current level without recording anything.
    pub fn leave_level(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Left level {}", session.level().id);
        }
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    pub fn current_level_id(&self) -> Option<LevelId> {
        self.session.as_ref().map(|session| session.level().id)
    }

    pub fn move_player(&mut self, direction: Direction) -> GitQuestResult<Vec<GameEvent>> {
        let events = self.active_session("move")?.move_player(direction);
        Ok(self.record_events(events))
    }

    pub fn submit_command(&mut self, text: &str) -> GitQuestResult<Vec<GameEvent>> {
        let events = self.active_session("submit a command")?.submit_command(text);
        Ok(self.record_events(events))
    }

    pub fn flee_encounter(&mut self) -> GitQuestResult<Vec<GameEvent>> {
        Ok(self.active_session("flee")?.flee())
    }

    /// Hint for the current session, if any.
    pub fn current_hint(&self) -> Option<String> {
        self.session.as_ref().and_then(LevelSession::current_hint)
    }

    /// The level to play after the current one, according to the configured
    /// successor policy.
    pub fn next_level(&self) -> Option<LevelId> {
        let current = self.current_level_id().unwrap_or(config::ENTRY_LEVEL);
        self.graph()
            .successor(current, &self.progress, self.config.successor_policy)
    }

    /// Clears every completed level and ends the current session.
    pub fn reset_progress(&mut self) {
        self.progress.reset();
        self.session = None;
    }

    /// Clears progress and overwrites the configured file without reading it,
    /// so a corrupt file can always be recovered from.
    pub fn clear_saved_progress(&mut self) -> GitQuestResult<()> {
        self.reset_progress();
        self.save_progress()
    }

    /// Writes the progress set to the configured file.
    pub fn save_progress(&self) -> GitQuestResult<()> {
        self.progress.save_to_file(&self.config.progress_path)
    }

    /// Replaces the progress set with the configured file's content.
    pub fn load_progress(&mut self) -> GitQuestResult<()> {
        self.progress = ProgressState::load_from_file(&self.config.progress_path)?;
        Ok(())
    }

    /// Saves settings, progress and the current level id to JSON.
    pub fn save_to_json(&self) -> GitQuestResult<String> {
        let saved = SavedGame {
            config: self.config.clone(),
            progress: self.progress.clone(),
            current_level: self.current_level_id(),
        };
        serde_json::to_string_pretty(&saved).map_err(GitQuestError::from)
    }

    /// Restores a game saved with [`GameState::save_to_json`].
    ///
    /// The saved level is re-entered from its start position.
    pub fn load_from_json(catalog: LevelCatalog, json: &str) -> GitQuestResult<Self> {
        let saved: SavedGame = serde_json::from_str(json)?;
        let mut state = Self::with_config(catalog, saved.progress, saved.config);
        if let Some(id) = saved.current_level {
            state.enter_level(id)?;
        }
        Ok(state)
    }

    fn active_session(&mut self, action: &str) -> GitQuestResult<&mut LevelSession> {
        self.session.as_mut().ok_or_else(|| {
            log::warn!("Cannot {} with no active level", action);
            GitQuestError::InvalidState(format!("cannot {} with no active level", action))
        })
    }

    fn record_events(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            if let GameEvent::LevelCompleted { level_id } = event {
                self.progress.record_completion(*level_id);
            }
        }
        events
    }
}
