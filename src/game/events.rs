//! # Game Events
//!
//! Events emitted by the engine for the presentation layer.

use crate::{Direction, LevelId, Position};
use serde::{Deserialize, Serialize};

/// Something that happened as the result of one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player moved to a new cell
    PlayerMoved {
        from: Position,
        to: Position,
        facing: Direction,
    },
    /// The destination was out of bounds or an obstacle
    MoveBlocked { at: Position, facing: Direction },
    /// The player bumped into an undefeated enemy and a battle started
    EnemyEncountered { enemy_id: String },
    /// A correct or incorrect command was used against the current enemy
    AttackResult {
        enemy_id: String,
        success: bool,
        remaining_health: u32,
    },
    /// The enemy's health reached zero
    EnemyDefeated { enemy_id: String },
    /// The player left the battle; the enemy keeps its remaining health
    EncounterFled {
        enemy_id: String,
        remaining_health: u32,
    },
    /// A command typed outside of a battle was checked
    CommandResult { success: bool },
    /// A collectible was picked up
    CollectibleGathered { label: String, position: Position },
    /// A learn objective was reached and its lesson should be shown
    LessonOpened { objective: usize },
    /// The objective at this index became completed
    ObjectiveCompleted { index: usize },
    /// Every objective of the level is completed
    LevelCompleted { level_id: LevelId },
}

impl GameEvent {
    /// Returns true for events that change what counts toward completion.
    pub fn is_progress(&self) -> bool {
        matches!(
            self,
            GameEvent::ObjectiveCompleted { .. }
                | GameEvent::LevelCompleted { .. }
                | GameEvent::EnemyDefeated { .. }
                | GameEvent::CollectibleGathered { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_events() {
        assert!(GameEvent::ObjectiveCompleted { index: 0 }.is_progress());
        assert!(GameEvent::LevelCompleted { level_id: 1 }.is_progress());
        assert!(!GameEvent::CommandResult { success: true }.is_progress());
        assert!(!GameEvent::MoveBlocked {
            at: Position::new(0, -1),
            facing: Direction::Up
        }
        .is_progress());
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::AttackResult {
            enemy_id: "chaos-beast".to_string(),
            success: true,
            remaining_health: 0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("AttackResult"));
        assert_eq!(serde_json::from_str::<GameEvent>(&json).unwrap(), event);
    }
}
