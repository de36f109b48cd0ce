//! # Level Definitions
//!
//! Static, immutable level data: map geometry, objectives, enemies and
//! collectibles. Levels never carry play-time flags. Everything that changes
//! while a level is being played lives in a [`crate::LevelSession`].

use crate::{config, GitQuestError, GitQuestResult, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a level. Ordering is the natural unlock order.
pub type LevelId = u32;

/// Width and height of a level map in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: u32,
    pub height: u32,
}

/// Which line of the story a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Main,
    Feature,
    Experimental,
}

/// How a level is played, shown as a badge in level listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Movement,
    Command,
    Visual,
    #[default]
    Hybrid,
}

impl std::fmt::Display for LevelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LevelKind::Movement => "movement",
            LevelKind::Command => "command",
            LevelKind::Visual => "visual",
            LevelKind::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Position of a level in the level graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub branch: Branch,
    /// Every listed level must be completed before this one unlocks
    #[serde(default)]
    pub prerequisite: Vec<LevelId>,
}

/// Teaching material shown when a learn objective is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonContent {
    pub title: String,
    pub concept: String,
    pub content: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// What has to happen for an objective to count as completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ObjectiveKind {
    /// Step onto the target cell
    Reach { target: Position },
    /// Defeat the enemy with this id
    DefeatEnemy { enemy_id: String },
    /// Gather every collectible carrying one of these labels
    CollectSet { labels: Vec<String> },
    /// Type any one of these commands outside of a battle
    Command { commands: Vec<String> },
    /// Type these commands in order outside of a battle
    Sequence { commands: Vec<String> },
    /// Step onto the target cell and read the lesson
    Learn {
        target: Position,
        lesson: LessonContent,
    },
}

impl ObjectiveKind {
    /// Short name used in logs and the terminal driver.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveKind::Reach { .. } => "reach",
            ObjectiveKind::DefeatEnemy { .. } => "defeat-enemy",
            ObjectiveKind::CollectSet { .. } => "collect-set",
            ObjectiveKind::Command { .. } => "command",
            ObjectiveKind::Sequence { .. } => "sequence",
            ObjectiveKind::Learn { .. } => "learn",
        }
    }

    /// Target cell for objectives completed by movement.
    pub fn target(&self) -> Option<Position> {
        match self {
            ObjectiveKind::Reach { target } | ObjectiveKind::Learn { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// A single condition a level requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub description: String,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
}

/// A scripted opponent defeated by typing an accepted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub position: Position,
    /// Health when a session starts
    pub health: u32,
    pub max_health: u32,
    pub accepted_commands: Vec<String>,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub block_message: String,
}

/// An item lying on the map, gathered by walking over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub position: Position,
    pub label: String,
}

/// Immutable definition of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: LevelKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tutorial: String,
    /// Git concept the level teaches
    #[serde(default)]
    pub concept: String,
    pub map_size: MapSize,
    pub start_position: Position,
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub obstacles: Vec<Position>,
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
    #[serde(default)]
    pub branch_info: Option<BranchInfo>,
}

impl Level {
    /// Checks if a position lies inside the map.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as i64) < self.map_size.width as i64
            && (pos.y as i64) < self.map_size.height as i64
    }

    /// Checks if an obstacle occupies the position.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.iter().any(|obstacle| *obstacle == pos)
    }

    /// Index of the enemy with the given id.
    pub fn enemy_index(&self, enemy_id: &str) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == enemy_id)
    }

    /// Levels that must be completed before this one unlocks.
    pub fn prerequisites(&self) -> &[LevelId] {
        self.branch_info
            .as_ref()
            .map(|info| info.prerequisite.as_slice())
            .unwrap_or(&[])
    }

    /// Branch the level belongs to. Levels without branch info are on main.
    pub fn branch(&self) -> Branch {
        self.branch_info
            .as_ref()
            .map(|info| info.branch)
            .unwrap_or(Branch::Main)
    }

    /// Validates the level's internal references and geometry.
    ///
    /// Prerequisite ids are checked by the catalog, which knows every level.
    pub fn validate(&self) -> GitQuestResult<()> {
        let invalid = |reason: String| GitQuestError::InvalidLevel {
            level: self.id,
            reason,
        };

        let MapSize { width, height } = self.map_size;
        if width == 0
            || height == 0
            || width > config::MAX_MAP_WIDTH
            || height > config::MAX_MAP_HEIGHT
        {
            return Err(invalid(format!("map size {}x{} is out of range", width, height)));
        }

        if self.objectives.is_empty() {
            return Err(invalid("level has no objectives".to_string()));
        }

        if !self.is_in_bounds(self.start_position) || self.is_obstacle(self.start_position) {
            return Err(invalid(format!(
                "start position {} is not a free cell",
                self.start_position
            )));
        }

        if let Some(obstacle) = self.obstacles.iter().find(|pos| !self.is_in_bounds(**pos)) {
            return Err(invalid(format!("obstacle {} is out of bounds", obstacle)));
        }

        let mut enemy_ids = HashSet::new();
        for enemy in &self.enemies {
            if enemy.id.is_empty() || !enemy_ids.insert(enemy.id.as_str()) {
                return Err(invalid(format!("enemy id '{}' is empty or duplicated", enemy.id)));
            }
            if !self.is_in_bounds(enemy.position) || self.is_obstacle(enemy.position) {
                return Err(invalid(format!(
                    "enemy '{}' stands on an invalid cell {}",
                    enemy.id, enemy.position
                )));
            }
            if enemy.position == self.start_position {
                return Err(invalid(format!("enemy '{}' stands on the start cell", enemy.id)));
            }
            if enemy.health == 0 || enemy.health > enemy.max_health {
                return Err(invalid(format!(
                    "enemy '{}' has health {}/{}",
                    enemy.id, enemy.health, enemy.max_health
                )));
            }
            if enemy.accepted_commands.is_empty()
                || enemy.accepted_commands.iter().any(|c| c.trim().is_empty())
            {
                return Err(invalid(format!(
                    "enemy '{}' has no usable accepted commands",
                    enemy.id
                )));
            }
        }

        for collectible in &self.collectibles {
            if collectible.label.is_empty()
                || !self.is_in_bounds(collectible.position)
                || self.is_obstacle(collectible.position)
            {
                return Err(invalid(format!(
                    "collectible '{}' at {} is invalid",
                    collectible.label, collectible.position
                )));
            }
        }

        for (index, objective) in self.objectives.iter().enumerate() {
            self.validate_objective(index, objective)?;
        }

        if self.prerequisites().contains(&self.id) {
            return Err(invalid("level lists itself as a prerequisite".to_string()));
        }

        Ok(())
    }

    fn validate_objective(&self, index: usize, objective: &Objective) -> GitQuestResult<()> {
        let invalid = |reason: String| GitQuestError::InvalidLevel {
            level: self.id,
            reason: format!("objective {}: {}", index, reason),
        };

        match &objective.kind {
            ObjectiveKind::Reach { target } | ObjectiveKind::Learn { target, .. } => {
                if !self.is_in_bounds(*target) || self.is_obstacle(*target) {
                    return Err(invalid(format!("target {} is unreachable", target)));
                }
            }
            ObjectiveKind::DefeatEnemy { enemy_id } => {
                if self.enemy_index(enemy_id).is_none() {
                    return Err(GitQuestError::UnknownEnemy {
                        level: self.id,
                        enemy_id: enemy_id.clone(),
                    });
                }
            }
            ObjectiveKind::CollectSet { labels } => {
                if labels.is_empty() {
                    return Err(invalid("collect set has no labels".to_string()));
                }
                for label in labels {
                    if !self.collectibles.iter().any(|c| &c.label == label) {
                        return Err(GitQuestError::UnknownCollectible {
                            level: self.id,
                            label: label.clone(),
                        });
                    }
                }
            }
            ObjectiveKind::Command { commands } | ObjectiveKind::Sequence { commands } => {
                if commands.is_empty() || commands.iter().any(|c| c.trim().is_empty()) {
                    return Err(invalid("command list is empty".to_string()));
                }
            }
        }

        Ok(())
    }
}
