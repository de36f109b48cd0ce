//! # Tile Grid
//!
//! Read-only queries over a level's geometry combined with the current
//! session flags. Maps are small, so every query is a linear scan.

use crate::{Collectible, Enemy, EnemyState, Level, ObjectiveTracker, Position};

/// A view of one level as seen by the movement simulator.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid<'a> {
    level: &'a Level,
    enemies: &'a [EnemyState],
    collected: &'a [bool],
    objectives: &'a ObjectiveTracker,
}

impl<'a> TileGrid<'a> {
    /// Creates a view over a level and the session state that goes with it.
    ///
    /// `enemies` and `collected` are indexed like `level.enemies` and
    /// `level.collectibles`.
    pub fn new(
        level: &'a Level,
        enemies: &'a [EnemyState],
        collected: &'a [bool],
        objectives: &'a ObjectiveTracker,
    ) -> Self {
        Self {
            level,
            enemies,
            collected,
            objectives,
        }
    }

    pub fn level(&self) -> &'a Level {
        self.level
    }

    /// True iff `0 <= x < width` and `0 <= y < height`.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.level.is_in_bounds(pos)
    }

    /// True iff an obstacle sits exactly on `pos`.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.level.is_obstacle(pos)
    }

    /// The first enemy on `pos` that has not been defeated.
    pub fn enemy_at(&self, pos: Position) -> Option<(usize, &'a Enemy)> {
        self.level
            .enemies
            .iter()
            .enumerate()
            .find(|(index, enemy)| {
                enemy.position == pos
                    && !self.enemies.get(*index).map(|s| s.defeated).unwrap_or(false)
            })
    }

    /// The collectible on `pos` that has not been gathered yet.
    pub fn collectible_at(&self, pos: Position) -> Option<(usize, &'a Collectible)> {
        self.level
            .collectibles
            .iter()
            .enumerate()
            .find(|(index, collectible)| {
                collectible.position == pos && !self.collected.get(*index).copied().unwrap_or(false)
            })
    }

    /// Incomplete reach and learn objectives whose target is `pos`.
    pub fn objective_target_hit(&self, pos: Position) -> Vec<usize> {
        self.level
            .objectives
            .iter()
            .enumerate()
            .filter(|(index, objective)| {
                objective.kind.target() == Some(pos) && !self.objectives.is_completed(*index)
            })
            .map(|(index, _)| index)
            .collect()
    }
}
