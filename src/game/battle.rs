//! # Battle Encounters
//!
//! A battle starts when the player bumps into an undefeated enemy and ends
//! when the enemy is defeated or the player flees. Every correct command
//! deals one point of damage; wrong commands change nothing.

use crate::{config, CommandMatcher, Enemy};
use serde::{Deserialize, Serialize};

/// Play-time state of one enemy. Survives fleeing, reset on level entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    pub health: u32,
    pub defeated: bool,
}

impl EnemyState {
    /// Fresh state taken from the enemy's definition.
    pub fn new(enemy: &Enemy) -> Self {
        Self {
            health: enemy.health,
            defeated: false,
        }
    }
}

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// The command was not one the enemy accepts
    Missed,
    /// The command landed but the enemy still stands
    Hit { remaining_health: u32 },
    /// The command brought the enemy's health to zero
    Defeated,
}

impl AttackOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, AttackOutcome::Missed)
    }
}

/// An ongoing battle against one enemy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encounter {
    enemy_index: usize,
    enemy_id: String,
}

impl Encounter {
    /// Starts a battle with the enemy at `enemy_index` of the level.
    pub fn begin(enemy_index: usize, enemy: &Enemy) -> Self {
        log::debug!("Encounter with '{}' begins", enemy.id);
        Self {
            enemy_index,
            enemy_id: enemy.id.clone(),
        }
    }

    pub fn enemy_index(&self) -> usize {
        self.enemy_index
    }

    pub fn enemy_id(&self) -> &str {
        &self.enemy_id
    }

    /// Validates `typed` against the enemy's accepted commands and applies
    /// damage on success.
    ///
    /// Health never drops below zero. When it reaches zero the enemy is
    /// marked defeated; the caller ends the encounter.
    pub fn attack(
        &self,
        matcher: &CommandMatcher,
        enemy: &Enemy,
        state: &mut EnemyState,
        typed: &str,
    ) -> AttackOutcome {
        if state.defeated {
            return AttackOutcome::Defeated;
        }

        if !matcher.matches(typed, &enemy.accepted_commands) {
            log::debug!("Attack on '{}' missed with '{}'", enemy.id, typed.trim());
            return AttackOutcome::Missed;
        }

        state.health = state.health.saturating_sub(config::DAMAGE_PER_HIT);
        if state.health == 0 {
            state.defeated = true;
            log::info!("Enemy '{}' defeated", enemy.id);
            AttackOutcome::Defeated
        } else {
            AttackOutcome::Hit {
                remaining_health: state.health,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::tests::sample_level;

    #[test]
    fn test_one_hit_enemy() {
        let level = sample_level();
        let enemy = &level.enemies[0];
        let mut state = EnemyState::new(enemy);
        let encounter = Encounter::begin(0, enemy);
        let matcher = CommandMatcher::new();

        assert_eq!(
            encounter.attack(&matcher, enemy, &mut state, "git status"),
            AttackOutcome::Missed
        );
        assert_eq!(state.health, 1);
        assert!(!state.defeated);

        assert_eq!(
            encounter.attack(&matcher, enemy, &mut state, "git init"),
            AttackOutcome::Defeated
        );
        assert_eq!(state.health, 0);
        assert!(state.defeated);
    }

    #[test]
    fn test_multi_hit_enemy() {
        let mut level = sample_level();
        level.enemies[0].health = 3;
        level.enemies[0].max_health = 3;
        let enemy = &level.enemies[0];
        let mut state = EnemyState::new(enemy);
        let encounter = Encounter::begin(0, enemy);
        let matcher = CommandMatcher::new();

        assert_eq!(
            encounter.attack(&matcher, enemy, &mut state, "git init"),
            AttackOutcome::Hit { remaining_health: 2 }
        );
        assert_eq!(
            encounter.attack(&matcher, enemy, &mut state, "GIT INIT"),
            AttackOutcome::Hit { remaining_health: 1 }
        );
        assert!(encounter
            .attack(&matcher, enemy, &mut state, "git init")
            .is_success());
        assert!(state.defeated);
        assert_eq!(encounter.enemy_id(), "beast");
    }
}
