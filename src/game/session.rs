//! # Level Session
//!
//! Everything that changes while one level is being played: player
//! position and facing, objective flags, enemy health, gathered
//! collectibles and the active battle.
//!
//! A session is built fresh from the immutable [`Level`] every time the
//! level is entered, so a replay never sees flags from an earlier run.

use crate::input::commands;
use crate::{
    AttackOutcome, CommandMatcher, Direction, Encounter, EnemyState, GameEvent, Level,
    ObjectiveKind, ObjectiveTracker, Position, TileGrid, Trigger,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where the player stands and which way they face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub facing: Direction,
}

impl PlayerState {
    /// Player at a level's start cell, facing down.
    pub fn at_start(level: &Level) -> Self {
        Self {
            position: level.start_position,
            facing: Direction::Down,
        }
    }
}

/// One play-through of a level.
#[derive(Debug, Clone)]
pub struct LevelSession {
    level: Arc<Level>,
    player: PlayerState,
    objectives: ObjectiveTracker,
    enemies: Vec<EnemyState>,
    collected: Vec<bool>,
    encounter: Option<Encounter>,
    matcher: CommandMatcher,
}

impl LevelSession {
    /// Starts a session with the built-in command matcher.
    pub fn new(level: Arc<Level>) -> Self {
        Self::with_matcher(level, CommandMatcher::new())
    }

    /// Starts a session that validates commands with `matcher`.
    pub fn with_matcher(level: Arc<Level>, matcher: CommandMatcher) -> Self {
        log::debug!("Starting session for level {} ({})", level.id, level.title);
        Self {
            player: PlayerState::at_start(&level),
            objectives: ObjectiveTracker::new(Arc::clone(&level)),
            enemies: level.enemies.iter().map(EnemyState::new).collect(),
            collected: vec![false; level.collectibles.len()],
            encounter: None,
            matcher,
            level,
        }
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn objectives(&self) -> &ObjectiveTracker {
        &self.objectives
    }

    /// Play-time state of the enemy at `index` of the level.
    pub fn enemy_state(&self, index: usize) -> Option<&EnemyState> {
        self.enemies.get(index)
    }

    /// Whether the collectible at `index` of the level has been gathered.
    pub fn is_collected(&self, index: usize) -> bool {
        self.collected.get(index).copied().unwrap_or(false)
    }

    /// The battle in progress, if any.
    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// True once the level has reported completion.
    pub fn is_complete(&self) -> bool {
        self.objectives.is_level_complete()
    }

    /// Grid view over the level and this session's flags.
    pub fn grid(&self) -> TileGrid<'_> {
        TileGrid::new(&self.level, &self.enemies, &self.collected, &self.objectives)
    }

    /// Moves the player one cell.
    ///
    /// Facing changes even when the move is blocked. Bumping into an
    /// undefeated enemy starts a battle without moving. Input is ignored
    /// while a battle is in progress.
    pub fn move_player(&mut self, direction: Direction) -> Vec<GameEvent> {
        if let Some(encounter) = &self.encounter {
            log::debug!(
                "Ignoring movement during encounter with '{}'",
                encounter.enemy_id()
            );
            return Vec::new();
        }

        self.player.facing = direction;
        let from = self.player.position;
        let to = from.step(direction);

        let blocked = {
            let grid = self.grid();
            !grid.is_in_bounds(to) || grid.is_obstacle(to)
        };
        if blocked {
            log::debug!("Move to {} blocked", to);
            return vec![GameEvent::MoveBlocked {
                at: to,
                facing: direction,
            }];
        }

        let encounter = self
            .grid()
            .enemy_at(to)
            .map(|(index, enemy)| Encounter::begin(index, enemy));
        if let Some(encounter) = encounter {
            let enemy_id = encounter.enemy_id().to_string();
            self.encounter = Some(encounter);
            return vec![GameEvent::EnemyEncountered { enemy_id }];
        }

        self.player.position = to;
        let mut events = vec![GameEvent::PlayerMoved {
            from,
            to,
            facing: direction,
        }];

        for index in self.grid().objective_target_hit(to) {
            if let ObjectiveKind::Learn { .. } = self.level.objectives[index].kind {
                events.push(GameEvent::LessonOpened { objective: index });
            }
        }
        events.extend(self.objectives.apply(Trigger::PositionReached(to)));

        self.gather_at(to, &mut events);
        events
    }

    /// Submits a typed command.
    ///
    /// During a battle the command is an attack; otherwise it is checked
    /// against the level's command and sequence objectives. Blank input is
    /// rejected without consulting the matcher.
    pub fn submit_command(&mut self, typed: &str) -> Vec<GameEvent> {
        if typed.trim().is_empty() {
            log::debug!("Rejected empty command");
            return match &self.encounter {
                Some(encounter) => vec![GameEvent::AttackResult {
                    enemy_id: encounter.enemy_id().to_string(),
                    success: false,
                    remaining_health: self.enemy_health(encounter.enemy_index()),
                }],
                None => vec![GameEvent::CommandResult { success: false }],
            };
        }

        if self.encounter.is_some() {
            return self.attack(typed);
        }

        self.objectives.submit_command(&self.matcher, typed)
    }

    /// Attacks the enemy of the current battle.
    pub fn attack(&mut self, typed: &str) -> Vec<GameEvent> {
        let Some(encounter) = self.encounter.clone() else {
            log::warn!("Attack submitted with no encounter in progress");
            return Vec::new();
        };

        let level = Arc::clone(&self.level);
        let index = encounter.enemy_index();
        let (Some(enemy), Some(state)) = (level.enemies.get(index), self.enemies.get_mut(index))
        else {
            self.encounter = None;
            return Vec::new();
        };

        let outcome = encounter.attack(&self.matcher, enemy, state, typed);
        let mut events = vec![GameEvent::AttackResult {
            enemy_id: enemy.id.clone(),
            success: outcome.is_success(),
            remaining_health: state.health,
        }];

        if outcome == AttackOutcome::Defeated {
            self.encounter = None;
            events.push(GameEvent::EnemyDefeated {
                enemy_id: enemy.id.clone(),
            });
            events.extend(self.objectives.apply(Trigger::EnemyDefeated(&enemy.id)));
        }

        events
    }

    /// Leaves the current battle. The enemy keeps its remaining health.
    pub fn flee(&mut self) -> Vec<GameEvent> {
        match self.encounter.take() {
            Some(encounter) => {
                log::debug!("Fled from '{}'", encounter.enemy_id());
                vec![GameEvent::EncounterFled {
                    enemy_id: encounter.enemy_id().to_string(),
                    remaining_health: self.enemy_health(encounter.enemy_index()),
                }]
            }
            None => Vec::new(),
        }
    }

    /// Advice for what to type next.
    ///
    /// In a battle this is the enemy's hint; otherwise it comes from the
    /// first incomplete command or sequence objective.
    pub fn current_hint(&self) -> Option<String> {
        if let Some(encounter) = &self.encounter {
            return self
                .level
                .enemies
                .get(encounter.enemy_index())
                .map(|enemy| enemy.hint.clone());
        }

        self.level
            .objectives
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.objectives.is_completed(*index))
            .find_map(|(index, objective)| match &objective.kind {
                ObjectiveKind::Command { commands } => {
                    commands::hint_for(commands).map(str::to_string)
                }
                ObjectiveKind::Sequence { commands } => {
                    let next = self.objectives.sequence_progress(index).unwrap_or(0);
                    commands.get(next).map(|cmd| format!("Next command: {}", cmd))
                }
                _ => None,
            })
    }

    fn enemy_health(&self, index: usize) -> u32 {
        self.enemies.get(index).map(|state| state.health).unwrap_or(0)
    }

    /// Picks up an uncollected collectible at `pos` and completes any
    /// collect-set objective that is now fully gathered.
    fn gather_at(&mut self, pos: Position, events: &mut Vec<GameEvent>) {
        let Some((index, label)) = self
            .grid()
            .collectible_at(pos)
            .map(|(index, collectible)| (index, collectible.label.clone()))
        else {
            return;
        };

        self.collected[index] = true;
        log::debug!("Gathered '{}' at {}", label, pos);
        events.push(GameEvent::CollectibleGathered {
            label: label.clone(),
            position: pos,
        });

        let filled: Vec<usize> = self
            .level
            .objectives
            .iter()
            .enumerate()
            .filter_map(|(objective, o)| match &o.kind {
                ObjectiveKind::CollectSet { labels }
                    if labels.contains(&label) && self.is_set_gathered(labels) =>
                {
                    Some(objective)
                }
                _ => None,
            })
            .collect();

        for objective in filled {
            events.extend(self.objectives.apply(Trigger::CollectSetFilled { objective }));
        }
    }

    fn is_set_gathered(&self, labels: &[String]) -> bool {
        self.level
            .collectibles
            .iter()
            .zip(&self.collected)
            .filter(|(collectible, _)| labels.contains(&collectible.label))
            .all(|(_, gathered)| *gathered)
    }
}
