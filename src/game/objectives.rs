//! # Objective Tracking
//!
//! Per-session state machine that turns triggers into objective completions
//! and a single level-completion signal.
//!
//! Objective flags only ever move from incomplete to complete. Raising a
//! trigger for an objective that is already complete is a no-op.

use crate::{CommandMatcher, GameEvent, Level, ObjectiveKind, Position};
use std::sync::Arc;

/// Raw events consumed by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger<'a> {
    /// A command or sequence objective was satisfied from the terminal
    CommandSucceeded { objective: usize },
    /// The enemy with this id was defeated
    EnemyDefeated(&'a str),
    /// The player stepped onto this cell
    PositionReached(Position),
    /// Every collectible of this collect-set objective has been gathered
    CollectSetFilled { objective: usize },
}

/// Completion state of every objective in one level session.
#[derive(Debug, Clone)]
pub struct ObjectiveTracker {
    level: Arc<Level>,
    completed: Vec<bool>,
    /// Next expected command for sequence objectives
    sequence_cursor: Vec<usize>,
    level_complete_reported: bool,
}

impl ObjectiveTracker {
    /// Creates a tracker with every objective incomplete.
    pub fn new(level: Arc<Level>) -> Self {
        let count = level.objectives.len();
        Self {
            level,
            completed: vec![false; count],
            sequence_cursor: vec![0; count],
            level_complete_reported: false,
        }
    }

    /// Whether the objective at `index` is completed.
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    pub fn total(&self) -> usize {
        self.completed.len()
    }

    /// True once every objective is completed.
    pub fn all_completed(&self) -> bool {
        !self.completed.is_empty() && self.completed.iter().all(|done| *done)
    }

    /// True once `LevelCompleted` has been emitted for this session.
    pub fn is_level_complete(&self) -> bool {
        self.level_complete_reported
    }

    /// How many commands of a sequence objective have been typed so far.
    pub fn sequence_progress(&self, index: usize) -> Option<usize> {
        match self.level.objectives.get(index).map(|o| &o.kind) {
            Some(ObjectiveKind::Sequence { .. }) => self.sequence_cursor.get(index).copied(),
            _ => None,
        }
    }

    /// Applies a trigger and returns the resulting events.
    pub fn apply(&mut self, trigger: Trigger<'_>) -> Vec<GameEvent> {
        let mut events = Vec::new();

        let matching: Vec<usize> = self
            .level
            .objectives
            .iter()
            .enumerate()
            .filter(|(index, objective)| {
                !self.completed[*index] && trigger_matches(trigger, *index, &objective.kind)
            })
            .map(|(index, _)| index)
            .collect();

        for index in matching {
            self.complete(index, &mut events);
        }

        self.check_level_complete(&mut events);
        events
    }

    /// Checks a command typed outside of a battle against the command and
    /// sequence objectives.
    ///
    /// The first event is always a `CommandResult`. A sequence only advances
    /// when the typed command matches its next expected entry; a wrong
    /// command leaves the sequence where it was.
    pub fn submit_command(&mut self, matcher: &CommandMatcher, typed: &str) -> Vec<GameEvent> {
        let level = Arc::clone(&self.level);
        let mut success = false;
        let mut finished = Vec::new();

        for (index, objective) in level.objectives.iter().enumerate() {
            if self.completed[index] {
                continue;
            }
            match &objective.kind {
                ObjectiveKind::Command { commands } => {
                    if matcher.matches(typed, commands) {
                        success = true;
                        finished.push(index);
                    }
                }
                ObjectiveKind::Sequence { commands } => {
                    let cursor = self.sequence_cursor[index];
                    let expected = commands.get(cursor).map(std::slice::from_ref);
                    if expected.is_some_and(|expected| matcher.matches(typed, expected)) {
                        success = true;
                        self.sequence_cursor[index] = cursor + 1;
                        log::debug!(
                            "Sequence objective {} advanced to {}/{}",
                            index,
                            cursor + 1,
                            commands.len()
                        );
                        if cursor + 1 == commands.len() {
                            finished.push(index);
                        }
                    }
                }
                _ => {}
            }
        }

        let mut events = vec![GameEvent::CommandResult { success }];
        for objective in finished {
            events.extend(self.apply(Trigger::CommandSucceeded { objective }));
        }
        events
    }

    fn complete(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        if self.completed[index] {
            return;
        }
        self.completed[index] = true;
        let objective = &self.level.objectives[index];
        log::info!(
            "Level {} {} objective {} completed: {}",
            self.level.id,
            objective.kind.name(),
            index,
            objective.description
        );
        events.push(GameEvent::ObjectiveCompleted { index });
    }

    fn check_level_complete(&mut self, events: &mut Vec<GameEvent>) {
        if self.level_complete_reported || !self.all_completed() {
            return;
        }
        self.level_complete_reported = true;
        log::info!("Level {} completed", self.level.id);
        events.push(GameEvent::LevelCompleted {
            level_id: self.level.id,
        });
    }
}

fn trigger_matches(trigger: Trigger<'_>, index: usize, kind: &ObjectiveKind) -> bool {
    match (trigger, kind) {
        (
            Trigger::CommandSucceeded { objective },
            ObjectiveKind::Command { .. } | ObjectiveKind::Sequence { .. },
        ) => objective == index,
        (Trigger::EnemyDefeated(defeated), ObjectiveKind::DefeatEnemy { enemy_id }) => {
            defeated == enemy_id.as_str()
        }
        (Trigger::PositionReached(pos), ObjectiveKind::Reach { target })
        | (Trigger::PositionReached(pos), ObjectiveKind::Learn { target, .. }) => pos == *target,
        (Trigger::CollectSetFilled { objective }, ObjectiveKind::CollectSet { .. }) => {
            objective == index
        }
        _ => false,
    }
}
