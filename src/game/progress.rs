//! # Level Progression
//!
//! The set of completed levels and the unlock rules built on top of it.
//!
//! A level unlocks when every one of its prerequisites is completed. Levels
//! with no branch information, or an empty prerequisite list, are always
//! unlocked. Completion is sticky until an explicit reset.

use crate::{GitQuestError, GitQuestResult, LevelCatalog, LevelId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Completed level ids, persisted between runs as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressState {
    completed: BTreeSet<LevelId>,
}

impl ProgressState {
    /// Empty progress: nothing completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed level ids in ascending order.
    pub fn completed(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.completed.iter().copied()
    }

    pub fn is_completed(&self, id: LevelId) -> bool {
        self.completed.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Marks a level as completed.
    ///
    /// Returns `false` if it already was, so replays are harmless.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::ProgressState;
    ///
    /// let mut progress = ProgressState::new();
    /// assert!(progress.record_completion(1));
    /// assert!(!progress.record_completion(1));
    /// assert_eq!(progress.len(), 1);
    /// ```
    pub fn record_completion(&mut self, id: LevelId) -> bool {
        let newly = self.completed.insert(id);
        if newly {
            log::info!("Recorded completion of level {}", id);
        }
        newly
    }

    /// Forgets every completed level.
    pub fn reset(&mut self) {
        log::info!("Progress reset ({} levels cleared)", self.completed.len());
        self.completed.clear();
    }

    pub fn to_json(&self) -> GitQuestResult<String> {
        serde_json::to_string(self).map_err(GitQuestError::from)
    }

    pub fn from_json(json: &str) -> GitQuestResult<Self> {
        serde_json::from_str(json).map_err(GitQuestError::from)
    }

    /// Writes progress to `path`, replacing any previous file.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed over
    /// `path`, so readers see either the old set or the new one.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GitQuestResult<()> {
        let path = path.as_ref();
        let staging = staging_path(path);
        fs::write(&staging, self.to_json()?)?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        log::debug!("Saved progress to {}", path.display());
        Ok(())
    }

    /// Reads progress from `path`. A missing file means a fresh start.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GitQuestResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No progress file at {}, starting fresh", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// How the next level is picked after one is completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessorPolicy {
    /// `current + 1`, provided it exists and is unlocked
    Sequential,
    /// Lowest-id level that is unlocked and not yet completed
    #[default]
    BranchAware,
}

impl fmt::Display for SuccessorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessorPolicy::Sequential => write!(f, "sequential"),
            SuccessorPolicy::BranchAware => write!(f, "branch-aware"),
        }
    }
}

impl FromStr for SuccessorPolicy {
    type Err = GitQuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(SuccessorPolicy::Sequential),
            "branch-aware" | "branch_aware" | "branchaware" => Ok(SuccessorPolicy::BranchAware),
            other => Err(GitQuestError::InvalidState(format!(
                "unknown successor policy '{}'",
                other
            ))),
        }
    }
}

/// Unlock queries over a catalog.
#[derive(Debug, Clone, Copy)]
pub struct LevelGraph<'a> {
    catalog: &'a LevelCatalog,
}

impl<'a> LevelGraph<'a> {
    pub fn new(catalog: &'a LevelCatalog) -> Self {
        Self { catalog }
    }

    /// True iff every prerequisite of the level is completed.
    ///
    /// Unknown levels are never unlocked.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::{LevelCatalog, LevelGraph, ProgressState};
    ///
    /// let catalog = LevelCatalog::builtin().unwrap();
    /// let graph = LevelGraph::new(&catalog);
    /// let progress = ProgressState::new();
    /// assert!(graph.is_unlocked(1, &progress));
    /// assert!(!graph.is_unlocked(2, &progress));
    /// ```
    pub fn is_unlocked(&self, id: LevelId, progress: &ProgressState) -> bool {
        self.catalog
            .get(id)
            .is_some_and(|level| Self::prerequisites_met(level.prerequisites(), progress))
    }

    /// AND over a prerequisite list. An empty list is always met.
    pub fn prerequisites_met(prerequisites: &[LevelId], progress: &ProgressState) -> bool {
        prerequisites.iter().all(|id| progress.is_completed(*id))
    }

    /// Every unlocked level in ascending id order.
    pub fn unlocked_levels(&self, progress: &ProgressState) -> Vec<LevelId> {
        self.catalog
            .ids()
            .filter(|id| self.is_unlocked(*id, progress))
            .collect()
    }

    /// The level to play after `current`, if there is one.
    pub fn successor(
        &self,
        current: LevelId,
        progress: &ProgressState,
        policy: SuccessorPolicy,
    ) -> Option<LevelId> {
        let next = match policy {
            SuccessorPolicy::Sequential => current
                .checked_add(1)
                .filter(|next| self.is_unlocked(*next, progress)),
            SuccessorPolicy::BranchAware => self
                .catalog
                .ids()
                .find(|id| !progress.is_completed(*id) && self.is_unlocked(*id, progress)),
        };
        log::debug!("Successor of level {} ({}): {:?}", current, policy, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn progress_of(ids: &[LevelId]) -> ProgressState {
        let mut progress = ProgressState::new();
        for id in ids {
            progress.record_completion(*id);
        }
        progress
    }

    #[test]
    fn test_entry_level_always_unlocked() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);
        assert_eq!(graph.unlocked_levels(&ProgressState::new()), vec![1]);
    }

    #[test]
    fn test_merge_level_needs_both_branches() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);

        let progress = progress_of(&[1, 2, 3]);
        assert!(graph.is_unlocked(4, &progress));
        assert!(graph.is_unlocked(5, &progress));
        assert!(!graph.is_unlocked(6, &progress));

        let progress = progress_of(&[1, 2, 3, 4]);
        assert!(!graph.is_unlocked(6, &progress));

        let progress = progress_of(&[1, 2, 3, 4, 5]);
        assert!(graph.is_unlocked(6, &progress));
    }

    #[test]
    fn test_unknown_level_is_locked() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);
        assert!(!graph.is_unlocked(42, &progress_of(&[1, 2, 3, 4, 5, 6, 7, 8])));
    }

    #[test]
    fn test_reset_relocks_everything_but_entry() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);
        let mut progress = progress_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(graph.unlocked_levels(&progress).len(), 8);

        progress.reset();
        assert!(progress.is_empty());
        assert_eq!(graph.unlocked_levels(&progress), vec![1]);
    }

    #[test]
    fn test_branch_aware_route() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);
        let mut progress = ProgressState::new();
        let mut route = vec![1];
        let mut current = 1;

        progress.record_completion(current);
        while let Some(next) = graph.successor(current, &progress, SuccessorPolicy::BranchAware)
        {
            route.push(next);
            progress.record_completion(next);
            current = next;
        }

        assert_eq!(route, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_sequential_stops_at_locked_level() {
        let catalog = LevelCatalog::builtin().unwrap();
        let graph = LevelGraph::new(&catalog);

        let progress = progress_of(&[1, 2, 3, 4]);
        assert_eq!(
            graph.successor(4, &progress, SuccessorPolicy::Sequential),
            Some(5)
        );
        // Level 6 waits for the experimental branch too
        let progress = progress_of(&[1, 2, 3, 5]);
        assert_eq!(graph.successor(5, &progress, SuccessorPolicy::Sequential), None);
        assert_eq!(
            graph.successor(5, &progress, SuccessorPolicy::BranchAware),
            Some(4)
        );
        let everything = progress_of(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(graph.successor(8, &everything, SuccessorPolicy::Sequential), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "sequential".parse::<SuccessorPolicy>().unwrap(),
            SuccessorPolicy::Sequential
        );
        assert_eq!(
            "Branch-Aware".parse::<SuccessorPolicy>().unwrap(),
            SuccessorPolicy::BranchAware
        );
        assert!("random".parse::<SuccessorPolicy>().is_err());
        assert_eq!(SuccessorPolicy::default().to_string(), "branch-aware");
    }

    #[test]
    fn test_progress_json_is_plain_array() {
        let progress = progress_of(&[3, 1, 2]);
        assert_eq!(progress.to_json().unwrap(), "[1,2,3]");
        assert_eq!(ProgressState::from_json("[2,1]").unwrap(), progress_of(&[1, 2]));
    }

    #[test]
    fn test_progress_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");

        assert!(ProgressState::load_from_file(&path).unwrap().is_empty());

        progress_of(&[1, 2]).save_to_file(&path).unwrap();
        let loaded = ProgressState::load_from_file(&path).unwrap();
        assert!(loaded.is_completed(1) && loaded.is_completed(2));
        assert!(!loaded.is_completed(3));
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");

        progress_of(&[1, 2, 3]).save_to_file(&path).unwrap();
        progress_of(&[1]).save_to_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
        assert!(!staging_path(&path).exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_interrupted_save_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        progress_of(&[1, 2]).save_to_file(&path).unwrap();

        // A crash between writing and renaming leaves only the staging file
        fs::write(staging_path(&path), "[1, 2, 3").unwrap();
        assert_eq!(ProgressState::load_from_file(&path).unwrap(), progress_of(&[1, 2]));

        progress_of(&[1, 2, 3]).save_to_file(&path).unwrap();
        assert_eq!(ProgressState::load_from_file(&path).unwrap(), progress_of(&[1, 2, 3]));
        assert!(!staging_path(&path).exists());
    }
}
