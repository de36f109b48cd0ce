//! # Level Catalog
//!
//! The fixed set of levels, embedded into the binary at build time and
//! validated once when loaded. A catalog that passes [`LevelCatalog::from_levels`]
//! has no dangling enemy, collectible or prerequisite references and every
//! level can eventually be unlocked.

use crate::{GitQuestError, GitQuestResult, Level, LevelId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Level definitions shipped with the game.
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// Immutable, validated collection of levels keyed by id.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: BTreeMap<LevelId, Arc<Level>>,
}

impl LevelCatalog {
    /// Loads the levels embedded in the crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::LevelCatalog;
    ///
    /// let catalog = LevelCatalog::builtin().unwrap();
    /// assert_eq!(catalog.len(), 8);
    /// assert!(catalog.get(1).is_some());
    /// ```
    pub fn builtin() -> GitQuestResult<Self> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Parses and validates a JSON array of levels.
    pub fn from_json(json: &str) -> GitQuestResult<Self> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    /// Validates a set of levels and builds the catalog.
    pub fn from_levels(levels: Vec<Level>) -> GitQuestResult<Self> {
        let mut map = BTreeMap::new();
        for level in levels {
            level.validate()?;
            let id = level.id;
            if map.insert(id, Arc::new(level)).is_some() {
                return Err(GitQuestError::InvalidLevel {
                    level: id,
                    reason: "duplicate level id".to_string(),
                });
            }
        }

        let catalog = Self { levels: map };
        catalog.validate_graph()?;
        log::debug!("Loaded {} levels", catalog.len());
        Ok(catalog)
    }

    fn validate_graph(&self) -> GitQuestResult<()> {
        for level in self.levels.values() {
            if let Some(missing) = level
                .prerequisites()
                .iter()
                .find(|id| !self.levels.contains_key(*id))
            {
                return Err(GitQuestError::UnknownPrerequisite {
                    level: level.id,
                    prerequisite: *missing,
                });
            }
        }

        // Completing levels in any unlock order must reach every level
        let mut reachable = BTreeSet::new();
        loop {
            let before = reachable.len();
            for level in self.levels.values() {
                if level.prerequisites().iter().all(|id| reachable.contains(id)) {
                    reachable.insert(level.id);
                }
            }
            if reachable.len() == before {
                break;
            }
        }

        match self.levels.keys().find(|id| !reachable.contains(*id)) {
            Some(id) => Err(GitQuestError::InvalidLevel {
                level: *id,
                reason: "prerequisites can never be satisfied".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the level with the given id.
    pub fn get(&self, id: LevelId) -> Option<Arc<Level>> {
        self.levels.get(&id).cloned()
    }

    /// Returns the level with the given id or an `UnknownLevel` error.
    pub fn load_level(&self, id: LevelId) -> GitQuestResult<Arc<Level>> {
        self.get(id).ok_or(GitQuestError::UnknownLevel(id))
    }

    /// Level ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.levels.keys().copied()
    }

    /// Levels in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Level>> {
        self.levels.values()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
