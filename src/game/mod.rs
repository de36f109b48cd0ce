//! # Game Module
//!
//! Core game state management, level data and the per-level simulation.
//!
//! This module contains the building blocks of the GitQuest engine:
//! - Static level definitions and the embedded level catalog
//! - Tile grid queries and player movement
//! - Objective tracking and command battles
//! - The level graph deciding which levels are unlocked

pub mod battle;
pub mod catalog;
pub mod events;
pub mod grid;
pub mod level;
pub mod objectives;
pub mod progress;
pub mod session;
pub mod state;

pub use battle::*;
pub use catalog::*;
pub use events::*;
pub use grid::*;
pub use level::*;
pub use objectives::*;
pub use progress::*;
pub use session::*;
pub use state::*;

use serde::{Deserialize, Serialize};

/// Represents a grid cell address on a level map.
///
/// # Examples
///
/// ```
/// use gitquest::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.to_string(), "(10, 5)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position one cell away in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Directions the player can move and face. There is no diagonal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::{Direction, Position};
    ///
    /// let delta = Direction::Up.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
        assert_eq!(pos.to_string(), "(5, 10)");
    }

    #[test]
    fn test_position_addition() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, -2);
        assert_eq!(pos1 + pos2, Position::new(8, 8));
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.step(Direction::Up), Position::new(2, 1));
        assert_eq!(pos.step(Direction::Down), Position::new(2, 3));
        assert_eq!(pos.step(Direction::Left), Position::new(1, 2));
        assert_eq!(pos.step(Direction::Right), Position::new(3, 2));
    }
}
