//! # Input Module
//!
//! Input handling and command matching for player interactions.

pub mod commands;

pub use commands::*;

use crate::game::Direction;

/// Input handler for processing player lines.
///
/// Turns a line typed into the terminal into a [`PlayerInput`]. Movement
/// keys are recognised first; everything else is treated as a Git command.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitquest::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse_line("w"), Some(PlayerInput::Move(Direction::Up)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: false,
        }
    }

    /// Parses one line of input.
    ///
    /// Returns None for blank lines, which are never submitted as commands.
    pub fn parse_line(&self, line: &str) -> Option<PlayerInput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(direction) = self.direction_for(trimmed) {
            return Some(PlayerInput::Move(direction));
        }

        let input = match trimmed.to_lowercase().as_str() {
            "quit" | "exit" | ":q" => PlayerInput::Quit,
            "help" | "?" => PlayerInput::Help,
            "hint" => PlayerInput::Hint,
            "flee" | "run" => PlayerInput::Flee,
            "levels" => PlayerInput::ShowLevels,
            "map" | "look" => PlayerInput::ShowMap,
            _ => PlayerInput::Command(trimmed.to_string()),
        };
        Some(input)
    }

    fn direction_for(&self, key: &str) -> Option<Direction> {
        match key.to_lowercase().as_str() {
            "w" | "up" => Some(Direction::Up),
            "s" | "down" => Some(Direction::Down),
            "a" | "left" => Some(Direction::Left),
            "d" | "right" => Some(Direction::Right),
            "k" if self.vi_keys_enabled => Some(Direction::Up),
            "j" if self.vi_keys_enabled => Some(Direction::Down),
            "h" if self.vi_keys_enabled => Some(Direction::Left),
            "l" if self.vi_keys_enabled => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Player input types that can be processed by the game loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    /// Move one cell in a direction
    Move(Direction),
    /// Submit a typed Git command
    Command(String),
    /// Leave the current battle
    Flee,
    /// Show the hint for the current battle or objective
    Hint,
    /// Show help information
    Help,
    /// List levels with their lock state
    ShowLevels,
    /// Redraw the map
    ShowMap,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line("a"), Some(PlayerInput::Move(Direction::Left)));
        assert_eq!(handler.parse_line(" RIGHT "), Some(PlayerInput::Move(Direction::Right)));
        assert_eq!(handler.parse_line("down"), Some(PlayerInput::Move(Direction::Down)));
    }

    #[test]
    fn test_vi_keys_only_when_enabled() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.parse_line("k"), Some(PlayerInput::Command("k".to_string())));

        handler.vi_keys_enabled = true;
        assert_eq!(handler.parse_line("k"), Some(PlayerInput::Move(Direction::Up)));
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let handler = InputHandler::new();
        assert_eq!(handler.parse_line(""), None);
        assert_eq!(handler.parse_line("   "), None);
    }

    #[test]
    fn test_commands_keep_original_text() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.parse_line("  git commit -m \"Hello\" "),
            Some(PlayerInput::Command("git commit -m \"Hello\"".to_string()))
        );
        assert_eq!(handler.parse_line("flee"), Some(PlayerInput::Flee));
        assert_eq!(handler.parse_line("QUIT"), Some(PlayerInput::Quit));
    }
}
