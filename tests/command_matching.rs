//! Property tests for the command matcher.

use gitquest::{CommandMatcher, LevelCatalog, MatchRule, ObjectiveKind};
use proptest::prelude::*;

/// Every command the built-in levels accept, from enemies and objectives.
fn builtin_commands() -> Vec<String> {
    let catalog = LevelCatalog::builtin().unwrap();
    let mut commands = Vec::new();
    for level in catalog.iter() {
        for enemy in &level.enemies {
            commands.extend(enemy.accepted_commands.iter().cloned());
        }
        for objective in &level.objectives {
            match &objective.kind {
                ObjectiveKind::Command { commands: accepted }
                | ObjectiveKind::Sequence { commands: accepted } => {
                    commands.extend(accepted.iter().cloned())
                }
                _ => {}
            }
        }
    }
    commands
}

/// Flips the case of characters selected by `mask`.
fn scramble_case(text: &str, mask: &[bool]) -> String {
    text.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn test_case_and_padding_are_ignored(
        command in prop::sample::select(builtin_commands()),
        mask in prop::collection::vec(any::<bool>(), 1..16),
        lead in "[ \t]{0,4}",
        trail in "[ \t]{0,4}",
    ) {
        let matcher = CommandMatcher::new();
        let typed = format!("{}{}{}", lead, scramble_case(&command, &mask), trail);
        prop_assert!(matcher.matches(&typed, &[command.as_str()]));
    }

    #[test]
    fn test_any_quoted_commit_message_is_accepted(
        message in "[A-Za-z0-9][A-Za-z0-9 ,.!-]{0,30}",
        double_quotes in any::<bool>(),
    ) {
        let quote = if double_quotes { '"' } else { '\'' };
        let typed = format!("git commit -m {}{}{}", quote, message, quote);
        prop_assert!(gitquest::matches(&typed, &["git commit -m \"Initial commit\""]));
    }

    #[test]
    fn test_unrelated_text_never_matches(text in "[a-fh-z][a-z -]{0,24}") {
        let commands = builtin_commands();
        prop_assert!(!gitquest::matches(&text, &commands));
    }

    #[test]
    fn test_blank_input_never_matches(blank in "[ \t\n]{0,8}") {
        prop_assert!(!gitquest::matches(&blank, &builtin_commands()));
    }
}

#[test]
fn test_commit_without_message_is_rejected() {
    let accepted = ["git commit -m \"Initial commit\""];
    assert!(!gitquest::matches("git commit", &accepted));
    assert!(!gitquest::matches("git commit -m", &accepted));
    assert!(!gitquest::matches("git commit -m \"\"", &accepted));
    assert!(!gitquest::matches("git commit -m unquoted", &accepted));
}

#[test]
fn test_custom_rule_takes_precedence() {
    let prefix = MatchRule {
        name: "add-anything",
        applies: |pattern| pattern.starts_with("git add"),
        matches: |input, _pattern| input.starts_with("git add "),
    };
    let matcher = CommandMatcher::new().with_rule(prefix);

    assert_eq!(matcher.rules()[0].name, "add-anything");
    assert!(matcher.matches("git add src/main.rs", &["git add README.md"]));
    assert!(!CommandMatcher::new().matches("git add src/main.rs", &["git add README.md"]));
    // Other families still use the built-in rules
    assert!(matcher.matches("git init", &["git init"]));
}
