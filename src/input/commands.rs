//! # Command Matching
//!
//! Decides whether a typed string counts as one of the accepted Git commands.
//!
//! Matching is driven by a small table of [`MatchRule`]s. For every accepted
//! pattern the first rule whose predicate accepts the pattern decides the
//! outcome, so new command families can be added without touching
//! [`CommandMatcher::matches`].

use regex::Regex;
use std::sync::OnceLock;

/// Accepts any message for `git commit -m`, quoted with either quote style.
const COMMIT_MESSAGE_PATTERN: &str = r#"(?i)^git\s+commit\s+-m\s+["'].+["']$"#;

fn commit_message_regex() -> Option<&'static Regex> {
    static COMMIT_MESSAGE: OnceLock<Option<Regex>> = OnceLock::new();
    COMMIT_MESSAGE
        .get_or_init(|| Regex::new(COMMIT_MESSAGE_PATTERN).ok())
        .as_ref()
}

/// Normalizes typed input: surrounding whitespace trimmed, lowercased.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// One entry of the matcher's rule table.
///
/// `applies` inspects the normalized accepted pattern; `matches` compares the
/// normalized input against it.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    pub name: &'static str,
    pub applies: fn(pattern: &str) -> bool,
    pub matches: fn(input: &str, pattern: &str) -> bool,
}

impl MatchRule {
    /// Any commit with a quoted message satisfies a `commit -m` pattern.
    pub fn commit_message() -> Self {
        Self {
            name: "commit-message",
            applies: |pattern| pattern.contains("commit -m"),
            matches: |input, _pattern| {
                commit_message_regex().is_some_and(|regex| regex.is_match(input))
            },
        }
    }

    /// Exact equality after normalization.
    pub fn exact() -> Self {
        Self {
            name: "exact",
            applies: |_pattern| true,
            matches: |input, pattern| input == pattern,
        }
    }
}

/// Matches typed commands against accepted patterns.
///
/// # Examples
///
/// ```
/// use gitquest::CommandMatcher;
///
/// let matcher = CommandMatcher::new();
/// assert!(matcher.matches("  GIT INIT ", &["git init"]));
/// assert!(matcher.matches("git commit -m 'wip'", &["git commit -m \"Initial commit\""]));
/// assert!(!matcher.matches("git commit", &["git commit -m \"Initial commit\""]));
/// ```
#[derive(Debug, Clone)]
pub struct CommandMatcher {
    rules: Vec<MatchRule>,
}

impl Default for CommandMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMatcher {
    /// Creates a matcher with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: vec![MatchRule::commit_message(), MatchRule::exact()],
        }
    }

    /// Adds a rule that is consulted before every rule already present.
    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// Rules in the order they are consulted.
    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Returns true if `typed` satisfies any of the accepted patterns.
    ///
    /// Empty or whitespace-only input never matches.
    pub fn matches<S: AsRef<str>>(&self, typed: &str, accepted: &[S]) -> bool {
        let input = normalize(typed);
        if input.is_empty() {
            return false;
        }

        accepted.iter().any(|pattern| {
            let pattern = normalize(pattern.as_ref());
            self.rules
                .iter()
                .find(|rule| (rule.applies)(&pattern))
                .is_some_and(|rule| (rule.matches)(&input, &pattern))
        })
    }
}

/// Matches with the built-in rule table.
pub fn matches<S: AsRef<str>>(typed: &str, accepted: &[S]) -> bool {
    CommandMatcher::new().matches(typed, accepted)
}

/// General advice for the command family an accepted pattern belongs to.
pub fn hint_for<S: AsRef<str>>(accepted: &[S]) -> Option<&'static str> {
    const HINTS: &[(&str, &str)] = &[
        ("git init", "Try: git init"),
        ("git add", "Remember to specify the filename, like: git add filename.ext"),
        ("git commit", "Don't forget the message flag: git commit -m \"your message\""),
        ("git status", "Try: git status"),
        ("git log", "Try: git log"),
        ("git branch", "Try: git branch branch-name"),
        ("git checkout", "Try: git checkout branch-name or git checkout -b new-branch"),
        ("git merge", "Try: git merge branch-name"),
        ("git diff", "Try: git diff"),
        ("git cat-file", "Try: git cat-file -t or -p followed by object reference"),
    ];

    HINTS
        .iter()
        .find(|(family, _)| accepted.iter().any(|cmd| cmd.as_ref().contains(family)))
        .map(|(_, hint)| *hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        assert!(matches("git init", &["git init"]));
        assert!(matches("  Git Init\t", &["git init"]));
        assert!(matches("git add readme.md", &["git add README.md"]));
        assert!(!matches("git  init", &["git init"]));
        assert!(!matches("git status", &["git init"]));
    }

    #[test]
    fn test_empty_input_never_matches() {
        assert!(!matches("", &["git init"]));
        assert!(!matches("   ", &["git init"]));
        assert!(!matches("", &[""]));
    }

    #[test]
    fn test_commit_family_accepts_any_message() {
        let accepted = ["git commit -m \"Initial commit\""];
        assert!(matches("git commit -m \"Add login\"", &accepted));
        assert!(matches("GIT COMMIT -M 'x'", &accepted));
        assert!(matches("git   commit  -m   'spaced out'", &accepted));
        assert!(!matches("git commit", &accepted));
        assert!(!matches("git commit -m", &accepted));
        assert!(!matches("git commit -m no quotes", &accepted));
    }

    #[test]
    fn test_multiple_patterns_are_alternatives() {
        let accepted = ["git branch feature", "git checkout -b feature", "git switch -c feature"];
        assert!(matches("git switch -c feature", &accepted));
        assert!(matches("git branch feature", &accepted));
        assert!(!matches("git branch other", &accepted));
    }

    #[test]
    fn test_custom_rule_takes_precedence() {
        let any_flag_order = MatchRule {
            name: "log-oneline",
            applies: |pattern| pattern == "git log --oneline",
            matches: |input, _| {
                let mut words: Vec<&str> = input.split_whitespace().collect();
                words.sort_unstable();
                words == ["--oneline", "git", "log"]
            },
        };
        let matcher = CommandMatcher::new().with_rule(any_flag_order);

        assert_eq!(matcher.rules()[0].name, "log-oneline");
        assert!(matcher.matches("git log --oneline", &["git log --oneline"]));
        assert!(matcher.matches("git --oneline log", &["git log --oneline"]));
        assert!(!matches("git --oneline log", &["git log --oneline"]));
    }

    #[test]
    fn test_hint_for_known_family() {
        assert_eq!(hint_for(&["git merge feature"]), Some("Try: git merge branch-name"));
        assert_eq!(hint_for(&["hg commit"]), None);
    }
}
