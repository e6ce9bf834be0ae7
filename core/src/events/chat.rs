//! Server death broadcasts.

use std::sync::LazyLock;

use regex::Regex;

/// `<name> was killed`, `<name> was killed by <name>`, optional `!`.
static CHAT_DEATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z0-9_]+) was killed(?: by [a-z0-9_]+)?!?")
        .expect("death pattern is a valid regex")
});

/// Extract the victim name from a death broadcast, if the line is one.
pub fn match_death_message(line: &str) -> Option<&str> {
    // cheap reject before running the regex on every chat line
    if !line.to_ascii_lowercase().contains("was killed") {
        return None;
    }
    CHAT_DEATH_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// True if `line` announces the death of `self_name`.
pub fn is_self_death(line: &str, self_name: &str) -> bool {
    match_death_message(line).is_some_and(|victim| victim.eq_ignore_ascii_case(self_name))
}
