//! Message hygiene applied before a prompt is interpreted.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const MAX_MESSAGE_CHARS: usize = 2000;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref SCRIPT_SCHEME: Regex = Regex::new(r"(?i)javascript:").unwrap();
    static ref INLINE_SPACE: Regex = Regex::new(r"[ \t\x{a0}]+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextIssue {
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message must be less than {max} characters")]
    TooLong { max: usize },
}

/// Strips markup and collapses runs of spaces. Line breaks survive so that
/// "Label: value" lines can still be recognised.
pub fn clean_text(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, "");
    let without_scripts = SCRIPT_SCHEME.replace_all(&without_tags, "");
    without_scripts
        .lines()
        .map(|line| INLINE_SPACE.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn validate_message(text: &str) -> Result<(), TextIssue> {
    if text.trim().is_empty() {
        return Err(TextIssue::Empty);
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(TextIssue::TooLong { max: MAX_MESSAGE_CHARS });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_removed_and_lines_kept() {
        let cleaned = clean_text("  <b>Event:</b>   Tech   Expo \n\n Location:\tDubai ");
        assert_eq!(cleaned, "Event: Tech Expo\nLocation: Dubai");
    }

    #[test]
    fn script_schemes_are_dropped() {
        assert_eq!(clean_text("see javascript:alert(1)"), "see alert(1)");
    }

    #[test]
    fn blank_and_oversized_messages_are_refused() {
        assert_eq!(validate_message("   \n"), Err(TextIssue::Empty));
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(
            validate_message(&long),
            Err(TextIssue::TooLong { max: MAX_MESSAGE_CHARS })
        );
        assert!(validate_message("Make slides for Dubai").is_ok());
    }
}
