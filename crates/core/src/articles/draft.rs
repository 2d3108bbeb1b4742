//! Article request body and its validation rules.

use serde::{Deserialize, Serialize};

use crate::Error;

const TITLE_MAX_CHARS: usize = 50;
const CONTENT_CHARS: std::ops::RangeInclusive<usize> = 60..=300;

/// Title and content supplied by a client on create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ArticleDraft {
    /// Article title, unique across all articles (max 50 characters).
    pub title: String,
    /// Article body (60 to 300 characters).
    pub content: String,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }

    /// Check every rule and report all violations at once.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationFailed` listing each broken rule, joined by `", "`.
    pub fn validate(&self) -> Result<(), Error> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push("Title cannot be blank");
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            violations.push("Title cannot exceed 50 characters");
        }

        if self.content.trim().is_empty() {
            violations.push("Content cannot be blank");
        }
        if !CONTENT_CHARS.contains(&self.content.chars().count()) {
            violations.push("Content must be between 60 and 300 characters");
        }

        if violations.is_empty() { Ok(()) } else { Err(Error::ValidationFailed(violations.join(", "))) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(draft: &ArticleDraft) -> String {
        match draft.validate() {
            Err(Error::ValidationFailed(msg)) => msg,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_draft() {
        let draft = ArticleDraft::new("Rust", "a".repeat(60));
        assert!(draft.validate().is_ok());

        let draft = ArticleDraft::new("t".repeat(50), "a".repeat(300));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_blank_title() {
        let msg = violations(&ArticleDraft::new("   ", "a".repeat(80)));
        assert_eq!(msg, "Title cannot be blank");
    }

    #[test]
    fn test_title_too_long() {
        let msg = violations(&ArticleDraft::new("t".repeat(51), "a".repeat(80)));
        assert_eq!(msg, "Title cannot exceed 50 characters");
    }

    #[test]
    fn test_content_length_bounds() {
        let short = violations(&ArticleDraft::new("Rust", "a".repeat(59)));
        assert_eq!(short, "Content must be between 60 and 300 characters");

        let long = violations(&ArticleDraft::new("Rust", "a".repeat(301)));
        assert_eq!(long, "Content must be between 60 and 300 characters");
    }

    #[test]
    fn test_all_violations_reported_together() {
        let msg = violations(&ArticleDraft::new("", ""));
        assert_eq!(
            msg,
            "Title cannot be blank, Content cannot be blank, Content must be between 60 and 300 characters"
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let draft = ArticleDraft::new("é".repeat(50), "ü".repeat(60));
        assert!(draft.validate().is_ok());
    }
}
