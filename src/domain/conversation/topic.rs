//! Conversation topic value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum topic length in characters; longer input is cut silently.
pub const MAX_TOPIC_CHARS: usize = 200;

/// Short display name of a conversation.
///
/// # Invariants
///
/// - non-empty after trimming surrounding whitespace
/// - at most [`MAX_TOPIC_CHARS`] characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validates and normalizes user input into a topic.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }
        Ok(Self(trimmed.chars().take(MAX_TOPIC_CHARS).collect()))
    }

    /// Rebuilds a topic read back from storage without re-validating it.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Returns the topic text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_topic() {
        assert_eq!(Topic::new(""), Err(ValidationError::empty_field("topic")));
    }

    #[test]
    fn rejects_whitespace_only_topic() {
        assert!(Topic::new("  \t\n ").is_err());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(Topic::new("  Rust lifetimes  ").unwrap().as_str(), "Rust lifetimes");
    }

    #[test]
    fn keeps_topic_at_exact_limit() {
        let raw = "a".repeat(MAX_TOPIC_CHARS);
        assert_eq!(Topic::new(&raw).unwrap().as_str(), raw);
    }

    #[test]
    fn truncates_on_character_boundaries() {
        let raw = "é".repeat(MAX_TOPIC_CHARS + 5);
        let topic = Topic::new(&raw).unwrap();
        assert_eq!(topic.as_str().chars().count(), MAX_TOPIC_CHARS);
    }

    proptest! {
        #[test]
        fn long_topics_keep_exactly_the_first_200_chars(raw in "[a-zA-Z0-9]{201,400}") {
            let topic = Topic::new(&raw).unwrap();
            let expected: String = raw.chars().take(MAX_TOPIC_CHARS).collect();
            prop_assert_eq!(topic.as_str(), expected.as_str());
        }

        #[test]
        fn valid_topics_are_never_longer_than_limit(raw in "\\PC{1,300}") {
            if let Ok(topic) = Topic::new(&raw) {
                prop_assert!(topic.as_str().chars().count() <= MAX_TOPIC_CHARS);
                prop_assert!(!topic.as_str().trim().is_empty());
            }
        }
    }
}
