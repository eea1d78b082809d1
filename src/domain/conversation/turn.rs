//! Conversation turn value object.
//!
//! A turn is one human or assistant contribution. Turns are immutable once
//! appended to a [`ConversationLog`](super::ConversationLog); their ordinal is
//! the only sequencing guarantee.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Who contributed a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The host or guest typing into the chat.
    Human,
    /// The assistant voice (oracle follow-ups, narratives, failure notices).
    Assistant,
}

/// An immutable turn within a conversation.
///
/// # Invariants
///
/// - `text` is non-blank (validated at construction)
/// - `ordinal` is strictly greater than every earlier turn in the same log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    speaker: Speaker,
    text: String,
    ordinal: u64,
}

impl ConversationTurn {
    pub(crate) fn new(
        speaker: Speaker,
        text: impl Into<String>,
        ordinal: u64,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self {
            speaker,
            text,
            ordinal,
        })
    }

    /// Returns who produced this turn.
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// Returns the turn text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the position of this turn within its log (1-based).
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Returns true if the human side of the conversation produced this turn.
    pub fn is_human(&self) -> bool {
        self.speaker == Speaker::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_text() {
        let result = ConversationTurn::new(Speaker::Human, "  \n ", 1);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn keeps_text_verbatim() {
        let turn = ConversationTurn::new(Speaker::Assistant, " Where is it? ", 2).unwrap();
        assert_eq!(turn.text(), " Where is it? ");
        assert_eq!(turn.ordinal(), 2);
        assert!(!turn.is_human());
    }

    #[test]
    fn speaker_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Speaker::Human).unwrap(), "\"human\"");
        assert_eq!(
            serde_json::to_string(&Speaker::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
