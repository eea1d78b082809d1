//! Append-only conversation log.

use serde::{Deserialize, Serialize};

use super::turn::{ConversationTurn, Speaker};
use crate::domain::foundation::ValidationError;

/// Ordered, append-only sequence of turns owned by one session.
///
/// Turns are never removed or reordered. Appending is crate-private so that
/// only the orchestration layer can grow a log; everything else sees it
/// through shared references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn with the next ordinal and returns it.
    pub(crate) fn append(
        &mut self,
        speaker: Speaker,
        text: impl Into<String>,
    ) -> Result<&ConversationTurn, ValidationError> {
        let turn = ConversationTurn::new(speaker, text, self.next_ordinal())?;
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Returns the ordinal the next appended turn will receive.
    pub fn next_ordinal(&self) -> u64 {
        self.turns.last().map_or(1, |t| t.ordinal() + 1)
    }

    /// Returns all turns in order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Returns the most recent turn.
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Returns the most recent human turn.
    pub fn last_human(&self) -> Option<&ConversationTurn> {
        self.turns.iter().rev().find(|t| t.is_human())
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Snapshots are validated on the way back in: ordinals must be strictly increasing.
impl<'de> Deserialize<'de> for ConversationLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            turns: Vec<ConversationTurn>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let ordered = raw
            .turns
            .windows(2)
            .all(|pair| pair[0].ordinal() < pair[1].ordinal());
        if !ordered {
            return Err(serde::de::Error::custom(
                "conversation turns must have strictly increasing ordinals",
            ));
        }
        Ok(Self { turns: raw.turns })
    }
}
