//! Turn state machine shared by every conversational session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a session is in its turn loop.
///
/// - `Idle`: waiting for user input or a publish request
/// - `AwaitingOracle`: one oracle call in flight, new input refused
/// - `Published`: draft saved, session over
/// - `Abandoned`: session discarded
///
/// Whether an oracle answer merged or failed is a turn outcome, not a
/// resting state; both paths land back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingOracle,
    Published,
    Abandoned,
}

impl TurnState {
    /// Returns true if new user input may start a turn.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true once the session has ended.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Published | Self::Abandoned)
    }
}

impl StateMachine for TurnState {
    fn valid_transitions(&self) -> Vec<Self> {
        use TurnState::*;
        match self {
            Idle => vec![AwaitingOracle, Published, Abandoned],
            AwaitingOracle => vec![Idle, Abandoned],
            Published | Abandoned => vec![],
        }
    }
}
