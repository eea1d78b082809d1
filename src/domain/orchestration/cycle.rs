//! The per-session turn loop: log plus state.

use crate::domain::conversation::{ConversationLog, Speaker};
use crate::domain::foundation::{StateMachine, ValidationError};

use super::{TurnError, TurnState};

/// Stands in for a blank assistant reply so every turn still gets one.
pub const BLANK_REPLY: &str = "Sorry, I lost my train of thought. Could you say that again?";

/// Owns a session's conversation log and enforces one turn at a time.
///
/// Only this type appends to the log. A human turn is appended when a turn
/// begins; exactly one assistant turn is appended when it ends, whether the
/// oracle answered or failed.
#[derive(Debug, Clone)]
pub struct TurnCycle {
    log: ConversationLog,
    state: TurnState,
    max_input_chars: usize,
}

impl TurnCycle {
    pub fn new(max_input_chars: usize) -> Self {
        Self {
            log: ConversationLog::new(),
            state: TurnState::Idle,
            max_input_chars,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Fails unless the session is idle.
    pub fn ensure_idle(&self) -> Result<(), TurnError> {
        match self.state {
            TurnState::Idle => Ok(()),
            TurnState::AwaitingOracle => Err(TurnError::TurnInFlight),
            TurnState::Published | TurnState::Abandoned => Err(TurnError::SessionClosed),
        }
    }

    /// Validates user input, appends it and moves to `AwaitingOracle`.
    ///
    /// Nothing is appended when the input is refused.
    pub fn begin(&mut self, input: &str) -> Result<(), TurnError> {
        self.ensure_idle()?;
        let text = input.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyInput);
        }
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(TurnError::InputTooLong {
                len,
                max: self.max_input_chars,
            });
        }

        self.log
            .append(Speaker::Human, text)
            .map_err(|_| TurnError::EmptyInput)?;
        self.state = TurnState::AwaitingOracle;
        Ok(())
    }

    /// Appends the assistant reply and returns to `Idle`.
    ///
    /// A blank reply is replaced by [`BLANK_REPLY`]. Returns false (and
    /// appends nothing) if no turn was in flight.
    pub fn finish(&mut self, reply: &str) -> bool {
        let Ok(next) = self.state.transition_to(TurnState::Idle) else {
            return false;
        };
        let text = match reply.trim() {
            "" => {
                tracing::warn!("blank assistant reply replaced");
                BLANK_REPLY
            }
            text => text,
        };
        if let Err(error) = self.log.append(Speaker::Assistant, text) {
            tracing::warn!(%error, "assistant turn not appended");
        }
        self.state = next;
        true
    }

    /// Drops an in-flight turn without an assistant reply.
    ///
    /// Used when the future driving a turn was dropped mid-call.
    pub fn cancel_pending(&mut self) -> bool {
        if self.state == TurnState::AwaitingOracle {
            self.state = TurnState::Idle;
            true
        } else {
            false
        }
    }

    /// Ends the session as `Published` or `Abandoned`.
    pub fn close(&mut self, terminal: TurnState) -> Result<(), ValidationError> {
        if !terminal.is_closed() {
            return Err(ValidationError::invalid_transition(self.state, terminal));
        }
        self.state = self.state.transition_to(terminal)?;
        Ok(())
    }

    /// Starts over with an empty log. Only allowed while idle.
    pub fn restart(&mut self) -> Result<(), TurnError> {
        self.ensure_idle()?;
        self.log = ConversationLog::new();
        Ok(())
    }
}
