//! State machine trait for lifecycle enums.
//!
//! Gives every session lifecycle the same validated transition surface.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list the legal targets of each state; `transition_to`
/// and `is_terminal` follow from that.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for TurnState {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Idle => vec![AwaitingOracle, Published, Abandoned],
///             AwaitingOracle => vec![Idle, Abandoned],
///             Published | Abandoned => vec![],
///         }
///     }
/// }
///
/// let next = TurnState::Idle.transition_to(TurnState::AwaitingOracle)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if a transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs the transition, returning an error if it is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if the current state is terminal (no outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
