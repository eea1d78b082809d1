//! Synchronous turn rejections.

use thiserror::Error;

/// A user turn refused before anything was appended to the log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Message is {len} characters, limit is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error("A reply to the previous message is still pending")]
    TurnInFlight,

    #[error("Session is closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_reports_both_sizes() {
        let err = TurnError::InputTooLong { len: 5000, max: 4000 };
        assert_eq!(err.to_string(), "Message is 5000 characters, limit is 4000");
    }
}
