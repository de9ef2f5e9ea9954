//! Session state
//!
//! A session starts in `Selecting` and ends in exactly one of the two
//! terminal states. There is no way back.

use crate::domain::core::PixelRect;

/// Where a selection session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The user is choosing cells
    #[default]
    Selecting,
    /// The selection was accepted and applied
    Committed,
    /// The session was aborted
    Cancelled,
}

impl SessionState {
    /// Checks if the session has finished
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Selecting)
    }
}

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The window was moved to this rectangle
    Committed(PixelRect),
    Cancelled,
}

impl SessionOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::Committed(_) => 0,
            SessionOutcome::Cancelled => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_selecting() {
        assert_eq!(SessionState::default(), SessionState::Selecting);
        assert!(!SessionState::Selecting.is_terminal());
        assert!(SessionState::Committed.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
    }

    #[test]
    fn outcome_exit_codes() {
        let committed = SessionOutcome::Committed(PixelRect::new(0, 0, 10, 10));
        assert_eq!(committed.exit_code(), 0);
        assert_eq!(SessionOutcome::Cancelled.exit_code(), 1);
    }
}
