use serde::{Deserialize, Serialize};
use std::fmt;

/// Claimer state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimerState {
    /// Polling pending reward, no transaction in flight
    Idle,
    /// Claim transaction submitted, waiting for the receipt
    Claiming,
}

impl ClaimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimerState::Idle => "IDLE",
            ClaimerState::Claiming => "CLAIMING",
        }
    }

    /// Check if this state can transition to another state
    pub fn can_transition_to(&self, target: ClaimerState) -> bool {
        use ClaimerState::*;

        match (self, target) {
            (Idle, Idle) => true,     // below threshold
            (Idle, Claiming) => true, // threshold reached
            (Claiming, Idle) => true, // claim returned, success or not
            _ => false,
        }
    }
}

impl fmt::Display for ClaimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
