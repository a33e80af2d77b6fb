//! Session FSM State Definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Observable state of a terminal session
///
/// Initial (and post-eject) state: IDLE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No card in the slot
    Idle,

    /// Card inserted, PIN not yet validated
    CardPresent,

    /// PIN validated, account bound
    Authenticated,
}

impl SessionState {
    /// A card is in the slot
    #[inline]
    pub fn has_card(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }

    /// Account operations are allowed
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::CardPresent => "CARD_PRESENT",
            SessionState::Authenticated => "AUTHENTICATED",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
