//! Terminal session: card insertion, PIN gate, account operations

pub mod controller;
pub mod state;

pub use controller::{SessionController, TerminalLimits};
pub use state::SessionState;
