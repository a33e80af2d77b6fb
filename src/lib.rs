//! atm_core - Teller Session Core
//!
//! Card-and-PIN session logic for an automated teller, built as a small
//! set of strongly-typed pieces.
//!
//! # Modules
//!
//! - [`core_types`] - Amount / AccountId aliases and card constants
//! - [`error`] - `AtmError`, the single error taxonomy
//! - [`card`] - Luhn-validated card numbers with masking
//! - [`account`] - Enforced balance ledger (deposit / withdraw)
//! - [`bank`] - AccountDirectory and pluggable PIN verification
//! - [`session`] - SessionController state machine
//! - [`config`] - YAML application config
//! - [`logging`] - tracing subscriber setup and the audit target
//! - [`script`] - Session script parser and runner
//!
//! # Example
//!
//! ```
//! use atm_core::{AccountDirectory, Card, SessionController};
//!
//! let mut directory = AccountDirectory::new();
//! directory.register("4111111111111111", "1234", 100).unwrap();
//!
//! let card = Card::new("4111111111111111").unwrap();
//! let mut atm = SessionController::new(&mut directory);
//! atm.insert_card(&card).unwrap();
//! atm.enter_pin("1234").unwrap();
//! assert_eq!(atm.deposit(50).unwrap(), 150);
//! atm.eject_card();
//! ```

// Core types - must be first!
pub mod core_types;
pub mod error;

// Domain
pub mod account;
pub mod bank;
pub mod card;
pub mod session;

// Application plumbing
pub mod config;
pub mod logging;
pub mod script;

// Convenient re-exports at crate root
pub use account::Account;
pub use bank::{AccountDirectory, AccountSnapshot, PinHashing, PinVerifier};
pub use card::Card;
pub use core_types::{AccountId, Amount};
pub use error::{AtmError, Result};
pub use session::{SessionController, SessionState, TerminalLimits};
