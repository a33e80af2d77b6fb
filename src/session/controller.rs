//! SessionController - the terminal state machine
//!
//! ```text
//!            insert_card                 enter_pin (valid)
//!   ┌──────┐ ──────────▶ ┌─────────────┐ ────────────────▶ ┌───────────────┐
//!   │ IDLE │             │ CARD_PRESENT│                   │ AUTHENTICATED │
//!   └──────┘ ◀────────── └─────────────┘ ◀──────────────── └───────────────┘
//!       ▲      eject_card       │ enter_pin (invalid)            │
//!       │                       └──▶ InvalidPin, stays           │
//!       └──────────────────────── eject_card ────────────────────┘
//! ```
//!
//! Account operations (balance, deposit, withdraw) are only forwarded in
//! AUTHENTICATED. The bound account is held as its identifier and resolved
//! through the directory on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::SessionState;
use crate::account::Account;
use crate::bank::AccountDirectory;
use crate::card::Card;
use crate::core_types::{AccountId, Amount};
use crate::error::{AtmError, Result};
use crate::logging::TARGET_AUDIT;

/// Per-terminal limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLimits {
    /// Largest single withdrawal this terminal dispenses. `None` = unlimited.
    #[serde(default)]
    pub max_withdrawal: Option<Amount>,
}

#[derive(Debug)]
enum Session {
    Idle,
    CardPresent {
        card: Card,
        inserted_at: DateTime<Utc>,
    },
    Authenticated {
        card: Card,
        account_id: AccountId,
        inserted_at: DateTime<Utc>,
    },
}

/// One instance per physical terminal; lives across many card sessions.
///
/// Holds an exclusive borrow of the directory, so every mutation made
/// through a terminal is serialized by construction.
#[derive(Debug)]
pub struct SessionController<'d> {
    directory: &'d mut AccountDirectory,
    limits: TerminalLimits,
    session: Session,
}

impl<'d> SessionController<'d> {
    pub fn new(directory: &'d mut AccountDirectory) -> Self {
        Self::with_limits(directory, TerminalLimits::default())
    }

    pub fn with_limits(directory: &'d mut AccountDirectory, limits: TerminalLimits) -> Self {
        Self {
            directory,
            limits,
            session: Session::Idle,
        }
    }

    // ============================================================
    // OBSERVERS
    // ============================================================

    pub fn state(&self) -> SessionState {
        match self.session {
            Session::Idle => SessionState::Idle,
            Session::CardPresent { .. } => SessionState::CardPresent,
            Session::Authenticated { .. } => SessionState::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn inserted_card(&self) -> Option<&Card> {
        match &self.session {
            Session::Idle => None,
            Session::CardPresent { card, .. } | Session::Authenticated { card, .. } => Some(card),
        }
    }

    /// Identifier of the bound account; `Some` iff authenticated
    pub fn bound_account_id(&self) -> Option<&str> {
        match &self.session {
            Session::Authenticated { account_id, .. } => Some(account_id),
            _ => None,
        }
    }

    pub fn limits(&self) -> TerminalLimits {
        self.limits
    }

    pub fn directory(&self) -> &AccountDirectory {
        &*self.directory
    }

    // ============================================================
    // CARD LIFECYCLE
    // ============================================================

    /// # Errors
    /// [`AtmError::CardAlreadyInserted`] if a card is in the slot
    pub fn insert_card(&mut self, card: &Card) -> Result<()> {
        if !matches!(self.session, Session::Idle) {
            return Err(AtmError::CardAlreadyInserted);
        }
        tracing::debug!(card = %card, "Card inserted");
        self.session = Session::CardPresent {
            card: card.clone(),
            inserted_at: Utc::now(),
        };
        Ok(())
    }

    /// Return to IDLE. Always succeeds, also with an empty slot.
    ///
    /// Hands back the card that was inserted, if any.
    pub fn eject_card(&mut self) -> Option<Card> {
        match std::mem::replace(&mut self.session, Session::Idle) {
            Session::Idle => None,
            Session::CardPresent { card, inserted_at }
            | Session::Authenticated {
                card, inserted_at, ..
            } => {
                let held_ms = (Utc::now() - inserted_at).num_milliseconds();
                tracing::debug!(card = %card, held_ms, "Card ejected");
                Some(card)
            }
        }
    }

    /// Validate `pin` against the inserted card and bind its account.
    ///
    /// Re-entering a valid PIN while authenticated keeps the session as is;
    /// an invalid one fails without dropping the existing authentication.
    ///
    /// # Errors
    /// - [`AtmError::NoCardInserted`] in IDLE
    /// - [`AtmError::InvalidPin`] on mismatch
    /// - [`AtmError::AccountNotFound`] if the directory has a PIN but no account
    pub fn enter_pin(&mut self, pin: &str) -> Result<()> {
        let (card, inserted_at) = match &self.session {
            Session::Idle => return Err(AtmError::NoCardInserted),
            Session::CardPresent { card, inserted_at }
            | Session::Authenticated {
                card, inserted_at, ..
            } => (card, *inserted_at),
        };

        if !self.directory.validate_pin(card.number(), pin) {
            tracing::warn!(target: TARGET_AUDIT, card = %card, "PIN rejected");
            return Err(AtmError::InvalidPin);
        }

        let account_id = self
            .directory
            .get_account(card.number())?
            .account_id()
            .to_string();
        let card = card.clone();

        tracing::debug!(card = %card, "Session authenticated");
        self.session = Session::Authenticated {
            card,
            account_id,
            inserted_at,
        };
        Ok(())
    }

    /// Confirm the bound account
    ///
    /// # Errors
    /// [`AtmError::NotAuthenticated`] unless the PIN has been validated
    pub fn select_account(&self) -> Result<&Account> {
        match &self.session {
            Session::Authenticated { account_id, .. } => self.directory.get_account(account_id),
            _ => Err(AtmError::NotAuthenticated),
        }
    }

    // ============================================================
    // ACCOUNT OPERATIONS (authenticated only)
    // ============================================================

    pub fn view_balance(&self) -> Result<Amount> {
        Ok(self.bound_account()?.balance())
    }

    /// # Errors
    /// [`AtmError::NoAccountSelected`] when not authenticated, otherwise
    /// whatever [`Account::deposit`] reports
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        let account = self.bound_account_mut()?;
        let balance = account.deposit(amount)?;
        tracing::info!(target: TARGET_AUDIT, amount, balance, "Deposit");
        Ok(balance)
    }

    /// # Errors
    /// - [`AtmError::NoAccountSelected`] when not authenticated
    /// - [`AtmError::WithdrawalLimitExceeded`] above the terminal limit
    /// - whatever [`Account::withdraw`] reports
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount> {
        let limit = self.limits.max_withdrawal;
        let account = self.bound_account_mut()?;

        if let Some(limit) = limit {
            if amount > 0 && amount > limit {
                return Err(AtmError::WithdrawalLimitExceeded {
                    requested: amount,
                    limit,
                });
            }
        }

        let balance = account.withdraw(amount)?;
        tracing::info!(target: TARGET_AUDIT, amount, balance, "Withdrawal");
        Ok(balance)
    }

    fn bound_account(&self) -> Result<&Account> {
        match &self.session {
            Session::Authenticated { account_id, .. } => self.directory.get_account(account_id),
            _ => Err(AtmError::NoAccountSelected),
        }
    }

    fn bound_account_mut(&mut self) -> Result<&mut Account> {
        match &self.session {
            Session::Authenticated { account_id, .. } => {
                self.directory.get_account_mut(account_id)
            }
            _ => Err(AtmError::NoAccountSelected),
        }
    }
}
