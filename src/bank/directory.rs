//! AccountDirectory - the bank system
//!
//! Owns every [`Account`] and the PIN credential registered with it.
//!
//! # Invariants
//!
//! - `accounts` and `pins` always have identical key sets. `register`
//!   validates and enrols before inserting either map, so a failure
//!   leaves both untouched.
//! - Entries are never removed.
//! - Keys are exact-match strings: no trimming, no case folding.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::credentials::{PinVerifier, PlaintextPinVerifier, StoredPin};
use crate::account::Account;
use crate::core_types::{AccountId, Amount};
use crate::error::{AtmError, Result};

/// Point-in-time view of one account, for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    pub balance: Amount,
    pub version: u64,
}

/// In-memory account and PIN store
///
/// Explicitly constructed and passed to each `SessionController`; there is
/// no process-wide instance.
pub struct AccountDirectory {
    accounts: FxHashMap<AccountId, Account>,
    pins: FxHashMap<AccountId, StoredPin>,
    verifier: Box<dyn PinVerifier>,
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AccountDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountDirectory")
            .field("accounts", &self.accounts.len())
            .field("verifier", &self.verifier.name())
            .finish()
    }
}

impl AccountDirectory {
    /// Empty directory using plaintext PIN comparison
    pub fn new() -> Self {
        Self::with_verifier(Box::new(PlaintextPinVerifier))
    }

    /// Empty directory using the given credential verifier
    pub fn with_verifier(verifier: Box<dyn PinVerifier>) -> Self {
        Self {
            accounts: FxHashMap::default(),
            pins: FxHashMap::default(),
            verifier,
        }
    }

    /// Register a new account with its PIN.
    ///
    /// # Errors
    /// - [`AtmError::DuplicateAccount`] if `account_id` is already registered
    /// - [`AtmError::InvalidInitialState`] if `initial_balance < 0`
    /// - [`AtmError::Credential`] if the verifier cannot enrol the PIN
    pub fn register(&mut self, account_id: &str, pin: &str, initial_balance: Amount) -> Result<()> {
        if self.accounts.contains_key(account_id) {
            return Err(AtmError::DuplicateAccount(account_id.to_string()));
        }
        let account = Account::new(account_id, initial_balance)?;
        let stored = self.verifier.enroll(pin)?;

        self.accounts.insert(account_id.to_string(), account);
        self.pins.insert(account_id.to_string(), stored);

        tracing::debug!(
            accounts = self.accounts.len(),
            verifier = self.verifier.name(),
            "Account registered"
        );
        Ok(())
    }

    /// Whether `pin` matches the PIN registered for `card_number`.
    ///
    /// An unknown card number is a non-match, not an error.
    pub fn validate_pin(&self, card_number: &str, pin: &str) -> bool {
        self.pins
            .get(card_number)
            .is_some_and(|stored| self.verifier.verify(pin, stored))
    }

    /// # Errors
    /// [`AtmError::AccountNotFound`] for an unregistered identifier
    pub fn get_account(&self, card_number: &str) -> Result<&Account> {
        self.accounts
            .get(card_number)
            .ok_or_else(|| AtmError::AccountNotFound(card_number.to_string()))
    }

    /// # Errors
    /// [`AtmError::AccountNotFound`] for an unregistered identifier
    pub fn get_account_mut(&mut self, card_number: &str) -> Result<&mut Account> {
        self.accounts
            .get_mut(card_number)
            .ok_or_else(|| AtmError::AccountNotFound(card_number.to_string()))
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.accounts.contains_key(account_id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Registered identifiers, sorted
    pub fn account_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.accounts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All accounts, sorted by identifier
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        let mut rows: Vec<AccountSnapshot> = self
            .accounts
            .values()
            .map(|a| AccountSnapshot {
                account_id: a.account_id().to_string(),
                balance: a.balance(),
                version: a.version(),
            })
            .collect();
        rows.sort_unstable_by(|a, b| a.account_id.cmp(&b.account_id));
        rows
    }

    pub fn verifier_name(&self) -> &'static str {
        self.verifier.name()
    }
}
