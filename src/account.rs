//! ENFORCED ACCOUNT TYPE - Owned by the AccountDirectory
//!
//! This is the SINGLE source of truth for balance arithmetic.
//! ALL balance mutations MUST go through these methods.
//!
//! # Enforcement Strategy:
//! 1. Fields are PRIVATE - no direct access
//! 2. All mutations return Result - errors are explicit
//! 3. Version auto-increments - audit trail
//! 4. checked_add/sub - overflow protection
//! 5. A failed call leaves balance AND version untouched

use serde::Serialize;

use crate::core_types::Amount;
use crate::error::{AtmError, Result};

/// Balance ledger for a single account
///
/// # Invariants (ENFORCED by private fields):
/// - balance >= 0 at all times
/// - every mutation is a positive deposit or a withdrawal <= balance
/// - version counts successful mutations only
///
/// # Usage:
/// ```
/// use atm_core::account::Account;
///
/// let mut account = Account::new("4111111111111111", 100).unwrap();
/// assert_eq!(account.deposit(50).unwrap(), 150);
/// assert_eq!(account.withdraw(70).unwrap(), 80);
/// assert!(account.withdraw(1000).is_err());
/// assert_eq!(account.balance(), 80);
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    account_id: String, // PRIVATE - immutable after creation
    balance: Amount,    // PRIVATE - ONLY modified through deposit/withdraw
    version: u64,       // PRIVATE - incremented on each successful mutation
}

impl Account {
    /// Create an account with an opening balance.
    ///
    /// # Errors
    /// - [`AtmError::InvalidInitialState`] if `initial_balance < 0`
    pub fn new(account_id: impl Into<String>, initial_balance: Amount) -> Result<Self> {
        if initial_balance < 0 {
            return Err(AtmError::InvalidInitialState(initial_balance));
        }
        Ok(Self {
            account_id: account_id.into(),
            balance: initial_balance,
            version: 0,
        })
    }

    // ============================================================
    // READ-ONLY GETTERS (safe to expose)
    // ============================================================

    #[inline(always)]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Current balance (read-only, never fails)
    #[inline(always)]
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Number of successful deposits and withdrawals so far
    #[inline(always)]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // ============================================================
    // VALIDATED MUTATIONS (ENFORCED operations)
    // ============================================================

    /// Deposit funds
    ///
    /// # Errors
    /// - [`AtmError::InvalidAmount`] if `amount <= 0`
    /// - [`AtmError::AmountOverflow`] if the balance would overflow
    ///
    /// # Returns
    /// The new balance
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        if amount <= 0 {
            return Err(AtmError::InvalidAmount(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AtmError::AmountOverflow)?;
        self.version = self.version.wrapping_add(1);
        Ok(self.balance)
    }

    /// Withdraw funds
    ///
    /// # Errors
    /// - [`AtmError::InvalidAmount`] if `amount <= 0`
    /// - [`AtmError::InsufficientFunds`] if `amount > balance`
    ///
    /// # Returns
    /// The new balance
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount> {
        if amount <= 0 {
            return Err(AtmError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(AtmError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(AtmError::AmountOverflow)?;
        self.version = self.version.wrapping_add(1);
        Ok(self.balance)
    }
}

// ============================================================
// TESTS - Prove enforcement works
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let account = Account::new("12345", 100).unwrap();
        assert_eq!(account.account_id(), "12345");
        assert_eq!(account.balance(), 100);
        assert_eq!(account.version(), 0);

        assert_eq!(Account::new("zero", 0).unwrap().balance(), 0);
    }

    #[test]
    fn test_new_negative_rejected() {
        let err = Account::new("12345", -1).unwrap_err();
        assert_eq!(err, AtmError::InvalidInitialState(-1));
    }

    #[test]
    fn test_deposit() {
        let mut acc = Account::new("12345", 100).unwrap();

        assert_eq!(acc.deposit(50).unwrap(), 150);
        assert_eq!(acc.balance(), 150);
        assert_eq!(acc.version(), 1);

        assert_eq!(acc.deposit(1).unwrap(), 151);
        assert_eq!(acc.version(), 2);
    }

    #[test]
    fn test_deposit_non_positive() {
        let mut acc = Account::new("12345", 100).unwrap();

        assert_eq!(acc.deposit(-10).unwrap_err(), AtmError::InvalidAmount(-10));
        assert_eq!(acc.deposit(0).unwrap_err(), AtmError::InvalidAmount(0));
        assert_eq!(acc.balance(), 100); // Unchanged
        assert_eq!(acc.version(), 0);
    }

    #[test]
    fn test_deposit_overflow() {
        let mut acc = Account::new("12345", Amount::MAX).unwrap();

        // Should fail
        assert_eq!(acc.deposit(1).unwrap_err(), AtmError::AmountOverflow);
        assert_eq!(acc.balance(), Amount::MAX);
        assert_eq!(acc.version(), 0);
    }

    #[test]
    fn test_withdraw() {
        let mut acc = Account::new("12345", 100).unwrap();

        assert_eq!(acc.withdraw(30).unwrap(), 70);
        assert_eq!(acc.version(), 1);

        // Draining to exactly zero is allowed
        assert_eq!(acc.withdraw(70).unwrap(), 0);
        assert_eq!(acc.version(), 2);
    }

    #[test]
    fn test_withdraw_insufficient() {
        let mut acc = Account::new("12345", 80).unwrap();

        let err = acc.withdraw(1000).unwrap_err();
        assert_eq!(
            err,
            AtmError::InsufficientFunds {
                requested: 1000,
                available: 80
            }
        );
        assert_eq!(acc.balance(), 80); // Unchanged

        // Repeating the failed call changes nothing
        assert!(acc.withdraw(1000).is_err());
        assert_eq!(acc.balance(), 80);
        assert_eq!(acc.version(), 0);
    }

    #[test]
    fn test_withdraw_non_positive() {
        let mut acc = Account::new("12345", 80).unwrap();

        assert_eq!(acc.withdraw(-20).unwrap_err(), AtmError::InvalidAmount(-20));
        assert_eq!(acc.withdraw(0).unwrap_err(), AtmError::InvalidAmount(0));
        assert_eq!(acc.balance(), 80);
    }

    #[test]
    fn test_serialize() {
        let mut acc = Account::new("12345", 10).unwrap();
        acc.deposit(5).unwrap();

        let json = serde_json::to_value(&acc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "account_id": "12345", "balance": 15, "version": 1 })
        );
    }
}
