//! ATM Error Types
//!
//! One error enum for every failure the session core can report.
//! All errors are returned synchronously to the immediate caller; a failed
//! operation leaves directory and session state unchanged.

use thiserror::Error;

use crate::core_types::Amount;

/// Result alias used across the core
pub type Result<T> = std::result::Result<T, AtmError>;

/// ATM error types
///
/// Codes returned by [`AtmError::code`] are stable and safe to show on a
/// terminal screen or write into an audit line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    // === Card Errors ===
    #[error("Invalid card number: {reason}")]
    InvalidCardNumber { reason: &'static str },

    // === Directory Errors ===
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Initial balance cannot be negative: {0}")]
    InvalidInitialState(Amount),

    #[error("Credential error: {0}")]
    Credential(String),

    // === Session Errors ===
    #[error("A card is already inserted")]
    CardAlreadyInserted,

    #[error("No card inserted")]
    NoCardInserted,

    #[error("PIN not validated")]
    NotAuthenticated,

    #[error("Account not selected")]
    NoAccountSelected,

    #[error("Invalid PIN")]
    InvalidPin,

    // === Amount Errors ===
    #[error("Amount must be greater than zero: got {0}")]
    InvalidAmount(Amount),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Amount would cause overflow")]
    AmountOverflow,

    #[error("Withdrawal of {requested} exceeds the terminal limit of {limit}")]
    WithdrawalLimitExceeded { requested: Amount, limit: Amount },
}

impl AtmError {
    /// Stable error code for screens and logs
    pub fn code(&self) -> &'static str {
        match self {
            AtmError::InvalidCardNumber { .. } => "INVALID_CARD_NUMBER",
            AtmError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            AtmError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AtmError::InvalidInitialState(_) => "INVALID_INITIAL_STATE",
            AtmError::Credential(_) => "CREDENTIAL_ERROR",
            AtmError::CardAlreadyInserted => "CARD_ALREADY_INSERTED",
            AtmError::NoCardInserted => "NO_CARD_INSERTED",
            AtmError::NotAuthenticated => "NOT_AUTHENTICATED",
            AtmError::NoAccountSelected => "NO_ACCOUNT_SELECTED",
            AtmError::InvalidPin => "INVALID_PIN",
            AtmError::InvalidAmount(_) => "INVALID_AMOUNT",
            AtmError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            AtmError::AmountOverflow => "AMOUNT_OVERFLOW",
            AtmError::WithdrawalLimitExceeded { .. } => "WITHDRAWAL_LIMIT_EXCEEDED",
        }
    }

    /// Whether the same call may succeed if retried with different input
    /// while the session stays where it is.
    ///
    /// Only a PIN mismatch qualifies; there is no attempt counting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AtmError::InvalidPin)
    }

    /// Session precondition violations: the caller has to move the session
    /// (eject, insert, authenticate) before the call can succeed.
    pub fn is_session_precondition(&self) -> bool {
        matches!(
            self,
            AtmError::CardAlreadyInserted
                | AtmError::NoCardInserted
                | AtmError::NotAuthenticated
                | AtmError::NoAccountSelected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AtmError::InvalidPin.code(), "INVALID_PIN");
        assert_eq!(
            AtmError::InsufficientFunds {
                requested: 10,
                available: 5
            }
            .code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            AtmError::InvalidCardNumber { reason: "length" }.code(),
            "INVALID_CARD_NUMBER"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AtmError::InvalidPin.is_retryable());
        assert!(!AtmError::InvalidAmount(0).is_retryable());
        assert!(!AtmError::NoCardInserted.is_retryable());
    }

    #[test]
    fn test_session_precondition() {
        assert!(AtmError::CardAlreadyInserted.is_session_precondition());
        assert!(AtmError::NoAccountSelected.is_session_precondition());
        assert!(!AtmError::InvalidPin.is_session_precondition());
        assert!(!AtmError::AccountNotFound("x".into()).is_session_precondition());
    }

    #[test]
    fn test_display() {
        let err = AtmError::InsufficientFunds {
            requested: 1000,
            available: 80,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 1000, available 80"
        );
        assert_eq!(AtmError::NoAccountSelected.to_string(), "Account not selected");
    }
}
