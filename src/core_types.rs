//! Core types used throughout the system
//!
//! Fundamental type aliases shared by the account, bank and session modules.

/// Monetary amount in minor currency units (e.g. cents).
///
/// # Constraints:
/// - Signed so that invalid caller input (`<= 0`) can be represented and rejected
/// - Stored balances are **never negative**
/// - No fractional representation; callers convert at the edge
pub type Amount = i64;

/// Account identifier. In this system it is the card number of the card
/// bound to the account, compared by exact string equality.
pub type AccountId = String;

/// Number of digits in a valid card number
pub const CARD_NUMBER_LEN: usize = 16;

/// Number of trailing digits left visible when a card number is masked
pub const CARD_VISIBLE_DIGITS: usize = 4;
