//! Card number validation
//!
//! [`Card`] is a validated card identifier. The field is private to force
//! validation through [`Card::new`]: once built, a card is always 16 ASCII
//! digits with a valid Luhn checksum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core_types::{CARD_NUMBER_LEN, CARD_VISIBLE_DIGITS};
use crate::error::{AtmError, Result};

// ============================================================================
// Luhn checksum
// ============================================================================

/// Luhn checksum over a digit string.
///
/// Reads right-to-left, doubles every second digit (subtracting 9 when the
/// doubled value exceeds 9) and checks the total is divisible by 10.
/// Returns `false` for empty input or any non-digit character.
pub fn is_luhn_valid(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

// ============================================================================
// Card - Validated Card Number (Private Field)
// ============================================================================

/// Validated bank card
///
/// # Examples
/// ```
/// use atm_core::card::Card;
///
/// let card = Card::new("4111111111111111").unwrap();
/// assert_eq!(card.masked_number(), "****-****-****-1111");
///
/// assert!(Card::new("12345").is_err()); // wrong length
/// assert!(Card::new("4111111111111112").is_err()); // bad checksum
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(String);

impl Card {
    /// Create a new validated card
    ///
    /// # Validation Rules
    /// - Exactly 16 characters
    /// - ASCII digits only
    /// - Luhn checksum passes
    ///
    /// # Errors
    /// Returns [`AtmError::InvalidCardNumber`] on any violation. The `reason`
    /// is diagnostic only; callers should treat all variants alike.
    pub fn new(number: &str) -> Result<Self> {
        if number.len() != CARD_NUMBER_LEN {
            return Err(AtmError::InvalidCardNumber {
                reason: "must be exactly 16 characters",
            });
        }

        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AtmError::InvalidCardNumber {
                reason: "must contain digits only",
            });
        }

        if !is_luhn_valid(number) {
            return Err(AtmError::InvalidCardNumber {
                reason: "failed Luhn checksum",
            });
        }

        Ok(Self(number.to_string()))
    }

    /// The card number, verbatim
    pub fn number(&self) -> &str {
        &self.0
    }

    /// Masked form: `****-****-****-XXXX`
    pub fn masked_number(&self) -> String {
        // 16 ASCII digits, so byte slicing is on char boundaries
        let last = &self.0[CARD_NUMBER_LEN - CARD_VISIBLE_DIGITS..];
        format!("****-****-****-{}", last)
    }

    /// Convert into owned String
    pub fn into_string(self) -> String {
        self.0
    }
}

// Debug and Display both mask: a card must never reach a log line in clear.
impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Card").field(&self.masked_number()).finish()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked_number())
    }
}

impl AsRef<str> for Card {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Card {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self> {
        Card::new(s)
    }
}

impl TryFrom<String> for Card {
    type Error = AtmError;

    fn try_from(value: String) -> Result<Self> {
        Card::new(&value)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.into_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
