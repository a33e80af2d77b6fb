//! PIN credential verification
//!
//! The directory never compares PINs itself; it stores whatever the
//! configured [`PinVerifier`] produced at enrolment and asks the verifier
//! again at validation time. Swapping plaintext for argon2 touches nothing
//! in the session state machine.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

use crate::error::{AtmError, Result};

/// Opaque stored credential (plaintext PIN or a PHC hash string)
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPin(String);

impl StoredPin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredPin(<redacted>)")
    }
}

/// Credential enrolment and verification
pub trait PinVerifier: Send + Sync {
    /// Turn a raw PIN into what the directory stores
    fn enroll(&self, pin: &str) -> Result<StoredPin>;

    /// Whether `pin` matches the stored credential. Never errors: any
    /// failure to verify is a non-match.
    fn verify(&self, pin: &str, stored: &StoredPin) -> bool;

    fn name(&self) -> &'static str;
}

// ============================================================================
// Plaintext
// ============================================================================

/// Exact, case-sensitive string equality. No trimming.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextPinVerifier;

impl PinVerifier for PlaintextPinVerifier {
    fn enroll(&self, pin: &str) -> Result<StoredPin> {
        Ok(StoredPin(pin.to_string()))
    }

    fn verify(&self, pin: &str, stored: &StoredPin) -> bool {
        stored.0 == pin
    }

    fn name(&self) -> &'static str {
        "plaintext"
    }
}

// ============================================================================
// Argon2
// ============================================================================

/// Salted argon2 hash per PIN, stored as a PHC string
#[derive(Default)]
pub struct Argon2PinVerifier {
    argon2: Argon2<'static>,
}

impl Argon2PinVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinVerifier for Argon2PinVerifier {
    fn enroll(&self, pin: &str) -> Result<StoredPin> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| AtmError::Credential(format!("Hashing failed: {}", e)))?;
        Ok(StoredPin(hash.to_string()))
    }

    fn verify(&self, pin: &str, stored: &StoredPin) -> bool {
        let Ok(parsed) = PasswordHash::new(&stored.0) else {
            tracing::error!("Stored PIN hash is malformed");
            return false;
        };
        self.argon2
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok()
    }

    fn name(&self) -> &'static str {
        "argon2"
    }
}

// ============================================================================
// Config selector
// ============================================================================

/// Which verifier a directory is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinHashing {
    #[default]
    Plaintext,
    Argon2,
}

impl PinHashing {
    pub fn verifier(self) -> Box<dyn PinVerifier> {
        match self {
            PinHashing::Plaintext => Box::new(PlaintextPinVerifier),
            PinHashing::Argon2 => Box::new(Argon2PinVerifier::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_exact_match() {
        let v = PlaintextPinVerifier;
        let stored = v.enroll("1234").unwrap();
        assert!(v.verify("1234", &stored));
        assert!(!v.verify("0000", &stored));
        assert!(!v.verify("1234 ", &stored)); // no trimming
        assert!(!v.verify("", &stored));
    }

    #[test]
    fn test_plaintext_case_sensitive() {
        let v = PlaintextPinVerifier;
        let stored = v.enroll("abC1").unwrap();
        assert!(v.verify("abC1", &stored));
        assert!(!v.verify("ABC1", &stored));
    }

    #[test]
    fn test_argon2_roundtrip() {
        let v = Argon2PinVerifier::new();
        let stored = v.enroll("1234").unwrap();
        assert!(stored.as_str().starts_with("$argon2"));
        assert_ne!(stored.as_str(), "1234");
        assert!(v.verify("1234", &stored));
        assert!(!v.verify("1235", &stored));
    }

    #[test]
    fn test_argon2_salted() {
        let v = Argon2PinVerifier::new();
        let a = v.enroll("1234").unwrap();
        let b = v.enroll("1234").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_argon2_malformed_hash_is_non_match() {
        let v = Argon2PinVerifier::new();
        assert!(!v.verify("1234", &StoredPin("1234".to_string())));
    }

    #[test]
    fn test_debug_redacted() {
        let stored = PlaintextPinVerifier.enroll("9876").unwrap();
        assert!(!format!("{:?}", stored).contains("9876"));
    }

    #[test]
    fn test_pin_hashing_selector() {
        assert_eq!(PinHashing::default(), PinHashing::Plaintext);
        assert_eq!(PinHashing::Plaintext.verifier().name(), "plaintext");
        assert_eq!(PinHashing::Argon2.verifier().name(), "argon2");

        let parsed: PinHashing = serde_yaml::from_str("argon2").unwrap();
        assert_eq!(parsed, PinHashing::Argon2);
    }
}
