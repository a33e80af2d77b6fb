//! Bank system: account storage and PIN validation

pub mod credentials;
pub mod directory;

// Re-export commonly used types
pub use credentials::{
    Argon2PinVerifier, PinHashing, PinVerifier, PlaintextPinVerifier, StoredPin,
};
pub use directory::{AccountDirectory, AccountSnapshot};
