/*
    errors.rs - Error types for the key ring layer

    Every failure here is recoverable and returned to the caller:
    - Unlocking and locking private material
    - Ring membership validation
    - Capability checks on locked or public-only keys
    - Symmetric key material validation
*/

use crate::core_keyring::symmetric::SymmetricAlgorithm;
use crate::core_keyring::types::KeyId;
use thiserror::Error;

/// Errors from sealing or opening private material
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SealError {
    /// AEAD tag mismatch: wrong passphrase or tampered ciphertext
    #[error("Authentication failed while opening private material")]
    AuthenticationFailed,

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),
}

/// Errors from `Key::unlock`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnlockError {
    #[error("Wrong passphrase")]
    WrongPassphrase,

    #[error("Key {0} is already unlocked")]
    AlreadyUnlocked(KeyId),

    #[error("Key {0} has no private material")]
    NoPrivateMaterial(KeyId),

    /// Failure of the key derivation itself, not of the passphrase
    #[error("Unlock failed: {0}")]
    Kdf(String),
}

/// Errors from `Key::lock`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("Key {0} is not private")]
    NotPrivate(KeyId),

    #[error("Key {0} is already locked")]
    AlreadyLocked(KeyId),

    #[error("Lock failed: {0}")]
    Seal(#[from] SealError),
}

/// Ring membership validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A private key must be unlocked before it joins a ring
    #[error("Unable to add locked key {0} to a key ring")]
    LockedKeyRejected(KeyId),
}

/// `KeyRing::first_key` on a ring with no keys
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Key ring is empty")]
pub struct EmptyRingError;

/// The kind of private operation being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sign,
    Decrypt,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Sign => write!(f, "sign"),
            Capability::Decrypt => write!(f, "decrypt"),
        }
    }
}

/// Private operation requested on a key that cannot perform it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Key {key_id} is locked and cannot {capability}")]
    Locked { key_id: KeyId, capability: Capability },

    #[error("Key {key_id} is public-only and cannot {capability}")]
    PublicOnly { key_id: KeyId, capability: Capability },

    #[error("Key {key_id} has no sub-key able to {capability}")]
    Unsupported { key_id: KeyId, capability: Capability },
}

/// Symmetric key validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymmetricKeyError {
    #[error("Invalid key material for {algorithm}: expected {expected} bytes, got {actual}")]
    InvalidKeyMaterial {
        algorithm: SymmetricAlgorithm,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown symmetric algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Umbrella error for callers that do not branch on the specific kind
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyRingError {
    #[error(transparent)]
    Unlock(#[from] UnlockError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    EmptyRing(#[from] EmptyRingError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    SymmetricKey(#[from] SymmetricKeyError),
}

pub type Result<T> = std::result::Result<T, KeyRingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        let err = ValidationError::LockedKeyRejected(KeyId(0xabc));
        assert_eq!(
            err.to_string(),
            "Unable to add locked key 0000000000000abc to a key ring"
        );

        let err = CapabilityError::Locked {
            key_id: KeyId(1),
            capability: Capability::Decrypt,
        };
        assert_eq!(
            err.to_string(),
            "Key 0000000000000001 is locked and cannot decrypt"
        );
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: KeyRingError = EmptyRingError.into();
        assert!(matches!(err, KeyRingError::EmptyRing(_)));
        assert_eq!(err.to_string(), "Key ring is empty");

        let err: KeyRingError = UnlockError::WrongPassphrase.into();
        assert_eq!(err.to_string(), "Wrong passphrase");
    }
}
