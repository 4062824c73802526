//! Key ring management
//!
//! API surface:
//! - `Key::new(entity)` wraps an already-parsed entity and tracks its lock state
//! - `Key::unlock(passphrase)` -> new unlocked key, receiver untouched
//! - `KeyRing::new(keys)` / `add_key` -> ordered ring, locked keys rejected
//! - `KeyRing::first_key()`, `key_ids()`, `identities()`, decryption counts
//! - `KeyRing::filter_expired_keys(rings, at)` -> rings with no expired key
//! - `SymmetricKey` for passphrase-style encryption, independent of rings

pub mod entity;
pub mod errors;
pub mod expiry;
pub mod identity;
pub mod key;
pub mod key_ring;
pub mod material;
pub mod sealed;
pub mod symmetric;
pub mod types;

pub use entity::{Entity, SecretPart, SubKey};
pub use errors::{
    Capability, CapabilityError, EmptyRingError, KeyRingError, LockError, Result, SealError,
    SymmetricKeyError, UnlockError, ValidationError,
};
pub use expiry::ExpiryPolicy;
pub use identity::{extract_identities, Identity, UserIdRecord};
pub use key::{Capabilities, Key, LockState, PrivateKeyHandle};
pub use key_ring::KeyRing;
pub use material::{KeyAlgorithm, KeyUsage, SecretMaterial};
pub use sealed::{KdfParams, SealedSecret};
pub use symmetric::{SymmetricAlgorithm, SymmetricKey};
pub use types::{Fingerprint, KeyId, Timestamp};

#[cfg(test)]
mod tests;
