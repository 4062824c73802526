//! Key ring module
//!
//! An ordered collection of keys used as one credential set. Insertion
//! order is significant: the first key is the ring's owner for identity
//! queries and the default choice wherever exactly one key is needed.
//!
//! Locked private keys never enter a ring. Derived rings (`first_key`,
//! expiry filtering, `public_only`) are new containers; the source ring is
//! never modified by them.

use crate::config::KeyRingConfig;
use crate::core_keyring::errors::{EmptyRingError, ValidationError};
use crate::core_keyring::expiry::ExpiryPolicy;
use crate::core_keyring::identity::Identity;
use crate::core_keyring::key::Key;
use crate::core_keyring::types::{Fingerprint, KeyId, Timestamp};
use crate::metrics::{record_counter, FILTER_DROPPED, RING_REJECTED_LOCKED};
use tracing::{debug, trace};

/// Ordered, append-only collection of keys
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    keys: Vec<Key>,
}

impl KeyRing {
    /// Build a ring from zero or more keys
    ///
    /// Fails without building anything if any key is locked.
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Result<Self, ValidationError> {
        let keys: Vec<Key> = keys.into_iter().collect();
        for key in &keys {
            validate_member(key)?;
        }

        debug!(keys = keys.len(), "Key ring built");
        Ok(KeyRing { keys })
    }

    pub fn empty() -> Self {
        KeyRing { keys: Vec::new() }
    }

    /// Append a key; the ring is unchanged if the key is rejected
    pub fn add_key(&mut self, key: Key) -> Result<(), ValidationError> {
        validate_member(&key)?;
        trace!(key_id = %key.key_id(), position = self.keys.len(), "Key added to ring");
        self.keys.push(key);
        Ok(())
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys in the ring
    pub fn count_entities(&self) -> usize {
        self.keys.len()
    }

    /// Number of keys able to decrypt right now
    pub fn count_decryption_entities(&self) -> usize {
        self.keys.iter().filter(|key| key.can_decrypt()).count()
    }

    /// Primary key id of each key, in ring order
    pub fn key_ids(&self) -> Vec<KeyId> {
        self.keys.iter().map(Key::key_id).collect()
    }

    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.keys.iter().map(Key::fingerprint).collect()
    }

    /// Identities of the first key; empty for an empty ring
    pub fn identities(&self) -> &[Identity] {
        self.keys.first().map(Key::identities).unwrap_or(&[])
    }

    /// A new ring holding only the first key
    pub fn first_key(&self) -> Result<KeyRing, EmptyRingError> {
        let first = self.keys.first().ok_or(EmptyRingError)?;
        Ok(KeyRing {
            keys: vec![first.clone()],
        })
    }

    /// Every key can encrypt, and there is at least one key
    pub fn can_encrypt(&self) -> bool {
        !self.keys.is_empty() && self.keys.iter().all(Key::can_encrypt)
    }

    /// At least one key can verify signatures
    pub fn can_verify(&self) -> bool {
        self.keys.iter().any(Key::can_verify)
    }

    /// Whether any key in the ring is expired at `at`
    pub fn is_expired(&self, at: Timestamp) -> bool {
        self.keys.iter().any(|key| key.is_expired(at))
    }

    /// A new ring with public-only copies of every key
    pub fn public_only(&self) -> KeyRing {
        KeyRing {
            keys: self.keys.iter().map(Key::to_public).collect(),
        }
    }

    /// Rings in which no key is expired at `at`, in input order
    ///
    /// A ring holding even one expired key is dropped entirely.
    pub fn filter_expired_keys(rings: &[KeyRing], at: Timestamp) -> Vec<KeyRing> {
        Self::filter_expired_keys_with_policy(rings, at, ExpiryPolicy::WholeRing)
    }

    /// Expiry filtering with an explicit policy
    pub fn filter_expired_keys_with_policy(
        rings: &[KeyRing],
        at: Timestamp,
        policy: ExpiryPolicy,
    ) -> Vec<KeyRing> {
        let filtered: Vec<KeyRing> = match policy {
            ExpiryPolicy::WholeRing => rings
                .iter()
                .filter(|ring| !ring.is_expired(at))
                .cloned()
                .collect(),
            ExpiryPolicy::PruneKeys => rings
                .iter()
                .map(|ring| KeyRing {
                    keys: ring
                        .keys
                        .iter()
                        .filter(|key| !key.is_expired(at))
                        .cloned()
                        .collect(),
                })
                .filter(|ring| !ring.is_empty())
                .collect(),
        };

        let dropped = rings.len() - filtered.len();
        if dropped > 0 {
            record_counter(FILTER_DROPPED, dropped as u64);
        }
        debug!(
            policy = %policy,
            input = rings.len(),
            kept = filtered.len(),
            "Filtered expired key rings"
        );
        filtered
    }

    /// Filter against the current time
    pub fn filter_unexpired_now(rings: &[KeyRing]) -> Vec<KeyRing> {
        Self::filter_expired_keys(rings, Timestamp::now())
    }

    /// Filter against the current time with the configured policy
    pub fn filter_unexpired_now_with(rings: &[KeyRing], config: &KeyRingConfig) -> Vec<KeyRing> {
        Self::filter_expired_keys_with_policy(rings, Timestamp::now(), config.expiry_policy)
    }
}

impl<'a> IntoIterator for &'a KeyRing {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

fn validate_member(key: &Key) -> Result<(), ValidationError> {
    if key.is_locked() {
        record_counter(RING_REJECTED_LOCKED, 1);
        return Err(ValidationError::LockedKeyRejected(key.key_id()));
    }
    Ok(())
}
