//! Key module
//!
//! A `Key` wraps one entity and tracks whether its private material is
//! usable. Lock state and capabilities are computed once, when the key is
//! built, and never change afterwards: `unlock` and `lock` return new keys
//! and leave the receiver as it was.
//!
//! Private material can only be reached through `signing_material` and
//! `decryption_material`, which fail with a `CapabilityError` on locked or
//! public-only keys.

use crate::core_keyring::entity::{Entity, SubKey};
use crate::core_keyring::errors::{Capability, CapabilityError, LockError, SealError, UnlockError};
use crate::core_keyring::expiry;
use crate::core_keyring::identity::{extract_identities, Identity};
use crate::core_keyring::material::{KeyAlgorithm, SecretMaterial};
use crate::core_keyring::sealed::KdfParams;
use crate::core_keyring::types::{Fingerprint, KeyId, Timestamp};
use crate::metrics::{record_counter, UNLOCK_FAILED, UNLOCK_SUCCESS};
use std::sync::Arc;
use tracing::debug;

/// Availability of a key's private material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No private material at all
    Public,
    /// Private material present but sealed under a passphrase
    Locked,
    /// Private material decrypted and usable
    Unlocked,
}

/// What a key's sub-units can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub sign: bool,
    pub encrypt: bool,
}

impl Capabilities {
    fn public_of(entity: &Entity) -> Self {
        Capabilities {
            sign: entity.sub_units().any(SubKey::can_sign),
            encrypt: entity.sub_units().any(SubKey::can_encrypt),
        }
    }

    /// Capabilities backed by private material, sealed or not
    fn private_of(entity: &Entity) -> Self {
        Capabilities {
            sign: entity
                .sub_units()
                .any(|subkey| subkey.can_sign() && subkey.secret().is_some()),
            encrypt: entity
                .sub_units()
                .any(|subkey| subkey.can_encrypt() && subkey.secret().is_some()),
        }
    }
}

/// Borrowed handle to the decrypted material of one sub-unit
#[derive(Debug, Clone, Copy)]
pub struct PrivateKeyHandle<'a> {
    pub key_id: KeyId,
    pub algorithm: KeyAlgorithm,
    pub material: &'a SecretMaterial,
}

/// One key entity plus its lock state
#[derive(Debug, Clone)]
pub struct Key {
    entity: Arc<Entity>,
    state: LockState,
    public_caps: Capabilities,
    private_caps: Capabilities,
    identities: Arc<[Identity]>,
}

impl Key {
    /// Wrap an already-parsed entity
    pub fn new(entity: Entity) -> Self {
        let state = if !entity.has_private() {
            LockState::Public
        } else if entity.has_sealed() {
            LockState::Locked
        } else {
            LockState::Unlocked
        };

        Key {
            public_caps: Capabilities::public_of(&entity),
            private_caps: Capabilities::private_of(&entity),
            identities: extract_identities(&entity).into(),
            entity: Arc::new(entity),
            state,
        }
    }

    /// Decrypt all private material with the passphrase
    ///
    /// Returns a new unlocked key; the receiver stays locked.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<Key, UnlockError> {
        match self.state {
            LockState::Public => return Err(UnlockError::NoPrivateMaterial(self.key_id())),
            LockState::Unlocked => return Err(UnlockError::AlreadyUnlocked(self.key_id())),
            LockState::Locked => {}
        }

        let entity = match self.entity.decrypt_private(passphrase) {
            Ok(entity) => entity,
            Err(SealError::AuthenticationFailed) => {
                record_counter(UNLOCK_FAILED, 1);
                return Err(UnlockError::WrongPassphrase);
            }
            Err(e) => {
                record_counter(UNLOCK_FAILED, 1);
                return Err(UnlockError::Kdf(e.to_string()));
            }
        };

        record_counter(UNLOCK_SUCCESS, 1);
        debug!(key_id = %self.key_id(), "Key unlocked");
        Ok(Key::new(entity))
    }

    /// Seal all private material under the passphrase
    ///
    /// Returns a new locked copy; the receiver stays unlocked.
    pub fn lock(&self, passphrase: &[u8], kdf: KdfParams) -> Result<Key, LockError> {
        match self.state {
            LockState::Public => return Err(LockError::NotPrivate(self.key_id())),
            LockState::Locked => return Err(LockError::AlreadyLocked(self.key_id())),
            LockState::Unlocked => {}
        }

        let entity = self.entity.seal_private(passphrase, kdf)?;
        debug!(key_id = %self.key_id(), "Key locked");
        Ok(Key::new(entity))
    }

    /// Public-only copy of this key
    pub fn to_public(&self) -> Key {
        if self.state == LockState::Public {
            return self.clone();
        }
        Key::new(self.entity.to_public())
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn lock_state(&self) -> LockState {
        self.state
    }

    pub fn is_private(&self) -> bool {
        self.state != LockState::Public
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == LockState::Unlocked
    }

    /// Identities in the entity's declared order
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Id of the primary key
    pub fn key_id(&self) -> KeyId {
        self.entity.primary().key_id()
    }

    pub fn hex_key_id(&self) -> String {
        self.key_id().to_hex()
    }

    /// One id per sub-unit, primary first
    pub fn key_ids(&self) -> Vec<KeyId> {
        self.entity.sub_units().map(SubKey::key_id).collect()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.entity.primary().fingerprint()
    }

    /// Hex SHA-256 fingerprints, one per sub-unit, primary first
    pub fn sha256_fingerprints(&self) -> Vec<String> {
        self.entity
            .sub_units()
            .map(|subkey| hex::encode(subkey.sha256_fingerprint()))
            .collect()
    }

    pub fn created_at(&self) -> Timestamp {
        self.entity.primary().created_at()
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.entity.primary().expires_at()
    }

    pub fn is_expired(&self, at: Timestamp) -> bool {
        expiry::entity_is_expired(&self.entity, at)
    }

    /// Private decryption is possible right now
    pub fn can_decrypt(&self) -> bool {
        self.state == LockState::Unlocked && self.private_caps.encrypt
    }

    /// Private signing is possible right now
    pub fn can_sign(&self) -> bool {
        self.state == LockState::Unlocked && self.private_caps.sign
    }

    pub fn can_encrypt(&self) -> bool {
        self.public_caps.encrypt
    }

    pub fn can_verify(&self) -> bool {
        self.public_caps.sign
    }

    pub fn capabilities(&self) -> Capabilities {
        self.public_caps
    }

    /// Material of the first signing-capable sub-unit, primary first
    pub fn signing_material(&self) -> Result<PrivateKeyHandle<'_>, CapabilityError> {
        self.check_private(Capability::Sign)?;
        self.entity
            .sub_units()
            .filter(|subkey| subkey.can_sign())
            .find_map(handle_of)
            .ok_or(CapabilityError::Unsupported {
                key_id: self.key_id(),
                capability: Capability::Sign,
            })
    }

    /// Material of every encryption-capable sub-unit, primary first
    pub fn decryption_material(&self) -> Result<Vec<PrivateKeyHandle<'_>>, CapabilityError> {
        self.check_private(Capability::Decrypt)?;
        let handles: Vec<_> = self
            .entity
            .sub_units()
            .filter(|subkey| subkey.can_encrypt())
            .filter_map(handle_of)
            .collect();

        if handles.is_empty() {
            return Err(CapabilityError::Unsupported {
                key_id: self.key_id(),
                capability: Capability::Decrypt,
            });
        }
        Ok(handles)
    }

    fn check_private(&self, capability: Capability) -> Result<(), CapabilityError> {
        let key_id = self.key_id();
        match self.state {
            LockState::Public => Err(CapabilityError::PublicOnly { key_id, capability }),
            LockState::Locked => Err(CapabilityError::Locked { key_id, capability }),
            LockState::Unlocked => Ok(()),
        }
    }
}

fn handle_of(subkey: &SubKey) -> Option<PrivateKeyHandle<'_>> {
    subkey.plain_secret().map(|material| PrivateKeyHandle {
        key_id: subkey.key_id(),
        algorithm: subkey.algorithm(),
        material,
    })
}
