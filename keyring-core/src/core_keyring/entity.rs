//! Entity module
//!
//! An entity is one already-parsed cryptographic identity: a primary key,
//! zero or more subkeys and the user-identity records bound to them. Parsing
//! and key generation happen elsewhere; this module only holds the result
//! and performs whole-entity transformations of its private material.
//!
//! Fingerprints are derived from algorithm tag, creation time and public
//! material with BLAKE3 truncated to 20 bytes. The key id is the trailing
//! 8 bytes of the fingerprint.

use crate::core_keyring::errors::SealError;
use crate::core_keyring::expiry;
use crate::core_keyring::identity::UserIdRecord;
use crate::core_keyring::material::{KeyAlgorithm, KeyUsage, SecretMaterial};
use crate::core_keyring::sealed::{KdfParams, SealedSecret};
use crate::core_keyring::types::{Fingerprint, KeyId, Timestamp, FINGERPRINT_LEN};
use sha2::{Digest, Sha256};

/// Private part of a key or subkey
#[derive(Debug, Clone)]
pub enum SecretPart {
    /// Encrypted under a passphrase, not usable
    Sealed(SealedSecret),
    /// Decrypted and usable
    Plain(SecretMaterial),
}

/// A primary key or subkey
#[derive(Debug, Clone)]
pub struct SubKey {
    algorithm: KeyAlgorithm,
    public: Vec<u8>,
    fingerprint: Fingerprint,
    created_at: Timestamp,
    expires_at: Option<Timestamp>,
    usage: KeyUsage,
    secret: Option<SecretPart>,
}

impl SubKey {
    /// Create a public sub-unit; usage defaults to what the algorithm supports
    pub fn new(algorithm: KeyAlgorithm, public: Vec<u8>, created_at: Timestamp) -> Self {
        let fingerprint = derive_fingerprint(algorithm, created_at, &public);
        SubKey {
            algorithm,
            public,
            fingerprint,
            created_at,
            expires_at: None,
            usage: KeyUsage::for_algorithm(algorithm),
            secret: None,
        }
    }

    pub fn with_usage(mut self, usage: KeyUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Attach decrypted private material
    pub fn with_secret(mut self, secret: SecretMaterial) -> Self {
        self.secret = Some(SecretPart::Plain(secret));
        self
    }

    /// Attach passphrase-sealed private material
    pub fn with_sealed_secret(mut self, sealed: SealedSecret) -> Self {
        self.secret = Some(SecretPart::Sealed(sealed));
        self
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint.key_id()
    }

    /// SHA-256 over the public material
    pub fn sha256_fingerprint(&self) -> [u8; 32] {
        let digest = Sha256::digest(&self.public);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    pub fn usage(&self) -> KeyUsage {
        self.usage
    }

    pub fn secret(&self) -> Option<&SecretPart> {
        self.secret.as_ref()
    }

    /// Declared usage intersected with algorithm capability
    pub fn can_sign(&self) -> bool {
        self.usage.sign && self.algorithm.can_sign()
    }

    pub fn can_encrypt(&self) -> bool {
        self.usage.encrypt && self.algorithm.can_encrypt()
    }

    pub fn is_expired_at(&self, at: Timestamp) -> bool {
        expiry::is_expired(self.expires_at, at)
    }

    /// Decrypted material, if present and open
    pub fn plain_secret(&self) -> Option<&SecretMaterial> {
        match &self.secret {
            Some(SecretPart::Plain(secret)) => Some(secret),
            _ => None,
        }
    }

    fn is_sealed(&self) -> bool {
        matches!(self.secret, Some(SecretPart::Sealed(_)))
    }

    fn opened(&self, passphrase: &[u8]) -> Result<SubKey, SealError> {
        let mut subkey = self.clone();
        if let Some(SecretPart::Sealed(sealed)) = &self.secret {
            subkey.secret = Some(SecretPart::Plain(sealed.open(passphrase)?));
        }
        Ok(subkey)
    }

    fn sealed(&self, passphrase: &[u8], kdf: KdfParams) -> Result<SubKey, SealError> {
        let mut subkey = self.clone();
        if let Some(SecretPart::Plain(secret)) = &self.secret {
            subkey.secret = Some(SecretPart::Sealed(SealedSecret::seal(secret, passphrase, kdf)?));
        }
        Ok(subkey)
    }

    fn public_only(&self) -> SubKey {
        SubKey {
            secret: None,
            ..self.clone()
        }
    }
}

/// An already-parsed key entity: primary key, subkeys and user ids
#[derive(Debug, Clone)]
pub struct Entity {
    primary: SubKey,
    subkeys: Vec<SubKey>,
    user_ids: Vec<UserIdRecord>,
}

impl Entity {
    pub fn new(primary: SubKey) -> Self {
        Entity {
            primary,
            subkeys: Vec::new(),
            user_ids: Vec::new(),
        }
    }

    pub fn with_subkey(mut self, subkey: SubKey) -> Self {
        self.subkeys.push(subkey);
        self
    }

    pub fn with_user_id(mut self, user_id: UserIdRecord) -> Self {
        self.user_ids.push(user_id);
        self
    }

    pub fn primary(&self) -> &SubKey {
        &self.primary
    }

    pub fn subkeys(&self) -> &[SubKey] {
        &self.subkeys
    }

    pub fn user_ids(&self) -> &[UserIdRecord] {
        &self.user_ids
    }

    /// Primary first, then subkeys in declared order
    pub fn sub_units(&self) -> impl Iterator<Item = &SubKey> {
        std::iter::once(&self.primary).chain(self.subkeys.iter())
    }

    /// Whether any sub-unit carries private material
    pub fn has_private(&self) -> bool {
        self.sub_units().any(|subkey| subkey.secret.is_some())
    }

    /// Whether any sub-unit's private material is still sealed
    pub fn has_sealed(&self) -> bool {
        self.sub_units().any(SubKey::is_sealed)
    }

    /// Open every sealed part with the passphrase
    ///
    /// Either every sealed part opens or the call fails; the receiver is
    /// never modified.
    pub fn decrypt_private(&self, passphrase: &[u8]) -> Result<Entity, SealError> {
        Ok(Entity {
            primary: self.primary.opened(passphrase)?,
            subkeys: self
                .subkeys
                .iter()
                .map(|subkey| subkey.opened(passphrase))
                .collect::<Result<Vec<_>, _>>()?,
            user_ids: self.user_ids.clone(),
        })
    }

    /// Seal every plain private part under the passphrase
    pub fn seal_private(&self, passphrase: &[u8], kdf: KdfParams) -> Result<Entity, SealError> {
        Ok(Entity {
            primary: self.primary.sealed(passphrase, kdf)?,
            subkeys: self
                .subkeys
                .iter()
                .map(|subkey| subkey.sealed(passphrase, kdf))
                .collect::<Result<Vec<_>, _>>()?,
            user_ids: self.user_ids.clone(),
        })
    }

    /// Copy without any private material
    pub fn to_public(&self) -> Entity {
        Entity {
            primary: self.primary.public_only(),
            subkeys: self.subkeys.iter().map(SubKey::public_only).collect(),
            user_ids: self.user_ids.clone(),
        }
    }
}

fn derive_fingerprint(
    algorithm: KeyAlgorithm,
    created_at: Timestamp,
    public: &[u8],
) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[algorithm.tag()]);
    hasher.update(&created_at.as_secs().to_be_bytes());
    hasher.update(public);
    let hash = hasher.finalize();

    let mut bytes = [0u8; FINGERPRINT_LEN];
    bytes.copy_from_slice(&hash.as_bytes()[..FINGERPRINT_LEN]);
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_kdf() -> KdfParams {
        KdfParams::new(1024, 1, 1).unwrap()
    }

    fn private_entity() -> Entity {
        let created = Timestamp::from_secs(1_600_000_000);
        Entity::new(
            SubKey::new(KeyAlgorithm::EdDsa, vec![1; 32], created)
                .with_secret(SecretMaterial::new(vec![11; 32])),
        )
        .with_subkey(
            SubKey::new(KeyAlgorithm::Ecdh, vec![2; 32], created)
                .with_secret(SecretMaterial::new(vec![22; 32])),
        )
        .with_user_id(UserIdRecord::parse("UserID"))
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let created = Timestamp::from_secs(1);
        let a = SubKey::new(KeyAlgorithm::Rsa, vec![5; 64], created);
        let b = SubKey::new(KeyAlgorithm::Rsa, vec![5; 64], created);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.key_id(), a.fingerprint().key_id());
    }

    #[test]
    fn test_fingerprint_covers_algorithm_time_and_material() {
        let created = Timestamp::from_secs(1);
        let base = SubKey::new(KeyAlgorithm::Rsa, vec![5; 64], created);

        let other_algo = SubKey::new(KeyAlgorithm::Dsa, vec![5; 64], created);
        let other_time = SubKey::new(KeyAlgorithm::Rsa, vec![5; 64], Timestamp::from_secs(2));
        let other_material = SubKey::new(KeyAlgorithm::Rsa, vec![6; 64], created);

        assert_ne!(base.fingerprint(), other_algo.fingerprint());
        assert_ne!(base.fingerprint(), other_time.fingerprint());
        assert_ne!(base.fingerprint(), other_material.fingerprint());
    }

    #[test]
    fn test_usage_is_intersected_with_algorithm() {
        let created = Timestamp::from_secs(1);
        let ecdh = SubKey::new(KeyAlgorithm::Ecdh, vec![1; 32], created).with_usage(KeyUsage::ALL);
        assert!(ecdh.can_encrypt());
        assert!(!ecdh.can_sign());

        let rsa_sign_only =
            SubKey::new(KeyAlgorithm::Rsa, vec![1; 32], created).with_usage(KeyUsage::SIGN);
        assert!(rsa_sign_only.can_sign());
        assert!(!rsa_sign_only.can_encrypt());
    }

    #[test]
    fn test_sub_units_order() {
        let entity = private_entity();
        let algorithms: Vec<_> = entity.sub_units().map(SubKey::algorithm).collect();
        assert_eq!(algorithms, vec![KeyAlgorithm::EdDsa, KeyAlgorithm::Ecdh]);
    }

    #[test]
    fn test_seal_then_decrypt_restores_material() {
        let entity = private_entity();
        let sealed = entity.seal_private(b"apple", fast_kdf()).unwrap();
        assert!(sealed.has_sealed());
        assert!(sealed.primary().plain_secret().is_none());

        let opened = sealed.decrypt_private(b"apple").unwrap();
        assert!(!opened.has_sealed());
        assert_eq!(opened.primary().plain_secret().unwrap().expose(), &[11; 32]);
        assert_eq!(opened.subkeys()[0].plain_secret().unwrap().expose(), &[22; 32]);
        assert_eq!(opened.user_ids(), entity.user_ids());
    }

    #[test]
    fn test_decrypt_with_wrong_passphrase_fails_whole_entity() {
        let sealed = private_entity().seal_private(b"apple", fast_kdf()).unwrap();
        assert_eq!(
            sealed.decrypt_private(b"wrong").unwrap_err(),
            SealError::AuthenticationFailed
        );
        // Receiver is untouched
        assert!(sealed.has_sealed());
    }

    #[test]
    fn test_to_public_strips_private_parts() {
        let entity = private_entity();
        assert!(entity.has_private());

        let public = entity.to_public();
        assert!(!public.has_private());
        assert_eq!(public.primary().fingerprint(), entity.primary().fingerprint());
        assert_eq!(public.subkeys().len(), 1);
    }

    #[test]
    fn test_sha256_fingerprint_of_public_material() {
        let subkey = SubKey::new(KeyAlgorithm::EdDsa, b"abc".to_vec(), Timestamp::from_secs(1));
        assert_eq!(
            hex::encode(subkey.sha256_fingerprint()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
