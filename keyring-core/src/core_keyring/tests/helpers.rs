//! Test helpers and fixtures
//!
//! Fixtures are built explicitly per test; nothing here is shared mutable
//! state. Material is derived from a seeded RNG so runs are reproducible.

use crate::core_keyring::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Passphrase of the locked private fixture
pub const TEST_PASSPHRASE: &[u8] = b"apple";

/// Name on the private fixture's only user id
pub const TEST_USER_ID: &str = "UserID";

/// Fixed creation time for fixtures (2020-09-13)
pub fn test_created_at() -> Timestamp {
    Timestamp::from_secs(1_600_000_000)
}

/// Cheap Argon2 parameters so tests stay fast
pub fn fast_kdf() -> KdfParams {
    KdfParams::new(1024, 1, 1).expect("valid test KDF params")
}

fn seeded_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random()).collect()
}

/// Unlocked RSA-class entity: one primary key that signs and encrypts
pub fn rsa_entity(seed: u64) -> Entity {
    Entity::new(
        SubKey::new(KeyAlgorithm::Rsa, seeded_bytes(seed, 256), test_created_at())
            .with_secret(SecretMaterial::new(seeded_bytes(seed ^ 0xff, 256))),
    )
    .with_user_id(UserIdRecord::parse("RSA Owner <rsa@example.com>"))
}

/// Unlocked elliptic-curve entity: Ed25519 primary, X25519 encryption subkey
pub fn ec_entity(seed: u64) -> Entity {
    let mut rng = StdRng::seed_from_u64(seed);
    let signing_seed: [u8; 32] = rng.random();
    let dh_secret: [u8; 32] = rng.random();

    let signing_key = ed25519_dalek::SigningKey::from_bytes(&signing_seed);
    let dh_key = x25519_dalek::StaticSecret::from(dh_secret);
    let dh_public = x25519_dalek::PublicKey::from(&dh_key);

    Entity::new(
        SubKey::new(
            KeyAlgorithm::EdDsa,
            signing_key.verifying_key().to_bytes().to_vec(),
            test_created_at(),
        )
        .with_usage(KeyUsage::CERTIFY_SIGN)
        .with_secret(SecretMaterial::new(signing_key.to_bytes().to_vec())),
    )
    .with_subkey(
        SubKey::new(KeyAlgorithm::Ecdh, dh_public.to_bytes().to_vec(), test_created_at())
            .with_secret(SecretMaterial::new(dh_key.to_bytes().to_vec())),
    )
    .with_user_id(UserIdRecord::parse("EC Owner <ec@example.com>"))
}

/// Unlocked RSA-class key
pub fn rsa_key(seed: u64) -> Key {
    Key::new(rsa_entity(seed))
}

/// Unlocked elliptic-curve key
pub fn ec_key(seed: u64) -> Key {
    Key::new(ec_entity(seed))
}

/// Private key sealed under `TEST_PASSPHRASE`, with a single bare-name user id
pub fn locked_private_key() -> Key {
    let entity = Entity::new(
        SubKey::new(KeyAlgorithm::Rsa, seeded_bytes(7, 256), test_created_at())
            .with_secret(SecretMaterial::new(seeded_bytes(8, 256))),
    )
    .with_subkey(
        SubKey::new(KeyAlgorithm::Rsa, seeded_bytes(9, 256), test_created_at())
            .with_usage(KeyUsage::ENCRYPT)
            .with_secret(SecretMaterial::new(seeded_bytes(10, 256))),
    )
    .with_user_id(UserIdRecord::parse(TEST_USER_ID));

    Key::new(entity)
        .lock(TEST_PASSPHRASE, fast_kdf())
        .expect("lock test key")
}

/// Public counterpart of the locked private fixture
pub fn public_key() -> Key {
    locked_private_key().to_public()
}

/// Public key whose primary expired at `expired_at`
pub fn expired_key(seed: u64, expired_at: Timestamp) -> Key {
    Key::new(Entity::new(
        SubKey::new(KeyAlgorithm::EdDsa, seeded_bytes(seed, 32), test_created_at())
            .with_expiry(expired_at),
    ))
}
