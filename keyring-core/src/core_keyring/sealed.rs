//! Passphrase-sealed private material
//!
//! Private key material at rest is sealed with a key derived from the
//! passphrase:
//! - Argon2id key derivation, parameters stored alongside the ciphertext
//! - AES-256-GCM, random 16-byte salt and 12-byte nonce per seal
//!
//! An AEAD tag mismatch on open is reported as `AuthenticationFailed`:
//! either the passphrase is wrong or the ciphertext was tampered with.

use crate::core_keyring::errors::SealError;
use crate::core_keyring::material::SecretMaterial;
use crate::metrics::{Timer, KDF_DURATION_MS};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Argon2, Params};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Salt length for Argon2 KDF (16 bytes = 128 bits)
pub const SALT_LEN: usize = 16;

/// Nonce length for AES-GCM (12 bytes = 96 bits)
pub const NONCE_LEN: usize = 12;

/// Derived key length (256 bits for AES-256)
const KEY_LEN: usize = 32;

/// Upper bound on Argon2 memory cost (1 GiB)
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Upper bound on Argon2 passes
pub const MAX_ITERATIONS: u32 = 64;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024, // 19 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, SealError> {
        let params = KdfParams {
            memory_kib,
            iterations,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), SealError> {
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(SealError::InvalidKdfParams(
                "iterations and parallelism must be greater than 0".to_string(),
            ));
        }
        if self.memory_kib > MAX_MEMORY_KIB || self.iterations > MAX_ITERATIONS {
            return Err(SealError::InvalidKdfParams(format!(
                "memory_kib must be at most {} and iterations at most {}",
                MAX_MEMORY_KIB, MAX_ITERATIONS
            )));
        }
        let min_memory = self.parallelism.saturating_mul(8);
        if self.memory_kib < min_memory {
            return Err(SealError::InvalidKdfParams(format!(
                "memory_kib must be at least {} for parallelism {}",
                min_memory, self.parallelism
            )));
        }
        Ok(())
    }

    /// Derive a 256-bit key from the passphrase using Argon2id
    fn derive_key(
        &self,
        passphrase: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, SealError> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| SealError::InvalidKdfParams(e.to_string()))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let timer = Timer::new(KDF_DURATION_MS);
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        argon2
            .hash_password_into(passphrase, salt, &mut key[..])
            .map_err(|e| SealError::KeyDerivation(e.to_string()))?;
        timer.stop();

        Ok(key)
    }
}

/// Private material encrypted under a passphrase
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSecret {
    kdf: KdfParams,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    /// Ciphertext including the 16-byte AEAD tag
    ciphertext: Vec<u8>,
}

impl SealedSecret {
    /// Seal private material under a passphrase
    pub fn seal(
        secret: &SecretMaterial,
        passphrase: &[u8],
        kdf: KdfParams,
    ) -> Result<Self, SealError> {
        kdf.validate()?;

        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let key = kdf.derive_key(passphrase, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| SealError::Encryption(format!("Invalid key: {}", e)))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), secret.expose())
            .map_err(|e| SealError::Encryption(e.to_string()))?;

        Ok(SealedSecret {
            kdf,
            salt,
            nonce,
            ciphertext,
        })
    }

    /// Open the sealed material with a passphrase
    ///
    /// Stored KDF parameters are validated before any key derivation.
    pub fn open(&self, passphrase: &[u8]) -> Result<SecretMaterial, SealError> {
        self.kdf.validate()?;
        let key = self.kdf.derive_key(passphrase, &self.salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| SealError::KeyDerivation(format!("Invalid key: {}", e)))?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_slice())
            .map_err(|_| SealError::AuthenticationFailed)?;

        Ok(SecretMaterial::new(plaintext))
    }

    pub fn kdf_params(&self) -> KdfParams {
        self.kdf
    }
}

impl fmt::Debug for SealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedSecret")
            .field("kdf", &self.kdf)
            .field("salt", &hex::encode(self.salt))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}
