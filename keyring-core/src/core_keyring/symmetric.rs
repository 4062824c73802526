//! Symmetric key module
//!
//! Raw symmetric key material paired with its cipher algorithm, used for
//! passphrase-style encryption independently of asymmetric key rings.
//! Material is held in a `secrecy` wrapper and zeroized on drop.

use crate::core_keyring::errors::SymmetricKeyError;
use secrecy::{ExposeSecret, SecretVec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symmetric cipher algorithms a `SymmetricKey` may be declared for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetricAlgorithm {
    TripleDes,
    Cast5,
    Blowfish,
    Aes128,
    Aes192,
    Aes256,
    Twofish,
}

impl SymmetricAlgorithm {
    /// Required key length in bytes
    pub fn key_size(&self) -> usize {
        match self {
            SymmetricAlgorithm::TripleDes => 24,
            SymmetricAlgorithm::Cast5 => 16,
            SymmetricAlgorithm::Blowfish => 16,
            SymmetricAlgorithm::Aes128 => 16,
            SymmetricAlgorithm::Aes192 => 24,
            SymmetricAlgorithm::Aes256 => 32,
            SymmetricAlgorithm::Twofish => 32,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymmetricAlgorithm::TripleDes => "3des",
            SymmetricAlgorithm::Cast5 => "cast5",
            SymmetricAlgorithm::Blowfish => "blowfish",
            SymmetricAlgorithm::Aes128 => "aes128",
            SymmetricAlgorithm::Aes192 => "aes192",
            SymmetricAlgorithm::Aes256 => "aes256",
            SymmetricAlgorithm::Twofish => "twofish",
        }
    }

    /// Parse an algorithm name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self, SymmetricKeyError> {
        match name.to_lowercase().as_str() {
            "3des" | "tripledes" => Ok(SymmetricAlgorithm::TripleDes),
            "cast5" => Ok(SymmetricAlgorithm::Cast5),
            "blowfish" => Ok(SymmetricAlgorithm::Blowfish),
            "aes128" => Ok(SymmetricAlgorithm::Aes128),
            "aes192" => Ok(SymmetricAlgorithm::Aes192),
            "aes256" => Ok(SymmetricAlgorithm::Aes256),
            "twofish" => Ok(SymmetricAlgorithm::Twofish),
            _ => Err(SymmetricKeyError::UnknownAlgorithm(name.to_string())),
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Symmetric key material plus the algorithm it is declared for
///
/// Construction never fails; the length is checked at the point of use
/// through [`SymmetricKey::validate`] or [`SymmetricKey::material_for_use`].
pub struct SymmetricKey {
    material: SecretVec<u8>,
    algorithm: SymmetricAlgorithm,
}

impl SymmetricKey {
    pub fn new(material: Vec<u8>, algorithm: SymmetricAlgorithm) -> Self {
        SymmetricKey {
            material: SecretVec::new(material),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> SymmetricAlgorithm {
        self.algorithm
    }

    /// Length of the held material in bytes
    pub fn len(&self) -> usize {
        self.material.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the material length against the declared algorithm
    pub fn validate(&self) -> Result<(), SymmetricKeyError> {
        let expected = self.algorithm.key_size();
        let actual = self.len();
        if actual != expected {
            return Err(SymmetricKeyError::InvalidKeyMaterial {
                algorithm: self.algorithm,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Validated key bytes for the encryption pipeline
    pub fn material_for_use(&self) -> Result<&[u8], SymmetricKeyError> {
        self.validate()?;
        Ok(self.material.expose_secret())
    }
}

impl Clone for SymmetricKey {
    fn clone(&self) -> Self {
        SymmetricKey::new(self.material.expose_secret().clone(), self.algorithm)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &self.algorithm)
            .field("material", &"<redacted>")
            .finish()
    }
}
