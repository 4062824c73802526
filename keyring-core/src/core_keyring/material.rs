//! Key material module
//!
//! Algorithm tags, usage flags and the in-memory holder for decrypted
//! private key material. The cryptographic math behind each algorithm lives
//! with the external collaborator; this layer only needs to know what each
//! algorithm is declared to be capable of.
//!
//! Security: private material is zeroized on drop and never printed by `Debug`.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public key algorithm of a key or subkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// RSA, sign and encrypt
    Rsa,
    /// DSA, sign only
    Dsa,
    /// ElGamal, encrypt only
    ElGamal,
    /// ECDSA, sign only
    Ecdsa,
    /// ECDH (e.g. X25519), encrypt only
    Ecdh,
    /// EdDSA (e.g. Ed25519), sign only
    EdDsa,
}

impl KeyAlgorithm {
    pub fn can_sign(&self) -> bool {
        matches!(
            self,
            KeyAlgorithm::Rsa | KeyAlgorithm::Dsa | KeyAlgorithm::Ecdsa | KeyAlgorithm::EdDsa
        )
    }

    pub fn can_encrypt(&self) -> bool {
        matches!(
            self,
            KeyAlgorithm::Rsa | KeyAlgorithm::ElGamal | KeyAlgorithm::Ecdh
        )
    }

    /// Stable one-byte tag, mixed into fingerprints
    pub fn tag(&self) -> u8 {
        match self {
            KeyAlgorithm::Rsa => 1,
            KeyAlgorithm::ElGamal => 16,
            KeyAlgorithm::Dsa => 17,
            KeyAlgorithm::Ecdh => 18,
            KeyAlgorithm::Ecdsa => 19,
            KeyAlgorithm::EdDsa => 22,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyAlgorithm::Rsa => "rsa",
            KeyAlgorithm::Dsa => "dsa",
            KeyAlgorithm::ElGamal => "elgamal",
            KeyAlgorithm::Ecdsa => "ecdsa",
            KeyAlgorithm::Ecdh => "ecdh",
            KeyAlgorithm::EdDsa => "eddsa",
        };
        write!(f, "{}", name)
    }
}

/// Usage flags declared on a key or subkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyUsage {
    pub sign: bool,
    pub encrypt: bool,
    pub certify: bool,
}

impl KeyUsage {
    pub const SIGN: KeyUsage = KeyUsage {
        sign: true,
        encrypt: false,
        certify: false,
    };
    pub const ENCRYPT: KeyUsage = KeyUsage {
        sign: false,
        encrypt: true,
        certify: false,
    };
    pub const CERTIFY_SIGN: KeyUsage = KeyUsage {
        sign: true,
        encrypt: false,
        certify: true,
    };
    pub const ALL: KeyUsage = KeyUsage {
        sign: true,
        encrypt: true,
        certify: true,
    };

    /// Usage flags an algorithm supports when none are declared explicitly
    pub fn for_algorithm(algorithm: KeyAlgorithm) -> Self {
        KeyUsage {
            sign: algorithm.can_sign(),
            encrypt: algorithm.can_encrypt(),
            certify: algorithm.can_sign(),
        }
    }
}

/// Decrypted private key material
///
/// The bytes are opaque here and consumed by the signing/decryption
/// collaborator. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretMaterial(Vec<u8>);

impl SecretMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        SecretMaterial(bytes)
    }

    /// Get reference to the secret bytes (use carefully!)
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("len", &self.0.len())
            .field("bytes", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_capabilities() {
        assert!(KeyAlgorithm::Rsa.can_sign());
        assert!(KeyAlgorithm::Rsa.can_encrypt());
        assert!(KeyAlgorithm::EdDsa.can_sign());
        assert!(!KeyAlgorithm::EdDsa.can_encrypt());
        assert!(!KeyAlgorithm::Ecdh.can_sign());
        assert!(KeyAlgorithm::Ecdh.can_encrypt());
        assert!(!KeyAlgorithm::ElGamal.can_sign());
        assert!(!KeyAlgorithm::Dsa.can_encrypt());
    }

    #[test]
    fn test_default_usage_follows_algorithm() {
        let usage = KeyUsage::for_algorithm(KeyAlgorithm::Ecdh);
        assert!(usage.encrypt);
        assert!(!usage.sign);
        assert!(!usage.certify);

        assert_eq!(KeyUsage::for_algorithm(KeyAlgorithm::Rsa), KeyUsage::ALL);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let secret = SecretMaterial::new(vec![0xde, 0xad, 0xbe, 0xef]);
        let debug_str = format!("{:?}", secret);

        assert!(debug_str.contains("<redacted>"), "Debug should redact secret");
        assert!(!debug_str.contains("222"), "Debug should not show secret bytes");
        assert!(!debug_str.contains("deadbeef"));
    }
}
