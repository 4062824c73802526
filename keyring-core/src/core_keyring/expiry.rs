//! Expiry evaluation
//!
//! Stateless checks over entity validity metadata. An expiry instant is
//! itself invalid: a sub-unit expiring at `t` is expired when evaluated at
//! `t`. A sub-unit with no expiry never expires.

use crate::core_keyring::entity::Entity;
use crate::core_keyring::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How expiry filtering treats a ring that contains an expired key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Drop the whole ring if any key in it is expired
    #[default]
    WholeRing,
    /// Drop only the expired keys; rings left empty are dropped
    PruneKeys,
}

impl ExpiryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryPolicy::WholeRing => "whole_ring",
            ExpiryPolicy::PruneKeys => "prune_keys",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "whole_ring" | "whole-ring" => Some(ExpiryPolicy::WholeRing),
            "prune_keys" | "prune-keys" => Some(ExpiryPolicy::PruneKeys),
            _ => None,
        }
    }
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an optional expiry boundary has passed at `at`
pub fn is_expired(expires_at: Option<Timestamp>, at: Timestamp) -> bool {
    match expires_at {
        Some(expiry) => expiry <= at,
        None => false,
    }
}

/// Whether an entity is expired at `at`
///
/// The primary key and every signing-capable subkey are checked.
/// Encryption-only subkeys do not expire the entity.
pub fn entity_is_expired(entity: &Entity, at: Timestamp) -> bool {
    if entity.primary().is_expired_at(at) {
        return true;
    }

    entity
        .subkeys()
        .iter()
        .filter(|subkey| subkey.can_sign())
        .any(|subkey| subkey.is_expired_at(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_keyring::entity::SubKey;
    use crate::core_keyring::material::KeyAlgorithm;

    fn at(secs: u64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn test_no_expiry_never_expires() {
        assert!(!is_expired(None, at(0)));
        assert!(!is_expired(None, Timestamp::from_millis(u64::MAX)));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expiry = Some(at(100));
        assert!(!is_expired(expiry, at(99)));
        assert!(is_expired(expiry, at(100)));
        assert!(is_expired(expiry, at(101)));
        assert!(!is_expired(expiry, Timestamp::from_millis(99_999)));
    }

    #[test]
    fn test_expired_primary_expires_entity() {
        let primary = SubKey::new(KeyAlgorithm::EdDsa, vec![1; 32], at(10)).with_expiry(at(50));
        let entity = Entity::new(primary);

        assert!(!entity_is_expired(&entity, at(49)));
        assert!(entity_is_expired(&entity, at(50)));
    }

    #[test]
    fn test_expired_signing_subkey_expires_entity() {
        let primary = SubKey::new(KeyAlgorithm::EdDsa, vec![1; 32], at(10));
        let signing = SubKey::new(KeyAlgorithm::EdDsa, vec![2; 32], at(10)).with_expiry(at(50));
        let entity = Entity::new(primary).with_subkey(signing);

        assert!(entity_is_expired(&entity, at(60)));
    }

    #[test]
    fn test_expired_encryption_subkey_does_not_expire_entity() {
        let primary = SubKey::new(KeyAlgorithm::EdDsa, vec![1; 32], at(10));
        let encryption = SubKey::new(KeyAlgorithm::Ecdh, vec![2; 32], at(10)).with_expiry(at(50));
        let entity = Entity::new(primary).with_subkey(encryption);

        assert!(!entity_is_expired(&entity, at(60)));
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(ExpiryPolicy::default(), ExpiryPolicy::WholeRing);
        assert_eq!(ExpiryPolicy::from_str("PRUNE-KEYS"), Some(ExpiryPolicy::PruneKeys));
        assert_eq!(ExpiryPolicy::from_str("per_key"), None);
        assert_eq!(ExpiryPolicy::PruneKeys.to_string(), "prune_keys");
    }
}
