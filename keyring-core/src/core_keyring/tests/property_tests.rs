//! Property tests for ring ordering and counting

use super::helpers::*;
use crate::core_keyring::*;
use proptest::prelude::*;

/// 0 = RSA-class, 1 = elliptic-curve, 2 = public-only
fn key_for(kind: u8, seed: u64) -> Key {
    match kind {
        0 => rsa_key(seed),
        1 => ec_key(seed),
        _ => ec_key(seed).to_public(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_counts_match_added_keys(kinds in prop::collection::vec(0u8..3, 0..8)) {
        let mut ring = KeyRing::empty();
        let mut keys = Vec::new();
        for (i, kind) in kinds.iter().enumerate() {
            let key = key_for(*kind, i as u64);
            keys.push(key.clone());
            ring.add_key(key).unwrap();
        }

        prop_assert_eq!(ring.count_entities(), kinds.len());
        prop_assert_eq!(
            ring.count_decryption_entities(),
            keys.iter().filter(|key| key.can_decrypt()).count()
        );
        let expected: Vec<KeyId> = keys.iter().map(Key::key_id).collect();
        prop_assert_eq!(ring.key_ids(), expected);
    }

    #[test]
    fn prop_first_key_selects_first_inserted(kinds in prop::collection::vec(0u8..3, 1..6)) {
        let keys: Vec<Key> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| key_for(*kind, 100 + i as u64))
            .collect();
        let ring = KeyRing::new(keys.clone()).unwrap();

        let first = ring.first_key().unwrap();
        prop_assert_eq!(first.count_entities(), 1);
        prop_assert_eq!(first.key_ids(), vec![keys[0].key_id()]);
    }

    #[test]
    fn prop_whole_ring_filter_keeps_only_clean_rings(
        expired_flags in prop::collection::vec(any::<bool>(), 0..6),
    ) {
        let now = Timestamp::from_secs(1_700_000_000);
        let rings: Vec<KeyRing> = expired_flags
            .iter()
            .enumerate()
            .map(|(i, expired)| {
                let mut keys = vec![ec_key(i as u64)];
                if *expired {
                    keys.push(expired_key(i as u64, now));
                }
                KeyRing::new(keys).unwrap()
            })
            .collect();

        let kept = KeyRing::filter_expired_keys(&rings, now);
        prop_assert_eq!(kept.len(), expired_flags.iter().filter(|e| !**e).count());
        prop_assert!(kept.iter().all(|ring| !ring.is_expired(now)));
    }
}
