/*
    types.rs - Shared value types for the key ring layer

    Defines:
    - Timestamps (Unix milliseconds)
    - 64-bit key identifiers
    - Key fingerprints
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp representing the current time
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Create a timestamp from milliseconds since epoch
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Create a timestamp from seconds since epoch
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Get milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get whole seconds since epoch
    pub fn as_secs(&self) -> u64 {
        self.0 / 1000
    }

    pub fn saturating_add_millis(&self, millis: u64) -> Self {
        Timestamp(self.0.saturating_add(millis))
    }

    pub fn saturating_sub_millis(&self, millis: u64) -> Self {
        Timestamp(self.0.saturating_sub(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit key identifier of a single key or subkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyId(pub u64);

impl KeyId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// 16 lowercase hex digits, zero padded
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }

    /// Parse a 16 digit hex key id (case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self, String> {
        if s.len() != 16 {
            return Err(format!("Key id must be 16 hex digits, got {}", s.len()));
        }
        u64::from_str_radix(s, 16)
            .map(KeyId)
            .map_err(|e| format!("Invalid hex key id: {}", e))
    }
}

impl From<KeyId> for u64 {
    fn from(id: KeyId) -> Self {
        id.0
    }
}

impl From<u64> for KeyId {
    fn from(id: u64) -> Self {
        KeyId(id)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Length of a key fingerprint in bytes
pub const FINGERPRINT_LEN: usize = 20;

/// Fingerprint of a single key or subkey
///
/// The key id is the trailing 8 bytes of the fingerprint, read big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    pub fn key_id(&self) -> KeyId {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[FINGERPRINT_LEN - 8..]);
        KeyId(u64::from_be_bytes(tail))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ordering() {
        let ts1 = Timestamp::from_secs(10);
        let ts2 = ts1.saturating_add_millis(1);
        assert!(ts1 < ts2);
        assert_eq!(ts1.as_millis(), 10_000);
        assert_eq!(ts2.as_secs(), 10);
    }

    #[test]
    fn test_timestamp_now_is_monotonic_enough() {
        let ts1 = Timestamp::now();
        let ts2 = Timestamp::now();
        assert!(ts2 >= ts1);
    }

    #[test]
    fn test_key_id_hex_is_zero_padded() {
        assert_eq!(KeyId(0x1f).to_hex(), "000000000000001f");
        assert_eq!(KeyId::from_hex("000000000000001F").unwrap(), KeyId(0x1f));
        assert!(KeyId::from_hex("1f").is_err());
        assert!(KeyId::from_hex("zzzzzzzzzzzzzzzz").is_err());
    }

    #[test]
    fn test_fingerprint_key_id_is_trailing_bytes() {
        let mut bytes = [0u8; FINGERPRINT_LEN];
        bytes[12..].copy_from_slice(&[0x3e, 0xb6, 0x25, 0x9e, 0xdf, 0x21, 0xdf, 0x24]);
        let fp = Fingerprint(bytes);
        assert_eq!(fp.key_id(), KeyId(0x3eb6259edf21df24));
        assert_eq!(u64::from(fp.key_id()), 4518840640391470884);
    }
}
