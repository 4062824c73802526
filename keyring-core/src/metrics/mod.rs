//! Metrics for key ring operations
//!
//! Recorded through the `metrics` facade; no recorder is installed here.
//! Without one, every call below is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Successful passphrase unlocks
pub const UNLOCK_SUCCESS: &str = "keyring.unlock.success";
/// Failed unlock attempts, wrong passphrase included
pub const UNLOCK_FAILED: &str = "keyring.unlock.failed";
/// Locked keys refused by ring construction or `add_key`
pub const RING_REJECTED_LOCKED: &str = "keyring.ring.rejected_locked";
/// Rings dropped by expiry filtering
pub const FILTER_DROPPED: &str = "keyring.filter.dropped";
/// Passphrase key derivation time
pub const KDF_DURATION_MS: &str = "keyring.kdf.duration_ms";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(UNLOCK_SUCCESS, "Number of keys unlocked with a passphrase");
    describe_counter!(UNLOCK_FAILED, "Number of failed unlock attempts");
    describe_counter!(
        RING_REJECTED_LOCKED,
        "Number of locked keys rejected from a key ring"
    );
    describe_counter!(FILTER_DROPPED, "Number of key rings dropped as expired");
    describe_histogram!(
        KDF_DURATION_MS,
        "Passphrase key derivation duration in milliseconds"
    );
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a histogram metric
pub fn record_histogram(name: &'static str, value: f64) {
    histogram!(name).record(value);
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Milliseconds since the timer started
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Stop the timer and record the duration
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed_ms();
        record_histogram(self.name, elapsed);
        elapsed
    }
}
