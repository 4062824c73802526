//! Key ring management over parsed key entities
//!
//! - `core_keyring`: keys, lock state, rings, identities, expiry filtering
//! - `config`: TOML and environment configuration
//! - `logging`: `tracing` subscriber setup
//! - `metrics`: counters and timings through the `metrics` facade

pub mod config;
pub mod core_keyring;
pub mod logging;
pub mod metrics;

pub use config::{Config, ConfigError, KeyRingConfig};
pub use core_keyring::{
    EmptyRingError, ExpiryPolicy, Identity, Key, KeyId, KeyRing, KeyRingError, SymmetricAlgorithm,
    SymmetricKey, Timestamp, UnlockError, ValidationError,
};
pub use logging::{init_logging, LogLevel};
